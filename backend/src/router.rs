use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{docs::ApiDoc, handlers, middleware, state::AppState};

pub fn router(state: AppState) -> Router {
    // Every calendar route forwards the caller's Frappe credentials.
    let employee_routes = Router::new()
        .route(
            "/api/employees/{employee_id}/calendar",
            get(handlers::get_calendar),
        )
        .route(
            "/api/employees/{employee_id}/checkins",
            post(handlers::submit_check_entry),
        )
        .route_layer(axum_middleware::from_fn(middleware::require_frappe_auth));

    Router::new()
        .route("/api/health", get(handlers::health))
        .merge(employee_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
