use ess_backend::{config::Config, router, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ess_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        frappe_base_url = %config.frappe.base_url,
        frappe_timeout_secs = config.frappe.timeout_secs,
        checkin_doctype = %config.frappe.checkin_doctype,
        attendance_doctype = %config.frappe.attendance_doctype,
        wfh_doctype = %config.frappe.wfh_doctype,
        od_doctype = %config.frappe.od_doctype,
        time_zone = %config.time_zone,
        edit_window_days = config.edit_window_days,
        "Loaded configuration from environment/.env"
    );

    let addr = config.bind_addr;
    let state = AppState::from_config(config)?;
    let app = router(state);

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
