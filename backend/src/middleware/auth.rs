use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::repositories::FrappeAuth;

const ACCEPTED_SCHEMES: [&str; 2] = ["token ", "Bearer "];

/// Requires a Frappe `Authorization` header and hands it to handlers as [`FrappeAuth`].
///
/// The credential itself is checked by Frappe on the first forwarded call.
pub async fn require_frappe_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let auth = extract_frappe_auth(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

pub fn extract_frappe_auth(headers: &HeaderMap) -> Option<FrappeAuth> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    ACCEPTED_SCHEMES
        .iter()
        .find_map(|scheme| value.strip_prefix(scheme))
        .filter(|credential| !credential.trim().is_empty())
        .map(|_| FrappeAuth::new(value))
}
