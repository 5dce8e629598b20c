use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

/// Gate every dashboard route behind the shared ops token.
///
/// The token can come in as an `x-ops-token` header (curl, scripts) or an
/// `ops_token` cookie (browser). With no `OPS_ADMIN_TOKEN` configured the
/// dashboard is open, which is the intended local-dev mode.
/// The configured ops token, if any. Empty counts as unset so a blank line
/// in `.env` does not lock everyone out with an unguessable token.
pub fn configured_token() -> Option<String> {
    std::env::var("OPS_ADMIN_TOKEN").ok().filter(|v| !v.is_empty())
}

pub async fn require_ops_token(request: Request, next: Next) -> Response {
    let Some(expected) = configured_token() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get("x-ops-token")
        .and_then(|hv| hv.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            request
                .headers()
                .get(header::COOKIE)
                .and_then(|hv| hv.to_str().ok())
                .and_then(|cookies| {
                    cookies
                        .split("; ")
                        .find(|c| c.starts_with("ops_token="))
                        .and_then(|c| c.strip_prefix("ops_token="))
                })
                .map(str::to_string)
        });

    if presented.as_deref() == Some(expected.as_str()) {
        return next.run(request).await;
    }

    Response::builder()
        .status(401)
        .body(axum::body::Body::from("Unauthorized - ops token required"))
        .unwrap()
}
