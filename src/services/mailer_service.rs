use std::fmt;

use serde_json::json;

#[derive(Debug, Clone)]
pub struct MailUpstreamError {
    pub detail: String,
}

impl fmt::Display for MailUpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mail upstream: {}", self.detail)
    }
}

fn mail_base_url() -> String {
    std::env::var("MAIL_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8025".to_string())
}

/// Hand one message to the mail transport. Returns only after the transport
/// has accepted or rejected it; retrying is the caller's call.
pub async fn send_email(to: &str, subject: &str, html_body: &str) -> Result<(), MailUpstreamError> {
    let base_url = mail_base_url();
    let url = format!("{}/send", base_url.trim_end_matches('/'));
    let api_key = std::env::var("MAIL_API_KEY").ok();

    let client = reqwest::Client::new();
    let mut req = client.post(&url).json(&json!({
        "to": to,
        "subject": subject,
        "html": html_body
    }));

    if let Some(key) = api_key {
        req = req.header("x-api-key", key);
    }

    let resp = req.send().await.map_err(|e| MailUpstreamError {
        detail: format!("connect failed for {}: {}", url, e),
    })?;

    if !resp.status().is_success() {
        return Err(MailUpstreamError {
            detail: format!("delivery to {} rejected: {}", to, resp.status()),
        });
    }

    Ok(())
}
