use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct SessionUpstreamError {
    pub detail: String,
}

impl fmt::Display for SessionUpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session upstream: {}", self.detail)
    }
}

fn session_base_url() -> String {
    std::env::var("SESSION_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8090".to_string())
}

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    sessions: Option<Vec<SessionHit>>,
}

#[derive(Debug, Deserialize)]
struct SessionHit {
    title: Option<String>,
    speaker: Option<String>,
    room: Option<String>,
    #[serde(alias = "startsAt")]
    starts_at: Option<String>,
    #[serde(alias = "endsAt")]
    ends_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionView {
    pub title: String,
    pub speaker: String,
    pub room: String,
    pub starts_at: String,
    pub ends_at: String,
}

/// Fetch the talk schedule from the session-management platform, ordered by
/// start time. Untitled entries are placeholders in the planning tool and
/// are dropped.
pub async fn fetch_schedule() -> Result<Vec<SessionView>, SessionUpstreamError> {
    let base_url = session_base_url();
    let url = format!("{}/sessions", base_url.trim_end_matches('/'));

    let client = reqwest::Client::new();
    let resp = client.get(&url).send().await.map_err(|e| SessionUpstreamError {
        detail: format!("connect failed for {}: {}", url, e),
    })?;

    if !resp.status().is_success() {
        return Err(SessionUpstreamError {
            detail: format!("non-OK status {}", resp.status()),
        });
    }

    let parsed: SessionsResponse = resp.json().await.map_err(|e| SessionUpstreamError {
        detail: format!("JSON parse failed: {}", e),
    })?;

    let mut sessions: Vec<SessionView> = parsed
        .sessions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|hit| {
            let title = hit.title.filter(|t| !t.trim().is_empty())?;
            Some(SessionView {
                title,
                speaker: hit.speaker.unwrap_or_default(),
                room: hit.room.unwrap_or_default(),
                starts_at: hit.starts_at.unwrap_or_default(),
                ends_at: hit.ends_at.unwrap_or_default(),
            })
        })
        .collect();

    sessions.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    Ok(sessions)
}
