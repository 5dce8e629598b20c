use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::models::NewAttendee;

#[derive(Debug, Clone)]
pub struct TicketingUpstreamError {
    pub detail: String,
}

impl fmt::Display for TicketingUpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticketing upstream: {}", self.detail)
    }
}

fn ticketing_base_url() -> String {
    std::env::var("TICKETING_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

#[derive(Debug, Deserialize)]
struct AttendeePage {
    attendees: Option<Vec<AttendeeHit>>,
    has_more: Option<bool>,
}

// The ticketing export is not stable across platform updates; keep every
// field optional and accept both snake_case and camelCase keys.
#[derive(Debug, Deserialize)]
struct AttendeeHit {
    barcode: Option<String>,
    #[serde(alias = "orderNumber")]
    order_id: Option<String>,
    #[serde(alias = "firstName")]
    first_name: Option<String>,
    #[serde(alias = "lastName")]
    last_name: Option<String>,
    email: Option<String>,
    #[serde(alias = "orderDate")]
    order_date: Option<String>,
    #[serde(alias = "jobTitle")]
    job_title: Option<String>,
    company: Option<String>,
    #[serde(alias = "lunchPreference")]
    lunch_preference: Option<String>,
    #[serde(alias = "cocAccepted")]
    coc_accepted: Option<bool>,
    #[serde(alias = "volunteerInterest")]
    volunteer_interest: Option<bool>,
    #[serde(alias = "socialHandles")]
    social_handles: Option<String>,
}

/// Pull the complete attendee set from the ticketing platform, page by page.
///
/// The platform is the single source of truth, so this always walks every
/// page; incremental sync is not a thing here.
pub async fn fetch_all_attendees() -> Result<Vec<NewAttendee>, TicketingUpstreamError> {
    let base_url = ticketing_base_url();
    let token = std::env::var("TICKETING_API_TOKEN").map_err(|_| TicketingUpstreamError {
        detail: "TICKETING_API_TOKEN is not set".to_string(),
    })?;

    let url = format!("{}/attendees", base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    let mut attendees = Vec::new();
    let mut page = 1u32;
    loop {
        let resp = client
            .get(&url)
            .query(&[("page", page.to_string())])
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| TicketingUpstreamError {
                detail: format!("connect failed for {}: {}", url, e),
            })?;

        if !resp.status().is_success() {
            return Err(TicketingUpstreamError {
                detail: format!("non-OK status {} on page {}", resp.status(), page),
            });
        }

        let parsed: AttendeePage = resp.json().await.map_err(|e| TicketingUpstreamError {
            detail: format!("JSON parse failed on page {}: {}", page, e),
        })?;

        let hits = parsed.attendees.unwrap_or_default();
        if hits.is_empty() {
            break;
        }

        for hit in hits {
            match attendee_from_hit(hit) {
                Some(a) => attendees.push(a),
                None => warn!("🎟 Skipping ticketing record without barcode (page {})", page),
            }
        }

        if !parsed.has_more.unwrap_or(false) {
            break;
        }
        page += 1;
    }

    Ok(attendees)
}

fn attendee_from_hit(hit: AttendeeHit) -> Option<NewAttendee> {
    let barcode = hit.barcode.map(|b| b.trim().to_string())?;
    if barcode.is_empty() {
        return None;
    }

    Some(NewAttendee {
        barcode,
        order_id: hit.order_id,
        first_name: hit.first_name,
        last_name: hit.last_name,
        email: hit.email,
        order_date: hit.order_date,
        job_title: hit.job_title,
        company: hit.company,
        lunch_preference: hit.lunch_preference,
        coc_accepted: hit.coc_accepted.map(i64::from),
        volunteer_interest: hit.volunteer_interest.map(i64::from),
        social_handles: hit.social_handles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_maps_camel_case_keys() {
        let hit: AttendeeHit = serde_json::from_str(
            r#"{
                "barcode": "T100",
                "orderNumber": "ORD-7",
                "firstName": "Anna",
                "lastName": "Zed",
                "email": "anna@example.org",
                "cocAccepted": true
            }"#,
        )
        .unwrap();

        let attendee = attendee_from_hit(hit).unwrap();
        assert_eq!(attendee.barcode, "T100");
        assert_eq!(attendee.order_id.as_deref(), Some("ORD-7"));
        assert_eq!(attendee.first_name.as_deref(), Some("Anna"));
        assert_eq!(attendee.coc_accepted, Some(1));
    }

    #[test]
    fn hit_without_barcode_is_dropped() {
        let hit: AttendeeHit = serde_json::from_str(r#"{"email": "x@example.org"}"#).unwrap();
        assert!(attendee_from_hit(hit).is_none());

        let hit: AttendeeHit =
            serde_json::from_str(r#"{"barcode": "   ", "email": "x@example.org"}"#).unwrap();
        assert!(attendee_from_hit(hit).is_none());
    }
}
