use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::attendee_repo;
use crate::database::tracking_repo;
use crate::models::TrackingPurpose;
use crate::services::tracking_service;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub attendee_count: i64,
    pub purposes: Vec<PurposeCardView>,
}

pub struct PurposeCardView {
    pub label: String,
    pub slug: String,
    pub tracked: i64,
    pub eligible: usize,
}

fn purpose_label(purpose: TrackingPurpose) -> &'static str {
    match purpose {
        TrackingPurpose::Emailed => "Confirmation emails",
        TrackingPurpose::BadgePrinted => "SpeedPass printing",
    }
}

pub async fn dashboard_handler(State(pool): State<SqlitePool>) -> impl IntoResponse {
    let attendee_count = match attendee_repo::count_attendees(&pool).await {
        Ok(v) => v,
        Err(e) => {
            warn!("Dashboard attendee count failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut purposes = Vec::new();
    for purpose in [TrackingPurpose::Emailed, TrackingPurpose::BadgePrinted] {
        let tracked = match tracking_repo::count_entries(&pool, purpose).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Dashboard tracking count failed for {}: {}", purpose, e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        let eligible = match tracking_service::fetch_eligible(&pool, purpose).await {
            Ok(rows) => rows.len(),
            Err(e) => {
                warn!("Dashboard eligible fetch failed for {}: {}", purpose, e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        purposes.push(PurposeCardView {
            label: purpose_label(purpose).to_string(),
            slug: purpose.as_str().to_string(),
            tracked,
            eligible,
        });
    }

    let template = DashboardTemplate {
        attendee_count,
        purposes,
    };
    Html(template.render().unwrap()).into_response()
}
