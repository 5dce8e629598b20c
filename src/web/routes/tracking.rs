use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::models::EligibleAttendeeRow;
use crate::models::TrackingPurpose;
use crate::services::tracking_service;

#[derive(Template)]
#[template(path = "eligible.html")]
pub struct EligibleTemplate {
    pub purpose: String,
    pub attendees: Vec<EligibleView>,
}

pub struct EligibleView {
    pub barcode: String,
    pub name: String,
    pub email: String,
    pub order_date: String,
    pub job_title: String,
    pub company: String,
}

#[derive(Template)]
#[template(path = "tracking_result.html")]
pub struct TrackingResultTemplate {
    pub purpose: String,
    pub message: String,
}

fn build_eligible_view(row: EligibleAttendeeRow) -> EligibleView {
    EligibleView {
        name: format!("{} {}", row.first_name, row.last_name),
        barcode: row.barcode,
        email: row.email,
        order_date: row.order_date.unwrap_or_default(),
        job_title: row.job_title.unwrap_or_default(),
        company: row.company.unwrap_or_default(),
    }
}

pub async fn eligible_handler(
    Path(purpose): Path<String>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let Some(purpose) = TrackingPurpose::parse(&purpose) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let rows = match tracking_service::fetch_eligible(&pool, purpose).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Eligible fetch failed for {}: {}", purpose, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = EligibleTemplate {
        purpose: purpose.as_str().to_string(),
        attendees: rows.into_iter().map(build_eligible_view).collect(),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct MarkForm {
    pub barcode: String,
}

pub async fn mark_handler(
    Path(purpose): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<MarkForm>,
) -> impl IntoResponse {
    let Some(purpose) = TrackingPurpose::parse(&purpose) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if form.barcode.trim().is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    // Dashboard marks always stamp "now"; backdating is a script concern.
    let outcome = match tracking_service::mark_one(&pool, purpose, &form.barcode, None).await {
        Ok(o) => o,
        Err(e) => {
            warn!("Mark failed for {} ({}): {}", form.barcode, purpose, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = TrackingResultTemplate {
        purpose: purpose.as_str().to_string(),
        message: outcome.message,
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct MarkBatchForm {
    pub barcodes: String,
}

pub async fn mark_batch_handler(
    Path(purpose): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<MarkBatchForm>,
) -> impl IntoResponse {
    let Some(purpose) = TrackingPurpose::parse(&purpose) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let report = match tracking_service::mark_batch(&pool, purpose, &form.barcodes, None).await {
        Ok(r) => r,
        Err(e) => {
            warn!("Batch mark failed for {}: {}", purpose, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = TrackingResultTemplate {
        purpose: purpose.as_str().to_string(),
        message: report.message,
    };
    Html(template.render().unwrap()).into_response()
}
