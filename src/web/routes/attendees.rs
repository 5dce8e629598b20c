use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::attendee_repo;
use crate::models::AttendeeRow;

#[derive(Template)]
#[template(path = "attendees.html")]
pub struct AttendeesTemplate {
    pub attendees: Vec<AttendeeView>,
}

pub struct AttendeeView {
    pub barcode: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub order_id: String,
    pub lunch_preference: String,
}

fn build_attendee_view(row: AttendeeRow) -> AttendeeView {
    let name = format!(
        "{} {}",
        row.first_name.as_deref().unwrap_or(""),
        row.last_name.as_deref().unwrap_or("")
    )
    .trim()
    .to_string();

    AttendeeView {
        barcode: row.barcode,
        name,
        email: row.email.unwrap_or_default(),
        company: row.company.unwrap_or_default(),
        order_id: row.order_id.unwrap_or_default(),
        lunch_preference: row.lunch_preference.unwrap_or_default(),
    }
}

pub async fn attendees_handler(State(pool): State<SqlitePool>) -> impl IntoResponse {
    let rows = match attendee_repo::list_attendees(&pool).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Attendee list failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = AttendeesTemplate {
        attendees: rows.into_iter().map(build_attendee_view).collect(),
    };
    Html(template.render().unwrap()).into_response()
}
