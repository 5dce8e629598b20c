use askama::Template;
use sqlx::SqlitePool;
use tracing::info;
use tracing::warn;

use crate::models::TrackingPurpose;
use crate::services::mailer_service;
use crate::services::tracking_service;

#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationEmailTemplate<'a> {
    first_name: &'a str,
    last_name: &'a str,
    barcode: &'a str,
    conference_name: &'a str,
}

#[derive(Debug, Default)]
pub struct EmailRunReport {
    pub candidates: usize,
    pub sent: usize,
    pub failed: usize,
}

fn conference_name() -> String {
    std::env::var("CONFERENCE_NAME").unwrap_or_else(|_| "CodeFest".to_string())
}

/// Send a confirmation email to every attendee that has not had one yet.
///
/// Each attendee is marked as emailed only after the transport accepted the
/// message, so a run that dies halfway can simply be re-run: already-marked
/// attendees are no longer eligible. Transport rejections are counted, not
/// fatal; store failures abort the run.
pub async fn send_confirmations(pool: &SqlitePool) -> sqlx::Result<EmailRunReport> {
    let eligible = tracking_service::fetch_eligible(pool, TrackingPurpose::Emailed).await?;
    let mut report = EmailRunReport {
        candidates: eligible.len(),
        ..EmailRunReport::default()
    };

    let conference = conference_name();
    let subject = std::env::var("CONFIRMATION_SUBJECT")
        .unwrap_or_else(|_| format!("Your {} SpeedPass is ready", conference));

    for attendee in eligible {
        let template = ConfirmationEmailTemplate {
            first_name: &attendee.first_name,
            last_name: &attendee.last_name,
            barcode: &attendee.barcode,
            conference_name: &conference,
        };
        let body = match template.render() {
            Ok(b) => b,
            Err(e) => {
                warn!("✉️ Render failed for {}: {}", attendee.barcode, e);
                report.failed += 1;
                continue;
            }
        };

        match mailer_service::send_email(&attendee.email, &subject, &body).await {
            Ok(()) => {
                tracking_service::mark_one(pool, TrackingPurpose::Emailed, &attendee.barcode, None)
                    .await?;
                report.sent += 1;
            }
            Err(e) => {
                warn!("✉️ Delivery failed for {} ({}): {}", attendee.barcode, attendee.email, e);
                report.failed += 1;
            }
        }
    }

    info!(
        "✉️ Confirmation run done: candidates={}, sent={}, failed={}",
        report.candidates, report.sent, report.failed
    );

    Ok(report)
}
