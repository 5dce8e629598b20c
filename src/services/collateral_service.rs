use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use askama::Template;
use sqlx::SqlitePool;
use tracing::info;
use tracing::warn;

use crate::models::TrackingPurpose;
use crate::services::session_service::SessionView;
use crate::services::tracking_service;

#[derive(Template)]
#[template(path = "collateral/badge.html")]
struct BadgeTemplate<'a> {
    first_name: &'a str,
    last_name: &'a str,
    company: &'a str,
    job_title: &'a str,
    barcode: &'a str,
    qr_url: String,
    conference_name: &'a str,
}

#[derive(Template)]
#[template(path = "collateral/stamp_game.html")]
struct StampGameTemplate<'a> {
    stations: Vec<String>,
    conference_name: &'a str,
}

#[derive(Template)]
#[template(path = "collateral/schedule.html")]
struct ScheduleTemplate<'a> {
    sessions: &'a [SessionView],
    conference_name: &'a str,
}

#[derive(Debug, Default)]
pub struct SpeedPassReport {
    pub candidates: usize,
    pub rendered: usize,
    pub failed: usize,
    pub newly_tracked: u64,
}

fn conference_name() -> String {
    std::env::var("CONFERENCE_NAME").unwrap_or_else(|_| "CodeFest".to_string())
}

// QR rendering stays external: the badge just points at the image service
// with the barcode as payload.
fn qr_url(barcode: &str) -> String {
    let base =
        std::env::var("QR_SERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8100".to_string());
    format!("{}/qr?data={}", base.trim_end_matches('/'), barcode)
}

/// Render a SpeedPass PDF for every attendee that does not have one yet,
/// then record the printed barcodes in one batch.
///
/// A badge that fails to render or print is skipped and counted; the batch
/// mark only covers badges that made it to PDF, so a re-run picks up the
/// stragglers.
pub async fn render_speedpasses(pool: &SqlitePool, out_dir: &Path) -> sqlx::Result<SpeedPassReport> {
    let eligible = tracking_service::fetch_eligible(pool, TrackingPurpose::BadgePrinted).await?;
    let mut report = SpeedPassReport {
        candidates: eligible.len(),
        ..SpeedPassReport::default()
    };

    fs::create_dir_all(out_dir).map_err(sqlx::Error::Io)?;
    let conference = conference_name();

    let mut printed = Vec::new();
    for attendee in &eligible {
        let template = BadgeTemplate {
            first_name: &attendee.first_name,
            last_name: &attendee.last_name,
            company: attendee.company.as_deref().unwrap_or(""),
            job_title: attendee.job_title.as_deref().unwrap_or(""),
            barcode: &attendee.barcode,
            qr_url: qr_url(&attendee.barcode),
            conference_name: &conference,
        };

        match render_to_pdf(template, out_dir, &format!("speedpass_{}", attendee.barcode)) {
            Ok(_) => {
                printed.push(attendee.barcode.clone());
                report.rendered += 1;
            }
            Err(e) => {
                warn!("🖨 SpeedPass failed for {}: {}", attendee.barcode, e);
                report.failed += 1;
            }
        }
    }

    if !printed.is_empty() {
        let batch = tracking_service::mark_batch(
            pool,
            TrackingPurpose::BadgePrinted,
            &printed.join(","),
            None,
        )
        .await?;
        report.newly_tracked = batch.new_count;
    }

    info!(
        "🖨 SpeedPass run done: candidates={}, rendered={}, failed={}, newly_tracked={}",
        report.candidates, report.rendered, report.failed, report.newly_tracked
    );

    Ok(report)
}

pub fn render_stamp_game(out_dir: &Path) -> Result<PathBuf, String> {
    let stations: Vec<String> = std::env::var("STAMP_GAME_STATIONS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let conference = conference_name();
    let template = StampGameTemplate {
        stations,
        conference_name: &conference,
    };
    render_to_pdf(template, out_dir, "stamp_game")
}

pub fn render_schedule(out_dir: &Path, sessions: &[SessionView]) -> Result<PathBuf, String> {
    let conference = conference_name();
    let template = ScheduleTemplate {
        sessions,
        conference_name: &conference,
    };
    render_to_pdf(template, out_dir, "schedule")
}

fn render_to_pdf(template: impl Template, out_dir: &Path, stem: &str) -> Result<PathBuf, String> {
    let html = template
        .render()
        .map_err(|e| format!("template render: {}", e))?;

    let html_path = out_dir.join(format!("{}.html", stem));
    let pdf_path = out_dir.join(format!("{}.pdf", stem));
    fs::write(&html_path, html).map_err(|e| format!("write {}: {}", html_path.display(), e))?;

    print_to_pdf(&html_path, &pdf_path)?;
    Ok(pdf_path)
}

/// Convert a rendered HTML file to PDF via the browser's print mode.
fn print_to_pdf(html_path: &Path, pdf_path: &Path) -> Result<(), String> {
    let browser = std::env::var("BROWSER_BIN").unwrap_or_else(|_| "chromium".to_string());

    let output = Command::new(&browser)
        .arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-pdf-header-footer")
        .arg(format!("--print-to-pdf={}", pdf_path.display()))
        .arg(html_path.display().to_string())
        .output()
        .map_err(|e| format!("spawn {}: {}", browser, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{} exited with {}: {}",
            browser,
            output.status,
            stderr.trim()
        ));
    }
    Ok(())
}
