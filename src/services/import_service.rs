use sqlx::SqlitePool;
use tracing::info;

use crate::database::attendee_repo;
use crate::models::NewAttendee;

#[derive(Debug, Default)]
pub struct ImportReport {
    pub fetched: usize,
    pub loaded: u64,
}

/// Replace the attendee set with a fresh ticketing export.
///
/// `fetched` counts what the platform delivered, `loaded` what survived the
/// staging insert (the export occasionally repeats barcodes across pages).
pub async fn reload_attendees(
    pool: &SqlitePool,
    attendees: &[NewAttendee],
) -> sqlx::Result<ImportReport> {
    let fetched = attendees.len();
    let loaded = attendee_repo::replace_all(pool, attendees).await?;

    info!("🎟 Attendee reload done: fetched={}, loaded={}", fetched, loaded);

    Ok(ImportReport { fetched, loaded })
}
