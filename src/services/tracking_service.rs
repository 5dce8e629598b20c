use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::tracking_repo;
use crate::models::EligibleAttendeeRow;
use crate::models::TrackingPurpose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStatus {
    New,
    Updated,
}

#[derive(Debug, Clone)]
pub struct MarkOutcome {
    pub status: MarkStatus,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMarkReport {
    pub new_count: u64,
    pub updated_count: u64,
    pub message: String,
}

impl BatchMarkReport {
    pub fn total(&self) -> u64 {
        self.new_count + self.updated_count
    }
}

pub async fn fetch_eligible(
    pool: &SqlitePool,
    purpose: TrackingPurpose,
) -> sqlx::Result<Vec<EligibleAttendeeRow>> {
    tracking_repo::fetch_eligible(pool, purpose).await
}

/// Idempotently record completion for one barcode.
///
/// `completed_at` defaults to now; the default is applied here and nowhere
/// deeper, so everything below this call works with an explicit timestamp.
pub async fn mark_one(
    pool: &SqlitePool,
    purpose: TrackingPurpose,
    barcode: &str,
    completed_at: Option<DateTime<Utc>>,
) -> sqlx::Result<MarkOutcome> {
    let barcode = barcode.trim();
    if barcode.is_empty() {
        return Err(sqlx::Error::Protocol("barcode is required".into()));
    }

    let at = completed_at.unwrap_or_else(Utc::now);
    let inserted = tracking_repo::upsert_entry(pool, barcode, purpose, &at).await?;

    let outcome = if inserted {
        MarkOutcome {
            status: MarkStatus::New,
            message: format!("{} newly recorded for {}", barcode, purpose),
        }
    } else {
        MarkOutcome {
            status: MarkStatus::Updated,
            message: format!(
                "{} already recorded for {}, timestamp refreshed",
                barcode, purpose
            ),
        }
    };
    Ok(outcome)
}

/// Idempotently record completion for a comma-separated barcode list.
///
/// An input that is empty after trimming is a no-op success, not an error.
pub async fn mark_batch(
    pool: &SqlitePool,
    purpose: TrackingPurpose,
    raw_list: &str,
    completed_at: Option<DateTime<Utc>>,
) -> sqlx::Result<BatchMarkReport> {
    let barcodes = parse_barcode_list(raw_list);
    if barcodes.is_empty() {
        return Ok(BatchMarkReport {
            message: format!("no barcodes to record for {}", purpose),
            ..BatchMarkReport::default()
        });
    }

    let at = completed_at.unwrap_or_else(Utc::now);
    let (new_count, updated_count) =
        tracking_repo::upsert_entries(pool, &barcodes, purpose, &at).await?;

    Ok(BatchMarkReport {
        new_count,
        updated_count,
        message: format!(
            "{} barcodes recorded for {}: {} new, {} refreshed",
            new_count + updated_count,
            purpose,
            new_count,
            updated_count
        ),
    })
}

/// Tolerant parse of a comma-separated barcode list: trim every token, drop
/// empties, dedupe while keeping the first occurrence's position. Malformed
/// input never fails, it just yields fewer barcodes.
pub fn parse_barcode_list(raw: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut barcodes = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if seen.insert(token) {
            barcodes.push(token.to_string());
        }
    }
    barcodes
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::database::schema;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        schema::ensure_schema(&pool).await.unwrap();
        pool
    }

    fn stamp(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, secs).unwrap()
    }

    #[test]
    fn parse_trims_and_drops_empty_tokens() {
        assert_eq!(
            parse_barcode_list(" A1 ,A2,  , A3,"),
            vec!["A1", "A2", "A3"]
        );
        assert!(parse_barcode_list("").is_empty());
        assert!(parse_barcode_list(" , , ").is_empty());
    }

    #[test]
    fn parse_dedupes_keeping_first_occurrence() {
        assert_eq!(parse_barcode_list("A2, A1, A2, A1"), vec!["A2", "A1"]);
    }

    #[tokio::test]
    async fn mark_one_reports_new_then_updated() {
        let pool = test_pool().await;

        let first = mark_one(&pool, TrackingPurpose::Emailed, "T100", Some(stamp(0)))
            .await
            .unwrap();
        assert_eq!(first.status, MarkStatus::New);

        let second = mark_one(&pool, TrackingPurpose::Emailed, "T100", Some(stamp(5)))
            .await
            .unwrap();
        assert_eq!(second.status, MarkStatus::Updated);

        let entry = tracking_repo::load_entry(&pool, "T100", TrackingPurpose::Emailed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.completed_at, stamp(5).to_rfc3339());
    }

    #[tokio::test]
    async fn mark_one_rejects_empty_barcode() {
        let pool = test_pool().await;
        let result = mark_one(&pool, TrackingPurpose::Emailed, "   ", None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn mark_one_defaults_timestamp_to_now() {
        let pool = test_pool().await;

        let before = Utc::now();
        mark_one(&pool, TrackingPurpose::Emailed, "T100", None)
            .await
            .unwrap();

        let entry = tracking_repo::load_entry(&pool, "T100", TrackingPurpose::Emailed)
            .await
            .unwrap()
            .unwrap();
        let stored = DateTime::parse_from_rfc3339(&entry.completed_at)
            .unwrap()
            .with_timezone(&Utc);
        assert!(stored >= before);
        assert!((stored - before).num_seconds() < 5);
    }

    #[tokio::test]
    async fn mark_batch_partitions_new_and_updated() {
        let pool = test_pool().await;

        // A2 is already tracked, A1/A3 are not; the duplicate A1 and the
        // empty token must both be dropped by the parser.
        mark_one(&pool, TrackingPurpose::Emailed, "A2", Some(stamp(0)))
            .await
            .unwrap();

        let report = mark_batch(
            &pool,
            TrackingPurpose::Emailed,
            "A1, A2, A1,  , A3",
            Some(stamp(10)),
        )
        .await
        .unwrap();

        assert_eq!(report.new_count, 2);
        assert_eq!(report.updated_count, 1);
        assert_eq!(report.total(), 3);

        let refreshed = tracking_repo::load_entry(&pool, "A2", TrackingPurpose::Emailed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.completed_at, stamp(10).to_rfc3339());
    }

    #[tokio::test]
    async fn mark_batch_empty_input_is_a_noop() {
        let pool = test_pool().await;

        for raw in ["", " , , "] {
            let report = mark_batch(&pool, TrackingPurpose::BadgePrinted, raw, None)
                .await
                .unwrap();
            assert_eq!(report.new_count, 0);
            assert_eq!(report.updated_count, 0);
            assert_eq!(report.total(), 0);
        }

        let count = tracking_repo::count_entries(&pool, TrackingPurpose::BadgePrinted)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
