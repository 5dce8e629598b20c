use chrono::DateTime;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::EligibleAttendeeRow;
use crate::models::TrackingEntryRow;
use crate::models::TrackingPurpose;

pub const SQL_FETCH_ELIGIBLE: &str = r#"
SELECT
    a.barcode,
    a.first_name,
    a.last_name,
    a.email,
    a.order_date,
    a.job_title,
    a.company
FROM attendees a
LEFT JOIN tracking_entries t
  ON t.barcode = a.barcode
 AND t.purpose = ?1
WHERE t.barcode IS NULL
  AND a.email IS NOT NULL AND a.email <> ''
  AND a.first_name IS NOT NULL
  AND a.last_name IS NOT NULL
ORDER BY a.last_name ASC, a.first_name ASC
"#;

const SQL_INSERT_ENTRY_IF_NEW: &str = r#"
INSERT OR IGNORE INTO tracking_entries (
  barcode,
  purpose,
  completed_at
) VALUES (?1, ?2, ?3)
"#;

const SQL_REFRESH_ENTRY: &str = r#"
UPDATE tracking_entries
SET completed_at = ?3
WHERE barcode = ?1
  AND purpose = ?2
"#;

const SQL_LOAD_ENTRY: &str = r#"
SELECT barcode, purpose, completed_at
FROM tracking_entries
WHERE barcode = ?1
  AND purpose = ?2
LIMIT 1
"#;

const SQL_COUNT_ENTRIES: &str = r#"
SELECT COUNT(*) FROM tracking_entries WHERE purpose = ?1
"#;

/// Attendees that still lack a tracking entry for `purpose` and have the
/// minimum contact fields to act on. Ordered by last name, then first name.
pub async fn fetch_eligible(
    pool: &SqlitePool,
    purpose: TrackingPurpose,
) -> sqlx::Result<Vec<EligibleAttendeeRow>> {
    sqlx::query_as::<_, EligibleAttendeeRow>(SQL_FETCH_ELIGIBLE)
        .bind(purpose.as_str())
        .fetch_all(pool)
        .await
}

/// Record completion for one barcode. Returns `true` when the entry is new,
/// `false` when an existing entry had its timestamp refreshed.
///
/// Insert-or-ignore and the fallback update run in one transaction, so a
/// caller that loses the insert race lands on the refresh path instead of
/// getting a constraint error. The barcode is not checked against the
/// attendees table: tracking deliberately outlives attendee reloads.
pub async fn upsert_entry(
    pool: &SqlitePool,
    barcode: &str,
    purpose: TrackingPurpose,
    completed_at: &DateTime<Utc>,
) -> sqlx::Result<bool> {
    let stamp = completed_at.to_rfc3339();
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(SQL_INSERT_ENTRY_IF_NEW)
        .bind(barcode)
        .bind(purpose.as_str())
        .bind(&stamp)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if inserted == 0 {
        sqlx::query(SQL_REFRESH_ENTRY)
            .bind(barcode)
            .bind(purpose.as_str())
            .bind(&stamp)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(inserted > 0)
}

/// Record completion for a whole batch in one transaction.
/// Returns `(new, updated)` counts.
pub async fn upsert_entries(
    pool: &SqlitePool,
    barcodes: &[String],
    purpose: TrackingPurpose,
    completed_at: &DateTime<Utc>,
) -> sqlx::Result<(u64, u64)> {
    let stamp = completed_at.to_rfc3339();
    let mut tx = pool.begin().await?;

    let mut new_count = 0u64;
    let mut updated_count = 0u64;
    for barcode in barcodes {
        let inserted = sqlx::query(SQL_INSERT_ENTRY_IF_NEW)
            .bind(barcode)
            .bind(purpose.as_str())
            .bind(&stamp)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if inserted > 0 {
            new_count += 1;
        } else {
            sqlx::query(SQL_REFRESH_ENTRY)
                .bind(barcode)
                .bind(purpose.as_str())
                .bind(&stamp)
                .execute(&mut *tx)
                .await?;
            updated_count += 1;
        }
    }

    tx.commit().await?;
    Ok((new_count, updated_count))
}

pub async fn load_entry(
    pool: &SqlitePool,
    barcode: &str,
    purpose: TrackingPurpose,
) -> sqlx::Result<Option<TrackingEntryRow>> {
    sqlx::query_as::<_, TrackingEntryRow>(SQL_LOAD_ENTRY)
        .bind(barcode)
        .bind(purpose.as_str())
        .fetch_optional(pool)
        .await
}

pub async fn count_entries(pool: &SqlitePool, purpose: TrackingPurpose) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ENTRIES)
        .bind(purpose.as_str())
        .fetch_one(pool)
        .await
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

    async fn insert_attendee(
        pool: &SqlitePool,
        barcode: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) {
        sqlx::query(
            "INSERT INTO attendees (barcode, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(barcode)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    }

    fn stamp(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, secs).unwrap()
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let pool = test_pool().await;
        let at = stamp(0);

        let first = upsert_entry(&pool, "T100", TrackingPurpose::Emailed, &at)
            .await
            .unwrap();
        let second = upsert_entry(&pool, "T100", TrackingPurpose::Emailed, &at)
            .await
            .unwrap();

        assert!(first);
        assert!(!second);

        let count = count_entries(&pool, TrackingPurpose::Emailed).await.unwrap();
        assert_eq!(count, 1);

        let entry = load_entry(&pool, "T100", TrackingPurpose::Emailed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.barcode, "T100");
        assert_eq!(entry.purpose, "emailed");
        assert_eq!(entry.completed_at, at.to_rfc3339());
    }

    #[tokio::test]
    async fn refresh_overwrites_timestamp() {
        let pool = test_pool().await;

        upsert_entry(&pool, "T100", TrackingPurpose::Emailed, &stamp(0))
            .await
            .unwrap();
        upsert_entry(&pool, "T100", TrackingPurpose::Emailed, &stamp(30))
            .await
            .unwrap();

        let entry = load_entry(&pool, "T100", TrackingPurpose::Emailed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.completed_at, stamp(30).to_rfc3339());
    }

    #[tokio::test]
    async fn purposes_are_tracked_separately() {
        let pool = test_pool().await;
        let at = stamp(0);

        upsert_entry(&pool, "T100", TrackingPurpose::Emailed, &at)
            .await
            .unwrap();

        assert!(load_entry(&pool, "T100", TrackingPurpose::BadgePrinted)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn eligible_excludes_tracked_attendees() {
        let pool = test_pool().await;
        insert_attendee(&pool, "T1", Some("Anna"), Some("Zed"), Some("anna@example.org")).await;
        insert_attendee(&pool, "T2", Some("Zoe"), Some("Abel"), Some("zoe@example.org")).await;

        upsert_entry(&pool, "T1", TrackingPurpose::Emailed, &stamp(0))
            .await
            .unwrap();

        let rows = fetch_eligible(&pool, TrackingPurpose::Emailed).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].barcode, "T2");

        // Tracking for one purpose does not hide the attendee from another.
        let rows = fetch_eligible(&pool, TrackingPurpose::BadgePrinted)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn eligible_requires_email_and_names() {
        let pool = test_pool().await;
        insert_attendee(&pool, "T1", Some("Anna"), Some("Zed"), None).await;
        insert_attendee(&pool, "T2", Some("Zoe"), Some("Abel"), Some("")).await;
        insert_attendee(&pool, "T3", None, Some("Abel"), Some("a@example.org")).await;
        insert_attendee(&pool, "T4", Some("Zoe"), None, Some("b@example.org")).await;
        insert_attendee(&pool, "T5", Some("Mira"), Some("Kok"), Some("mira@example.org")).await;

        let rows = fetch_eligible(&pool, TrackingPurpose::Emailed).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].barcode, "T5");
    }

    #[tokio::test]
    async fn eligible_is_ordered_by_last_then_first_name() {
        let pool = test_pool().await;
        insert_attendee(&pool, "T1", Some("Anna"), Some("Zed"), Some("anna@example.org")).await;
        insert_attendee(&pool, "T2", Some("Zoe"), Some("Abel"), Some("zoe@example.org")).await;
        insert_attendee(&pool, "T3", Some("Bart"), Some("Abel"), Some("bart@example.org")).await;

        let rows = fetch_eligible(&pool, TrackingPurpose::Emailed).await.unwrap();
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.last_name.as_str(), r.first_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("Abel", "Bart"), ("Abel", "Zoe"), ("Zed", "Anna")]
        );
    }

    #[tokio::test]
    async fn batch_marked_barcodes_leave_the_eligible_set() {
        let pool = test_pool().await;
        insert_attendee(&pool, "T1", Some("Anna"), Some("Zed"), Some("anna@example.org")).await;
        insert_attendee(&pool, "T2", Some("Zoe"), Some("Abel"), Some("zoe@example.org")).await;

        let barcodes = vec!["T1".to_string(), "T2".to_string()];
        let (new_count, updated_count) =
            upsert_entries(&pool, &barcodes, TrackingPurpose::BadgePrinted, &stamp(0))
                .await
                .unwrap();
        assert_eq!((new_count, updated_count), (2, 0));

        let rows = fetch_eligible(&pool, TrackingPurpose::BadgePrinted)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unknown_barcode_is_tracked_without_attendee_check() {
        let pool = test_pool().await;

        let inserted = upsert_entry(&pool, "GHOST", TrackingPurpose::Emailed, &stamp(0))
            .await
            .unwrap();
        assert!(inserted);
        assert!(load_entry(&pool, "GHOST", TrackingPurpose::Emailed)
            .await
            .unwrap()
            .is_some());
    }
}
