use sqlx::SqlitePool;

use crate::models::AttendeeRow;
use crate::models::NewAttendee;

const SQL_DROP_STAGING: &str = "DROP TABLE IF EXISTS attendees_staging";

const SQL_CREATE_STAGING: &str = r#"
CREATE TABLE attendees_staging (
  barcode TEXT PRIMARY KEY,
  order_id TEXT,
  first_name TEXT,
  last_name TEXT,
  email TEXT,
  order_date TEXT,
  job_title TEXT,
  company TEXT,
  lunch_preference TEXT,
  coc_accepted INTEGER,
  volunteer_interest INTEGER,
  social_handles TEXT
)
"#;

const SQL_INSERT_STAGING: &str = r#"
INSERT OR REPLACE INTO attendees_staging (
  barcode,
  order_id,
  first_name,
  last_name,
  email,
  order_date,
  job_title,
  company,
  lunch_preference,
  coc_accepted,
  volunteer_interest,
  social_handles
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

const SQL_LIST_ATTENDEES: &str = r#"
SELECT
    barcode,
    order_id,
    first_name,
    last_name,
    email,
    order_date,
    job_title,
    company,
    lunch_preference,
    coc_accepted,
    volunteer_interest,
    social_handles
FROM attendees
ORDER BY last_name ASC, first_name ASC
"#;

const SQL_COUNT_ATTENDEES: &str = "SELECT COUNT(*) FROM attendees";

/// Replace the whole attendee set with the given one.
///
/// The ticketing platform is the single source of truth, so there are no
/// partial-update semantics: rows are bulk-loaded into a staging table and the
/// tables are swapped in a single transaction. A concurrent reader sees the
/// old set or the new set, never a half-loaded one. Returns the number of
/// rows loaded.
pub async fn replace_all(pool: &SqlitePool, attendees: &[NewAttendee]) -> sqlx::Result<u64> {
    sqlx::query(SQL_DROP_STAGING).execute(pool).await?;
    sqlx::query(SQL_CREATE_STAGING).execute(pool).await?;

    for a in attendees {
        // INSERT OR REPLACE: the ticketing export occasionally repeats a
        // barcode across pages, last one wins.
        sqlx::query(SQL_INSERT_STAGING)
            .bind(&a.barcode)
            .bind(&a.order_id)
            .bind(&a.first_name)
            .bind(&a.last_name)
            .bind(&a.email)
            .bind(&a.order_date)
            .bind(&a.job_title)
            .bind(&a.company)
            .bind(&a.lunch_preference)
            .bind(a.coc_accepted)
            .bind(a.volunteer_interest)
            .bind(&a.social_handles)
            .execute(pool)
            .await?;
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DROP TABLE attendees").execute(&mut *tx).await?;
    sqlx::query("ALTER TABLE attendees_staging RENAME TO attendees")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    count_attendees(pool).await.map(|n| n as u64)
}

pub async fn list_attendees(pool: &SqlitePool) -> sqlx::Result<Vec<AttendeeRow>> {
    sqlx::query_as::<_, AttendeeRow>(SQL_LIST_ATTENDEES)
        .fetch_all(pool)
        .await
}

pub async fn count_attendees(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ATTENDEES)
        .fetch_one(pool)
        .await
}
