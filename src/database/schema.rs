use sqlx::SqlitePool;

const SQL_CREATE_ATTENDEES: &str = r#"
CREATE TABLE IF NOT EXISTS attendees (
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

// Composite key keeps "at most one entry per barcode per purpose" a schema
// guarantee instead of an application-level check.
const SQL_CREATE_TRACKING_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS tracking_entries (
  barcode TEXT NOT NULL,
  purpose TEXT NOT NULL,
  completed_at TEXT NOT NULL,
  PRIMARY KEY (barcode, purpose)
)
"#;

pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(SQL_CREATE_ATTENDEES).execute(pool).await?;
    sqlx::query(SQL_CREATE_TRACKING_ENTRIES).execute(pool).await?;
    Ok(())
}
