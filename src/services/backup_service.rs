use std::fs;
use std::path::Path;
use std::path::PathBuf;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

/// Snapshot the live database into `backup_dir` using SQLite's own backup
/// path (`VACUUM INTO`), which is safe against concurrent writers. Returns
/// the backup file path.
pub async fn backup_database(pool: &SqlitePool, backup_dir: &Path) -> sqlx::Result<PathBuf> {
    fs::create_dir_all(backup_dir).map_err(sqlx::Error::Io)?;

    let file = backup_dir.join(format!(
        "confops-{}.sqlite",
        Utc::now().format("%Y%m%d-%H%M%S")
    ));

    // VACUUM INTO takes no bind parameters; single quotes in the path are
    // escaped SQL-style.
    let target = file.display().to_string().replace('\'', "''");
    sqlx::query(&format!("VACUUM INTO '{}'", target))
        .execute(pool)
        .await?;

    info!("💾 Backup written: {}", file.display());
    Ok(file)
}

/// Copy a backup file over the live database. Offline operation: nothing may
/// hold the database open while this runs, which is why it lives behind an
/// explicit flag in the backup binary rather than a dashboard button.
pub fn restore_database(backup_file: &Path, db_file: &Path) -> std::io::Result<u64> {
    fs::copy(backup_file, db_file)
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::database::schema;

    #[tokio::test]
    async fn backup_produces_a_readable_snapshot() {
        let dir = std::env::temp_dir().join(format!("confops-backup-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        // File-backed database, like production: every pooled `:memory:`
        // connection is its own private database, so VACUUM INTO through a
        // memory pool would snapshot an empty one.
        let db_file = dir.join("live.sqlite");
        let pool = SqlitePoolOptions::new()
            .connect(&format!("sqlite://{}?mode=rwc", db_file.display()))
            .await
            .unwrap();
        schema::ensure_schema(&pool).await.unwrap();
        sqlx::query("INSERT INTO attendees (barcode) VALUES ('T1')")
            .execute(&pool)
            .await
            .unwrap();

        let file = backup_database(&pool, &dir).await.unwrap();
        assert!(file.exists());

        let copy = SqlitePoolOptions::new()
            .connect(&format!("sqlite://{}", file.display()))
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendees")
            .fetch_one(&copy)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
