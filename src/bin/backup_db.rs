use clap::Parser;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::path::PathBuf;

use confops::services::backup_service;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory where backup snapshots land.
    #[arg(long, default_value = "backups")]
    backup_dir: PathBuf,

    /// Restore this backup file over the live database instead of taking a
    /// backup. The dashboard and scripts must be stopped first.
    #[arg(long)]
    restore: Option<PathBuf>,
}

fn database_file(db_url: &str) -> PathBuf {
    // "sqlite://conference.db" en "sqlite:conference.db" komen allebei voor.
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    PathBuf::from(path)
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL moet in .env staan");

    if let Some(backup_file) = args.restore {
        let target = database_file(&db_url);
        match backup_service::restore_database(&backup_file, &target) {
            Ok(bytes) => println!(
                "restored {} -> {} ({} bytes)",
                backup_file.display(),
                target.display(),
                bytes
            ),
            Err(e) => {
                eprintln!("restore failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Kan niet verbinden met DB");

    match backup_service::backup_database(&pool, &args.backup_dir).await {
        Ok(file) => println!("backup: {}", file.display()),
        Err(e) => {
            eprintln!("backup failed: {}", e);
            std::process::exit(1);
        }
    }
}
