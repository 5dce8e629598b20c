use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use confops::database::schema;
use confops::services::email_service;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL moet in .env staan");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Kan niet verbinden met DB");
    schema::ensure_schema(&pool)
        .await
        .expect("Schema bootstrap failed");

    match email_service::send_confirmations(&pool).await {
        Ok(report) => {
            println!(
                "confirmation run: candidates={}, sent={}, failed={}",
                report.candidates, report.sent, report.failed
            );
        }
        Err(e) => {
            eprintln!("confirmation run failed: {}", e);
            std::process::exit(1);
        }
    }
}
