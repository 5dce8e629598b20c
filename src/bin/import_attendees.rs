use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use confops::database::schema;
use confops::services::import_service;
use confops::services::ticketing_service;

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

    let attendees = match ticketing_service::fetch_all_attendees().await {
        Ok(a) => a,
        Err(e) => {
            eprintln!("attendee import failed: {}", e);
            std::process::exit(1);
        }
    };

    match import_service::reload_attendees(&pool, &attendees).await {
        Ok(report) => {
            println!(
                "attendee import: fetched={}, loaded={}",
                report.fetched, report.loaded
            );
        }
        Err(e) => {
            eprintln!("attendee reload failed: {}", e);
            std::process::exit(1);
        }
    }
}
