use clap::Parser;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::path::PathBuf;

use confops::database::schema;
use confops::services::collateral_service;
use confops::services::session_service;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory for rendered HTML and PDF files.
    #[arg(long, default_value = "collateral")]
    out_dir: PathBuf,

    /// Render attendee SpeedPasses (and mark them as printed).
    #[arg(long)]
    speedpasses: bool,

    /// Render the stamp-game sheet.
    #[arg(long)]
    stamp_game: bool,

    /// Render the talk schedule.
    #[arg(long)]
    schedule: bool,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    // Geen vlaggen betekent: alles renderen.
    let all = !args.speedpasses && !args.stamp_game && !args.schedule;

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL moet in .env staan");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Kan niet verbinden met DB");
    schema::ensure_schema(&pool)
        .await
        .expect("Schema bootstrap failed");

    if args.speedpasses || all {
        match collateral_service::render_speedpasses(&pool, &args.out_dir).await {
            Ok(report) => {
                println!(
                    "speedpasses: candidates={}, rendered={}, failed={}, newly_tracked={}",
                    report.candidates, report.rendered, report.failed, report.newly_tracked
                );
            }
            Err(e) => {
                eprintln!("speedpass run failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.stamp_game || all {
        match collateral_service::render_stamp_game(&args.out_dir) {
            Ok(path) => println!("stamp game: {}", path.display()),
            Err(e) => {
                eprintln!("stamp game failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.schedule || all {
        let sessions = match session_service::fetch_schedule().await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("schedule fetch failed: {}", e);
                std::process::exit(1);
            }
        };
        match collateral_service::render_schedule(&args.out_dir, &sessions) {
            Ok(path) => println!("schedule: {} ({} sessions)", path.display(), sessions.len()),
            Err(e) => {
                eprintln!("schedule render failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
