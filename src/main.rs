use axum::{
    middleware,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use confops::database::schema;
use confops::web::middleware::auth as auth_middleware;
use confops::web::routes::{attendees, dashboard, tracking};

#[tokio::main]
async fn main() {
    // Laad .env bestand
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL moet in .env staan");
    println!("Verbinden met database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Kan niet verbinden met DB");

    schema::ensure_schema(&pool)
        .await
        .expect("Schema bootstrap failed");

    if auth_middleware::configured_token().is_none() {
        tracing::warn!("🔓 OPS_ADMIN_TOKEN is niet gezet, dashboard staat open voor iedereen");
    }

    let ops_routes = Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .route("/attendees", get(attendees::attendees_handler))
        .route("/eligible/:purpose", get(tracking::eligible_handler))
        .route("/tracking/:purpose/mark", post(tracking::mark_handler))
        .route(
            "/tracking/:purpose/mark-batch",
            post(tracking::mark_batch_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_ops_token));

    let static_service = get_service(ServeDir::new("static")).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ),
    );

    let app = Router::new()
        .merge(ops_routes)
        .nest_service("/static", static_service)
        .layer(CatchPanicLayer::new())
        .with_state(pool);

    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("BIND_ADDR is geen geldig adres");
    println!(
        "Ops dashboard op http://{} (build {})",
        addr,
        env!("CONFOPS_BUILD_ID")
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Kan niet binden op adres");
    axum::serve(listener, app).await.expect("Server gestopt");
}
