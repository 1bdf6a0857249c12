use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use organizations_catalog::config::AppConfig;
use organizations_catalog::web::{build_router, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::fmt::init();

    // 2. Configuration and database
    let config = AppConfig::from_env().expect("invalid configuration");
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to database");

    // 3. Router
    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    let app = build_router(state);

    // 4. Serve
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("cannot parse host/port");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind listener");
    info!("catalog API listening on http://{}", addr);

    axum::serve(listener, app).await.expect("server error");
}
