use std::env;

use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;

use organizations_catalog::database::{schema, seed};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to database");

    if let Err(e) = schema::create_schema(&pool).await {
        eprintln!("schema setup failed: {}", e);
        std::process::exit(1);
    }

    match seed::seed_catalog(&pool).await {
        Ok(()) => println!("seed complete"),
        Err(e) => {
            eprintln!("seed failed: {}", e);
            std::process::exit(1);
        }
    }
}
