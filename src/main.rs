use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use teamhub_server::config::Config;
use teamhub_server::routes::create_routes;
use teamhub_server::services::EventService;
use teamhub_server::state::AppState;
use teamhub_server::store::postgres::{PgEventStore, PgMemberDirectory};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let events = EventService::new(Arc::new(PgEventStore::new(pool.clone())));
    let members = Arc::new(PgMemberDirectory::new(pool));
    let app = create_routes(AppState::new(events, members));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
