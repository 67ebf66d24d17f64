use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod export;
mod jwt;
mod middleware;
mod models;
mod notify;
mod repositories;
mod routes;
mod schema;
mod state;
mod validation;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use crate::jwt::{JwtConfig, JwtService};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    schema::init_schema(&pool).await?;
    info!("Database schema ready");

    let jwt_service = JwtService::new(JwtConfig::from_env());
    let app_state = AppState::new(pool, jwt_service);

    app_state.user_repository.bootstrap_admin().await?;

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
