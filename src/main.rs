use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetops_api::{
    config::Config,
    db::{self, shifts::PgShiftStore},
    routes,
    services::group_ids::RandomGroupIds,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let state = AppState {
        store: Arc::new(PgShiftStore::new(pool)),
        group_ids: Arc::new(RandomGroupIds),
    };

    let app = routes::router(state, &config);

    let addr = format!("{}:{}", config.host, config.port);
    info!("fleetops API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
