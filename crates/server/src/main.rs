use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use weatherflow::api;
use weatherflow::collector::Collector;
use weatherflow::config;
use weatherflow::db;
use weatherflow::jobs::{JobStore, JobsRepo};
use weatherflow::weather::{OpenWeatherClient, WeatherSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("weatherflow=info,weatherflow_server=info,tower_http=info")
            }),
        )
        .init();

    let cfg = config::Config::from_env()?;

    info!(
        listen_addr = %cfg.listen_addr,
        api_base = %cfg.api_base,
        cities = cfg.city_ids.len(),
        fetch_timeout_ms = cfg.fetch_timeout.map(|d| d.as_millis() as u64),
        migrate_on_startup = cfg.migrate_on_startup,
        "weatherflow starting"
    );

    let pool = db::make_pool(&cfg.database_url).await?;
    if cfg.migrate_on_startup {
        db::run_migrations(&pool).await?;
    }

    let store: Arc<dyn JobStore> = Arc::new(JobsRepo::new(pool));
    let source: Arc<dyn WeatherSource> =
        Arc::new(OpenWeatherClient::new(cfg.api_base.clone(), cfg.api_key.clone()));
    let collector = Collector::new(store.clone(), source, cfg.city_ids.clone())
        .with_fetch_timeout(cfg.fetch_timeout);

    let app = api::router(api::ApiState::new(store, collector)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    info!("api listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("weatherflow stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
