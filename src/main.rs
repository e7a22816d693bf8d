use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use workout_api::config::{run_migrations, AppConfig, DatabaseConfig};
use workout_api::telemetry::init_tracing;
use workout_api::{create_routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load application config")?;
    init_tracing(&config.log_level);

    if config.uses_development_secret() {
        warn!("JWT_SECRET not set, using the development secret");
    }

    let db_config = DatabaseConfig::from_env().context("failed to load database config")?;
    let pool = db_config
        .create_pool()
        .await
        .context("failed to connect to the database")?;

    if db_config.run_migrations {
        run_migrations(&pool).await?;
    }

    let app = create_routes(AppState::postgres(pool, &config));

    let address = config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(environment = %config.environment, "workout API listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
