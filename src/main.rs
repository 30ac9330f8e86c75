use anyhow::Context;
use hostconnect::{app, db, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hostconnect=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    if config.dev_login {
        tracing::warn!("DEV_LOGIN is on: /session/dev trusts any posted user id");
    }

    let db_pool = db::connect_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&db_pool).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);

    axum::serve(listener, app(AppState::new(db_pool, config)))
        .await
        .context("server error")?;

    Ok(())
}
