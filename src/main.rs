use anyhow::Context;
use hashledger::rates::spawn_refresher;
use hashledger::{
    api, config::Config, db::init_db, CoinGeckoRateProvider, LedgerService, RateBook,
    RateProvider, Repository,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let port = config.port;

    let pool = init_db(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    let repo = Arc::new(Repository::new(pool));

    let rates = Arc::new(
        RateBook::load(repo.clone(), config.default_reduction)
            .await
            .context("Failed to load settings")?,
    );
    let ledger = Arc::new(
        LedgerService::load(repo)
            .await
            .context("Failed to load ledger")?,
    );
    let provider: Arc<dyn RateProvider> =
        Arc::new(CoinGeckoRateProvider::new(config.rates_api_url.clone()));

    let _refresher = spawn_refresher(rates.clone(), provider.clone(), config.rate_refresh);

    let app = api::create_router(api::AppState::new(ledger, rates, provider));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
