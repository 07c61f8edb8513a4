//! Vista dashboard server entry point.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vista_core::FactKind;
use vista_engine::DashboardBuilder;
use vista_ext_file::{
    load_fact_table, CsvPriceSource, CsvTickerReferenceSource, EmptyPriceSource,
};
use vista_ext_http::YahooPriceSource;
use vista_server::{PriceProvider, Server, ServerConfig};
use vista_traits::market_data::PriceSource;
use vista_traits::DataProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,vista=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Vista Dashboard Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/vista.toml".to_string());

    let server_config = if std::path::Path::new(&config_path).exists() {
        info!("Loading configuration from {}", config_path);
        ServerConfig::from_file(&config_path)?
    } else {
        info!("Using default configuration");
        ServerConfig::default()
    };

    // Load datasets
    let waterfall = load_fact_table(&server_config.waterfall_file, FactKind::Waterfall)?;
    let alm = load_fact_table(&server_config.alm_file, FactKind::Alm)?;

    // Create sources
    let prices: Arc<dyn PriceSource> = match server_config.price_provider {
        PriceProvider::File => match &server_config.prices_file {
            Some(path) => Arc::new(CsvPriceSource::new(path)?),
            None => {
                warn!("price_provider = \"file\" but no prices_file set; returns will be empty");
                Arc::new(EmptyPriceSource)
            }
        },
        PriceProvider::Yahoo => {
            let timeout = server_config.dashboard.fetch_timeout();
            let source = match &server_config.price_base_url {
                Some(url) => YahooPriceSource::new(url.as_str(), timeout)?,
                None => YahooPriceSource::public(timeout)?,
            };
            Arc::new(source)
        }
        PriceProvider::None => Arc::new(EmptyPriceSource),
    };

    let provider = DataProvider {
        prices,
        tickers: Arc::new(CsvTickerReferenceSource::new(&server_config.tickers_file)?),
    };

    // Build dashboard
    let dashboard = DashboardBuilder::new()
        .with_config(server_config.dashboard.clone())
        .with_waterfall(waterfall)
        .with_alm(alm)
        .with_provider(provider)
        .build()?;

    // Start server
    let server = Server::new(server_config, Arc::new(dashboard));
    server.start().await?;

    Ok(())
}
