//! # Vista Server
//!
//! HTTP server for the Vista reporting dashboard.
//!
//! ## Features
//!
//! - Return-on-capital waterfall and KPI cards as JSON chart specs
//! - ALM scenario fan and raw fact queries
//! - Ticker returns with rebase, drawdown and risk figures
//! - Page routing and slicer catalogue for the front end
//! - Configuration via TOML file
//!
//! ## Usage
//!
//! ```ignore
//! use vista_server::Server;
//!
//! let server = Server::new(config, dashboard);
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use vista_engine::Dashboard;

pub use config::{ConfigError, PriceProvider, ServerConfig};

/// The Vista server.
pub struct Server {
    config: ServerConfig,
    dashboard: Arc<Dashboard>,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig, dashboard: Arc<Dashboard>) -> Self {
        Self { config, dashboard }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.dashboard.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Socket address from the configured host and port.
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        )
    }

    /// Start the server and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = self.address();
        let listener = TcpListener::bind(addr).await?;

        info!("Vista server listening on http://{}", addr);
        info!("  GET  /api/v1/pages");
        info!("  GET  /api/v1/roc?year&portfolio&basis&scenario");
        info!("  GET  /api/v1/alm?portfolio&basis");
        info!("  GET  /api/v1/facts?table&<column>=<code>");
        info!("  GET  /api/v1/returns?tickers&start&end&drawdown");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Resolves on Ctrl+C. A failed handler install never resolves.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down...");
    } else {
        std::future::pending::<()>().await;
    }
}
