// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface of the simulation engine.
//!
//! A single axum server exposes the pipeline under `/api/v1/*`. Each
//! simulation runs on tokio's blocking pool; nothing is cached between
//! requests.
//!
//! # Usage
//!
//! ```ignore
//! use qupid_floquet::config::Config;
//! use qupid_floquet::server::{run_server, ServerState};
//!
//! let config = Config::load(None)?;
//! run_server(Arc::new(ServerState::new(config))).await?;
//! ```

pub mod rest;

pub use rest::RestServer;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::analyzer::ConversationAnalyzer;
use crate::config::Config;
use crate::error::Result;
use crate::render::{SvgRenderer, TrajectoryRenderer};

/// Shared, read-only state of the server.
pub struct ServerState {
    /// Effective configuration
    pub config: Arc<Config>,

    /// Plot renderer, set up once at start when rendering is enabled
    pub renderer: Option<Arc<dyn TrajectoryRenderer>>,

    /// Conversation analyzer backing `/analyze-run`, if one is installed
    pub analyzer: Option<Arc<dyn ConversationAnalyzer>>,

    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ServerState {
    /// Build state from configuration. No analyzer is installed.
    pub fn new(config: Config) -> Self {
        let renderer: Option<Arc<dyn TrajectoryRenderer>> = if config.render.enabled {
            Some(Arc::new(SvgRenderer::from_config(&config.render)))
        } else {
            None
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config: Arc::new(config),
            renderer,
            analyzer: None,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Install a conversation analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn ConversationAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Get a shutdown receiver.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Whether shutdown has been signalled.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}

/// Serve until ctrl-c, then drain in-flight requests.
///
/// Draining is bounded by `server.shutdown_timeout_sec`.
pub async fn run_server(state: Arc<ServerState>) -> Result<()> {
    let config = state.config.clone();
    let server = RestServer::new(state.clone());

    info!(
        host = %config.server.host,
        port = config.server.port,
        render = state.renderer.is_some(),
        analyzer = state.analyzer.is_some(),
        "Starting Qupid server"
    );

    let state_for_signal = state.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received shutdown signal, initiating graceful shutdown");
            state_for_signal.shutdown();
        }
    });

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_sec);
    let mut deadline_rx = state.shutdown_receiver();
    let drain_deadline = async move {
        let _ = deadline_rx.changed().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server.serve(&config.server) => result?,
        _ = drain_deadline => {
            warn!(timeout_secs = config.server.shutdown_timeout_sec, "Shutdown timed out with requests in flight");
        }
    }

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::test_utils::MockAnalyzer;

    #[test]
    fn test_renderer_follows_config() {
        let state = ServerState::new(Config::default());
        assert!(state.renderer.is_some());

        let config = Config {
            render: RenderConfig {
                enabled: false,
                ..RenderConfig::default()
            },
            ..Config::default()
        };
        assert!(ServerState::new(config).renderer.is_none());
    }

    #[test]
    fn test_with_analyzer() {
        let state = ServerState::new(Config::default());
        assert!(state.analyzer.is_none());
        let state = state.with_analyzer(Arc::new(MockAnalyzer::midpoint()));
        assert!(state.analyzer.is_some());
    }

    #[tokio::test]
    async fn test_shutdown_signal_reaches_receivers() {
        let state = ServerState::new(Config::default());
        let mut rx = state.shutdown_receiver();
        assert!(!state.is_shutting_down());

        state.shutdown();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(state.is_shutting_down());
    }
}
