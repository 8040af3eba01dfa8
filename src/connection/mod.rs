//! Connection management for MongoDB
//!
//! This module provides connection management functionality including:
//! - Connection establishment with the configured timeout and app name
//! - Connection termination
//! - Client access for the script host

use mongodb::{Client, options::ClientOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, Result};

/// MongoDB connection manager
///
/// The driver connects lazily, so a successful [`connect`](Self::connect)
/// means the URI was accepted and a client exists; servers are contacted
/// on first use.
pub struct ConnectionManager {
    /// MongoDB client instance
    client: Option<Client>,

    /// Connection configuration
    config: ConnectionConfig,

    /// Current connection state
    state: Arc<RwLock<ConnectionState>>,

    /// Connection URI
    uri: String,
}

/// Connection state information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,

    /// Currently connecting
    Connecting,

    /// Connected and ready
    Connected,

    /// Connection failed
    Failed(String),
}

impl ConnectionManager {
    /// Create a new connection manager
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection URI
    /// * `config` - Connection configuration
    pub fn new(uri: String, config: ConnectionConfig) -> Self {
        Self {
            client: None,
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            uri,
        }
    }

    /// Establish connection to MongoDB
    ///
    /// # Returns
    /// * `Result<()>` - Success or connection error
    pub async fn connect(&mut self) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;

        let result = self.build_client().await;
        match result {
            Ok(client) => {
                info!("Connected to {}", self.uri);
                self.client = Some(client);
                self.set_state(ConnectionState::Connected).await;
                Ok(())
            }
            Err(e) => {
                self.set_state(ConnectionState::Failed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Disconnect from MongoDB
    ///
    /// Closes all connections and cleans up resources
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            debug!("Shutting down MongoDB client");
            client.shutdown().await;
        }
        self.set_state(ConnectionState::Disconnected).await;
        Ok(())
    }

    /// Get the MongoDB client
    ///
    /// # Returns
    /// * `Result<&Client>` - Reference to client or error
    pub fn get_client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ConnectionError::NotConnected.into())
    }

    /// Get current connection state
    pub async fn get_state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Check if currently connected
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }

    /// Connection URI this manager targets
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Parse the URI and apply the configured options
    async fn build_client(&self) -> Result<Client> {
        let mut options = Self::parse_uri(&self.uri).await?;
        self.configure(&mut options);
        Client::with_options(options)
            .map_err(|e| ConnectionError::ConnectionFailed(e.to_string()).into())
    }

    /// Parse connection URI and create client options
    async fn parse_uri(uri: &str) -> Result<ClientOptions> {
        ClientOptions::parse(uri)
            .await
            .map_err(|e| ConnectionError::InvalidUri(format!("{}: {}", uri, e)).into())
    }

    /// Apply timeout and app name from the configuration
    fn configure(&self, options: &mut ClientOptions) {
        let timeout = Duration::from_secs(self.config.timeout);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        if options.app_name.is_none() {
            options.app_name = Some(self.config.app_name.clone());
        }
    }

    /// Update connection state
    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }
}
