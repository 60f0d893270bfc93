//! `ShowServer` builder and server loop.
//!
//! This ties the layers together: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use show_protocol::{Codec, JsonCodec};
use show_room::RoomConfig;
use show_session::SessionRouter;
use show_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{ServerConfig, ShowError};

/// How long a freshly accepted socket gets to finish the WebSocket
/// handshake before it is dropped.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) router: SessionRouter,
    pub(crate) codec: C,
    pub(crate) handshake_timeout: Duration,
}

/// Builder for configuring and starting a Show server.
///
/// # Example
///
/// ```rust,no_run
/// use show::prelude::*;
///
/// # async fn start() -> Result<(), ShowError> {
/// let server = ShowServer::builder()
///     .bind("0.0.0.0:3001")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ShowServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    handshake_timeout: Duration,
}

impl ShowServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: ServerConfig::default().bind_addr,
            room_config: RoomConfig::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Starts from a loaded [`ServerConfig`].
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr.clone(),
            room_config: config.room_config(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets how long a new socket may take to complete its handshake.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener. Events are JSON over WebSocket.
    pub async fn build(self) -> Result<ShowServer<JsonCodec>, ShowError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            router: SessionRouter::new(self.room_config),
            codec: JsonCodec,
            handshake_timeout: self.handshake_timeout,
        });

        Ok(ShowServer { transport, state })
    }
}

impl Default for ShowServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Show server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ShowServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl ShowServer<JsonCodec> {
    pub fn builder() -> ShowServerBuilder {
        ShowServerBuilder::new()
    }
}

impl<C: Codec> ShowServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The router every connection dispatches through.
    pub fn router(&self) -> &SessionRouter {
        &self.state.router
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted socket is handed to its own task, handshake
    /// included; a failing connection is logged and never stops the loop.
    pub async fn run(mut self) -> Result<(), ShowError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "show server running");

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(pending, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
