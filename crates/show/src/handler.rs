//! Per-connection handler: session setup and event pumping.
//!
//! Each accepted socket gets its own Tokio task running this handler.
//! The flow is:
//!   1. Finish the WebSocket handshake, or give up after the timeout
//!   2. Open a session → the client receives `connected(playerId)`
//!   3. Loop: decode inbound frames and dispatch them, while forwarding
//!      queued server events to the socket
//!   4. On exit, the guard runs the disconnect path

use std::sync::Arc;

use show_protocol::{ClientEvent, Codec};
use show_session::{Session, SessionRouter};
use show_transport::{Connection, PendingConnection, PendingWebSocket};
use tokio::sync::mpsc;

use crate::ShowError;
use crate::server::ServerState;

/// Drop guard that ends the player's session when the handler exits.
///
/// Runs even if the handler panics. Since `Drop` is synchronous, the
/// async disconnect is spawned as a fire-and-forget task.
struct SessionGuard {
    session: Option<Session>,
    router: SessionRouter,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let router = self.router.clone();
            tokio::spawn(async move {
                router.disconnect(session).await;
            });
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    pending: PendingWebSocket,
    state: Arc<ServerState<C>>,
) -> Result<(), ShowError> {
    let conn = pending.upgrade(state.handshake_timeout).await?;
    let conn_id = conn.id();
    let (outbound_tx, mut outbound) = mpsc::unbounded_channel();

    let session = state.router.open(outbound_tx);
    let player_id = session.player_id().clone();
    tracing::debug!(%conn_id, %player_id, peer = %conn.peer_addr(), "connection opened");

    let mut guard = SessionGuard {
        session: Some(session),
        router: state.router.clone(),
    };

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "failed to decode event");
                        continue;
                    }
                };

                let Some(session) = guard.session.as_mut() else {
                    break;
                };
                if let Err(e) = state.router.dispatch(session, event).await {
                    tracing::debug!(%player_id, error = %e, "dispatch failed");
                }
            }
            Some(event) = outbound.recv() => {
                let bytes = state.codec.encode(&event)?;
                conn.send(&bytes).await?;
            }
        }
    }

    // guard drops here → disconnect fires.
    Ok(())
}
