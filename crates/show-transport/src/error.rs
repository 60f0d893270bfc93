/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer went away while we were talking to it.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or accepting a socket failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The peer sent something other than a valid handshake.
    #[error("handshake with {peer} failed: {source}")]
    HandshakeFailed {
        peer: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The peer did not finish its handshake in time.
    #[error("handshake with {0} timed out")]
    HandshakeTimeout(std::net::SocketAddr),
}
