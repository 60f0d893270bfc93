//! Player sessions and event routing for the Show server.
//!
//! Every connection gets a [`Session`]: a fresh player id, an outbound
//! channel, and at most one room. The [`SessionRouter`] turns decoded
//! client events into registry and room calls and sends the replies.
//!
//! # How it fits in the stack
//!
//! ```text
//! Connection handler (above)  ← decodes frames, owns one Session
//!     ↕
//! Session Layer (this crate)  ← identity, room membership, dispatch
//!     ↕
//! Room Layer (below)          ← registry, room actors, game rules
//! ```

mod error;
mod router;
mod session;

pub use error::SessionError;
pub use router::SessionRouter;
pub use session::Session;
