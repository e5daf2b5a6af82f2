//! # sockmux-core
//!
//! Lets many named publish/subscribe channels share one long-lived,
//! message-oriented connection per client.
//!
//! A [`ConnectionMultiplexer`] runs one read loop per [`Connection`], decodes
//! each inbound frame (`sub,<channel>`, `uns,<channel>`, `msg,<channel>,<payload>`)
//! and dispatches it to the registered [`Channel`] as an independent task.
//! Text that is not a frame goes to the multiplexer's fallback.

pub mod channel;
pub mod connection;
pub mod multiplexer;
pub mod protocol;


pub use channel::{CallbackHandler, Channel, ChannelHandler};
pub use connection::{Connection, ConnectionError, ConnectionRef};
pub use multiplexer::{ConnectionHandler, ConnectionMultiplexer, Fallback};
pub use protocol::{Frame, FrameKind, Inbound};
