//! Multiplexing wire protocol
//!
//! Frame types and the text encoding used on the shared connection.

mod frame;
mod frame_kind;

pub use frame::{encode_message, strip_quotes, Frame, Inbound, SEPARATOR};
pub use frame_kind::{FrameKind, MESSAGE, SUBSCRIBE, UNSUBSCRIBE};
