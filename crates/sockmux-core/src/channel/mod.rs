//! Channels
//!
//! A channel is a named topic with a subscriber set and user callbacks.

mod channel;
mod handler;

pub use channel::Channel;
pub use handler::{CallbackHandler, ChannelHandler};
