//! # sockmux-gateway
//!
//! WebSocket server that hands every upgraded socket to a channel multiplexer.

pub mod channels;
pub mod connection;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
