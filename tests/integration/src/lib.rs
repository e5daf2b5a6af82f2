//! Integration test utilities for the multiplexing gateway
//!
//! This crate provides helpers for running end-to-end tests against
//! a gateway bound to an ephemeral port.

pub mod client;
pub mod helpers;

pub use client::*;
pub use helpers::*;
