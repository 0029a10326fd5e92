//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - HTTP transport to chat-completion endpoints (reqwest)

pub mod adapter;

pub use adapter::*;
