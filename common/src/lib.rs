//! Shared models, configuration and logging helpers for lensguard.
//!
//! Everything in here is free of network I/O except
//! [`network::interface::local_ipv4`], which only opens an unsent UDP socket.

pub mod config;
pub mod logging;
pub mod network;
pub mod report;
pub mod security;

#[doc(hidden)]
pub use tracing;
