//! # Brewguide Server
//!
//! HTTP API server exposing the café lookup endpoint.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod server;

pub use server::{Server, ServerConfig};
