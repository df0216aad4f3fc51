//! # Brewguide Core
//!
//! Core types for the brewguide café lookup service:
//! - Common error types
//! - The static city → café catalog

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;

pub use catalog::CafeCatalog;
pub use error::{Error, Result};
