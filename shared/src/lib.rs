//! DevConnector Shared Library
//!
//! This crate contains the wire types, models, and input helpers shared
//! between the backend and API clients.

pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use models::*;
pub use types::*;
