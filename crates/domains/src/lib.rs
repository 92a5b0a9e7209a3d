//! # domains
//!
//! The entity model, port traits and authorization policy for Inkpot.
//! Nothing in this crate performs I/O; adapters implement the ports.

pub mod error;
pub mod models;
pub mod policy;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
