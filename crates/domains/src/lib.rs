//! # domains
//!
//! Entity models, identifiers, the error taxonomy and the port traits of the
//! roleplay forum. Nothing in this crate performs I/O.

pub mod errors;
pub mod ids;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use ids::*;
pub use models::*;
pub use ports::*;
