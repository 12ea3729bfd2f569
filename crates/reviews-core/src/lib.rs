//! # reviews-core
//!
//! Core types, traits, and abstractions for the product reviews service.
//!
//! This crate provides the domain models, request/response shapes, and the
//! repository trait that the database and HTTP crates build on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
