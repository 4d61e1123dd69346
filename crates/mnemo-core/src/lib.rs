//! # mnemo-core
//!
//! Core types, traits, and abstractions for the mnemo knowledge backend.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other mnemo crates depend on.

pub mod error;
pub mod hashtags;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use hashtags::{extract_inline_hashtags, merge_tags};
pub use models::*;
pub use traits::*;
