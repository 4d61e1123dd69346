//! # mnemo-index
//!
//! Vector index collaborator for mnemo.
//!
//! The index is an external, independently-failing service consumed only
//! through the `mnemo_core::VectorIndex` contract. This crate provides
//! the in-memory reference implementation and a failure-injecting mock
//! for purge-protocol tests. Embedding computation itself is out of
//! scope: the index records the text it was handed, keyed by note id.

pub mod memory;
pub mod mock;

pub use memory::MemoryVectorIndex;
pub use mock::{MockIndexCall, MockVectorIndex};

// Re-export the contract
pub use mnemo_core::VectorIndex;
