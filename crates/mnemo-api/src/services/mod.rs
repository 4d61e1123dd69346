//! Service layer: logic that spans repositories and external collaborators.

pub mod purge;

pub use purge::{PurgeConfig, PurgeCoordinator};
