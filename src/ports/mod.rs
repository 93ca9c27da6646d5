//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the artifact storage backend.

mod model_store;

pub use model_store::ModelStore;
