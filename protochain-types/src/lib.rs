//! Core type definitions for protochain.
//!
//! This crate defines the identifiers shared by every protochain crate:
//! - [`EntityId`], the opaque handle for an object in a prototype graph (UUID v7)
//!
//! The value model and the graph itself live in `protochain-graph`.

mod ids;

pub use ids::EntityId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
