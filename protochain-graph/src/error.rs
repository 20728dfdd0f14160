//! Error types for graph operations.

use protochain_types::EntityId;
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur in graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The id does not name an entity in this graph.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Linking `child` to `parent` would close a delegation cycle.
    #[error("delegating {child} to {parent} would create a cycle")]
    Cycle { child: EntityId, parent: EntityId },

    /// The resolved property is data, not a method.
    #[error("property is not callable: {0}")]
    NotCallable(String),

    /// No entity on the chain owns the property.
    #[error("property not found: {0}")]
    PropertyNotFound(String),

    /// A property resolved to a value of the wrong kind.
    #[error("type mismatch on {name}: expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A method rejected its arguments.
    #[error("invalid argument to {method}: {reason}")]
    InvalidArgument { method: String, reason: String },

    /// Other entities still delegate to this one.
    #[error("entity {id} is still the parent of {dependents} entities")]
    EntityInUse { id: EntityId, dependents: usize },

    /// A thread panicked while holding the shared graph lock.
    #[error("graph lock poisoned")]
    LockPoisoned,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
