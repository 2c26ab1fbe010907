//! Error types for fetch specifications and object stores.

use fetchkit_proto::{CollectionId, EntityId};
use thiserror::Error;

use crate::selection::filter;
use crate::value::CastError;

/// Error type for building, executing, or evaluating a fetch specification.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Unknown entity, unknown or non-collection relationship, or a malformed filter/ordering
    #[error("invalid fetch specification: {0}")]
    InvalidSpecification(#[from] SpecificationError),

    /// `matches()` was handed an object of another entity type
    #[error("type mismatch: expected {expected} object, got {actual}")]
    TypeMismatch { expected: CollectionId, actual: CollectionId },

    /// The backing store (or an object it was asked to resolve) is no longer valid
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),

    #[error("filter evaluation failed: {0}")]
    Evaluation(#[from] filter::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecificationError {
    #[error("unknown entity: {0}")]
    UnknownEntity(CollectionId),

    #[error("unknown field '{field}' on entity {entity}")]
    UnknownField { entity: CollectionId, field: String },

    #[error("'{field}' on entity {entity} is not a collection-valued relationship")]
    NotARelationship { entity: CollectionId, field: String },

    #[error("relationship owner {entity}/{id} is not in the store")]
    OwnerNotFound { entity: CollectionId, id: EntityId },

    #[error("invalid operand: {0}")]
    InvalidOperand(String),
}

/// Error type for object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store '{0}' is closed")]
    Closed(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(CollectionId),

    #[error("object not found: {collection}/{id}")]
    ObjectNotFound { collection: CollectionId, id: EntityId },

    #[error("object already exists: {0}")]
    AlreadyExists(EntityId),

    #[error("'{field}' on entity {collection} is not a collection-valued relationship")]
    NotARelationship { collection: CollectionId, field: String },

    #[error("unknown field '{field}' on entity {collection}")]
    UnknownField { collection: CollectionId, field: String },

    #[error("invalid value for {collection}.{field}: {source}")]
    InvalidValue {
        collection: CollectionId,
        field: String,
        #[source]
        source: CastError,
    },
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CollectionNotFound(collection) => FetchError::InvalidSpecification(SpecificationError::UnknownEntity(collection)),
            StoreError::NotARelationship { collection, field } => {
                FetchError::InvalidSpecification(SpecificationError::NotARelationship { entity: collection, field })
            }
            StoreError::UnknownField { collection, field } => {
                FetchError::InvalidSpecification(SpecificationError::UnknownField { entity: collection, field })
            }
            other => FetchError::StoreUnavailable(other),
        }
    }
}
