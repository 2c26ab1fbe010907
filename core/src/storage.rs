mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use fetchkit_proto::{CollectionId, EntityId};
use tracing::warn;

use crate::error::StoreError;
use crate::object::Object;
use crate::schema::EntitySchema;

/// The object store a fetch specification runs against.
///
/// Implementations own their data; fetch specifications only borrow the store. Every call is
/// fallible so that a store which has gone away reports it instead of returning stale data.
pub trait ObjectStore {
    /// Human-readable identity of this store, for diagnostics.
    fn name(&self) -> &str;

    /// Schema of a registered entity, or `CollectionNotFound`.
    fn schema(&self, collection: &CollectionId) -> Result<Arc<EntitySchema>, StoreError>;

    /// Every object of the entity, in store-native order.
    fn resolve_collection(&self, collection: &CollectionId) -> Result<Vec<Object>, StoreError>;

    /// Current state of one object.
    fn get(&self, collection: &CollectionId, id: EntityId) -> Result<Object, StoreError>;

    fn get_many(&self, collection: &CollectionId, ids: &[EntityId]) -> Result<Vec<Object>, StoreError> {
        let mut objects = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(collection, *id) {
                Ok(object) => objects.push(object),
                Err(StoreError::ObjectNotFound { .. }) => {
                    warn!("{}: dangling reference to {}/{:?}", self.name(), collection, id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(objects)
    }

    /// Current contents of `owner.relationship`, in relationship-native order.
    fn resolve_relationship(&self, owner: &Object, relationship: &str) -> Result<Vec<Object>, StoreError> {
        let schema = self.schema(owner.collection())?;
        let target = schema.relationship_target(relationship).map_err(|_| match schema.get(relationship) {
            Some(_) => StoreError::NotARelationship { collection: owner.collection().clone(), field: relationship.to_string() },
            None => StoreError::UnknownField { collection: owner.collection().clone(), field: relationship.to_string() },
        })?;
        self.get_many(target, &owner.references(relationship))
    }
}
