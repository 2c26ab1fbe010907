use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use fetchkit_proto::{CollectionId, EntityId};
use indexmap::IndexMap;
use tracing::debug;

use super::ObjectStore;
use crate::error::StoreError;
use crate::object::Object;
use crate::schema::{EntitySchema, FieldKind};
use crate::value::Value;

/// In-memory object store. Collections keep insertion order, which is the order
/// `resolve_collection` reports.
///
/// Fetch specifications borrow the store, so it must outlive every specification built on it.
/// [`MemoryStore::close`] simulates a store going away: all later calls fail with
/// [`StoreError::Closed`].
pub struct MemoryStore {
    name: String,
    open: AtomicBool,
    schemas: DashMap<CollectionId, Arc<EntitySchema>>,
    collections: DashMap<CollectionId, IndexMap<EntityId, Object>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), open: AtomicBool::new(true), schemas: DashMap::new(), collections: DashMap::new() }
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Closed(self.name.clone()))
        }
    }

    pub fn is_open(&self) -> bool { self.open.load(Ordering::Acquire) }

    pub fn close(&self) {
        debug!("MemoryStore({}).close()", self.name);
        self.open.store(false, Ordering::Release);
    }

    /// Register (or replace) an entity schema. Existing objects are kept.
    pub fn register(&self, schema: EntitySchema) -> Result<(), StoreError> {
        self.check_open()?;
        let collection = schema.collection().clone();
        self.collections.entry(collection.clone()).or_default();
        self.schemas.insert(collection, Arc::new(schema));
        Ok(())
    }

    fn contains(&self, collection: &CollectionId, id: EntityId) -> bool {
        self.collections.get(collection).map(|objects| objects.contains_key(&id)).unwrap_or(false)
    }

    /// Cast a field value to the schema's declared type. Relationship values must reference
    /// existing objects of the target entity.
    fn normalize(&self, schema: &EntitySchema, field: &str, value: Value) -> Result<Value, StoreError> {
        let collection = schema.collection();
        let conformed = schema
            .conform(field, &value)
            .ok_or_else(|| StoreError::UnknownField { collection: collection.clone(), field: field.to_string() })?
            .map_err(|source| StoreError::InvalidValue { collection: collection.clone(), field: field.to_string(), source })?;

        if let Ok(target) = schema.relationship_target(field) {
            for id in conformed.entity_ids() {
                if !self.contains(target, id) {
                    return Err(StoreError::ObjectNotFound { collection: target.clone(), id });
                }
            }
        }
        Ok(conformed)
    }

    pub fn insert(&self, mut object: Object) -> Result<EntityId, StoreError> {
        self.check_open()?;
        let schema = self.schema(object.collection())?;

        let fields = std::mem::take(object.fields_mut());
        for (name, value) in fields {
            let value = self.normalize(&schema, &name, value)?;
            object.fields_mut().insert(name, value);
        }

        let id = object.id();
        let mut objects = self.collections.get_mut(object.collection()).ok_or_else(|| StoreError::CollectionNotFound(object.collection().clone()))?;
        if objects.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        debug!("MemoryStore({}).insert {}", self.name, object);
        objects.insert(id, object);
        Ok(id)
    }

    /// Set one field on a stored object.
    pub fn set(&self, collection: &CollectionId, id: EntityId, field: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        self.check_open()?;
        let schema = self.schema(collection)?;
        let value = self.normalize(&schema, field, value.into())?;
        self.with_object_mut(collection, id, |object| {
            object.set(field, value);
        })
    }

    /// Clear one field, making it null.
    pub fn unset(&self, collection: &CollectionId, id: EntityId, field: &str) -> Result<(), StoreError> {
        self.check_open()?;
        let schema = self.schema(collection)?;
        if schema.get(field).is_none() {
            return Err(StoreError::UnknownField { collection: collection.clone(), field: field.to_string() });
        }
        self.with_object_mut(collection, id, |object| {
            object.unset(field);
        })
    }

    fn with_object_mut<R>(&self, collection: &CollectionId, id: EntityId, f: impl FnOnce(&mut Object) -> R) -> Result<R, StoreError> {
        let mut objects = self.collections.get_mut(collection).ok_or_else(|| StoreError::CollectionNotFound(collection.clone()))?;
        let object = objects.get_mut(&id).ok_or_else(|| StoreError::ObjectNotFound { collection: collection.clone(), id })?;
        Ok(f(object))
    }

    /// Remove an object, and every relationship reference to it.
    pub fn delete(&self, collection: &CollectionId, id: EntityId) -> Result<Object, StoreError> {
        self.check_open()?;
        let removed = {
            let mut objects = self.collections.get_mut(collection).ok_or_else(|| StoreError::CollectionNotFound(collection.clone()))?;
            objects.shift_remove(&id).ok_or_else(|| StoreError::ObjectNotFound { collection: collection.clone(), id })?
        };

        let referrers: Vec<(CollectionId, String)> = self
            .schemas
            .iter()
            .flat_map(|schema| {
                let owner = schema.collection().clone();
                schema
                    .fields()
                    .iter()
                    .filter(|def| matches!(&def.kind, FieldKind::Relationship { target } if target == collection))
                    .map(|def| (owner.clone(), def.name.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();

        for (owner, field) in referrers {
            if let Some(mut objects) = self.collections.get_mut(&owner) {
                for object in objects.values_mut() {
                    let refs = object.references(&field);
                    if refs.contains(&id) {
                        object.set(field.as_str(), refs.into_iter().filter(|r| *r != id).collect::<Vec<_>>());
                    }
                }
            }
        }

        debug!("MemoryStore({}).delete {}", self.name, removed);
        Ok(removed)
    }

    /// Append `target` to `owner.relationship`.
    pub fn relate(&self, owner_collection: &CollectionId, owner_id: EntityId, relationship: &str, target: EntityId) -> Result<(), StoreError> {
        self.check_open()?;
        let schema = self.schema(owner_collection)?;
        let target_collection = relationship_target(&schema, relationship)?;
        if !self.contains(&target_collection, target) {
            return Err(StoreError::ObjectNotFound { collection: target_collection, id: target });
        }
        self.with_object_mut(owner_collection, owner_id, |owner| {
            let mut refs = owner.references(relationship);
            refs.push(target);
            owner.set(relationship, refs);
        })
    }

    /// Remove every occurrence of `target` from `owner.relationship`. Returns whether it was present.
    pub fn unrelate(&self, owner_collection: &CollectionId, owner_id: EntityId, relationship: &str, target: EntityId) -> Result<bool, StoreError> {
        self.check_open()?;
        let schema = self.schema(owner_collection)?;
        relationship_target(&schema, relationship)?;
        self.with_object_mut(owner_collection, owner_id, |owner| {
            let refs = owner.references(relationship);
            let present = refs.contains(&target);
            owner.set(relationship, refs.into_iter().filter(|r| *r != target).collect::<Vec<_>>());
            present
        })
    }
}

fn relationship_target(schema: &EntitySchema, relationship: &str) -> Result<CollectionId, StoreError> {
    match schema.get(relationship).map(|def| &def.kind) {
        Some(FieldKind::Relationship { target }) => Ok(target.clone()),
        Some(FieldKind::Value(_)) => Err(StoreError::NotARelationship { collection: schema.collection().clone(), field: relationship.to_string() }),
        None => Err(StoreError::UnknownField { collection: schema.collection().clone(), field: relationship.to_string() }),
    }
}

impl ObjectStore for MemoryStore {
    fn name(&self) -> &str { &self.name }

    fn schema(&self, collection: &CollectionId) -> Result<Arc<EntitySchema>, StoreError> {
        self.check_open()?;
        self.schemas.get(collection).map(|schema| schema.clone()).ok_or_else(|| StoreError::CollectionNotFound(collection.clone()))
    }

    fn resolve_collection(&self, collection: &CollectionId) -> Result<Vec<Object>, StoreError> {
        self.check_open()?;
        let objects = self.collections.get(collection).ok_or_else(|| StoreError::CollectionNotFound(collection.clone()))?;
        Ok(objects.values().cloned().collect())
    }

    fn get(&self, collection: &CollectionId, id: EntityId) -> Result<Object, StoreError> {
        self.check_open()?;
        let objects = self.collections.get(collection).ok_or_else(|| StoreError::CollectionNotFound(collection.clone()))?;
        objects.get(&id).cloned().ok_or_else(|| StoreError::ObjectNotFound { collection: collection.clone(), id })
    }
}
