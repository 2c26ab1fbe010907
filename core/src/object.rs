use std::collections::BTreeMap;
use std::fmt;

use fetchkit_proto::{CollectionId, EntityId};
use serde::{Deserialize, Serialize};

use crate::selection::filter::Filterable;
use crate::value::Value;

/// A stored object: identity plus a snapshot of its field values.
///
/// A field absent from `fields` is null. Objects are plain values; mutating one does not touch
/// the store it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    id: EntityId,
    collection: CollectionId,
    fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(collection: impl Into<CollectionId>) -> Self { Self::with_id(collection, EntityId::new()) }

    pub fn with_id(collection: impl Into<CollectionId>, id: EntityId) -> Self {
        Self { id, collection: collection.into(), fields: BTreeMap::new() }
    }

    /// Builder form of [`Object::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn id(&self) -> EntityId { self.id }

    pub fn collection(&self) -> &CollectionId { &self.collection }

    pub fn fields(&self) -> &BTreeMap<String, Value> { &self.fields }

    pub fn get(&self, name: &str) -> Option<&Value> { self.fields.get(name) }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) { self.fields.insert(name.into(), value.into()); }

    pub fn unset(&mut self, name: &str) -> Option<Value> { self.fields.remove(name) }

    /// Ids held by a relationship field, in relationship order.
    pub fn references(&self, name: &str) -> Vec<EntityId> { self.fields.get(name).map(|v| v.entity_ids()).unwrap_or_default() }

    pub(crate) fn fields_mut(&mut self) -> &mut BTreeMap<String, Value> { &mut self.fields }
}

impl Filterable for Object {
    fn collection(&self) -> &str { self.collection.as_str() }

    fn value(&self, name: &str) -> Option<Value> { self.fields.get(name).cloned() }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}/{:#}", self.collection, self.id) }
}
