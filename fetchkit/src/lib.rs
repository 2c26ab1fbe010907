//! # fetchkit
//!
//! Reusable descriptions of "all objects of entity E matching filter F, ordered by O" that can be
//! run against an object store, or asked whether a single object would be in the result without
//! running the query again.
//!
//! ## Core Concepts
//!
//! - **Entity**: a named object type known to the store, with a schema of typed fields
//! - **Relationship**: a field holding an ordered list of references to objects of another entity
//! - **Predicate**: a typed boolean expression over an object's fields (see [`fetchql`])
//! - **FetchSpecification**: entity + filter + ordering, executed against a borrowed store
//! - **RelationshipFetchSpecification**: the same, scoped to one owner's relationship
//!
//! ## Example
//!
//! ```rust
//! # use fetchkit::{field, EntitySchema, FetchSpecification, MemoryStore, Object, ValueType};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new("tasks");
//! store.register(EntitySchema::new("Task").field("title", ValueType::String).field("done", ValueType::Bool))?;
//! let done = store.insert(Object::new("Task").with("title", "ship it").with("done", true))?;
//! store.insert(Object::new("Task").with("title", "write docs").with("done", false))?;
//!
//! let mut spec = FetchSpecification::with_filter("Task", &store, field("done").eq(true))?;
//! spec.set_ordering(vec![field("title").asc()])?;
//! assert_eq!(spec.execute()?.ids(), vec![done]);
//!
//! // Check an edited object without re-running the fetch
//! let pending = Object::new("Task").with("title", "review").with("done", false);
//! assert!(!spec.matches(&pending)?);
//! # Ok(())
//! # }
//! ```

pub use fetchkit_core::{
    classify_change, ChangeKind, EntitySchema, FetchError, FetchRequest, FetchResults, FetchSpecification, FieldKind, Matcher,
    MemoryStore, Object, ObjectStore, RelationshipFetchSpecification, SpecificationError, StoreError, Value, ValueType,
};
pub use fetchkit_core as core;
pub use fetchkit_proto as proto;
pub use fetchql;

pub use fetchkit_proto::{CollectionId, EntityId};
pub use fetchql::builder::field;
