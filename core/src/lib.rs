pub mod changes;
pub mod error;
pub mod fetch;
pub mod object;
pub mod schema;
pub mod selection;
pub mod storage;
pub mod value;

pub use changes::{classify_change, ChangeKind};
pub use error::{FetchError, SpecificationError, StoreError};
pub use fetch::{FetchRequest, FetchResults, FetchSpecification, Matcher, RelationshipFetchSpecification};
pub use object::Object;
pub use schema::{EntitySchema, FieldKind};
pub use storage::{MemoryStore, ObjectStore};
pub use value::{Value, ValueType};

pub use fetchkit_proto as proto;
pub use fetchkit_proto::{CollectionId, EntityId};
pub use fetchql;
