use serde::{Deserialize, Serialize};

/// Name of an entity type, and of the collection holding its objects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn new(name: impl Into<String>) -> Self { CollectionId(name.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for CollectionId {
    fn from(val: &str) -> Self { CollectionId(val.to_string()) }
}

impl From<String> for CollectionId {
    fn from(val: String) -> Self { CollectionId(val) }
}

impl From<&CollectionId> for CollectionId {
    fn from(val: &CollectionId) -> Self { val.clone() }
}

impl PartialEq<str> for CollectionId {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for CollectionId {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

impl From<CollectionId> for String {
    fn from(collection_id: CollectionId) -> Self { collection_id.0 }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
