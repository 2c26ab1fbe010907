use fetchkit_proto::CollectionId;
use fetchql::ast::PathExpr;
use serde::{Deserialize, Serialize};

use crate::error::SpecificationError;
use crate::value::{CastError, Value, ValueType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Scalar field of a single value type
    Value(ValueType),
    /// Ordered collection of references to objects of `target`
    Relationship { target: CollectionId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// Field layout of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    collection: CollectionId,
    fields: Vec<FieldDef>,
}

impl EntitySchema {
    pub fn new(collection: impl Into<CollectionId>) -> Self { Self { collection: collection.into(), fields: Vec::new() } }

    pub fn field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.push(name.into(), FieldKind::Value(value_type));
        self
    }

    pub fn relationship(mut self, name: impl Into<String>, target: impl Into<CollectionId>) -> Self {
        self.push(name.into(), FieldKind::Relationship { target: target.into() });
        self
    }

    fn push(&mut self, name: String, kind: FieldKind) {
        // redefinition replaces
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldDef { name, kind });
    }

    pub fn collection(&self) -> &CollectionId { &self.collection }

    pub fn fields(&self) -> &[FieldDef] { &self.fields }

    pub fn get(&self, name: &str) -> Option<&FieldDef> { self.fields.iter().find(|f| f.name == name) }

    /// Cast `value` to the declared type of `field`, as a store does on write. Relationship
    /// fields become lists of entity ids. `None` if the entity has no such field.
    pub fn conform(&self, field: &str, value: &Value) -> Option<Result<Value, CastError>> {
        let def = self.get(field)?;
        Some(match &def.kind {
            FieldKind::Value(value_type) => value.cast_to(*value_type),
            FieldKind::Relationship { .. } => conform_references(value),
        })
    }

    /// Target entity of a collection-valued relationship field.
    pub fn relationship_target(&self, name: &str) -> Result<&CollectionId, SpecificationError> {
        match self.get(name).map(|f| &f.kind) {
            Some(FieldKind::Relationship { target }) => Ok(target),
            Some(FieldKind::Value(_)) => Err(SpecificationError::NotARelationship { entity: self.collection.clone(), field: name.to_string() }),
            None => Err(SpecificationError::UnknownField { entity: self.collection.clone(), field: name.to_string() }),
        }
    }
}

fn conform_references(value: &Value) -> Result<Value, CastError> {
    let Value::List(items) = value.cast_to(ValueType::List)? else {
        return Err(CastError::IncompatibleTypes { from: ValueType::of(value), to: ValueType::List });
    };
    items.iter().map(|item| item.cast_to(ValueType::EntityId)).collect::<Result<Vec<_>, _>>().map(Value::List)
}

/// Trait for providing schema information about collections
pub trait CollectionSchema {
    /// Resolve a (possibly entity-qualified) path to the field it names
    fn field_kind(&self, path: &PathExpr) -> Result<&FieldKind, SpecificationError>;
}

impl CollectionSchema for EntitySchema {
    fn field_kind(&self, path: &PathExpr) -> Result<&FieldKind, SpecificationError> {
        let unknown = || SpecificationError::UnknownField { entity: self.collection.clone(), field: path.to_string() };
        let name = match path.steps.as_slice() {
            [name] => name,
            [qualifier, name] if self.collection == qualifier.as_str() => name,
            _ => return Err(unknown()),
        };
        self.get(name).map(|f| &f.kind).ok_or_else(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> EntitySchema {
        EntitySchema::new("Project").field("name", ValueType::String).relationship("tasks", "Task")
    }

    #[test]
    fn test_field_kind_resolves_qualified_paths() {
        let schema = project();
        assert_eq!(schema.field_kind(&PathExpr::simple("name")).unwrap(), &FieldKind::Value(ValueType::String));
        assert_eq!(schema.field_kind(&PathExpr::qualified("Project", "name")).unwrap(), &FieldKind::Value(ValueType::String));
        assert!(matches!(schema.field_kind(&PathExpr::qualified("Task", "name")), Err(SpecificationError::UnknownField { .. })));
        assert!(matches!(schema.field_kind(&PathExpr::simple("owner")), Err(SpecificationError::UnknownField { .. })));
    }

    #[test]
    fn test_relationship_target() {
        let schema = project();
        assert_eq!(schema.relationship_target("tasks").unwrap(), &CollectionId::from("Task"));
        assert!(matches!(schema.relationship_target("name"), Err(SpecificationError::NotARelationship { .. })));
        assert!(matches!(schema.relationship_target("members"), Err(SpecificationError::UnknownField { .. })));
    }

    #[test]
    fn test_conform_casts_to_declared_types() {
        let schema = EntitySchema::new("Task").field("done", ValueType::Bool).field("priority", ValueType::I64).relationship("deps", "Task");
        assert_eq!(schema.conform("done", &Value::from("yes")), Some(Ok(Value::Bool(true))));
        assert_eq!(schema.conform("priority", &Value::F64(2.0)), Some(Ok(Value::I64(2))));
        assert!(matches!(schema.conform("priority", &Value::F64(2.5)), Some(Err(_))));
        assert_eq!(schema.conform("owner", &Value::from("me")), None);

        let id = fetchkit_proto::EntityId::new();
        assert_eq!(schema.conform("deps", &Value::EntityId(id)), Some(Ok(Value::from(vec![id]))));
        assert!(matches!(schema.conform("deps", &Value::from("not a list")), Some(Err(_))));
    }

    #[test]
    fn test_redefining_a_field_replaces_it() {
        let schema = EntitySchema::new("Task").field("done", ValueType::String).field("done", ValueType::Bool);
        assert_eq!(schema.fields().len(), 1);
        assert_eq!(schema.get("done").unwrap().kind, FieldKind::Value(ValueType::Bool));
    }
}
