mod cast;
mod compare;

pub use cast::CastError;
pub use compare::compare_values;

use fetchkit_proto::EntityId;
use fetchql::ast::Literal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A field value of a stored object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    // Numbers
    I16(i16),
    I32(i32),
    I64(i64),
    F64(f64),

    Bool(bool),
    String(String),
    EntityId(EntityId),
    Binary(Vec<u8>),
    /// Ordered collection. Relationship fields hold `EntityId` elements.
    List(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    I16,
    I32,
    I64,
    F64,
    Bool,
    String,
    EntityId,
    Binary,
    List,
}

impl ValueType {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::I16(_) => ValueType::I16,
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::F64(_) => ValueType::F64,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::EntityId(_) => ValueType::EntityId,
            Value::Binary(_) => ValueType::Binary,
            Value::List(_) => ValueType::List,
        }
    }

    pub fn is_numeric(&self) -> bool { matches!(self, ValueType::I16 | ValueType::I32 | ValueType::I64 | ValueType::F64) }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Entity ids held by a relationship value. Non-id elements are ignored.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        match self {
            Value::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::EntityId(id) => Some(*id),
                    _ => None,
                })
                .collect(),
            Value::EntityId(id) => vec![*id],
            _ => Vec::new(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::I16(int) => write!(f, "{:?}", int),
            Value::I32(int) => write!(f, "{:?}", int),
            Value::I64(int) => write!(f, "{:?}", int),
            Value::F64(float) => write!(f, "{:?}", float),
            Value::Bool(bool) => write!(f, "{:?}", bool),
            Value::String(string) => write!(f, "{:?}", string),
            Value::EntityId(entity_id) => write!(f, "{}", entity_id),
            Value::Binary(binary) => write!(f, "{:?}", binary),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::I16(i) => Value::I16(*i),
            Literal::I32(i) => Value::I32(*i),
            Literal::I64(i) => Value::I64(*i),
            Literal::F64(f) => Value::F64(*f),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::String(s) => Value::String(s.clone()),
            Literal::EntityId(ulid) => Value::EntityId(EntityId::from_ulid(*ulid)),
            Literal::Binary(binary) => Value::Binary(binary.clone()),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self { Value::from(&literal) }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self { Value::I16(v) }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::I32(v) }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::I64(v) }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::F64(v) }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::String(v.to_string()) }
}
impl From<String> for Value {
    fn from(v: String) -> Self { Value::String(v) }
}
impl From<EntityId> for Value {
    fn from(v: EntityId) -> Self { Value::EntityId(v) }
}
impl From<Vec<EntityId>> for Value {
    fn from(ids: Vec<EntityId>) -> Self { Value::List(ids.into_iter().map(Value::EntityId).collect()) }
}
