use crate::value::{Value, ValueType};
use fetchkit_proto::EntityId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    /// Cannot cast from source type to target type
    #[error("Cannot cast from {from:?} to {to:?}")]
    IncompatibleTypes { from: ValueType, to: ValueType },
    /// Invalid format for the target type (e.g., invalid EntityId string)
    #[error("Invalid format '{value}' for type {target_type:?}")]
    InvalidFormat { value: String, target_type: ValueType },
    /// Numeric overflow when casting between numeric types
    #[error("Numeric overflow: '{value}' cannot fit in {target_type:?}")]
    NumericOverflow { value: String, target_type: ValueType },
}

fn narrow<T, N>(n: N, target_type: ValueType, wrap: fn(T) -> Value) -> Result<Value, CastError>
where
    T: TryFrom<N>,
    N: ToString + Copy,
{
    T::try_from(n).map(wrap).map_err(|_| CastError::NumericOverflow { value: n.to_string(), target_type })
}

fn float_to_int(f: f64, target_type: ValueType) -> Result<Value, CastError> {
    let (min, max) = match target_type {
        ValueType::I16 => (i16::MIN as f64, i16::MAX as f64),
        ValueType::I32 => (i32::MIN as f64, i32::MAX as f64),
        _ => (i64::MIN as f64, i64::MAX as f64),
    };
    if !f.is_finite() || f < min || f > max {
        return Err(CastError::NumericOverflow { value: f.to_string(), target_type });
    }
    // Whole numbers only
    if f.fract() != 0.0 {
        return Err(CastError::InvalidFormat { value: f.to_string(), target_type });
    }
    Ok(match target_type {
        ValueType::I16 => Value::I16(f as i16),
        ValueType::I32 => Value::I32(f as i32),
        _ => Value::I64(f as i64),
    })
}

fn parse<T: std::str::FromStr>(s: &str, target_type: ValueType, wrap: fn(T) -> Value) -> Result<Value, CastError> {
    s.trim().parse::<T>().map(wrap).map_err(|_| CastError::InvalidFormat { value: s.to_string(), target_type })
}

impl Value {
    /// Widen any integer variant to i64, or None for non-integers.
    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I16(n) => Some(*n as i64),
            Value::I32(n) => Some(*n as i64),
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    /// Cast this value to the specified target type
    pub fn cast_to(&self, target_type: ValueType) -> Result<Value, CastError> {
        let source_type = ValueType::of(self);

        if source_type == target_type {
            return Ok(self.clone());
        }

        match (self, target_type) {
            (Value::String(s), ValueType::EntityId) => match EntityId::try_from(s.as_str()) {
                Ok(entity_id) => Ok(Value::EntityId(entity_id)),
                Err(_) => Err(CastError::InvalidFormat { value: s.clone(), target_type: ValueType::EntityId }),
            },
            (Value::EntityId(entity_id), ValueType::String) => Ok(Value::String(entity_id.to_base64())),

            // Integer widening and narrowing
            (Value::I16(_) | Value::I32(_) | Value::I64(_), ValueType::I16 | ValueType::I32 | ValueType::I64) => {
                let n = self.as_i64().unwrap_or_default();
                match target_type {
                    ValueType::I16 => narrow::<i16, i64>(n, target_type, Value::I16),
                    ValueType::I32 => narrow::<i32, i64>(n, target_type, Value::I32),
                    _ => Ok(Value::I64(n)),
                }
            }
            (Value::I16(_) | Value::I32(_) | Value::I64(_), ValueType::F64) => Ok(Value::F64(self.as_f64().unwrap_or_default())),
            (Value::F64(f), ValueType::I16 | ValueType::I32 | ValueType::I64) => float_to_int(*f, target_type),

            (Value::String(s), ValueType::I16) => parse(s, target_type, Value::I16),
            (Value::String(s), ValueType::I32) => parse(s, target_type, Value::I32),
            (Value::String(s), ValueType::I64) => parse(s, target_type, Value::I64),
            (Value::String(s), ValueType::F64) => parse(s, target_type, Value::F64),
            (Value::String(s), ValueType::Bool) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(CastError::InvalidFormat { value: s.clone(), target_type: ValueType::Bool }),
            },

            (Value::I16(_) | Value::I32(_) | Value::I64(_) | Value::F64(_) | Value::Bool(_), ValueType::String) => {
                Ok(Value::String(match self {
                    Value::F64(f) => f.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => other.as_i64().unwrap_or_default().to_string(),
                }))
            }

            // A lone id widens to a single-element relationship list
            (Value::EntityId(id), ValueType::List) => Ok(Value::List(vec![Value::EntityId(*id)])),

            _ => Err(CastError::IncompatibleTypes { from: source_type, to: target_type }),
        }
    }
}
