use std::cmp::Ordering;

use super::{Value, ValueType};

/// Order two values, casting across types where a lossless interpretation exists.
///
/// Numbers compare by numeric value regardless of width, so `I64(2)` and `F64(2.5)` are unequal.
/// Otherwise the right operand is cast to the left's type, then the left to the right's.
/// Returns None when the values have no common type (or a NaN is involved).
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    let left_type = ValueType::of(left);
    let right_type = ValueType::of(right);

    if left_type.is_numeric() && right_type.is_numeric() {
        return match (left.as_i64(), right.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
        };
    }

    if left_type == right_type {
        return left.partial_cmp(right);
    }

    // Numeric strings compare as numbers against numbers, from either side
    if left_type.is_numeric() {
        if let Ok(casted_right) = right.cast_to(ValueType::F64) {
            return compare_values(left, &casted_right);
        }
    } else if right_type.is_numeric() {
        if let Ok(casted_left) = left.cast_to(ValueType::F64) {
            return compare_values(&casted_left, right);
        }
    }

    if let Ok(casted_right) = right.cast_to(left_type) {
        return compare_values(left, &casted_right);
    }

    if let Ok(casted_left) = left.cast_to(right_type) {
        return compare_values(&casted_left, right);
    }

    None
}
