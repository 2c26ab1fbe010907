//! Schema checks run when a filter or ordering is installed on a fetch specification, so that a
//! malformed query fails up front instead of silently matching nothing.

use fetchql::ast::{ComparisonOperator, Expr, OrderByItem, Predicate};

use crate::error::SpecificationError;
use crate::schema::{CollectionSchema, FieldKind};
use crate::value::ValueType;

fn invalid(msg: impl Into<String>) -> SpecificationError { SpecificationError::InvalidOperand(msg.into()) }

fn validate_expr<S: CollectionSchema>(schema: &S, expr: &Expr) -> Result<(), SpecificationError> {
    match expr {
        Expr::Literal(_) => Ok(()),
        Expr::Path(path) => schema.field_kind(path).map(|_| ()),
        Expr::ExprList(exprs) => exprs.iter().try_for_each(|e| validate_expr(schema, e)),
        Expr::Placeholder => Err(invalid("unbound placeholder")),
    }
}

/// Whether the expression is a path to a field usable as a string or collection operand.
fn string_operand_kind<S: CollectionSchema>(schema: &S, expr: &Expr, allow_list: bool) -> bool {
    match expr {
        Expr::Path(path) => match schema.field_kind(path) {
            Ok(FieldKind::Value(ValueType::String)) => true,
            Ok(FieldKind::Value(ValueType::List)) | Ok(FieldKind::Relationship { .. }) => allow_list,
            _ => false,
        },
        Expr::Literal(_) => true,
        _ => false,
    }
}

fn is_list_operand<S: CollectionSchema>(schema: &S, expr: &Expr) -> bool {
    match expr {
        Expr::ExprList(_) => true,
        Expr::Path(path) => {
            matches!(schema.field_kind(path), Ok(FieldKind::Value(ValueType::List)) | Ok(FieldKind::Relationship { .. }))
        }
        _ => false,
    }
}

pub fn validate_predicate<S: CollectionSchema>(schema: &S, predicate: &Predicate) -> Result<(), SpecificationError> {
    match predicate {
        Predicate::Comparison { left, operator, right } => {
            validate_expr(schema, left)?;
            validate_expr(schema, right)?;
            match operator {
                ComparisonOperator::In if !is_list_operand(schema, right) => Err(invalid(format!("IN requires a list operand: {}", predicate))),
                ComparisonOperator::Between => match right.as_ref() {
                    Expr::ExprList(bounds) if bounds.len() == 2 => Ok(()),
                    _ => Err(invalid(format!("BETWEEN requires exactly two bounds: {}", predicate))),
                },
                ComparisonOperator::Contains { .. } if !string_operand_kind(schema, left, true) => {
                    Err(invalid(format!("CONTAINS requires a string or collection field: {}", predicate)))
                }
                op if op.is_string_operator() && !matches!(op, ComparisonOperator::Contains { .. }) => {
                    if string_operand_kind(schema, left, false) && string_operand_kind(schema, right, false) {
                        Ok(())
                    } else {
                        Err(invalid(format!("{} requires string operands: {}", op, predicate)))
                    }
                }
                _ => Ok(()),
            }
        }
        Predicate::IsNull(expr) => validate_expr(schema, expr),
        Predicate::And(left, right) | Predicate::Or(left, right) => {
            validate_predicate(schema, left)?;
            validate_predicate(schema, right)
        }
        Predicate::Not(inner) => validate_predicate(schema, inner),
        Predicate::True | Predicate::False => Ok(()),
        Predicate::Placeholder => Err(invalid("unbound placeholder predicate")),
    }
}

/// Ordering keys must name scalar fields.
pub fn validate_ordering<S: CollectionSchema>(schema: &S, order_by: &[OrderByItem]) -> Result<(), SpecificationError> {
    for item in order_by {
        if let FieldKind::Relationship { .. } = schema.field_kind(&item.path)? {
            return Err(invalid(format!("cannot order by relationship '{}'", item.path)));
        }
    }
    Ok(())
}
