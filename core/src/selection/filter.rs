//! Evaluate a predicate against a single item. Used both when scanning a collection for
//! `execute()` and when re-checking one object for `matches()`, so the two can never disagree.

use std::cmp::Ordering;

use fetchql::ast::{ComparisonOperator, Expr, Predicate};
use thiserror::Error;
use tracing::trace;

use crate::value::{compare_values, Value};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("collection mismatch: expected {expected}, got {actual}")]
    CollectionMismatch { expected: String, actual: String },
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprOutput<T> {
    List(Vec<ExprOutput<T>>),
    Value(T),
    None,
}

impl<T> ExprOutput<T> {
    fn as_value(&self) -> Option<&T> {
        match self {
            ExprOutput::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl ExprOutput<Value> {
    fn is_none(&self) -> bool { matches!(self, ExprOutput::None) }

    /// Elements of a literal list, or of a list-valued field. Nulls are dropped.
    fn elements(&self) -> Option<Vec<&Value>> {
        match self {
            ExprOutput::List(items) => Some(items.iter().filter_map(|i| i.as_value()).collect()),
            ExprOutput::Value(Value::List(items)) => Some(items.iter().collect()),
            _ => None,
        }
    }
}

/// Trait for items that can be filtered by predicate evaluation
///
/// Returns typed Values to enable proper comparison with casting. `None` means the field is null.
pub trait Filterable {
    fn collection(&self) -> &str;
    fn value(&self, name: &str) -> Option<Value>;
}

fn evaluate_expr<I: Filterable>(item: &I, expr: &Expr) -> Result<ExprOutput<Value>, Error> {
    match expr {
        Expr::Placeholder => Err(Error::UnsupportedExpression("Placeholder values must be replaced before filtering")),
        Expr::Literal(lit) => Ok(ExprOutput::Value(lit.into())),
        Expr::Path(path) => {
            let name = match path.steps.as_slice() {
                [name] => name,
                [collection, name] => {
                    if collection != item.collection() {
                        return Err(Error::CollectionMismatch { expected: collection.clone(), actual: item.collection().to_string() });
                    }
                    name
                }
                _ => return Err(Error::UnsupportedExpression("Key paths deeper than entity.field are not supported")),
            };
            Ok(item.value(name).map(ExprOutput::Value).unwrap_or(ExprOutput::None))
        }
        Expr::ExprList(exprs) => {
            let mut result = Vec::with_capacity(exprs.len());
            for expr in exprs {
                result.push(evaluate_expr(item, expr)?);
            }
            Ok(ExprOutput::List(result))
        }
    }
}

fn fold_case(s: &str, case_insensitive: bool) -> String { if case_insensitive { s.to_lowercase() } else { s.to_string() } }

fn values_equal(left: &Value, right: &Value, case_insensitive: bool) -> bool {
    match (left, right) {
        (Value::String(l), Value::String(r)) if case_insensitive => l.to_lowercase() == r.to_lowercase(),
        _ => compare_values(left, right) == Some(Ordering::Equal),
    }
}

fn string_match(left: &Value, right: &Value, case_insensitive: bool, test: fn(&str, &str) -> bool) -> bool {
    match (left.as_str(), right.as_str()) {
        (Some(l), Some(r)) => test(&fold_case(l, case_insensitive), &fold_case(r, case_insensitive)),
        _ => false,
    }
}

fn evaluate_comparison(left: &ExprOutput<Value>, operator: &ComparisonOperator, right: &ExprOutput<Value>) -> Result<bool, Error> {
    // Comparisons with null never hold
    let ordered = |accept: fn(Ordering) -> bool| -> bool {
        left.as_value().zip(right.as_value()).and_then(|(l, r)| compare_values(l, r)).map(accept).unwrap_or(false)
    };

    Ok(match operator {
        ComparisonOperator::Equal => ordered(|o| o == Ordering::Equal),
        ComparisonOperator::NotEqual => ordered(|o| o != Ordering::Equal),
        ComparisonOperator::GreaterThan => ordered(|o| o == Ordering::Greater),
        ComparisonOperator::GreaterThanOrEqual => ordered(|o| o != Ordering::Less),
        ComparisonOperator::LessThan => ordered(|o| o == Ordering::Less),
        ComparisonOperator::LessThanOrEqual => ordered(|o| o != Ordering::Greater),
        ComparisonOperator::In => {
            // An unset list field is null, not an error
            let Some(value) = left.as_value() else { return Ok(false) };
            if right.is_none() {
                return Ok(false);
            }
            let list = right.elements().ok_or(Error::UnsupportedExpression("IN requires a list or list-valued field on the right"))?;
            list.into_iter().any(|candidate| values_equal(value, candidate, false))
        }
        ComparisonOperator::Between => {
            let Some(value) = left.as_value() else { return Ok(false) };
            let ExprOutput::List(bounds) = right else {
                return Err(Error::UnsupportedExpression("BETWEEN requires a (low, high) list"));
            };
            let [low, high] = bounds.as_slice() else {
                return Err(Error::UnsupportedExpression("BETWEEN requires exactly two bounds"));
            };
            let (Some(low), Some(high)) = (low.as_value(), high.as_value()) else { return Ok(false) };
            matches!(compare_values(value, low), Some(Ordering::Greater | Ordering::Equal))
                && matches!(compare_values(value, high), Some(Ordering::Less | Ordering::Equal))
        }
        ComparisonOperator::Contains { case_insensitive } => match (left.as_value(), right.as_value()) {
            (Some(Value::List(items)), Some(needle)) => items.iter().any(|item| values_equal(item, needle, *case_insensitive)),
            (Some(l), Some(r)) => string_match(l, r, *case_insensitive, |h, n| h.contains(n)),
            _ => false,
        },
        ComparisonOperator::BeginsWith { case_insensitive } => match (left.as_value(), right.as_value()) {
            (Some(l), Some(r)) => string_match(l, r, *case_insensitive, |h, n| h.starts_with(n)),
            _ => false,
        },
        ComparisonOperator::EndsWith { case_insensitive } => match (left.as_value(), right.as_value()) {
            (Some(l), Some(r)) => string_match(l, r, *case_insensitive, |h, n| h.ends_with(n)),
            _ => false,
        },
    })
}

pub fn evaluate_predicate<I: Filterable>(item: &I, predicate: &Predicate) -> Result<bool, Error> {
    let result = match predicate {
        Predicate::Comparison { left, operator, right } => {
            let left_val = evaluate_expr(item, left)?;
            let right_val = evaluate_expr(item, right)?;
            evaluate_comparison(&left_val, operator, &right_val)?
        }
        Predicate::And(left, right) => evaluate_predicate(item, left)? && evaluate_predicate(item, right)?,
        Predicate::Or(left, right) => evaluate_predicate(item, left)? || evaluate_predicate(item, right)?,
        Predicate::Not(pred) => !evaluate_predicate(item, pred)?,
        Predicate::IsNull(expr) => evaluate_expr(item, expr)?.is_none(),
        Predicate::True => true,
        Predicate::False => false,
        // Placeholder should be bound before filtering
        Predicate::Placeholder => return Err(Error::UnsupportedExpression("Placeholder must be transformed before filtering")),
    };
    trace!("evaluate_predicate {} -> {}", predicate, result);
    Ok(result)
}

#[derive(Debug, PartialEq)]
pub enum FilterResult<R> {
    Pass(R),
    Skip(R),
    Error(R, Error),
}

pub struct FilterIterator<'p, I> {
    iter: I,
    predicate: &'p Predicate,
}

impl<'p, I, R> FilterIterator<'p, I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    pub fn new(iter: I, predicate: &'p Predicate) -> Self { Self { iter, predicate } }
}

impl<I, R> Iterator for FilterIterator<'_, I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    type Item = FilterResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|item| match evaluate_predicate(&item, self.predicate) {
            Ok(true) => FilterResult::Pass(item),
            Ok(false) => FilterResult::Skip(item),
            Err(e) => FilterResult::Error(item, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetchql::builder::{field, Field};

    #[derive(Debug, Clone, PartialEq)]
    struct TestItem {
        name: String,
        age: Option<i32>,
        tags: Vec<&'static str>,
    }

    impl Filterable for TestItem {
        fn collection(&self) -> &str { "users" }

        fn value(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::String(self.name.clone())),
                "age" => self.age.map(Value::I32),
                "tags" => Some(Value::List(self.tags.iter().map(|t| Value::from(*t)).collect())),
                _ => None,
            }
        }
    }

    impl TestItem {
        fn new(name: &str, age: Option<i32>) -> Self { Self { name: name.to_string(), age, tags: Vec::new() } }
    }

    fn passes(item: &TestItem, predicate: Predicate) -> bool { evaluate_predicate(item, &predicate).unwrap() }

    #[test]
    fn test_simple_equality() {
        let items = vec![TestItem::new("Alice", Some(30)), TestItem::new("Bob", Some(25)), TestItem::new("Charlie", Some(35))];

        let predicate = field("name").eq("Alice");
        let results: Vec<_> = FilterIterator::new(items.clone().into_iter(), &predicate).collect();

        assert_eq!(
            results,
            vec![FilterResult::Pass(items[0].clone()), FilterResult::Skip(items[1].clone()), FilterResult::Skip(items[2].clone()),]
        );
    }

    #[test]
    fn test_numeric_comparison_with_cast() {
        let alice = TestItem::new("Alice", Some(30));
        assert!(passes(&alice, field("age").gt(25i64)));
        assert!(passes(&alice, field("age").le(30.0)));
        assert!(!passes(&alice, field("age").lt("30")));
        assert!(passes(&alice, field("age").ne(31)));
    }

    #[test]
    fn test_complex_and_or() {
        let predicate = field("name").eq("Alice").and(field("age").gt(25)).or(field("name").eq("Charlie"));
        assert!(passes(&TestItem::new("Alice", Some(30)), predicate.clone()));
        assert!(!passes(&TestItem::new("Bob", Some(40)), predicate.clone()));
        assert!(passes(&TestItem::new("Charlie", Some(1)), predicate));
    }

    #[test]
    fn test_null_semantics() {
        let unknown_age = TestItem::new("Dana", None);
        assert!(passes(&unknown_age, field("age").is_null()));
        assert!(!passes(&unknown_age, field("age").eq(30)));
        assert!(!passes(&unknown_age, field("age").ne(30)));
        assert!(passes(&unknown_age, field("age").eq(30).not()));
        assert!(!passes(&TestItem::new("Eve", Some(3)), field("age").is_null()));
    }

    #[test]
    fn test_in_and_between() {
        let bob = TestItem::new("Bob", Some(25));
        assert!(passes(&bob, field("name").is_in(["Alice", "Bob"])));
        assert!(!passes(&bob, field("name").is_in(Vec::<&str>::new())));
        assert!(passes(&bob, field("age").between(25, 30)));
        assert!(passes(&bob, field("age").between(20, 25)));
        assert!(!passes(&bob, field("age").between(26, 30)));
    }

    #[test]
    fn test_in_against_list_field() {
        let mut item = TestItem::new("Bob", Some(25));
        item.tags = vec!["admin", "ops"];
        let predicate = Predicate::Comparison {
            left: Box::new(Expr::Literal("ops".into())),
            operator: ComparisonOperator::In,
            right: Box::new(Expr::Path(fetchql::ast::PathExpr::simple("tags"))),
        };
        assert!(passes(&item, predicate));
    }

    #[test]
    fn test_null_list_operands_are_false() {
        let item = TestItem::new("Bob", Some(25));
        let ops_in_missing = Predicate::Comparison {
            left: Box::new(Expr::Literal("ops".into())),
            operator: ComparisonOperator::In,
            right: Box::new(Expr::Path(fetchql::ast::PathExpr::simple("missing"))),
        };
        assert_eq!(evaluate_predicate(&item, &ops_in_missing), Ok(false));
        assert_eq!(evaluate_predicate(&item, &ops_in_missing.not()), Ok(true));

        let open_bound = Predicate::Comparison {
            left: Box::new(Expr::Path(fetchql::ast::PathExpr::simple("age"))),
            operator: ComparisonOperator::Between,
            right: Box::new(Expr::ExprList(vec![Expr::Literal(20.into()), Expr::Path(fetchql::ast::PathExpr::simple("missing"))])),
        };
        assert_eq!(evaluate_predicate(&item, &open_bound), Ok(false));

        // A scalar right operand is still malformed
        assert!(passes(&item, field("age").eq(25)));
        let in_scalar = Predicate::Comparison {
            left: Box::new(Expr::Path(fetchql::ast::PathExpr::simple("age"))),
            operator: ComparisonOperator::In,
            right: Box::new(Expr::Path(fetchql::ast::PathExpr::simple("name"))),
        };
        assert!(matches!(evaluate_predicate(&item, &in_scalar), Err(Error::UnsupportedExpression(_))));
    }

    #[test]
    fn test_string_operators() {
        let item = TestItem::new("Walking on a Dream", Some(1));
        assert!(passes(&item, field("name").contains("on a")));
        assert!(!passes(&item, field("name").contains("ON A")));
        assert!(passes(&item, field("name").contains_ci("ON A")));
        assert!(passes(&item, field("name").begins_with("Walk")));
        assert!(passes(&item, field("name").begins_with_ci("walk")));
        assert!(passes(&item, field("name").ends_with("Dream")));
        assert!(!passes(&item, field("name").ends_with_ci("walk")));
        // string operators never match non-strings
        assert!(!passes(&item, field("age").contains("1")));
    }

    #[test]
    fn test_contains_on_list_field() {
        let mut item = TestItem::new("Bob", None);
        item.tags = vec!["Admin"];
        assert!(passes(&item, field("tags").contains("Admin")));
        assert!(!passes(&item, field("tags").contains("admin")));
        assert!(passes(&item, field("tags").contains_ci("admin")));
    }

    #[test]
    fn test_qualified_path() {
        let item = TestItem::new("Alice", Some(30));
        assert!(passes(&item, Field::of("users", "name").eq("Alice")));
        assert_eq!(
            evaluate_predicate(&item, &Field::of("albums", "name").eq("Alice")),
            Err(Error::CollectionMismatch { expected: "albums".into(), actual: "users".into() })
        );
    }

    #[test]
    fn test_placeholder_is_an_error() {
        let item = TestItem::new("Alice", Some(30));
        assert!(matches!(evaluate_predicate(&item, &Predicate::Placeholder), Err(Error::UnsupportedExpression(_))));
    }
}
