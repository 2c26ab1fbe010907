//! Ergonomic construction of predicates and ordering keys.
//!
//! ```
//! use fetchql::builder::field;
//!
//! let predicate = field("done").eq(false).and(field("title").contains_ci("milk"));
//! assert_eq!(predicate.to_string(), "(done = false AND title CONTAINS[c] 'milk')");
//! ```

use crate::ast::{ComparisonOperator, Expr, Literal, OrderByItem, OrderDirection, PathExpr, Predicate};
use ulid::Ulid;

/// Start a predicate or ordering key on the named field.
pub fn field(name: impl Into<String>) -> Field { Field(PathExpr::simple(name)) }

#[derive(Debug, Clone)]
pub struct Field(PathExpr);

impl Field {
    /// Qualify with the entity name, e.g. `Task.done`.
    pub fn of(collection: impl Into<String>, name: impl Into<String>) -> Self { Field(PathExpr::qualified(collection, name)) }

    pub fn path(&self) -> &PathExpr { &self.0 }

    fn compare(self, operator: ComparisonOperator, right: Expr) -> Predicate {
        Predicate::Comparison { left: Box::new(Expr::Path(self.0)), operator, right: Box::new(right) }
    }

    pub fn eq(self, value: impl Into<Literal>) -> Predicate { self.compare(ComparisonOperator::Equal, Expr::Literal(value.into())) }
    pub fn ne(self, value: impl Into<Literal>) -> Predicate { self.compare(ComparisonOperator::NotEqual, Expr::Literal(value.into())) }
    pub fn gt(self, value: impl Into<Literal>) -> Predicate { self.compare(ComparisonOperator::GreaterThan, Expr::Literal(value.into())) }
    pub fn ge(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::GreaterThanOrEqual, Expr::Literal(value.into()))
    }
    pub fn lt(self, value: impl Into<Literal>) -> Predicate { self.compare(ComparisonOperator::LessThan, Expr::Literal(value.into())) }
    pub fn le(self, value: impl Into<Literal>) -> Predicate { self.compare(ComparisonOperator::LessThanOrEqual, Expr::Literal(value.into())) }

    /// Compare against another field of the same object.
    pub fn eq_field(self, other: Field) -> Predicate { self.compare(ComparisonOperator::Equal, Expr::Path(other.0)) }

    pub fn is_in<I, L>(self, values: I) -> Predicate
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        let list = values.into_iter().map(|v| Expr::Literal(v.into())).collect();
        self.compare(ComparisonOperator::In, Expr::ExprList(list))
    }

    /// Inclusive on both ends.
    pub fn between(self, low: impl Into<Literal>, high: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::Between, Expr::ExprList(vec![Expr::Literal(low.into()), Expr::Literal(high.into())]))
    }

    pub fn contains(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::Contains { case_insensitive: false }, Expr::Literal(value.into()))
    }
    pub fn contains_ci(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::Contains { case_insensitive: true }, Expr::Literal(value.into()))
    }
    pub fn begins_with(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::BeginsWith { case_insensitive: false }, Expr::Literal(value.into()))
    }
    pub fn begins_with_ci(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::BeginsWith { case_insensitive: true }, Expr::Literal(value.into()))
    }
    pub fn ends_with(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::EndsWith { case_insensitive: false }, Expr::Literal(value.into()))
    }
    pub fn ends_with_ci(self, value: impl Into<Literal>) -> Predicate {
        self.compare(ComparisonOperator::EndsWith { case_insensitive: true }, Expr::Literal(value.into()))
    }

    pub fn is_null(self) -> Predicate { Predicate::IsNull(Box::new(Expr::Path(self.0))) }

    pub fn asc(self) -> OrderByItem { OrderByItem { path: self.0, direction: OrderDirection::Asc } }
    pub fn desc(self) -> OrderByItem { OrderByItem { path: self.0, direction: OrderDirection::Desc } }
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate { Predicate::And(Box::new(self), Box::new(other)) }

    pub fn or(self, other: Predicate) -> Predicate { Predicate::Or(Box::new(self), Box::new(other)) }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate { Predicate::Not(Box::new(self)) }
}

impl From<i16> for Literal {
    fn from(v: i16) -> Self { Literal::I16(v) }
}
impl From<i32> for Literal {
    fn from(v: i32) -> Self { Literal::I32(v) }
}
impl From<i64> for Literal {
    fn from(v: i64) -> Self { Literal::I64(v) }
}
impl From<f64> for Literal {
    fn from(v: f64) -> Self { Literal::F64(v) }
}
impl From<bool> for Literal {
    fn from(v: bool) -> Self { Literal::Bool(v) }
}
impl From<&str> for Literal {
    fn from(v: &str) -> Self { Literal::String(v.to_string()) }
}
impl From<String> for Literal {
    fn from(v: String) -> Self { Literal::String(v) }
}
impl From<Ulid> for Literal {
    fn from(v: Ulid) -> Self { Literal::EntityId(v) }
}
