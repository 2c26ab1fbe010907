use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Path(PathExpr),
    ExprList(Vec<Expr>),
    /// Unbound value slot. Must be replaced before evaluation.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    I16(i16),
    I32(i32),
    I64(i64),
    F64(f64),
    Bool(bool),
    String(String),
    EntityId(Ulid),
    Binary(Vec<u8>),
}

/// Dotted property path. A single step names a field of the object being evaluated;
/// a leading step equal to the entity name qualifies the field (`Task.done`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathExpr {
    pub steps: Vec<String>,
}

impl PathExpr {
    pub fn simple(name: impl Into<String>) -> Self { Self { steps: vec![name.into()] } }

    pub fn qualified(collection: impl Into<String>, name: impl Into<String>) -> Self { Self { steps: vec![collection.into(), name.into()] } }

    /// The field name, ignoring an optional collection qualifier.
    pub fn property(&self) -> &str { self.steps.last().map(|s| s.as_str()).unwrap_or("") }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Comparison { left: Box<Expr>, operator: ComparisonOperator, right: Box<Expr> },
    IsNull(Box<Expr>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    True,
    False,
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,              // =
    NotEqual,           // != or <>
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    LessThan,           // <
    LessThanOrEqual,    // <=
    In,                 // IN
    Between,            // BETWEEN
    Contains { case_insensitive: bool },
    BeginsWith { case_insensitive: bool },
    EndsWith { case_insensitive: bool },
}

impl ComparisonOperator {
    pub fn is_string_operator(&self) -> bool {
        matches!(self, ComparisonOperator::Contains { .. } | ComparisonOperator::BeginsWith { .. } | ComparisonOperator::EndsWith { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub path: PathExpr,
    pub direction: OrderDirection,
}

impl Predicate {
    /// Every path referenced anywhere in this predicate, in evaluation order.
    pub fn paths(&self) -> Vec<&PathExpr> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a PathExpr>) {
        match self {
            Predicate::Comparison { left, right, .. } => {
                left.collect_paths(out);
                right.collect_paths(out);
            }
            Predicate::IsNull(expr) => expr.collect_paths(out),
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_paths(out);
                right.collect_paths(out);
            }
            Predicate::Not(inner) => inner.collect_paths(out),
            Predicate::True | Predicate::False | Predicate::Placeholder => {}
        }
    }
}

impl Expr {
    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a PathExpr>) {
        match self {
            Expr::Path(path) => out.push(path),
            Expr::ExprList(exprs) => exprs.iter().for_each(|e| e.collect_paths(out)),
            Expr::Literal(_) | Expr::Placeholder => {}
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.steps.join(".")) }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::I16(i) => write!(f, "{}", i),
            Literal::I32(i) => write!(f, "{}", i),
            Literal::I64(i) => write!(f, "{}", i),
            Literal::F64(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Literal::EntityId(id) => write!(f, "{}", id),
            Literal::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Path(path) => write!(f, "{}", path),
            Expr::ExprList(exprs) => {
                write!(f, "(")?;
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", expr)?;
                }
                write!(f, ")")
            }
            Expr::Placeholder => write!(f, "?"),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ci = |flag: bool| if flag { "[c]" } else { "" };
        match self {
            ComparisonOperator::Equal => write!(f, "="),
            ComparisonOperator::NotEqual => write!(f, "!="),
            ComparisonOperator::GreaterThan => write!(f, ">"),
            ComparisonOperator::GreaterThanOrEqual => write!(f, ">="),
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::LessThanOrEqual => write!(f, "<="),
            ComparisonOperator::In => write!(f, "IN"),
            ComparisonOperator::Between => write!(f, "BETWEEN"),
            ComparisonOperator::Contains { case_insensitive } => write!(f, "CONTAINS{}", ci(*case_insensitive)),
            ComparisonOperator::BeginsWith { case_insensitive } => write!(f, "BEGINSWITH{}", ci(*case_insensitive)),
            ComparisonOperator::EndsWith { case_insensitive } => write!(f, "ENDSWITH{}", ci(*case_insensitive)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { left, operator, right } => write!(f, "{} {} {}", left, operator, right),
            Predicate::IsNull(expr) => write!(f, "{} IS NULL", expr),
            Predicate::And(left, right) => write!(f, "({} AND {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} OR {})", left, right),
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::True => write!(f, "TRUEPREDICATE"),
            Predicate::False => write!(f, "FALSEPREDICATE"),
            Predicate::Placeholder => write!(f, "?"),
        }
    }
}

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        };
        write!(f, "{} {}", self.path, direction)
    }
}
