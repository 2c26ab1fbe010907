//! Typed predicate language for fetch specifications.
//!
//! Predicates are built as an AST rather than parsed from text, so the same tree drives both
//! store-side filtering and per-object re-evaluation.

pub mod ast;
pub mod builder;

pub use builder::field;
