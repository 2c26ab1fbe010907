//! Identity types shared by fetchkit crates.

pub mod collection;
pub mod error;
pub mod id;

pub use collection::*;
pub use error::*;
pub use id::*;
