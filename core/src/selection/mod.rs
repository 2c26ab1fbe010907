pub mod filter;
pub mod sorting;
pub mod validate;
