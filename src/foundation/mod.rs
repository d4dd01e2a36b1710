//! Foundation types shared across the crate.

pub mod core;
pub mod error;
