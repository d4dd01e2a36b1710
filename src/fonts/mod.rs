//! Font sources and their resolution to usable font bytes.
//!
//! Resolution is IO (network or disk, cacheable) and lives here; turning
//! resolved bytes into glyphs is pure layout work and lives in
//! [`crate::layout`].

pub mod resolve;
pub mod source;
