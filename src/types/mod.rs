//! Type-system adapter: the thin facade the dispatch engine is built on.
//!
//! Everything outside this module treats `JuliaType` as an opaque lattice with
//! a handful of operations (`is_subtype_of`, `intersect`, `is_leaf`,
//! `specificity`, `instantiate`). The lattice itself is intentionally a small
//! slice of the real one — just the numeric tower, the compound/parametric
//! shapes, and the abstract supertypes dispatch decisions need.
//!
//! # Module organization
//!
//! - `julia_type/`: the `JuliaType` enum, subtype/specificity rules, display
//! - `lattice`: `intersect`, `is_leaf`, and the tuple/vararg/union/typevar predicates
//! - `error`: `MethodError`, the error type dispatch raises

mod error;
mod julia_type;
mod lattice;

#[cfg(test)]
mod tests;

pub use error::MethodError;
pub use julia_type::JuliaType;
