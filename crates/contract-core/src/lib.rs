//! Core types for the contract impact engine.
//!
//! Holds the vocabulary every other crate speaks: the [`SpecType`] of a
//! contract, the versioned [`SpecKey`] (`name@version`) used to match specs
//! between a baseline and a head, and the semantic-versioning utilities used
//! both by the impact classifier and by capability resolution.

pub mod error;
pub mod key;
pub mod spec_type;
pub mod version;

pub use error::{CoreError, Result};
pub use key::SpecKey;
pub use spec_type::SpecType;
pub use version::{
    bump, bump_version, compare_versions, determine_bump_type, parse_version, BumpType, Version,
};
