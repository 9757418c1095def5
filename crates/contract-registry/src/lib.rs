//! Capability registry for contract specs.
//!
//! Specs provide and require capabilities (`payments@2.1.0`, `orders@1.0.0`).
//! A [`CapabilityRegistry`] is an explicit, caller-owned value holding every
//! registered capability version; [`is_requirement_satisfied`] decides whether
//! a requirement is met by what a spec provides locally or by the registry.

pub mod capability;
pub mod error;
pub mod resolution;

pub use capability::{CapabilityKind, CapabilityRef, CapabilityRegistry, CapabilitySpec};
pub use error::{RegistryError, Result};
pub use resolution::{is_requirement_satisfied, unsatisfied_requirements, CapabilityRequirement};
