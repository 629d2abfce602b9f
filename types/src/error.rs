//! Error types for the fallible entry points.
//!
//! Most queries in this crate are total: they answer for every node shape
//! and never fail. The exceptions are merging qualifier sets that may
//! conflict and substituting generic arguments supplied by a caller.

use thiserror::Error;

use crate::qualifiers::{AddressSpace, GcAttr, Lifetime};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierError {
    #[error("conflicting address spaces: {left:?} and {right:?}")]
    AddressSpaceConflict { left: AddressSpace, right: AddressSpace },

    #[error("conflicting garbage-collection attributes: {left:?} and {right:?}")]
    GcConflict { left: GcAttr, right: GcAttr },

    #[error("conflicting ownership lifetimes: {left:?} and {right:?}")]
    LifetimeConflict { left: Lifetime, right: Lifetime },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstError {
    #[error("type parameter #{index} has no argument ({available} supplied)")]
    TypeArgCountMismatch { index: u32, available: usize },

    #[error("bound of type parameter #{index} is not an object pointer")]
    BoundNotObjectPointer { index: u32 },
}
