//! Strongly-typed domain types for safer APIs.
//!
//! Index newtypes make the mesh and quantity APIs self-documenting and
//! prevent parameter mix-ups: a [`VolumeIndex`] addresses a triangle,
//! a [`BoundarySlot`] addresses the boundary-value side table, and the
//! two cannot be confused at compile time. All newtypes are
//! `#[repr(transparent)]` and cost nothing at runtime.

mod indices;

pub use indices::{BoundarySlot, VolumeIndex};
