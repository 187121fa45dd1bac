//! Step definitions for member registration scenarios.

pub mod when;
pub mod world;
