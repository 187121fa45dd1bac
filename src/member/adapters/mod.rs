//! Adapter implementations for member registration ports.

pub mod flat_file;
pub mod memory;
pub mod mirrored;
pub mod smtp;
pub mod sqlite;
