//! Member registration and administration for Rollbook.
//!
//! This module accepts registration submissions, rejects duplicate emails,
//! stores records in the relational table with a derived CSV roster, and
//! serves the administrator's search, grouping, statistics, removal, edit and
//! export operations. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
