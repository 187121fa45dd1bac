//! Rollbook: membership registration ledger.
//!
//! Rollbook collects member registrations, keeps them in a local `SQLite`
//! table with a CSV roster alongside, and gives an administrator search,
//! grouping, statistics, removal, editing and export over the records.
//!
//! # Architecture
//!
//! Rollbook follows hexagonal architecture principles:
//!
//! - **Domain**: Validated member values and roster summaries
//! - **Ports**: Abstract trait interfaces for storage, mirroring and mail
//! - **Adapters**: Concrete implementations of ports (`SQLite`, CSV, SMTP)
//!
//! # Modules
//!
//! - [`member`]: Registration intake and the administrator record browser
//! - [`app`]: Application state passed to every operation
//! - [`config`]: TOML configuration with environment overrides

pub mod app;
pub mod config;
pub mod member;
