//! Flat-file (CSV) adapters for the member roster.
//!
//! The roster file is a derived copy of the relational store. The codec is
//! shared with the administrator export so both use the same header.

mod codec;
mod roster_file;

pub use codec::{ROSTER_HEADER, RosterRow, decode_roster, encode_roster};
pub use roster_file::{CsvRosterFile, RosterFileError};
