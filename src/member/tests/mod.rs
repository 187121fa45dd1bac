//! Unit tests for the member module.
//!
//! Tests are organised by concern, covering validation, roster summaries,
//! service orchestration and the mirrored repository.
