//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the metric tracker persists through.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidData`) in addition to
//!   DB transport errors.

pub mod kv_repo;
pub mod tracker_repo;
