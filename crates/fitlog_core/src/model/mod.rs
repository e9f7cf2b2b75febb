//! Domain model for user-defined progress trackers.
//!
//! # Responsibility
//! - Define canonical tracker, observation and view-state types.
//! - Own input validation so invalid values never reach storage.

pub mod tracker;
pub mod view_state;
