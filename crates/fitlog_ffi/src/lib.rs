//! Flutter bridge for FitLog core.

pub mod api;
