//! Domain logic for the IntelliFactory monitor.
//!
//! Everything in this crate is pure (no database or network access) so the
//! evaluator, chart shaping and CSV codec can be tested in isolation.

pub mod anomaly;
pub mod chart;
pub mod csv;
pub mod detector;
pub mod error;
pub mod machine;
pub mod reading;
pub mod types;
