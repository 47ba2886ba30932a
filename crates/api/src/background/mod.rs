//! Background tasks.
//!
//! Each submodule provides a long-running loop spawned via `tokio::spawn`
//! that runs for the process lifetime and is aborted at shutdown.

pub mod broadcaster;
