//! Observability subsystem.
//!
//! Console logging only: every component emits `tracing` events and the
//! binaries install one subscriber at startup.

pub mod logging;

pub use logging::init_logging;
