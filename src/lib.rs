//! pfs library crate
//!
//! Turns a failed shell command into a suggested fix by asking a locally
//! hosted model. The `pfs` binary adds the shell-facing glue on top.

pub mod config;
pub mod correction;
pub mod handoff;
pub mod spinner;
pub mod telemetry;
pub mod util;
