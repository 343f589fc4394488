//! logsentry command-line front end.
//!
//! The binary in `main.rs` only wires these modules together; keeping them in
//! a library lets integration tests drive the reporters directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod report;
