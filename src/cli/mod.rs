//! Command Line Interface (CLI) layer for derivgen.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single-file and batch
//! derivative creation. It wires user-provided options to the underlying
//! library functionality exposed via `derivgen::api`.
//!
//! If you are embedding derivgen into another application, prefer using
//! the high-level `derivgen::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
