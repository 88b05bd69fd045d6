//! Core building blocks: argument resolution for derivative classes, source
//! eligibility, the `DerivativeImageCreator` itself, and config-file params.
//! These are consumed by the high-level `api` module and the CLI.
pub mod args;
pub mod creator;
pub mod eligibility;
pub mod params;
