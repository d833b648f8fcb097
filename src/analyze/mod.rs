//! The core analysis pipeline.
//!
//! Four analyzers consume one source unit: the syntax checker (the
//! only one that can halt the pipeline), the complexity estimator, the
//! semantic analyzer, and the code smell detector. The [`Runner`] ties
//! them together with the delegated collaborators.

pub mod complexity;
pub mod runner;
pub mod semantic;
pub mod smells;
pub mod syntax;
pub mod types;

pub use runner::Runner;
pub use types::{Finding, Severity};
