//! Script execution
//!
//! The embedded interpreter sits behind the [`Runtime`] trait. The
//! [`Executor`] owns the one runtime instance once it has started and turns
//! each run into a [`RunOutcome`] the UI can report.

mod executor;
mod output;
mod runtime;

pub use executor::{Executor, RunOutcome};
pub use output::OutputChannel;
pub use runtime::{InitError, RhaiRuntime, Runtime};

#[cfg(test)]
pub(crate) use executor::tests::EchoRuntime;
