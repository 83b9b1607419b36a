//! Hierarchical suite execution engine.
//!
//! Walks a tree of descriptors depth-first, driving each through a fixed
//! six-phase lifecycle and reporting every outcome to a listener. The crate is
//! split the same way the runner binary is:
//!
//! - **[`core`]**: the engine itself (lifecycle, failure collection, dedup
//!   tracking). No I/O.
//! - **[`io`]**: suite files, config, scripted nodes, and listeners that render
//!   reports or write event logs.
//!
//! [`engine::ExecutionEngine`] is the entry point; [`run`] wires it to the CLI.

pub mod core;
pub mod engine;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;
