//! Deterministic, I/O-free execution core.
//!
//! Core modules operate on in-memory descriptor trees and report through the
//! [`listener::ExecutionListener`] trait. Filesystem and process concerns live in
//! [`crate::io`].

pub mod collector;
pub mod descriptor;
pub mod executor;
pub mod invariants;
pub mod listener;
pub mod node;
pub mod outcome;
pub mod tracker;
