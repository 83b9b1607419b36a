//! I/O helpers for runner commands.

pub mod config;
pub mod event_log;
pub mod init;
pub mod report;
pub mod script;
pub mod suite_store;
