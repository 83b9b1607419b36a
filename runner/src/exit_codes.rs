//! Stable exit codes for runner CLI commands.

/// Command succeeded; for `runner run`, no node failed.
pub const OK: i32 = 0;
/// Invalid suite/config or another error prevented the command from completing.
pub const INVALID: i32 = 1;
/// `runner run` completed but at least one node failed.
pub const FAILED: i32 = 2;
