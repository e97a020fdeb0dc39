//! CLI command implementations
//!
//! Every command returns the process exit code:
//! 0 success, 1 completed with fetch errors, 2 configuration error,
//! 3 no medication items found, 5 fatal, 130 interrupted.

pub mod extract;
pub mod init;
pub mod validate;
