//! CLI command implementations
//!
//! Each command returns the process exit code; none of them exits itself.

pub mod history;
pub mod scan;
pub mod validate;
