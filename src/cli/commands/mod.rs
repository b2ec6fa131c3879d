//! CLI command implementations.

pub mod check;
pub mod enforcement;
pub mod events;
pub mod init;
pub mod levels;
pub mod log;
pub mod override_cmd;
pub mod recompute;
pub mod state;
