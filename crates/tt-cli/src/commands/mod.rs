//! CLI subcommand implementations.

pub mod dump;
pub mod list;
pub mod rm;
pub mod start;
pub mod status;
pub mod stop;
