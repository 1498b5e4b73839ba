//! CLI command implementations
//!
//! Each subcommand group has its own module with one async function per action.

pub mod config;
pub mod crops;
pub mod rules;
pub mod stages;
pub mod tasks;
