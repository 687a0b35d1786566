//! Subcommand implementations.

pub mod check;
pub mod describe;
pub mod info;
pub mod new;
