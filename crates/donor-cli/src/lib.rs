//! Library components of the `donor-tables` CLI.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
