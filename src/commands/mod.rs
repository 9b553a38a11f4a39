//! Handlers for the CLI subcommands.

pub mod server;
