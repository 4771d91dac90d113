//! `logo-studio` library crate.
//!
//! Argument parsing, output rendering and the subcommand drivers live
//! here so they can be exercised from integration tests. The binary
//! entrypoint lives in `main.rs`.

pub mod args;
pub mod commands;
pub mod render;
