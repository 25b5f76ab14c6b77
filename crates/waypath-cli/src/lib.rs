//! waypath CLI library.
//!
//! This crate provides the subcommand handlers and output selection for the
//! `waypath-cli` binary.

pub mod commands;
pub mod output;
