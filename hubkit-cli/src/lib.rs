//! # hubkit CLI
//!
//! Command definitions, client construction and terminal output for the
//! `hubkit` binary.

pub mod cli;
pub mod output;
