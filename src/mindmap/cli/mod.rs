//! # CLI Layer
//!
//! One possible client of the mindmap library. This is the only place that
//! parses arguments, talks to the terminal, and decides exit codes.
//!
//! ## Structure
//!
//! - `setup`: clap definitions, grouped help, version string
//! - `commands`: `run()`, logging setup, one-shot `handle_*` functions
//! - `render`: turns `CmdResult`s into colored terminal output
//! - `shell`: the interactive loop, driven by a [`mindmap::session::Session`]

mod commands;
mod render;
mod setup;
mod shell;

pub use commands::run;
