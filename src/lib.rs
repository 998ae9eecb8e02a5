//! psidb client library
//!
//! The `psidb` binary: argument parsing, the console and headless
//! notification surfaces, and the runner that wires a command to its page.

pub mod cli;
pub mod console;
pub mod headless;
pub mod runner;

pub use runner::{execute, run, CommandReport};
