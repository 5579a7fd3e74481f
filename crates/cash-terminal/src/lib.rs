//! Command interpreter for cash.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered under one or more aliases. The
//! registry tokenizes a line, resolves the first token, and hands the rest
//! to the command together with a `Session` holding the environment store
//! and the virtual filesystem. Output is styled by the markup engine.

mod commands;
pub mod env;
mod env_commands;
mod file_commands;
mod interpreter;
pub mod markup;
mod shell;
pub mod style;

/// Register all built-in commands into a registry.
pub use commands::register_builtins;
/// Environment variable store and values.
pub use env::{EnvStore, VarValue};
/// Expand `$VAR` arguments the way `echo` does.
pub use env_commands::expand_echo;
/// A single executable command trait.
pub use interpreter::Command;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Structured result of executing a command line.
pub use interpreter::ExecutionResult;
/// State handed to every command.
pub use interpreter::Session;
/// Split a command line into tokens.
pub use interpreter::tokenize;
/// Registry, environment and filesystem bundled together.
pub use shell::Shell;
/// Output styles and the palette they resolve through.
pub use style::{Palette, Style};
