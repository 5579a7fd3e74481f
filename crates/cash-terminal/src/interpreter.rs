//! Command trait, registry, and dispatch logic.
//!
//! A line is split on whitespace (the typed escape `\n` becomes a token of
//! its own), the first token selects a command by alias, and the remaining
//! tokens are passed as arguments. Errors never escape [`CommandRegistry::execute`]:
//! they come back as failed [`ExecutionResult`]s.

use std::collections::HashMap;

use serde::Serialize;

use cash_types::error::{Result, ShellError};
use cash_vfs::VirtualFs;

use crate::env::EnvStore;
use crate::markup::{self, ESCAPED_NEWLINE};
use crate::style::{Palette, Style};

/// Outcome of executing one command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    /// Rendered output. `None` means nothing to print.
    pub text: Option<String>,
    /// The caller should replace its history with `new_history`.
    pub history_changed: bool,
    pub new_history: Option<String>,
}

impl ExecutionResult {
    /// Successful result carrying rendered output.
    pub fn output(text: String) -> Self {
        Self {
            success: true,
            text: Some(text),
            history_changed: false,
            new_history: None,
        }
    }

    /// Successful result with nothing to print.
    pub fn silent() -> Self {
        Self {
            success: true,
            text: None,
            history_changed: false,
            new_history: None,
        }
    }

    /// Successful result asking the caller to wipe its history.
    pub fn clear_history() -> Self {
        Self {
            success: true,
            text: None,
            history_changed: true,
            new_history: Some(String::new()),
        }
    }

    /// Failed result carrying rendered output.
    pub fn failure(text: String) -> Self {
        Self {
            success: false,
            text: Some(text),
            history_changed: false,
            new_history: None,
        }
    }

    /// Render an error as a failed result.
    ///
    /// Every error shown to the user goes through here, including the
    /// shared "invalid args" usage message.
    pub fn from_error(err: &ShellError, palette: &Palette) -> Self {
        if !err.is_user_error() {
            log::warn!("command failed: {err}");
        }
        let label = palette.span(Style::Error, "Error:");
        let mut text = format!("{label} {}\n", markup::escape(&err.to_string()));
        if let ShellError::InvalidArguments { usage } = err {
            let usage = usage.split(',').map(str::trim).collect::<Vec<_>>().join(", ");
            text.push_str(&format!(
                "{} {}\n",
                palette.span(Style::Heading, "Usage:"),
                palette.span(Style::Command, &format!("[{}]", markup::escape(&usage)))
            ));
        }
        Self::failure(text)
    }
}

/// State handed to every command.
pub struct Session<'a> {
    pub vars: &'a mut EnvStore,
    pub fs: &'a mut VirtualFs,
    /// The registry the command was dispatched from.
    pub registry: &'a CommandRegistry,
    /// Pending input line, passed through untouched.
    pub input: Option<&'a str>,
    /// Caller's history/scrollback, passed through untouched.
    pub history: Option<&'a str>,
}

impl Session<'_> {
    /// Palette as currently defined by the `COLORS` variable.
    pub fn palette(&self) -> Palette {
        Palette::from_env(self.vars)
    }

    /// Render raw text with the markup engine.
    pub fn render(&self, text: &str) -> String {
        markup::render(text, &self.palette(), self.registry.command_refs())
    }

    /// Render raw text into a successful result.
    pub fn print(&self, text: &str) -> Result<ExecutionResult> {
        Ok(ExecutionResult::output(self.render(text)))
    }
}

/// A single executable command.
pub trait Command {
    /// Canonical name, always the first alias.
    fn name(&self) -> &str;

    /// Additional names the command answers to.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string; alternatives are separated by commas.
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments.
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult>;
}

/// Every alias of `cmd`, canonical name first.
pub fn alias_list(cmd: &dyn Command) -> Vec<&str> {
    let mut names = vec![cmd.name()];
    names.extend_from_slice(cmd.aliases());
    names
}

/// Alias list as it appears literally in text: `[help,h]`.
pub fn bracketed_aliases(cmd: &dyn Command) -> String {
    format!("[{}]", alias_list(cmd).join(","))
}

/// Alias list as displayed: `[help, h]`.
pub fn pretty_aliases(cmd: &dyn Command) -> String {
    format!("[{}]", alias_list(cmd).join(", "))
}

/// The standard error for a wrong argument count or unparsable argument.
pub fn invalid_args(cmd: &dyn Command) -> ShellError {
    ShellError::invalid_args(cmd.usage())
}

/// Split a command line into tokens.
///
/// The typed escape `\n` is isolated into its own token so it survives as
/// a line break. Runs of whitespace separate tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.replace(ESCAPED_NEWLINE, &format!(" {ESCAPED_NEWLINE} "))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Registry of available commands with dispatch.
///
/// Commands keep their registration order, which is the order `help`
/// lists them in.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    by_alias: HashMap<String, usize>,
    /// Literal bracketed alias text -> display form, for the markup engine.
    command_refs: HashMap<String, String>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            by_alias: HashMap::new(),
            command_refs: HashMap::new(),
        }
    }

    /// A registry holding every built-in command.
    pub fn with_builtins() -> Result<Self> {
        let mut reg = Self::new();
        crate::register_builtins(&mut reg)?;
        Ok(reg)
    }

    /// Register a command. Fails if any alias is already taken.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let names: Vec<String> = alias_list(cmd.as_ref())
            .into_iter()
            .map(str::to_string)
            .collect();
        for (i, name) in names.iter().enumerate() {
            if self.by_alias.contains_key(name) || names[..i].contains(name) {
                return Err(ShellError::DuplicateAlias(name.clone()));
            }
        }
        let index = self.commands.len();
        for name in names {
            self.by_alias.insert(name, index);
        }
        self.command_refs
            .insert(bracketed_aliases(cmd.as_ref()), pretty_aliases(cmd.as_ref()));
        self.commands.push(cmd);
        Ok(())
    }

    /// Find the command answering to `alias`.
    pub fn lookup(&self, alias: &str) -> Option<&dyn Command> {
        self.by_alias
            .get(alias)
            .map(|&index| self.commands[index].as_ref())
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bracketed-alias index used by the markup engine.
    pub fn command_refs(&self) -> &HashMap<String, String> {
        &self.command_refs
    }

    /// Parse and execute a command line.
    ///
    /// `input` and `history` are handed to the command unchanged. The
    /// command's result is returned as-is; errors are rendered into a
    /// failed result.
    pub fn execute(
        &self,
        line: &str,
        input: Option<&str>,
        history: Option<&str>,
        vars: &mut EnvStore,
        fs: &mut VirtualFs,
    ) -> ExecutionResult {
        let tokens = tokenize(line.trim());
        let name = tokens.first().map(String::as_str).unwrap_or("");
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        let mut session = Session {
            vars,
            fs,
            registry: self,
            input,
            history,
        };
        let result = match self.lookup(name) {
            Some(cmd) => {
                log::debug!("dispatch {} {:?}", cmd.name(), args);
                cmd.execute(&args, &mut session)
            },
            None => Err(ShellError::CommandNotFound(name.to_string())),
        };
        result.unwrap_or_else(|e| ExecutionResult::from_error(&e, &session.palette()))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
