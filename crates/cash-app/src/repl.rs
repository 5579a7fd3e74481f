//! Scrollback bookkeeping between the shell and a line-oriented terminal.

use cash_terminal::markup::plain_text;
use cash_terminal::{ExecutionResult, Shell};

/// What the terminal should do after a line was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Wipe the screen.
    Clear,
    Print(String),
    Nothing,
}

/// Feeds lines to a [`Shell`] and keeps the scrollback it is handed.
pub struct Repl {
    shell: Shell,
    scrollback: String,
    plain: bool,
}

impl Repl {
    pub fn new(shell: Shell, plain: bool) -> Self {
        Self {
            shell,
            scrollback: String::new(),
            plain,
        }
    }

    /// Prompt shown before each line.
    pub fn prompt(&self) -> String {
        format!("anon@cash:{}$ ", self.shell.fs().cwd())
    }

    pub fn scrollback(&self) -> &str {
        &self.scrollback
    }

    /// Execute `line` and record it, with its output, in the scrollback.
    pub fn submit(&mut self, line: &str) -> Reply {
        let echo = format!("{}{line}\n", self.prompt());
        let result = self.shell.execute(line, Some(line), Some(&self.scrollback));
        if !result.success {
            log::debug!("'{line}' failed");
        }
        self.scrollback.push_str(&echo);
        self.apply(result)
    }

    fn apply(&mut self, result: ExecutionResult) -> Reply {
        if result.history_changed {
            self.scrollback = result.new_history.unwrap_or_default();
            if self.scrollback.is_empty() {
                return Reply::Clear;
            }
        }
        match result.text {
            Some(markup) => {
                let shown = if self.plain {
                    plain_text(&markup)
                } else {
                    markup
                };
                self.scrollback.push_str(&shown);
                Reply::Print(shown)
            },
            None => Reply::Nothing,
        }
    }
}
