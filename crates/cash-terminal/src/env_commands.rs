//! Environment commands: echo, print-env, print-var.

use cash_types::error::{Result, ShellError};

use crate::env::EnvStore;
use crate::interpreter::{Command, CommandRegistry, ExecutionResult, Session, invalid_args};

/// Register environment commands into a registry.
pub fn register_env_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(EchoCmd))?;
    reg.register(Box::new(PrintEnvCmd))?;
    reg.register(Box::new(PrintVarCmd))?;
    Ok(())
}

/// Join `args` with single spaces, replacing each `$NAME` with the
/// pretty-printed value of `NAME`.
///
/// Unknown or empty variables expand to nothing and take no space. A bare
/// `$` is kept literally.
pub fn expand_echo(args: &[&str], vars: &EnvStore) -> String {
    let mut words: Vec<String> = Vec::with_capacity(args.len());
    for arg in args {
        match arg.strip_prefix('$') {
            Some(name) if !name.is_empty() => {
                if let Some(value) = vars.pretty(name).filter(|v| !v.is_empty()) {
                    words.push(value);
                }
            },
            _ => words.push(arg.to_string()),
        }
    }
    words.join(" ")
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Prints text, expanding $VARIABLES."
    }
    fn usage(&self) -> &str {
        "echo <text...>"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        let text = expand_echo(args, session.vars);
        session.print(&text)
    }
}

// ---------------------------------------------------------------------------
// print-env
// ---------------------------------------------------------------------------

struct PrintEnvCmd;
impl Command for PrintEnvCmd {
    fn name(&self) -> &str {
        "print-env"
    }
    fn description(&self) -> &str {
        "Lists environment variables."
    }
    fn usage(&self) -> &str {
        "print-env"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        if !args.is_empty() {
            return Err(invalid_args(self));
        }
        let names = session.vars.names().join(", ");
        session.print(&names)
    }
}

// ---------------------------------------------------------------------------
// print-var
// ---------------------------------------------------------------------------

struct PrintVarCmd;
impl Command for PrintVarCmd {
    fn name(&self) -> &str {
        "print-var"
    }
    fn description(&self) -> &str {
        "Prints the value of an environment variable."
    }
    fn usage(&self) -> &str {
        "print-var <name>"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        let [arg] = args else {
            return Err(invalid_args(self));
        };
        let name = arg.strip_prefix('$').unwrap_or(*arg);
        match session.vars.pretty(name) {
            Some(value) => session.print(&value),
            None => Err(ShellError::UnknownVariable(name.to_string())),
        }
    }
}
