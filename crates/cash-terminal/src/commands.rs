//! Built-in commands for the cash terminal.

use cash_types::error::Result;

use crate::interpreter::{
    Command, CommandRegistry, ExecutionResult, Session, bracketed_aliases, invalid_args,
};

/// Commands shown per `help` page.
pub const HELP_PAGE_SIZE: usize = 3;

const ACCOUNTS: &str = "Email: cv@caveat.cc\n\
Discord: caveat__\n\
Git Accounts:\n\
https://codeberg.org/caveat (preferred)\n\
https://github.com/caveat-dev";

const BIO: &str = "Caveat (often stylized as caveat, full name Caveat Emptor) is an amateur \
developer and FOSS enthusiast from North America.\n\
They enjoy developing programs in Rust and Haskell, but begrudgingly use Javascript the most.\n\
Watch them develop open-source software that nobody uses!";

/// Register all built-in commands into a registry.
///
/// Registration order is the order `help` pages through.
pub fn register_builtins(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(WelcomeCmd))?;
    reg.register(Box::new(HelpCmd))?;
    reg.register(Box::new(ClearCmd))?;
    reg.register(Box::new(AccountsCmd))?;
    reg.register(Box::new(BioCmd))?;
    crate::env_commands::register_env_commands(reg)?;
    crate::file_commands::register_file_commands(reg)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// welcome
// ---------------------------------------------------------------------------

struct WelcomeCmd;
impl Command for WelcomeCmd {
    fn name(&self) -> &str {
        "welcome"
    }
    fn description(&self) -> &str {
        "Displays the welcome message."
    }
    fn usage(&self) -> &str {
        "welcome"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        if !args.is_empty() {
            return Err(invalid_args(self));
        }
        let help = session
            .registry
            .lookup("help")
            .map_or_else(|| "[help]".to_string(), bracketed_aliases);
        session.print(&format!(
            "Welcome to https://caveat.cc!\nType {help} for a list of commands."
        ))
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn aliases(&self) -> &[&str] {
        &["h"]
    }
    fn description(&self) -> &str {
        "Displays available commands."
    }
    fn usage(&self) -> &str {
        "help, help <#page>"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        let requested = match args {
            [] => 1,
            [page] => leading_int(page).ok_or_else(|| invalid_args(self))?,
            _ => return Err(invalid_args(self)),
        };
        let total = session.registry.len();
        let pages = total.div_ceil(HELP_PAGE_SIZE).max(1);
        let page = requested.clamp(1, pages as i64) as usize;

        let mut out = String::new();
        for cmd in session
            .registry
            .commands()
            .skip((page - 1) * HELP_PAGE_SIZE)
            .take(HELP_PAGE_SIZE)
        {
            out.push_str(&format!(
                "{}\nDescription: {}\nUsage: {}\n",
                bracketed_aliases(cmd),
                cmd.description(),
                cmd.usage()
            ));
        }
        out.push_str(&format!("Page {page}/{pages}"));
        session.print(&out)
    }
}

/// The integer a page argument starts with: `2abc` is 2, `1.5` is 1.
/// `None` when there are no leading digits.
fn leading_int(arg: &str) -> Option<i64> {
    let (negative, rest) = match arg.as_bytes().first() {
        Some(b'-') => (true, &arg[1..]),
        Some(b'+') => (false, &arg[1..]),
        _ => (false, arg),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: Option<i64> = None;
    for d in digits {
        let n = value.unwrap_or(0);
        let d = i64::from(d - b'0');
        value = Some(if negative {
            n.saturating_mul(10).saturating_sub(d)
        } else {
            n.saturating_mul(10).saturating_add(d)
        });
    }
    value
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn aliases(&self) -> &[&str] {
        &["cls"]
    }
    fn description(&self) -> &str {
        "Clears the screen."
    }
    fn usage(&self) -> &str {
        "cls"
    }
    fn execute(&self, args: &[&str], _session: &mut Session<'_>) -> Result<ExecutionResult> {
        if !args.is_empty() {
            return Err(invalid_args(self));
        }
        Ok(ExecutionResult::clear_history())
    }
}

// ---------------------------------------------------------------------------
// accounts
// ---------------------------------------------------------------------------

struct AccountsCmd;
impl Command for AccountsCmd {
    fn name(&self) -> &str {
        "accounts"
    }
    fn description(&self) -> &str {
        "Displays Caveat's git pages, socials and other accounts online."
    }
    fn usage(&self) -> &str {
        "accounts"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        if !args.is_empty() {
            return Err(invalid_args(self));
        }
        session.print(ACCOUNTS)
    }
}

// ---------------------------------------------------------------------------
// bio
// ---------------------------------------------------------------------------

struct BioCmd;
impl Command for BioCmd {
    fn name(&self) -> &str {
        "bio"
    }
    fn description(&self) -> &str {
        "Displays Caveat's bio."
    }
    fn usage(&self) -> &str {
        "bio"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        if !args.is_empty() {
            return Err(invalid_args(self));
        }
        session.print(BIO)
    }
}
