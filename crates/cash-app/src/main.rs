//! cash terminal entry point.
//!
//! Reads command lines from stdin and prints their output, as markup or
//! as plain text. State lives in memory unless the config names a state
//! file. Type `exit` or send EOF to quit.

mod repl;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use cash_terminal::Shell;
use cash_types::config::ShellConfig;
use cash_types::store::{JsonFileStore, KvStore, MemoryStore};
use cash_vfs::{FS_KEY, VirtualFs, WD_KEY};

use repl::{Repl, Reply};

fn main() -> Result<()> {
    // Resolve config from CLI arg or CASH_CONFIG env var.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CASH_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ShellConfig::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();
    log::info!("Starting cash");

    let store: Box<dyn KvStore> = match &config.state_file {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };
    let fs = open_fs(store)?;
    let shell = Shell::with_config(fs, &config)?;
    let mut repl = Repl::new(shell, config.plain);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    show(&mut stdout, repl.submit("welcome"))?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "{}", repl.prompt())?;
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim() == "exit" {
            break;
        }
        show(&mut stdout, repl.submit(&line))?;
    }

    log::info!("Shutting down");
    Ok(())
}

/// Load persisted state, or write the defaults when none exists yet.
fn open_fs(store: Box<dyn KvStore>) -> Result<VirtualFs> {
    if store.get(FS_KEY).is_some() && store.get(WD_KEY).is_some() {
        Ok(VirtualFs::load(store)?)
    } else {
        log::info!("No saved state, initializing filesystem");
        Ok(VirtualFs::initialize(store)?)
    }
}

fn show(out: &mut impl Write, reply: Reply) -> io::Result<()> {
    match reply {
        // ANSI: erase display, cursor home.
        Reply::Clear => write!(out, "\x1b[2J\x1b[H"),
        Reply::Print(text) => {
            write!(out, "{text}")?;
            if !text.ends_with('\n') {
                writeln!(out)?;
            }
            Ok(())
        },
        Reply::Nothing => Ok(()),
    }
}
