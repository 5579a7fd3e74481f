//! The `Shell` facade: registry, environment and filesystem in one value.

use cash_types::config::ShellConfig;
use cash_types::error::Result;
use cash_vfs::VirtualFs;

use crate::env::EnvStore;
use crate::interpreter::{CommandRegistry, ExecutionResult};

/// A ready-to-use shell.
pub struct Shell {
    registry: CommandRegistry,
    vars: EnvStore,
    fs: VirtualFs,
}

impl Shell {
    /// Shell with every built-in command and the default environment.
    pub fn new(fs: VirtualFs) -> Result<Self> {
        Ok(Self {
            registry: CommandRegistry::with_builtins()?,
            vars: EnvStore::with_defaults(),
            fs,
        })
    }

    /// Like [`Shell::new`], with palette overrides from `config` applied.
    pub fn with_config(fs: VirtualFs, config: &ShellConfig) -> Result<Self> {
        let mut shell = Self::new(fs)?;
        shell.vars.apply_color_overrides(&config.colors)?;
        Ok(shell)
    }

    /// Execute one command line.
    pub fn execute(
        &mut self,
        line: &str,
        input: Option<&str>,
        history: Option<&str>,
    ) -> ExecutionResult {
        self.registry
            .execute(line, input, history, &mut self.vars, &mut self.fs)
    }

    /// Restore the filesystem to its default state. The environment is kept.
    pub fn reset(&mut self) -> Result<()> {
        self.fs.reset()
    }

    pub fn vars(&self) -> &EnvStore {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut EnvStore {
        &mut self.vars
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::plain_text;
    use cash_types::store::MemoryStore;
    use std::collections::BTreeMap;

    fn shell() -> Shell {
        let fs = VirtualFs::initialize(Box::new(MemoryStore::new())).unwrap();
        Shell::new(fs).unwrap()
    }

    #[test]
    fn runs_builtins() {
        let mut sh = shell();
        let result = sh.execute("pwd", None, None);
        assert!(result.success);
        assert_eq!(plain_text(&result.text.unwrap()), "/home/anon\n");
    }

    #[test]
    fn unknown_command() {
        let mut sh = shell();
        let result = sh.execute("frobnicate now", None, None);
        assert!(!result.success);
        assert_eq!(
            plain_text(&result.text.unwrap()),
            "Error: command not found: 'frobnicate'\n"
        );
    }

    #[test]
    fn empty_line_is_command_not_found() {
        let mut sh = shell();
        let result = sh.execute("   ", None, None);
        assert!(!result.success);
        assert!(plain_text(&result.text.unwrap()).contains("command not found: ''"));
    }

    #[test]
    fn alias_lookup_is_case_sensitive() {
        let mut sh = shell();
        assert!(!sh.execute("HELP", None, None).success);
    }

    #[test]
    fn state_persists_across_lines() {
        let mut sh = shell();
        sh.execute("cd /bin", None, None);
        assert_eq!(sh.fs().cwd(), "/bin");
        let result = sh.execute("pwd", None, Some("scrollback"));
        assert_eq!(plain_text(&result.text.unwrap()), "/bin\n");
    }

    #[test]
    fn reset_restores_home() {
        let mut sh = shell();
        sh.execute("cd /", None, None);
        sh.reset().unwrap();
        assert_eq!(sh.fs().cwd(), "/home/anon");
    }

    #[test]
    fn config_colors_reach_output() {
        let fs = VirtualFs::initialize(Box::new(MemoryStore::new())).unwrap();
        let config = ShellConfig {
            colors: BTreeMap::from([("link".to_string(), "#123456".to_string())]),
            ..ShellConfig::default()
        };
        let mut sh = Shell::with_config(fs, &config).unwrap();
        let out = sh.execute("welcome", None, None).text.unwrap();
        assert!(out.contains("#123456"));
        assert!(!out.contains("#89b4fa"));
    }

    #[test]
    fn unknown_color_key_is_rejected() {
        let fs = VirtualFs::initialize(Box::new(MemoryStore::new())).unwrap();
        let config = ShellConfig {
            colors: BTreeMap::from([("sparkle".to_string(), "#fff".to_string())]),
            ..ShellConfig::default()
        };
        assert!(Shell::with_config(fs, &config).is_err());
    }

    #[test]
    fn malformed_palette_falls_back_to_defaults() {
        let mut sh = shell();
        sh.vars_mut().set("COLORS", "not a map".into());
        let result = sh.execute("accounts", None, None);
        assert!(result.success);
        assert!(result.text.unwrap().contains("#89b4fa"));
    }
}
