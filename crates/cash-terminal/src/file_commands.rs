//! Filesystem commands: ls, cd, pwd, cat.

use cash_types::error::Result;
use cash_vfs::listing;

use crate::interpreter::{Command, CommandRegistry, ExecutionResult, Session, invalid_args};

/// Register filesystem commands into a registry.
pub fn register_file_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(LsCmd))?;
    reg.register(Box::new(CdCmd))?;
    reg.register(Box::new(PwdCmd))?;
    reg.register(Box::new(CatCmd))?;
    Ok(())
}

/// The optional single path argument shared by `ls` and `cd`.
fn optional_path<'a>(cmd: &dyn Command, args: &[&'a str]) -> Result<Option<&'a str>> {
    match args {
        [] => Ok(None),
        [path] => Ok(Some(*path)),
        _ => Err(invalid_args(cmd)),
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "Lists the contents of a directory."
    }
    fn usage(&self) -> &str {
        "ls, ls <path>"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        let path = optional_path(self, args)?;
        let entries = listing(session.fs.list_dir(path)?);
        session.print(&entries)
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Changes the working directory."
    }
    fn usage(&self) -> &str {
        "cd, cd <path>"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        let path = optional_path(self, args)?;
        session.fs.change_dir(path)?;
        Ok(ExecutionResult::silent())
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Prints the working directory."
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        if !args.is_empty() {
            return Err(invalid_args(self));
        }
        session.print(session.fs.cwd())
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Prints the contents of a file."
    }
    fn usage(&self) -> &str {
        "cat <file>"
    }
    fn execute(&self, args: &[&str], session: &mut Session<'_>) -> Result<ExecutionResult> {
        let [path] = args else {
            return Err(invalid_args(self));
        };
        session.print(session.fs.read_file(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvStore;
    use crate::markup::plain_text;
    use cash_types::store::MemoryStore;
    use cash_vfs::VirtualFs;

    struct Fixture {
        reg: CommandRegistry,
        vars: EnvStore,
        fs: VirtualFs,
    }

    impl Fixture {
        fn new() -> Self {
            let mut fs = VirtualFs::initialize(Box::new(MemoryStore::new())).unwrap();
            fs.add_file("/home/anon", "readme.txt", "Hello: world").unwrap();
            fs.add_dir("/home/anon", "projects").unwrap();
            Self {
                reg: CommandRegistry::with_builtins().unwrap(),
                vars: EnvStore::with_defaults(),
                fs,
            }
        }

        fn run(&mut self, line: &str) -> ExecutionResult {
            self.reg
                .execute(line, None, None, &mut self.vars, &mut self.fs)
        }

        fn text(&mut self, line: &str) -> String {
            let result = self.run(line);
            plain_text(result.text.as_deref().unwrap_or(""))
        }
    }

    #[test]
    fn ls_cwd() {
        let mut f = Fixture::new();
        assert_eq!(f.text("ls"), "readme.txt projects*\n");
    }

    #[test]
    fn ls_root() {
        let mut f = Fixture::new();
        assert_eq!(f.text("ls /"), "home* bin*\n");
    }

    #[test]
    fn ls_empty_directory_is_not_an_error() {
        let mut f = Fixture::new();
        let result = f.run("ls /bin");
        assert!(result.success);
        assert_eq!(plain_text(result.text.as_deref().unwrap()), "\n");
    }

    #[test]
    fn ls_invalid_path() {
        let mut f = Fixture::new();
        let result = f.run("ls nope");
        assert!(!result.success);
        assert_eq!(
            plain_text(result.text.as_deref().unwrap()),
            "Error: invalid path '/home/anon/nope'\n"
        );
    }

    #[test]
    fn ls_invalid_path_from_root_collapses_separators() {
        let mut f = Fixture::new();
        f.run("cd /");
        assert!(f.text("ls nope").contains("'/nope'"));
    }

    #[test]
    fn ls_too_many_args() {
        let mut f = Fixture::new();
        assert!(f.text("ls a b").contains("Usage: [ls, ls <path>]"));
    }

    #[test]
    fn cd_then_pwd() {
        let mut f = Fixture::new();
        let result = f.run("cd projects");
        assert!(result.success);
        assert!(result.text.is_none());
        assert_eq!(f.text("pwd"), "/home/anon/projects\n");
    }

    #[test]
    fn cd_without_args_goes_home() {
        let mut f = Fixture::new();
        f.run("cd /bin");
        f.run("cd");
        assert_eq!(f.fs.cwd(), "/home/anon");
    }

    #[test]
    fn cd_dotdot_once_per_level_reaches_root() {
        let mut f = Fixture::new();
        f.run("cd /home/anon/projects");
        for _ in 0..3 {
            assert!(f.run("cd ..").success);
        }
        assert_eq!(f.fs.cwd(), "/");
    }

    #[test]
    fn cd_failure_keeps_cwd() {
        let mut f = Fixture::new();
        let before = f.fs.cwd().to_string();
        let result = f.run("cd /does/not/exist");
        assert!(!result.success);
        assert!(plain_text(result.text.as_deref().unwrap()).contains("invalid path"));
        assert_eq!(f.fs.cwd(), before);
    }

    #[test]
    fn cd_into_file_fails() {
        let mut f = Fixture::new();
        assert!(!f.run("cd readme.txt").success);
        assert_eq!(f.fs.cwd(), "/home/anon");
    }

    #[test]
    fn pwd_rejects_args() {
        let mut f = Fixture::new();
        assert!(!f.run("pwd now").success);
    }

    #[test]
    fn cat_file() {
        let mut f = Fixture::new();
        let result = f.run("cat readme.txt");
        assert!(result.success);
        assert_eq!(plain_text(result.text.as_deref().unwrap()), "Hello: world\n");
    }

    #[test]
    fn cat_directory_fails() {
        let mut f = Fixture::new();
        assert!(!f.run("cat projects").success);
        assert!(!f.run("cat").success);
    }
}
