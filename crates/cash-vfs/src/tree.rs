//! The persisted node tree and working directory.

use cash_types::error::{Result, ShellError};
use cash_types::store::KvStore;

use crate::node::Node;
use crate::path::{self, HOME, ROOT};

/// Store key holding the serialized tree.
pub const FS_KEY: &str = "fs";

/// Store key holding the working directory.
pub const WD_KEY: &str = "wd";

/// Virtual filesystem backed by a key-value store.
pub struct VirtualFs {
    /// Children of `/`. The root is always a directory, so only its
    /// contents are kept.
    root: Vec<Node>,
    cwd: String,
    store: Box<dyn KvStore>,
}

impl std::fmt::Debug for VirtualFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFs")
            .field("root", &self.root)
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}

/// The tree written by a reset: `/home/anon` and `/bin`, both empty.
fn default_tree() -> Vec<Node> {
    vec![
        Node::dir("home", vec![Node::dir("anon", vec![])]),
        Node::dir("bin", vec![]),
    ]
}

/// Format directory entries as one space-separated line, directories
/// suffixed with `*`. An empty directory gives an empty string.
pub fn listing(entries: &[Node]) -> String {
    entries
        .iter()
        .map(Node::label)
        .collect::<Vec<_>>()
        .join(" ")
}

impl VirtualFs {
    /// Load state previously written to `store`.
    ///
    /// Fails with [`ShellError::NotInitialized`] if either key is absent;
    /// call [`VirtualFs::initialize`] to write the default state instead.
    pub fn load(store: Box<dyn KvStore>) -> Result<Self> {
        let raw_fs = store.get(FS_KEY).ok_or(ShellError::NotInitialized(FS_KEY))?;
        let cwd = store.get(WD_KEY).ok_or(ShellError::NotInitialized(WD_KEY))?;
        let root = match serde_json::from_str::<Node>(&raw_fs)? {
            Node::Directory { contents, .. } => contents,
            Node::File { name, .. } => {
                return Err(ShellError::Storage(format!(
                    "filesystem root '{name}' is not a directory"
                )));
            },
        };
        let vfs = Self { root, cwd, store };
        // The stored cursor has to name a live directory.
        vfs.resolve_dir(&vfs.cwd).map_err(|_| {
            ShellError::Storage(format!("working directory '{}' does not exist", vfs.cwd))
        })?;
        log::debug!("Loaded filesystem, cwd={}", vfs.cwd);
        Ok(vfs)
    }

    /// Clear `store` and write the default tree and working directory.
    pub fn initialize(store: Box<dyn KvStore>) -> Result<Self> {
        let mut vfs = Self {
            root: Vec::new(),
            cwd: String::new(),
            store,
        };
        vfs.reset()?;
        Ok(vfs)
    }

    /// Discard all state and restore the default tree with `cwd = /home/anon`.
    pub fn reset(&mut self) -> Result<()> {
        log::info!("Resetting filesystem to defaults");
        self.store.clear();
        self.root = default_tree();
        self.persist_tree()?;
        self.set_cwd(HOME.to_string());
        Ok(())
    }

    /// Current working directory. Always an existing absolute directory path.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// The backing store.
    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Children of the root directory.
    pub fn root(&self) -> &[Node] {
        &self.root
    }

    /// Entries of the directory at `path`, or of the working directory.
    pub fn list_dir(&self, path: Option<&str>) -> Result<&[Node]> {
        let target = path.unwrap_or(&self.cwd);
        self.resolve_dir(target).map(|(_, entries)| entries)
    }

    /// Change the working directory. `None` goes home.
    ///
    /// The stored path is rebuilt from the matched segments, so `..` and
    /// doubled separators never leak into it. On failure the working
    /// directory is left untouched.
    pub fn change_dir(&mut self, path: Option<&str>) -> Result<&str> {
        let (resolved, _) = self.resolve_dir(path.unwrap_or(HOME))?;
        log::debug!("cd {} -> {resolved}", self.cwd);
        self.set_cwd(resolved);
        Ok(&self.cwd)
    }

    /// Contents of the file at `path`.
    pub fn read_file(&self, path: &str) -> Result<&str> {
        let abs = path::absolutize(&self.cwd, path);
        let segs = path::segments(&abs);
        let invalid = || ShellError::InvalidPath(path::collapse_separators(&abs));
        let (name, parent) = segs.split_last().ok_or_else(invalid)?;
        let (_, entries) = self.walk(parent).ok_or_else(invalid)?;
        match entries.iter().find(|n| n.name() == *name) {
            Some(Node::File { contents, .. }) => Ok(contents.as_str()),
            Some(Node::Directory { .. }) | None => Err(invalid()),
        }
    }

    /// Create an empty directory `name` inside `parent`.
    pub fn add_dir(&mut self, parent: &str, name: &str) -> Result<()> {
        self.insert(parent, Node::dir(name, Vec::new()))
    }

    /// Create a file `name` inside `parent`.
    pub fn add_file(&mut self, parent: &str, name: &str, contents: &str) -> Result<()> {
        self.insert(parent, Node::file(name, contents))
    }

    fn insert(&mut self, parent: &str, node: Node) -> Result<()> {
        let abs = path::absolutize(&self.cwd, parent);
        let segs = path::segments(&abs);
        let invalid = || ShellError::InvalidPath(path::collapse_separators(&abs));
        if node.name().is_empty() || node.name().contains(path::SEPARATOR) {
            return Err(ShellError::InvalidPath(node.name().to_string()));
        }
        let entries = self.walk_mut(&segs).ok_or_else(invalid)?;
        if entries.iter().any(|n| n.name() == node.name()) {
            let mut taken = segs.clone();
            taken.push(node.name());
            return Err(ShellError::InvalidPath(path::join(&taken)));
        }
        entries.push(node);
        self.persist_tree()
    }

    /// Resolve `path` to a directory: its rebuilt absolute path and entries.
    fn resolve_dir(&self, path: &str) -> Result<(String, &[Node])> {
        let abs = path::absolutize(&self.cwd, path);
        let segs = path::segments(&abs);
        match self.walk(&segs) {
            Some(found) => Ok(found),
            None => {
                log::debug!("unresolvable path {abs}");
                Err(ShellError::InvalidPath(path::collapse_separators(&abs)))
            },
        }
    }

    /// Descend from the root through directories named by `segs`.
    fn walk(&self, segs: &[&str]) -> Option<(String, &[Node])> {
        let mut entries: &[Node] = &self.root;
        let mut resolved = String::new();
        for seg in segs {
            match entries.iter().find(|n| n.name() == *seg)? {
                Node::Directory { name, contents } => {
                    resolved.push(path::SEPARATOR);
                    resolved.push_str(name);
                    entries = contents;
                },
                Node::File { .. } => return None,
            }
        }
        if resolved.is_empty() {
            resolved.push_str(ROOT);
        }
        Some((resolved, entries))
    }

    fn walk_mut(&mut self, segs: &[&str]) -> Option<&mut Vec<Node>> {
        let mut entries = &mut self.root;
        for seg in segs {
            match entries.iter_mut().find(|n| n.name() == *seg)? {
                Node::Directory { contents, .. } => entries = contents,
                Node::File { .. } => return None,
            }
        }
        Some(entries)
    }

    fn set_cwd(&mut self, cwd: String) {
        self.store.set(WD_KEY, &cwd);
        self.cwd = cwd;
    }

    fn persist_tree(&mut self) -> Result<()> {
        let tree = Node::dir(ROOT, std::mem::take(&mut self.root));
        let json = serde_json::to_string(&tree);
        if let Node::Directory { contents, .. } = tree {
            self.root = contents;
        }
        self.store.set(FS_KEY, &json?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cash_types::store::MemoryStore;

    fn fresh() -> VirtualFs {
        VirtualFs::initialize(Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn initialize_writes_defaults() {
        let vfs = fresh();
        assert_eq!(vfs.cwd(), "/home/anon");
        assert_eq!(vfs.store().get(WD_KEY).as_deref(), Some("/home/anon"));
        let fs = vfs.store().get(FS_KEY).unwrap();
        let tree: Node = serde_json::from_str(&fs).unwrap();
        assert_eq!(tree.name(), "/");
        assert_eq!(listing(vfs.root()), "home* bin*");
    }

    #[test]
    fn load_requires_initialized_store() {
        let err = VirtualFs::load(Box::new(MemoryStore::new())).unwrap_err();
        assert!(matches!(err, ShellError::NotInitialized(FS_KEY)));
    }

    #[test]
    fn load_reads_persisted_state() {
        let mut store = MemoryStore::new();
        store.set(
            FS_KEY,
            r#"{"name":"/","contents":[{"name":"etc","contents":[{"name":"motd","contents":"hi"}]}]}"#,
        );
        store.set(WD_KEY, "/etc");
        let vfs = VirtualFs::load(Box::new(store)).unwrap();
        assert_eq!(vfs.cwd(), "/etc");
        assert_eq!(vfs.read_file("motd").unwrap(), "hi");
    }

    #[test]
    fn load_rejects_dangling_cwd() {
        let mut store = MemoryStore::new();
        store.set(FS_KEY, r#"{"name":"/","contents":[]}"#);
        store.set(WD_KEY, "/gone");
        assert!(matches!(
            VirtualFs::load(Box::new(store)),
            Err(ShellError::Storage(_))
        ));
    }

    #[test]
    fn load_rejects_file_root() {
        let mut store = MemoryStore::new();
        store.set(FS_KEY, r#"{"name":"/","contents":"oops"}"#);
        store.set(WD_KEY, "/");
        assert!(matches!(
            VirtualFs::load(Box::new(store)),
            Err(ShellError::Storage(_))
        ));
    }

    #[test]
    fn list_cwd_of_fresh_fs_is_empty() {
        let vfs = fresh();
        let entries = vfs.list_dir(None).unwrap();
        assert!(entries.is_empty());
        assert_eq!(listing(entries), "");
    }

    #[test]
    fn list_root_and_relative() {
        let vfs = fresh();
        assert_eq!(listing(vfs.list_dir(Some("/")).unwrap()), "home* bin*");
        assert_eq!(listing(vfs.list_dir(Some("..")).unwrap()), "anon*");
        assert_eq!(listing(vfs.list_dir(Some("../../")).unwrap()), "home* bin*");
    }

    #[test]
    fn directories_are_starred_files_are_not() {
        let mut vfs = fresh();
        vfs.add_file("/home/anon", "notes.txt", "todo").unwrap();
        vfs.add_dir("/home/anon", "src").unwrap();
        assert_eq!(listing(vfs.list_dir(None).unwrap()), "notes.txt src*");
    }

    #[test]
    fn list_missing_path_collapses_separators() {
        let mut vfs = fresh();
        vfs.change_dir(Some("/")).unwrap();
        match vfs.list_dir(Some("nope")) {
            Err(ShellError::InvalidPath(p)) => assert_eq!(p, "/nope"),
            other => panic!("expected invalid path, got {other:?}"),
        }
    }

    #[test]
    fn list_through_file_fails() {
        let mut vfs = fresh();
        vfs.add_file("/bin", "sh", "").unwrap();
        assert!(vfs.list_dir(Some("/bin/sh")).is_err());
    }

    #[test]
    fn cd_absolute_and_relative() {
        let mut vfs = fresh();
        assert_eq!(vfs.change_dir(Some("/bin")).unwrap(), "/bin");
        assert_eq!(vfs.change_dir(Some("../home")).unwrap(), "/home");
        assert_eq!(vfs.change_dir(Some("anon/")).unwrap(), "/home/anon");
        assert_eq!(vfs.store().get(WD_KEY).as_deref(), Some("/home/anon"));
    }

    #[test]
    fn cd_without_path_goes_home() {
        let mut vfs = fresh();
        vfs.change_dir(Some("/")).unwrap();
        assert_eq!(vfs.change_dir(None).unwrap(), "/home/anon");
    }

    #[test]
    fn cd_stores_normalized_path() {
        let mut vfs = fresh();
        assert_eq!(
            vfs.change_dir(Some("/home//anon/../anon/./")).unwrap(),
            "/home/anon"
        );
    }

    #[test]
    fn cd_dotdot_per_level_reaches_root() {
        let mut vfs = fresh();
        vfs.change_dir(Some("/home/anon")).unwrap();
        vfs.change_dir(Some("..")).unwrap();
        assert_eq!(vfs.cwd(), "/home");
        vfs.change_dir(Some("..")).unwrap();
        assert_eq!(vfs.cwd(), "/");
        // Past the root stays at the root.
        vfs.change_dir(Some("..")).unwrap();
        assert_eq!(vfs.cwd(), "/");
    }

    #[test]
    fn cd_failure_leaves_cwd_unchanged() {
        let mut vfs = fresh();
        let before = vfs.cwd().to_string();
        assert!(vfs.change_dir(Some("/nowhere")).is_err());
        assert_eq!(vfs.cwd(), before);
        assert_eq!(vfs.store().get(WD_KEY), Some(before));
    }

    #[test]
    fn cd_into_file_fails() {
        let mut vfs = fresh();
        vfs.add_file("/home/anon", "notes.txt", "").unwrap();
        assert!(vfs.change_dir(Some("notes.txt")).is_err());
        assert_eq!(vfs.cwd(), "/home/anon");
    }

    #[test]
    fn read_file_paths() {
        let mut vfs = fresh();
        vfs.add_file("/home/anon", "notes.txt", "buy milk").unwrap();
        assert_eq!(vfs.read_file("notes.txt").unwrap(), "buy milk");
        assert_eq!(vfs.read_file("/home/anon/notes.txt").unwrap(), "buy milk");
        assert_eq!(vfs.read_file("../anon/notes.txt").unwrap(), "buy milk");
    }

    #[test]
    fn read_file_rejects_directories_and_missing() {
        let vfs = fresh();
        assert!(vfs.read_file("/home").is_err());
        assert!(vfs.read_file("ghost").is_err());
        assert!(vfs.read_file("/").is_err());
    }

    #[test]
    fn add_rejects_duplicates_and_bad_names() {
        let mut vfs = fresh();
        vfs.add_dir("/", "tmp").unwrap();
        assert!(vfs.add_dir("/", "tmp").is_err());
        assert!(vfs.add_dir("/", "a/b").is_err());
        assert!(vfs.add_file("/", "", "x").is_err());
        assert!(vfs.add_file("/missing", "x", "").is_err());
    }

    #[test]
    fn mutations_survive_reload() {
        let mut vfs = fresh();
        vfs.add_file("/bin", "hello", "world").unwrap();
        vfs.change_dir(Some("/bin")).unwrap();

        let mut copy = MemoryStore::new();
        copy.set(FS_KEY, &vfs.store().get(FS_KEY).unwrap());
        copy.set(WD_KEY, &vfs.store().get(WD_KEY).unwrap());
        let reloaded = VirtualFs::load(Box::new(copy)).unwrap();
        assert_eq!(reloaded.cwd(), "/bin");
        assert_eq!(reloaded.read_file("hello").unwrap(), "world");
    }

    #[test]
    fn reset_discards_changes() {
        let mut vfs = fresh();
        vfs.add_dir("/", "tmp").unwrap();
        vfs.change_dir(Some("/tmp")).unwrap();
        vfs.reset().unwrap();
        assert_eq!(vfs.cwd(), "/home/anon");
        assert_eq!(listing(vfs.root()), "home* bin*");
    }
}
