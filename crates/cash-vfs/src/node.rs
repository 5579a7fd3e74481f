//! Filesystem nodes.

use serde::{Deserialize, Serialize};

/// A file or a directory.
///
/// Serialized untagged as `{"name": .., "contents": ..}`: a string
/// `contents` marks a file, an array marks a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    File { name: String, contents: String },
    Directory { name: String, contents: Vec<Node> },
}

impl Node {
    pub fn file(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Node::File {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn dir(name: impl Into<String>, contents: Vec<Node>) -> Self {
        Node::Directory {
            name: name.into(),
            contents,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File { name, .. } | Node::Directory { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    /// Listing label: directories get a trailing `*`.
    pub fn label(&self) -> String {
        match self {
            Node::File { name, .. } => name.clone(),
            Node::Directory { name, .. } => format!("{name}*"),
        }
    }
}
