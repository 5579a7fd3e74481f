//! Virtual filesystem for cash.
//!
//! The filesystem is a tree of [`Node`]s rooted at `/`, plus a single
//! working-directory cursor. Both live in a [`cash_types::store::KvStore`]
//! under the keys [`FS_KEY`] and [`WD_KEY`]; [`VirtualFs`] keeps a cached
//! copy and writes every mutation through.

mod node;
pub mod path;
mod tree;

pub use node::Node;
pub use tree::{FS_KEY, VirtualFs, WD_KEY, listing};
