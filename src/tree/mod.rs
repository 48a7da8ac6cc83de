//! Hierarchical namespace store.
//!
//! A [`NamespaceTree`] is a trie keyed by names whose segments are joined by a
//! single separator character, e.g. `root.branch1.leaf2`. Nodes are stored by
//! their full name in one owning map, with parent and children kept as names.
//! Each node holds an ordered list of values that insertions append to.

mod error;
mod mutators;
mod namespace_tree;
mod node;
mod path;
mod printer;
mod store;

pub use error::TreeError;
pub use namespace_tree::NamespaceTree;
pub use node::{Entry, NodeView};
pub use path::NamePath;

#[cfg(test)]
pub(crate) mod fixtures {
    use rstest::fixture;

    use super::{Entry, NamespaceTree};

    #[fixture]
    pub(crate) fn example_tree() -> NamespaceTree<String> {
        let mut tree = NamespaceTree::default();
        tree.add_nodes([
            Entry::with("root.branch1", "5".to_string()),
            Entry::with("root.branch1", "7".to_string()),
            Entry::new("root.branch2"),
            Entry::new("root.branch1.leaf1"),
            Entry::with("root.branch1.leaf1.subleaf1", "333".to_string()),
            Entry::with("root.branch1.leaf2", "Hello world!".to_string()),
            Entry::new("root.branch1.leaf2.subleaf2"),
        ])
        .expect("example tree is well formed");
        tree
    }
}
