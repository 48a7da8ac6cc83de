//! Node records and the owned values exchanged with callers.

use std::collections::BTreeSet;

use derive_more::From;

/// A single node of the tree, stored by its full name.
///
/// Parent and children are kept as full names rather than references, so the
/// store is the only owner of any node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<D> {
    pub(crate) parent: Option<String>,
    pub(crate) children: BTreeSet<String>,
    pub(crate) data: Vec<D>,
}

impl<D> Node<D> {
    pub(crate) fn new(parent: Option<String>) -> Self {
        Self {
            parent,
            children: BTreeSet::new(),
            data: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Owned snapshot of a node, detached from the tree it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView<D> {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub data: Vec<D>,
}

impl<D: Clone> NodeView<D> {
    pub(crate) fn capture(name: &str, node: &Node<D>) -> Self {
        Self {
            name: name.to_string(),
            parent: node.parent.clone(),
            children: node.children.iter().cloned().collect(),
            data: node.data.clone(),
        }
    }
}

/// An insertion request: the full node name and the values to append to it.
#[derive(Debug, Clone, PartialEq, From)]
pub struct Entry<D> {
    pub name: String,
    pub data: Vec<D>,
}

impl<D> Entry<D> {
    /// Entry that only materializes the node, appending nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    pub fn with(name: impl Into<String>, value: D) -> Self {
        Self {
            name: name.into(),
            data: vec![value],
        }
    }

    /// Each element of `values` is appended individually, in order.
    pub fn with_all(name: impl Into<String>, values: impl IntoIterator<Item = D>) -> Self {
        Self {
            name: name.into(),
            data: values.into_iter().collect(),
        }
    }
}
