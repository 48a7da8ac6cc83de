use std::collections::HashMap;

use crate::tree::node::Node;

/// Single owning map from full node name to node record.
///
/// Only the tree itself touches the store; it keeps the parent/children links
/// consistent across the primitives below.
#[derive(Debug, Clone)]
pub(crate) struct NodeStore<D> {
    nodes: HashMap<String, Node<D>>,
}

impl<D> NodeStore<D> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node<D>> {
        self.nodes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node<D>> {
        self.nodes.get_mut(name)
    }

    pub fn put(&mut self, name: String, node: Node<D>) -> Option<Node<D>> {
        self.nodes.insert(name, node)
    }

    pub fn remove(&mut self, name: &str) -> Option<Node<D>> {
        self.nodes.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Every stored name, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn all_paths(&self) -> Vec<&str> {
        let mut paths = self.paths().collect::<Vec<_>>();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Links `child` under `parent`, if the parent exists.
    pub fn attach(&mut self, parent: &str, child: &str) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(child.to_string());
        }
    }

    pub fn detach(&mut self, parent: &str, child: &str) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.remove(child);
        }
    }
}
