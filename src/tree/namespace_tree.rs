use snafu::{OptionExt, ensure};
use tracing::{debug, info};

use crate::tree::error::{
    IllegalNodeNameSnafu, InvalidNameSnafu, InvalidSeparatorSnafu, NodeNotFoundSnafu, TreeError,
};
use crate::tree::node::{Entry, Node, NodeView};
use crate::tree::path::NamePath;
use crate::tree::store::NodeStore;

/// Hierarchical namespace keyed by separator-delimited names.
///
/// Every node may carry any number of values. Inserting a name creates all of
/// its missing ancestors, and all names in a tree share a single root lineage.
#[derive(Debug, Clone)]
pub struct NamespaceTree<D> {
    pub(crate) path: NamePath,
    pub(crate) root: Option<String>,
    pub(crate) nodes: NodeStore<D>,
}

impl<D> NamespaceTree<D> {
    pub fn new(separator: char) -> Result<Self, TreeError> {
        ensure!(!separator.is_whitespace(), InvalidSeparatorSnafu { separator });
        Ok(Self {
            path: NamePath::new(separator),
            root: None,
            nodes: NodeStore::new(),
        })
    }

    pub fn separator(&self) -> char {
        self.path.separator()
    }

    pub fn path_algebra(&self) -> &NamePath {
        &self.path
    }

    pub fn root_name(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node names, sorted.
    pub fn nodes(&self) -> Vec<String> {
        self.nodes.all_paths().into_iter().map(str::to_string).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path.validate(name) && self.nodes.contains(name)
    }

    pub fn add_node(&mut self, entry: Entry<D>) -> Result<(), TreeError> {
        self.add_nodes([entry])
    }

    /// Inserts a batch of entries.
    ///
    /// The whole batch is checked before anything is inserted, so a failing
    /// entry leaves the tree untouched.
    pub fn add_nodes(
        &mut self,
        entries: impl IntoIterator<Item = Entry<D>>,
    ) -> Result<(), TreeError> {
        let entries = entries.into_iter().collect::<Vec<_>>();

        // The first entry of an empty tree decides the root for the rest.
        let mut lineage = self.root.clone();
        for entry in &entries {
            ensure!(
                self.path.validate(&entry.name),
                InvalidNameSnafu { name: &entry.name }
            );
            let root = lineage
                .get_or_insert_with(|| self.path.first_segment(&entry.name).to_string());
            ensure!(
                self.path.is_within(&entry.name, root),
                IllegalNodeNameSnafu {
                    name: &entry.name,
                    root: root.as_str(),
                }
            );
        }

        for entry in entries {
            self.insert(&entry.name, entry.data);
        }
        Ok(())
    }

    /// Materializes `name` and its missing ancestors, then appends `data`.
    /// Callers must have validated `name` against the root lineage.
    pub(crate) fn insert(&mut self, name: &str, data: Vec<D>) {
        let root = match self.root.clone() {
            Some(root) => root,
            None => {
                let root = self.path.first_segment(name).to_string();
                self.nodes.put(root.clone(), Node::new(None));
                self.root = Some(root.clone());
                info!("Created root node '{}'", root);
                root
            }
        };

        if let Some(relative) = self.path.relative_to(name, &root) {
            let mut current = root;
            for segment in relative.split(self.path.separator()) {
                let child = format!("{current}{}{segment}", self.path.separator());
                if !self.nodes.contains(&child) {
                    debug!("Creating node '{}' under '{}'", child, current);
                    self.nodes.put(child.clone(), Node::new(Some(current.clone())));
                    self.nodes.attach(&current, &child);
                }
                current = child;
            }
        }

        if !data.is_empty() {
            if let Some(node) = self.nodes.get_mut(name) {
                debug!("Appending {} value(s) to '{}'", data.len(), name);
                node.data.extend(data);
            }
        }
    }

    /// Validates `name` and returns its node.
    pub(crate) fn require(&self, name: &str) -> Result<&Node<D>, TreeError> {
        ensure!(self.path.validate(name), InvalidNameSnafu { name });
        self.nodes.get(name).context(NodeNotFoundSnafu { name })
    }

    pub fn children(&self, name: &str) -> Result<Vec<String>, TreeError> {
        Ok(self.require(name)?.children.iter().cloned().collect())
    }

    pub fn parent(&self, name: &str) -> Result<Option<String>, TreeError> {
        Ok(self.require(name)?.parent.clone())
    }

    pub fn is_root(&self, name: &str) -> Result<bool, TreeError> {
        self.require(name)?;
        Ok(self.root.as_deref() == Some(name))
    }

    pub fn is_leaf(&self, name: &str) -> Result<bool, TreeError> {
        Ok(self.require(name)?.is_leaf())
    }

    /// Names in the subtree of `name`, itself included, in pre-order with
    /// children visited in sorted order.
    pub fn subtree(&self, name: &str) -> Result<Vec<String>, TreeError> {
        self.require(name)?;
        Ok(self.subtree_paths(name))
    }

    pub fn leaves(&self, name: &str) -> Result<Vec<String>, TreeError> {
        Ok(self
            .subtree(name)?
            .into_iter()
            .filter(|path| self.nodes.get(path).is_some_and(Node::is_leaf))
            .collect())
    }

    /// Every name that contains `needle` as a whole run of segments, sorted.
    ///
    /// Matches are gathered when this is called, so later edits to the tree
    /// are not seen. The returned iterator can be cloned to walk the matches
    /// again.
    pub fn search<'a>(
        &'a self,
        needle: &'a str,
    ) -> Result<impl Iterator<Item = &'a str> + Clone + 'a, TreeError> {
        ensure!(self.path.validate(needle), InvalidNameSnafu { name: needle });
        let mut found = self
            .nodes
            .paths()
            .filter(|path| self.path.contains_segments(path, needle))
            .collect::<Vec<_>>();
        found.sort_unstable();
        Ok(found.into_iter())
    }

    pub(crate) fn subtree_paths(&self, name: &str) -> Vec<String> {
        let mut paths = Vec::new();
        let mut pending = vec![name.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get(&current) {
                pending.extend(node.children.iter().rev().cloned());
                paths.push(current);
            }
        }
        paths
    }
}

impl<D: Clone> NamespaceTree<D> {
    pub fn data(&self, name: &str) -> Result<Vec<D>, TreeError> {
        Ok(self.require(name)?.data.clone())
    }

    pub fn node(&self, name: &str) -> Result<NodeView<D>, TreeError> {
        Ok(NodeView::capture(name, self.require(name)?))
    }
}

impl<D> Default for NamespaceTree<D> {
    fn default() -> Self {
        Self {
            path: NamePath::default(),
            root: None,
            nodes: NodeStore::new(),
        }
    }
}
