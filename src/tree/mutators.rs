//! Structural edits: collapsing, flattening, copying, deleting and renaming
//! parts of a [`NamespaceTree`].

use std::collections::HashSet;

use snafu::{OptionExt, ensure};
use tracing::{debug, info};

use crate::tree::NamespaceTree;
use crate::tree::node::Node;
use crate::tree::error::{
    IllegalNewNameSnafu, IllegalRootRenameSnafu, IllegalRootSnafu, InvalidNameSnafu,
    InvalidPrefixSnafu, TreeError,
};

impl<D> NamespaceTree<D> {
    /// Merges chains of dataless single-child nodes into their descendant.
    ///
    /// Starting at `name`, every node without data and with exactly one child
    /// is removed, and the first node that breaks the chain takes the place of
    /// `name` under its parent (or as the root). Node names are kept, so the
    /// surviving node is displayed with the skipped segments in its label.
    /// With `recursive`, the same is done below every surviving child.
    pub fn collapse_subtree(&mut self, name: &str, recursive: bool) -> Result<(), TreeError> {
        self.require(name)?;
        self.collapse_from(name.to_string(), recursive);
        Ok(())
    }

    fn collapse_from(&mut self, start: String, recursive: bool) {
        let mut survivor = start.clone();
        let mut skipped = Vec::new();
        while let Some(node) = self.nodes.get(&survivor) {
            if node.has_data() || node.children.len() != 1 {
                break;
            }
            let Some(child) = node.children.first().cloned() else {
                break;
            };
            skipped.push(std::mem::replace(&mut survivor, child));
        }

        if !skipped.is_empty() {
            let parent = self.nodes.get(&start).and_then(|node| node.parent.clone());
            for name in &skipped {
                self.nodes.remove(name);
            }
            if let Some(node) = self.nodes.get_mut(&survivor) {
                node.parent = parent.clone();
            }
            match parent {
                Some(parent) => {
                    self.nodes.detach(&parent, &start);
                    self.nodes.attach(&parent, &survivor);
                }
                None => {
                    info!("Collapsed root '{}' into '{}'", start, survivor);
                    self.root = Some(survivor.clone());
                }
            }
            debug!("Collapsed {:?} into '{}'", skipped, survivor);
        }

        if recursive {
            let children = self
                .nodes
                .get(&survivor)
                .map(|node| node.children.iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            for child in children {
                self.collapse_from(child, true);
            }
        }
    }

    /// Removes the dataless intermediate node `name` and hands its children to
    /// its parent. Children keep their names.
    ///
    /// Nothing happens for the root, for nodes with data and for leaves.
    pub fn flatten_subtree(&mut self, name: &str) -> Result<(), TreeError> {
        let node = self.require(name)?;
        let Some(parent) = node.parent.clone() else {
            return Ok(());
        };
        if node.has_data() || node.is_leaf() {
            return Ok(());
        }

        if let Some(removed) = self.nodes.remove(name) {
            for child in &removed.children {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.parent = Some(parent.clone());
                }
                self.nodes.attach(&parent, child);
            }
            self.nodes.detach(&parent, name);
            debug!(
                "Flattened '{}', moved {} child(ren) to '{}'",
                name,
                removed.children.len(),
                parent
            );
        }
        Ok(())
    }

    /// Removes every name in `names` together with its subtree.
    ///
    /// All names are checked first; if any is missing nothing is deleted.
    pub fn delete_subtree<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<(), TreeError> {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect::<Vec<_>>();
        for name in &names {
            self.require(name)?;
        }

        for name in &names {
            // Already gone with an ancestor listed earlier in the batch.
            if !self.nodes.contains(name) {
                continue;
            }
            self.remove_subtree(name);
        }
        Ok(())
    }

    pub fn delete_node(&mut self, name: &str) -> Result<(), TreeError> {
        self.delete_subtree([name])
    }

    fn remove_subtree(&mut self, name: &str) {
        let parent = self.nodes.get(name).and_then(|node| node.parent.clone());
        let paths = self.subtree_paths(name);
        for path in &paths {
            self.nodes.remove(path);
        }
        debug!("Deleted {} node(s) under '{}'", paths.len(), name);

        match parent {
            Some(parent) => self.nodes.detach(&parent, name),
            None => {
                self.nodes.clear();
                self.root = None;
                info!("Deleted root '{}', tree is now empty", name);
            }
        }
    }

    /// Strips `prefix` from the front of every name in the tree.
    ///
    /// `prefix` has to be a leading run of the root's segments, and cannot be
    /// the whole root.
    pub fn delete_prefix(&mut self, prefix: &str) -> Result<(), TreeError> {
        ensure!(self.path.validate(prefix), InvalidNameSnafu { name: prefix });
        let root = self.root.clone().context(InvalidPrefixSnafu {
            prefix,
            root: String::new(),
        })?;
        let stripped = self
            .path
            .relative_to(&root, prefix)
            .map(str::to_string)
            .context(InvalidPrefixSnafu {
                prefix,
                root: root.as_str(),
            })?;

        self.move_subtree(&root, &stripped);
        info!("Stripped prefix '{}', root is now '{}'", prefix, stripped);
        Ok(())
    }

    /// Makes `name` the root, discarding everything outside of its subtree.
    pub fn make_root(&mut self, name: &str) -> Result<(), TreeError> {
        self.require(name)?;
        if self.root.as_deref() == Some(name) {
            return Ok(());
        }

        let keep = self.subtree_paths(name).into_iter().collect::<HashSet<_>>();
        let discard = self
            .nodes
            .all_paths()
            .into_iter()
            .filter(|path| !keep.contains(*path))
            .map(str::to_string)
            .collect::<Vec<_>>();
        for path in &discard {
            self.nodes.remove(path);
        }
        if let Some(node) = self.nodes.get_mut(name) {
            node.parent = None;
        }
        self.root = Some(name.to_string());
        info!("Promoted '{}' to root, discarded {} node(s)", name, discard.len());
        Ok(())
    }

    /// Renames `name` and every name below it.
    ///
    /// A non-root node may only change its last segment. The root may be
    /// renamed freely as long as the new name is not longer, in segments, than
    /// the current one.
    pub fn rename_node(&mut self, name: &str, new_name: &str) -> Result<(), TreeError> {
        self.require(name)?;
        ensure!(
            self.path.validate(new_name),
            InvalidNameSnafu { name: new_name }
        );
        if name == new_name {
            return Ok(());
        }
        ensure!(
            !self.nodes.contains(new_name),
            IllegalNewNameSnafu { name, new_name }
        );

        if self.root.as_deref() == Some(name) {
            ensure!(
                self.path.segment_count(new_name) <= self.path.segment_count(name),
                IllegalRootRenameSnafu { name, new_name }
            );
        } else {
            ensure!(
                self.path.parent_of(name) == self.path.parent_of(new_name),
                IllegalNewNameSnafu { name, new_name }
            );
            // Collapsed or flattened nodes may still own names below `new_name`.
            let clash = self.subtree_paths(name).iter().any(|path| {
                self.path
                    .reprefix(path, name, new_name)
                    .is_some_and(|target| self.nodes.contains(&target))
            });
            ensure!(!clash, IllegalNewNameSnafu { name, new_name });
        }

        self.move_subtree(name, new_name);
        debug!("Renamed '{}' to '{}'", name, new_name);
        Ok(())
    }

    /// Re-keys the subtree of `name` under `new_name` and relinks its parent.
    fn move_subtree(&mut self, name: &str, new_name: &str) {
        let rename = |path: &str| {
            self.path
                .reprefix(path, name, new_name)
                .unwrap_or_else(|| path.to_string())
        };

        let moved = self
            .subtree_paths(name)
            .into_iter()
            .filter_map(|path| self.nodes.remove(&path).map(|node| (path, node)))
            .collect::<Vec<_>>();

        let mut top_parent = None;
        let mut renamed = Vec::with_capacity(moved.len());
        for (path, mut node) in moved {
            if path == name {
                top_parent = node.parent.clone();
            } else {
                node.parent = node.parent.as_deref().map(rename);
            }
            node.children = node.children.iter().map(|child| rename(child)).collect();
            renamed.push((rename(&path), node));
        }
        for (path, node) in renamed {
            self.nodes.put(path, node);
        }

        match top_parent {
            Some(parent) => {
                self.nodes.detach(&parent, name);
                self.nodes.attach(&parent, new_name);
            }
            None => self.root = Some(new_name.to_string()),
        }
    }
}

impl<D: Clone> NamespaceTree<D> {
    /// Copies the subtree of `source` to `dest`, substituting the `source`
    /// prefix of every copied name.
    ///
    /// The copy has the same shape as the source, including names left behind
    /// by a collapse or flatten. Only the missing ancestors of `dest` are
    /// created. A target that already exists keeps its links and has its data
    /// replaced by the source's.
    pub fn copy_subtree(&mut self, source: &str, dest: &str) -> Result<(), TreeError> {
        self.require(source)?;
        ensure!(self.path.validate(dest), InvalidNameSnafu { name: dest });
        let root = self.root.clone().unwrap_or_default();
        ensure!(
            self.path.is_within(dest, &root),
            IllegalRootSnafu { name: dest, root }
        );

        let rename = |path: &str| self.path.reprefix(path, source, dest);
        let copies = self
            .subtree_paths(source)
            .into_iter()
            .filter_map(|path| {
                let node = self.nodes.get(&path)?;
                let mut copy = Node::new(node.parent.as_deref().and_then(rename));
                copy.children = node
                    .children
                    .iter()
                    .filter_map(|child| rename(child))
                    .collect();
                copy.data = node.data.clone();
                Some((rename(&path)?, copy))
            })
            .collect::<Vec<_>>();

        let dest_parent = match self.path.parent_of(dest) {
            Some(parent) if !self.nodes.contains(dest) => {
                self.insert(parent, Vec::new());
                Some(parent.to_string())
            }
            _ => None,
        };
        let existing = copies
            .iter()
            .filter(|(target, _)| self.nodes.contains(target))
            .map(|(target, _)| target.clone())
            .collect::<HashSet<_>>();

        debug!(
            "Copying {} node(s) from '{}' to '{}', {} already present",
            copies.len(),
            source,
            dest,
            existing.len()
        );
        for (target, mut copy) in copies {
            if existing.contains(&target) {
                if let Some(node) = self.nodes.get_mut(&target) {
                    node.data = copy.data;
                }
                continue;
            }
            if target == dest {
                copy.parent = dest_parent.clone();
            }
            copy.children.retain(|child| !existing.contains(child));
            let parent = copy.parent.clone();
            self.nodes.put(target.clone(), copy);
            let linked = parent.filter(|parent| target == dest || existing.contains(parent));
            if let Some(parent) = linked {
                self.nodes.attach(&parent, &target);
            }
        }
        Ok(())
    }
}
