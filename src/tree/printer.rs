use std::fmt;

use crate::tree::NamespaceTree;
use crate::tree::error::TreeError;

const DATA_MARKER: &str = "(*)";
const NONE: &str = "none";

impl<D> NamespaceTree<D> {
    /// Renders the tree as a glyph outline, appending `data_marker` to every
    /// node that carries data.
    ///
    /// ```text
    /// root
    /// ├branch1 (*)
    /// │├leaf1
    /// ││└subleaf1 (*)
    /// │└leaf2 (*)
    /// │ └subleaf2
    /// └branch2
    /// ```
    pub fn outline(&self, data_marker: &str) -> String {
        let Some(root) = self.root.as_deref() else {
            return String::new();
        };
        let mut lines = vec![self.outline_line("", root, root, data_marker)];
        self.outline_children(&mut lines, root, "", data_marker);
        lines.join("\n")
    }

    fn outline_children(&self, lines: &mut Vec<String>, name: &str, indent: &str, marker: &str) {
        let Some(node) = self.nodes.get(name) else {
            return;
        };
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            let last = index + 1 == count;
            let label = self.label(name, child);
            let connector = if last { '└' } else { '├' };
            lines.push(self.outline_line(&format!("{indent}{connector}"), child, label, marker));

            let nested = format!("{indent}{}", if last { ' ' } else { '│' });
            self.outline_children(lines, child, &nested, marker);
        }
    }

    fn outline_line(&self, lead: &str, name: &str, label: &str, marker: &str) -> String {
        match self.nodes.get(name) {
            Some(node) if node.has_data() => format!("{lead}{label} {marker}"),
            _ => format!("{lead}{label}"),
        }
    }

    /// Part of `child` below `parent`. After a collapse or flatten this spans
    /// more than one segment.
    fn label<'a>(&self, parent: &str, child: &'a str) -> &'a str {
        self.path
            .relative_to(child, parent)
            .unwrap_or_else(|| self.path.last_segment(child))
    }
}

impl<D: fmt::Display> NamespaceTree<D> {
    /// Describes a single node:
    ///
    /// ```text
    /// Name: root.branch1
    /// Parent: root
    /// Children: leaf1, leaf2
    /// Data: [5, 7]
    /// ```
    pub fn print_node(&self, name: &str) -> Result<String, TreeError> {
        let node = self.require(name)?;

        let children = node
            .children
            .iter()
            .map(|child| self.label(name, child))
            .collect::<Vec<_>>();
        let children = if children.is_empty() {
            NONE.to_string()
        } else {
            children.join(", ")
        };

        let data = match node.data.as_slice() {
            [] => NONE.to_string(),
            [single] => single.to_string(),
            many => format!(
                "[{}]",
                many.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };

        Ok(format!(
            "Name: {}\nParent: {}\nChildren: {}\nData: {}",
            name,
            node.parent.as_deref().unwrap_or(NONE),
            children,
            data
        ))
    }
}

impl<D> fmt::Display for NamespaceTree<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outline(DATA_MARKER))
    }
}
