use colored::Colorize;
use nametree::{NamespaceTree, NodesFile, NodesFileError, TreeError};
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::data::ColorChoice;
use crate::application::{Normalization, RuntimeConfig};
use crate::cli::Command;

const DATA_MARKER: &str = "(*)";

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let nodes_file = NodesFile::from_path(&app_config.file)
            .await
            .context(NodesFileSnafu)?;
        debug!("Loaded {} entries", nodes_file.entries().len());

        let mut tree = nodes_file
            .into_tree(app_config.separator)
            .context(NodesFileSnafu)?;
        Self::normalize(&mut tree, &app_config.normalization).context(NormalizationSnafu)?;

        let output =
            Self::execute(&tree, &app_config.command, app_config.color).context(CommandSnafu)?;
        println!("{output}");

        Ok(())
    }

    fn normalize(
        tree: &mut NamespaceTree<String>,
        normalization: &Normalization,
    ) -> Result<(), TreeError> {
        if let Some(name) = &normalization.make_root {
            tree.make_root(name)?;
        }
        if let Some(prefix) = &normalization.delete_prefix {
            tree.delete_prefix(prefix)?;
        }
        if normalization.collapse {
            if let Some(root) = tree.root_name().map(str::to_string) {
                tree.collapse_subtree(&root, true)?;
            }
        }
        info!("Tree has {} node(s) under root {:?}", tree.len(), tree.root_name());
        Ok(())
    }

    fn execute(
        tree: &NamespaceTree<String>,
        command: &Command,
        color: ColorChoice,
    ) -> Result<String, TreeError> {
        match command {
            Command::Print => Ok(tree.outline(&data_marker(color))),
            Command::Node { name } => tree.print_node(name),
            Command::Search { needle } => Ok(tree.search(needle)?.collect::<Vec<_>>().join("\n")),
            Command::Subtree { name } => Ok(tree.subtree(name)?.join("\n")),
            Command::Leaves { name } => Ok(tree.leaves(name)?.join("\n")),
        }
    }
}

fn data_marker(color: ColorChoice) -> String {
    if color.enabled() {
        DATA_MARKER.green().bold().to_string()
    } else {
        DATA_MARKER.to_string()
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the nodes file"))]
    NodesFileError { source: NodesFileError },
    #[snafu(display("Critical failure encountered while normalizing the tree"))]
    NormalizationError { source: TreeError },
    #[snafu(display("Critical failure encountered while running the command"))]
    CommandError { source: TreeError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use nametree::Entry;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn package_tree() -> NamespaceTree<String> {
        let mut tree = NamespaceTree::default();
        tree.add_nodes([
            Entry::new("site.pkg.mod.sub.a"),
            Entry::with("site.pkg.mod.sub.a.f", "doc".to_string()),
            Entry::with("site.pkg.mod.sub.b", "other".to_string()),
            Entry::new("site.pkg.extra"),
        ])
        .unwrap();
        tree
    }

    #[test]
    fn normalization_runs_in_order() {
        let mut tree = package_tree();
        let normalization = Normalization {
            make_root: Some("site.pkg.mod.sub".to_string()),
            delete_prefix: Some("site.pkg".to_string()),
            collapse: true,
        };
        Application::normalize(&mut tree, &normalization).unwrap();

        assert_eq!(tree.root_name(), Some("mod.sub"));
        assert_eq!(tree.nodes(), vec!["mod.sub", "mod.sub.a.f", "mod.sub.b"]);
        assert_eq!(tree.to_string(), "mod.sub\n├a.f (*)\n└b (*)");
    }

    #[test]
    fn normalization_reports_bad_prefix() {
        let mut tree = package_tree();
        let normalization = Normalization {
            delete_prefix: Some("elsewhere".to_string()),
            ..Normalization::default()
        };
        assert!(matches!(
            Application::normalize(&mut tree, &normalization),
            Err(TreeError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn execute_commands() {
        let tree = package_tree();
        let print = Application::execute(&tree, &Command::Print, ColorChoice::Never).unwrap();
        assert!(print.starts_with("site\n"));
        assert!(print.contains("f (*)"));

        let search = Application::execute(
            &tree,
            &Command::Search {
                needle: "sub".to_string(),
            },
            ColorChoice::Never,
        )
        .unwrap();
        assert_eq!(search.lines().count(), 4);

        let leaves = Application::execute(
            &tree,
            &Command::Leaves {
                name: "site.pkg".to_string(),
            },
            ColorChoice::Never,
        )
        .unwrap();
        assert_eq!(
            leaves,
            "site.pkg.extra\nsite.pkg.mod.sub.a.f\nsite.pkg.mod.sub.b"
        );

        let missing = Application::execute(
            &tree,
            &Command::Node {
                name: "site.nope".to_string(),
            },
            ColorChoice::Never,
        );
        assert!(matches!(missing, Err(TreeError::NodeNotFound { .. })));
    }

    #[compio::test]
    async fn run_reads_file_and_prints() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "nodes:\n  root.a: 1\n  root.b: [2, 3]\n")
            .expect("Failed to write to temp file");

        let config = RuntimeConfig {
            file: temp_file.path().to_path_buf(),
            separator: None,
            normalization: Normalization::default(),
            color: ColorChoice::Never,
            command: Command::Print,
        };
        assert!(Application::run(config).await.is_ok());
    }

    #[compio::test]
    async fn run_fails_on_missing_file() {
        let config = RuntimeConfig {
            file: "does-not-exist.yaml".into(),
            separator: None,
            normalization: Normalization::default(),
            color: ColorChoice::Never,
            command: Command::Print,
        };
        assert!(matches!(
            Application::run(config).await,
            Err(ApplicationError::NodesFileError { .. })
        ));
    }
}
