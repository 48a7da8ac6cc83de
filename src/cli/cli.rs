use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::{ColorChoice, LogLevel};

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML file listing the nodes to load
    pub file: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Overrides the separator declared in the nodes file
    #[clap(long, short)]
    pub separator: Option<char>,

    /// Discards everything outside of this node's subtree
    #[clap(long)]
    pub make_root: Option<String>,

    /// Strips this leading part from every node name, after --make-root
    #[clap(long)]
    pub delete_prefix: Option<String>,

    /// Merges chains of dataless single-child nodes
    #[clap(long)]
    pub collapse: bool,

    #[clap(long, default_value = "auto", value_enum)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Prints the whole tree as an outline
    Print,
    /// Prints a single node
    Node { name: String },
    /// Lists nodes containing the given segments
    Search { needle: String },
    /// Lists a node and all of its descendants
    Subtree { name: String },
    /// Lists the leaves below a node
    Leaves { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_normalization_flags() {
        let cli = Cli::try_parse_from([
            "nametree",
            "nodes.yaml",
            "--delete-prefix",
            "pkg",
            "--make-root",
            "pkg.mod",
            "--collapse",
            "-s",
            "/",
            "search",
            "leaf",
        ])
        .unwrap();
        assert_eq!(cli.file, PathBuf::from("nodes.yaml"));
        assert_eq!(cli.delete_prefix.as_deref(), Some("pkg"));
        assert_eq!(cli.make_root.as_deref(), Some("pkg.mod"));
        assert!(cli.collapse);
        assert_eq!(cli.separator, Some('/'));
        assert!(matches!(cli.command, Command::Search { needle } if needle == "leaf"));
    }

    #[test]
    fn cli_requires_command() {
        assert!(Cli::try_parse_from(["nametree", "nodes.yaml"]).is_err());
    }
}
