use std::path::PathBuf;

use crate::application::data::ColorChoice;
use crate::cli::{Cli, Command};

/// Steps that reshape the loaded tree before the command runs, applied in
/// field order.
#[derive(Debug, Clone, Default)]
pub struct Normalization {
    pub make_root: Option<String>,
    pub delete_prefix: Option<String>,
    pub collapse: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub file: PathBuf,
    pub separator: Option<char>,
    pub normalization: Normalization,
    pub color: ColorChoice,
    pub command: Command,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            file: cli.file,
            separator: cli.separator,
            normalization: Normalization {
                make_root: cli.make_root,
                delete_prefix: cli.delete_prefix,
                collapse: cli.collapse,
            },
            color: cli.color,
            command: cli.command,
        }
    }
}
