#![allow(clippy::enum_variant_names)]

pub mod config;
pub mod tree;

pub use config::{NodesFile, NodesFileError};
pub use tree::{Entry, NamePath, NamespaceTree, NodeView, TreeError};
