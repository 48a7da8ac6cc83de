//! Loading trees from YAML nodes files.

mod nodes_file;

pub use nodes_file::{NodesFile, NodesFileError};
