use std::{borrow::Cow, path::Path};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::tree::{Entry, NamespaceTree, TreeError};

const DEFAULT_SEPARATOR: char = '.';
const SEPARATOR_KEY: &str = "separator";
const NODES_KEY: &str = "nodes";

/// Separator and insertion entries read from a YAML document of the form
///
/// ```yaml
/// separator: "."
/// nodes:
///   root.branch1: [5, 7]
///   root.branch1.leaf2: Hello world!
///   root.branch2:
/// ```
///
/// Entries keep the order in which they appear in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct NodesFile {
    separator: char,
    entries: Vec<Entry<String>>,
}

impl NodesFile {
    pub async fn from_path(path: &Path) -> Result<Self, NodesFileError> {
        debug!("Opening nodes file: {}", path.display());
        let bytes = compio::fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Read {} bytes from nodes file", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn entries(&self) -> &[Entry<String>] {
        &self.entries
    }

    /// Builds a tree from the entries, using `separator` instead of the one
    /// declared in the file when given.
    pub fn into_tree(
        self,
        separator: Option<char>,
    ) -> Result<NamespaceTree<String>, NodesFileError> {
        let mut tree = NamespaceTree::new(separator.unwrap_or(self.separator)).context(TreeSnafu)?;
        tree.add_nodes(self.entries).context(TreeSnafu)?;
        debug!("Loaded {} node(s)", tree.len());
        Ok(tree)
    }

    fn parse_separator(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<char, NodesFileError> {
        let Some(value) = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(SEPARATOR_KEY))))
        else {
            return Ok(DEFAULT_SEPARATOR);
        };
        let text = scalar_text(value).unwrap_or_default();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(separator), None) => Ok(separator),
            _ => InvalidSeparatorSnafu { value: text }.fail(),
        }
    }

    fn parse_entries(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<Entry<String>>, NodesFileError> {
        let empty = Yaml::Mapping(LinkedHashMap::new());
        let nodes = top_level
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed(NODES_KEY))))
            .unwrap_or(&empty)
            .as_mapping()
            .ok_or(NodesFileError::NodesNotMap)?;

        nodes
            .iter()
            .filter_map(|(key, value)| match key {
                Yaml::Value(Scalar::String(name)) => Some((name.to_string(), value)),
                _ => {
                    debug!("Skipping node entry with non-string key: {:?}", key);
                    None
                }
            })
            .map(|(name, value)| Self::parse_entry(name, value))
            .collect()
    }

    fn parse_entry(name: String, value: &Yaml) -> Result<Entry<String>, NodesFileError> {
        if let Some(text) = scalar_text(value) {
            return Ok(Entry::with(name, text));
        }
        match value {
            Yaml::Value(Scalar::Null) => Ok(Entry::new(name)),
            Yaml::Sequence(items) => {
                let values = items.iter().map(scalar_text).collect::<Option<Vec<_>>>();
                match values {
                    Some(values) => Ok(Entry::with_all(name, values)),
                    None => InvalidValueSnafu { name }.fail(),
                }
            }
            _ => InvalidValueSnafu { name }.fail(),
        }
    }
}

fn scalar_text(value: &Yaml) -> Option<String> {
    match value {
        Yaml::Value(Scalar::String(text)) => Some(text.to_string()),
        Yaml::Value(Scalar::Integer(number)) => Some(number.to_string()),
        Yaml::Value(Scalar::FloatingPoint(number)) => Some(number.to_string()),
        Yaml::Value(Scalar::Boolean(flag)) => Some(flag.to_string()),
        _ => None,
    }
}

impl TryFrom<&str> for NodesFile {
    type Error = NodesFileError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().ok_or(NodesFileError::MalformedConfig)?;
        let top_level = document
            .as_mapping()
            .ok_or(NodesFileError::TopLevelNotMap)?;

        Ok(NodesFile {
            separator: Self::parse_separator(top_level)?,
            entries: Self::parse_entries(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum NodesFileError {
    #[snafu(display("Failed to read the nodes file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Nodes file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the nodes file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted nodes file"))]
    MalformedConfig,
    #[snafu(display("Top level of the nodes file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Nodes section should be a map"))]
    NodesNotMap,
    #[snafu(display("Separator should be a single character, got '{}'", value))]
    InvalidSeparator { value: String },
    #[snafu(display("Node '{}' has a value that is neither a scalar nor a list of scalars", name))]
    InvalidValue { name: String },
    #[snafu(display("Nodes could not be inserted into the tree"))]
    TreeError { source: TreeError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = r#"
separator: "."
nodes:
  root.branch1: ["5", "7"]
  root.branch2: []
  root.branch1.leaf1:
  root.branch1.leaf1.subleaf1: 333
  root.branch1.leaf2: Hello world!
  root.branch1.leaf2.subleaf2: []
"#;

    #[test]
    fn nodes_file_keeps_entry_order_and_values() {
        let file: NodesFile = EXAMPLE.try_into().unwrap();
        assert_eq!(file.separator(), '.');

        let names = file
            .entries()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "root.branch1",
                "root.branch2",
                "root.branch1.leaf1",
                "root.branch1.leaf1.subleaf1",
                "root.branch1.leaf2",
                "root.branch1.leaf2.subleaf2",
            ]
        );
        assert_eq!(file.entries()[0].data, vec!["5", "7"]);
        assert!(file.entries()[1].data.is_empty());
        assert!(file.entries()[2].data.is_empty());
        assert_eq!(file.entries()[3].data, vec!["333"]);
        assert_eq!(file.entries()[4].data, vec!["Hello world!"]);
    }

    #[test]
    fn nodes_file_builds_tree() {
        let file: NodesFile = EXAMPLE.try_into().unwrap();
        let tree = file.into_tree(None).unwrap();
        assert_eq!(tree.root_name(), Some("root"));
        assert_eq!(tree.data("root.branch1").unwrap(), vec!["5", "7"]);
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn nodes_file_defaults_separator() {
        let file: NodesFile = "nodes:\n  a.b: 1".try_into().unwrap();
        assert_eq!(file.separator(), '.');
    }

    #[test]
    fn nodes_file_separator_override() {
        let file: NodesFile = "separator: \"/\"\nnodes:\n  a.b: 1".try_into().unwrap();
        assert_eq!(file.separator(), '/');
        let tree = file.into_tree(Some('.')).unwrap();
        assert!(tree.contains("a.b"));
    }

    #[rstest]
    #[case("separator: \"\"\nnodes: {}")]
    #[case("separator: \"::\"\nnodes: {}")]
    fn nodes_file_rejects_bad_separator(#[case] contents: &str) {
        let result: Result<NodesFile, _> = contents.try_into();
        assert!(matches!(
            result,
            Err(NodesFileError::InvalidSeparator { .. })
        ));
    }

    #[rstest]
    #[case("", "MalformedConfig")]
    #[case("- item1\n- item2", "TopLevelNotMap")]
    #[case("just a string", "TopLevelNotMap")]
    #[case("nodes:\n  - a.b", "NodesNotMap")]
    #[case("nodes:\n  a.b:\n    nested: map", "InvalidValue")]
    #[case("nodes:\n  a.b: [[1, 2]]", "InvalidValue")]
    #[case("invalid: yaml: content: [unclosed", "ParseError")]
    fn nodes_file_reports_malformed_input(#[case] contents: &str, #[case] expected: &str) {
        let result: Result<NodesFile, _> = contents.try_into();
        let kind = match result {
            Err(NodesFileError::MalformedConfig) => "MalformedConfig",
            Err(NodesFileError::TopLevelNotMap) => "TopLevelNotMap",
            Err(NodesFileError::NodesNotMap) => "NodesNotMap",
            Err(NodesFileError::InvalidValue { .. }) => "InvalidValue",
            Err(NodesFileError::ParseError { .. }) => "ParseError",
            _ => "other",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn nodes_file_handles_missing_nodes_section() {
        let file: NodesFile = "other: value".try_into().unwrap();
        assert!(file.entries().is_empty());
        assert!(file.into_tree(None).unwrap().is_empty());
    }

    #[test]
    fn nodes_file_skips_non_string_keys() {
        let file: NodesFile = "nodes:\n  123: numeric\n  a.b: 1".try_into().unwrap();
        assert_eq!(file.entries().len(), 1);
        assert_eq!(file.entries()[0].name, "a.b");
    }

    #[test]
    fn nodes_file_surfaces_tree_errors() {
        let file: NodesFile = "nodes:\n  a.b: 1\n  z.y: 2".try_into().unwrap();
        assert!(matches!(
            file.into_tree(None),
            Err(NodesFileError::TreeError {
                source: TreeError::IllegalNodeName { .. }
            })
        ));
    }

    #[compio::test]
    async fn nodes_file_returns_error_on_nonexistent_file() {
        let result = NodesFile::from_path(Path::new("nonexistent.yaml")).await;
        assert!(matches!(result, Err(NodesFileError::ReadError { .. })));
    }

    #[compio::test]
    async fn nodes_file_reads_from_disk() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "{}", EXAMPLE).expect("Failed to write to temp file");

        let file = NodesFile::from_path(temp_file.path())
            .await
            .expect("Failed to read nodes file");
        assert_eq!(file.entries().len(), 6);
    }
}
