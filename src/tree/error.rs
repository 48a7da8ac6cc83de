use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("Node name '{}' is not valid", name))]
    InvalidName { name: String },
    #[snafu(display("Node '{}' not found", name))]
    NodeNotFound { name: String },
    #[snafu(display("Node '{}' does not descend from root '{}'", name, root))]
    IllegalNodeName { name: String, root: String },
    #[snafu(display("Destination '{}' does not descend from root '{}'", name, root))]
    IllegalRoot { name: String, root: String },
    #[snafu(display("Node '{}' cannot be renamed to '{}'", name, new_name))]
    IllegalNewName { name: String, new_name: String },
    #[snafu(display("Root '{}' cannot be renamed to the longer name '{}'", name, new_name))]
    IllegalRootRename { name: String, new_name: String },
    #[snafu(display("Prefix '{}' is not a strict leading part of root '{}'", prefix, root))]
    InvalidPrefix { prefix: String, root: String },
    #[snafu(display("Separator {:?} cannot be whitespace", separator))]
    InvalidSeparator { separator: char },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let not_found = TreeError::NodeNotFound {
            name: "root.x".to_string(),
        };
        assert_eq!(format!("{not_found}"), "Node 'root.x' not found");

        let prefix = TreeError::InvalidPrefix {
            prefix: "a.b".to_string(),
            root: "a.b".to_string(),
        };
        let message = format!("{prefix}");
        assert!(message.contains("'a.b'"));
        assert!(message.contains("strict leading part"));
    }
}
