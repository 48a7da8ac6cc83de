//! Splitting, joining and validating separator-delimited node names.

/// Path algebra for a single, fixed separator character.
///
/// A valid name is a non-empty sequence of non-empty segments, none of which
/// contain whitespace. All boundary checks are done at segment granularity, so
/// `a.bc` is never considered to be inside `a.b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePath {
    separator: char,
}

impl NamePath {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn split<'a>(&self, path: &'a str) -> Vec<&'a str> {
        path.split(self.separator).collect()
    }

    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let mut joined = String::new();
        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                joined.push(self.separator);
            }
            joined.push_str(segment.as_ref());
        }
        joined
    }

    pub fn validate(&self, path: &str) -> bool {
        !path.is_empty()
            && path
                .split(self.separator)
                .all(|segment| !segment.is_empty() && !segment.chars().any(char::is_whitespace))
    }

    /// Longest run of equal leading segments, joined back together.
    /// Empty when the first segments already differ.
    pub fn common_prefix(&self, a: &str, b: &str) -> String {
        let shared = a
            .split(self.separator)
            .zip(b.split(self.separator))
            .take_while(|(left, right)| left == right)
            .map(|(left, _)| left)
            .collect::<Vec<_>>();
        self.join(&shared)
    }

    pub fn segment_count(&self, path: &str) -> usize {
        path.split(self.separator).count()
    }

    pub fn first_segment<'a>(&self, path: &'a str) -> &'a str {
        path.split(self.separator).next().unwrap_or(path)
    }

    pub fn last_segment<'a>(&self, path: &'a str) -> &'a str {
        path.rsplit(self.separator).next().unwrap_or(path)
    }

    /// Name with its last segment removed, `None` for single-segment names.
    pub fn parent_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.rsplit_once(self.separator).map(|(parent, _)| parent)
    }

    pub fn is_within(&self, path: &str, ancestor: &str) -> bool {
        path == ancestor || self.is_strictly_within(path, ancestor)
    }

    pub fn is_strictly_within(&self, path: &str, ancestor: &str) -> bool {
        path.len() > ancestor.len()
            && path.starts_with(ancestor)
            && path[ancestor.len()..].starts_with(self.separator)
    }

    /// Part of `path` below `ancestor`, without the joining separator.
    pub fn relative_to<'a>(&self, path: &'a str, ancestor: &str) -> Option<&'a str> {
        if self.is_strictly_within(path, ancestor) {
            Some(&path[ancestor.len() + self.separator.len_utf8()..])
        } else {
            None
        }
    }

    /// Substitutes the leading `old` prefix of `path` with `new`.
    pub fn reprefix(&self, path: &str, old: &str, new: &str) -> Option<String> {
        if path == old {
            Some(new.to_string())
        } else if self.is_strictly_within(path, old) {
            Some(format!("{new}{}", &path[old.len()..]))
        } else {
            None
        }
    }

    /// Whether `needle` occurs in `path` as a whole run of segments.
    pub fn contains_segments(&self, path: &str, needle: &str) -> bool {
        let sep = self.separator;
        path == needle
            || path.starts_with(&format!("{needle}{sep}"))
            || path.ends_with(&format!("{sep}{needle}"))
            || path.contains(&format!("{sep}{needle}{sep}"))
    }
}

impl Default for NamePath {
    fn default() -> Self {
        Self::new('.')
    }
}
