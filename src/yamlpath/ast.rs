//! Key-path types.

use std::fmt;

/// A segment in a key-path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A literal mapping key, compared case-sensitively.
    Key(String),
    /// `*`: any key at this depth.
    Wildcard,
}

impl PathSegment {
    /// Returns true if `key` is accepted by this segment.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            PathSegment::Key(name) => name == key,
            PathSegment::Wildcard => true,
        }
    }

    /// Segment-wise comparison between a pattern segment (`self`) and a
    /// segment of a concrete path.
    pub fn accepts(&self, other: &PathSegment) -> bool {
        match (self, other) {
            (PathSegment::Wildcard, _) => true,
            (PathSegment::Key(a), PathSegment::Key(b)) => a == b,
            (PathSegment::Key(_), PathSegment::Wildcard) => false,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Wildcard => write!(f, "*"),
            PathSegment::Key(name) if needs_brackets(name) => {
                write!(f, "['{}']", name.replace('\'', "\\'"))
            }
            PathSegment::Key(name) => write!(f, "{}", name),
        }
    }
}

fn needs_brackets(name: &str) -> bool {
    name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '.' | '[' | ']' | '*' | '\'' | '"'))
}

/// The chain of mapping keys from the document root down to a node.
///
/// Used both for concrete locations (all segments are keys) and for patterns
/// (which may contain wildcards).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    /// Segments that make up the path, root first.
    pub segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Creates a new key-path with the given segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Builds a concrete path from literal keys.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: keys
                .into_iter()
                .map(|k| PathSegment::Key(k.into()))
                .collect(),
        }
    }

    /// Appends a key segment.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<&PathSegment> {
        self.segments.get(depth)
    }

    /// Returns true if `path` has the same length as this pattern and every
    /// segment is accepted.
    pub fn matches(&self, path: &KeyPath) -> bool {
        self.len() == path.len()
            && self
                .segments
                .iter()
                .zip(&path.segments)
                .all(|(pattern, segment)| pattern.accepts(segment))
    }

    /// Returns true if this pattern matches the given list of keys.
    pub fn matches_keys<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        self.len() == keys.len()
            && self
                .segments
                .iter()
                .zip(keys)
                .all(|(pattern, key)| pattern.matches(key.as_ref()))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 && !matches!(segment, PathSegment::Key(k) if needs_brackets(k)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
