//! Topic paths.
//!
//! A topic path is a string of segments joined by [`DELIMITER`], for example
//! `"order:created"`. Paths form a hierarchy: `"order"` is an ancestor of
//! `"order:created"`, which is an ancestor of `"order:created:eu"`.

use std::{convert::Infallible, fmt, str::FromStr};

/// The fixed segment delimiter.
///
/// Segment contents must not contain it.
pub const DELIMITER: char = ':';

/// Split a raw path into its segments.
///
/// One leading empty segment (a path starting with the delimiter) and all
/// trailing empty segments are discarded. Interior empty segments are kept,
/// so segment positions always line up with the raw path. The empty string
/// has no segments and denotes the root.
///
/// ```rust
/// use topiary_core::split_segments;
///
/// assert_eq!(split_segments("a:b"), vec!["a", "b"]);
/// assert_eq!(split_segments(":a:b:"), vec!["a", "b"]);
/// assert_eq!(split_segments("a::b"), vec!["a", "", "b"]);
/// assert!(split_segments("").is_empty());
/// ```
pub fn split_segments(path: &str) -> Vec<String> {
    let path = path.strip_prefix(DELIMITER).unwrap_or(path);
    let mut segments: Vec<String> = path.split(DELIMITER).map(str::to_owned).collect();
    while segments.last().is_some_and(String::is_empty) {
        segments.pop();
    }
    segments
}

/// A parsed topic path.
///
/// Keeps the verbatim string next to its segments, which are derived once at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TopicPath {
    raw: String,
    segments: Vec<String>,
}

impl TopicPath {
    /// Parse a path.
    pub fn parse(path: impl Into<String>) -> Self {
        let raw = path.into();
        let segments = split_segments(&raw);
        Self { raw, segments }
    }

    /// The root path (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// The path exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `self` is an ancestor of, or equal to, `other` (segment-wise).
    pub fn is_prefix_of(&self, other: &TopicPath) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TopicPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for TopicPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for TopicPath {
    fn from(value: String) -> Self {
        Self::parse(value)
    }
}

impl AsRef<str> for TopicPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
