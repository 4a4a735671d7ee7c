//! # Publish Context
//!
//! A [`Context`] is the mapping of arbitrary fields a publisher attaches to a
//! notification. Before a handler sees it, the dispatcher augments it:
//!
//! - `path_parts`: the segments of the published path *below* the depth the
//!   handler was registered at,
//! - `full_path`: the published path, verbatim,
//! - any fields named through [`PATH_KEYS`].
//!
//! Handlers receive a borrowed [`Delivery`] rather than a copy of the map,
//! so a publish touching many handlers never clones the caller's fields.
//! Call [`Delivery::to_context`] when an owned snapshot is needed.

use crate::error::ContextError;
use serde_json::{Map, Value};

/// Key holding the unconsumed path suffix.
pub const PATH_PARTS: &str = "path_parts";
/// Key holding the verbatim published path.
pub const FULL_PATH: &str = "full_path";
/// Key naming segment positions to unpack into named fields.
pub const PATH_KEYS: &str = "path_keys";

/// Fields attached to a published notification.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use topiary_core::Context;
///
/// let ctx = Context::new()
///     .with("order_id", 42)
///     .with_path_keys([None, Some("event")]);
/// assert_eq!(ctx.get("order_id"), Some(&json!(42)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: Map<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON value.
    ///
    /// The value must be an object. A `path_keys` entry, if present, must be
    /// a string or an array whose elements are strings or nulls.
    pub fn try_from_value(value: Value) -> Result<Self, ContextError> {
        let fields = match value {
            Value::Object(fields) => fields,
            Value::Null => return Ok(Self::new()),
            other => return Err(ContextError::NotAnObject(kind_of(&other))),
        };

        match fields.get(PATH_KEYS) {
            None | Some(Value::String(_)) => {}
            Some(Value::Array(keys)) if keys.iter().all(|k| k.is_string() || k.is_null()) => {}
            Some(_) => return Err(ContextError::InvalidPathKeys),
        }

        Ok(Self { fields })
    }

    /// Add a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Name segment positions: the segment at index `i` of the published
    /// path is copied into a field called `keys[i]`. `None` skips a position.
    pub fn with_path_keys<'k>(mut self, keys: impl IntoIterator<Item = Option<&'k str>>) -> Self {
        let keys: Vec<Value> = keys
            .into_iter()
            .map(|k| k.map_or(Value::Null, |k| Value::String(k.to_owned())))
            .collect();
        self.fields.insert(PATH_KEYS.to_owned(), Value::Array(keys));
        self
    }

    /// Insert a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// The `path_parts` field of an owned snapshot, if present.
    pub fn path_parts(&self) -> Option<Vec<&str>> {
        self.get(PATH_PARTS)?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    /// The `full_path` field of an owned snapshot, if present.
    pub fn full_path(&self) -> Option<&str> {
        self.get_str(FULL_PATH)
    }

    /// Convert into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Drop `path_parts` and `full_path`, which are set per delivery.
    ///
    /// Returns whether anything was removed.
    pub fn remove_reserved(&mut self) -> bool {
        let parts = self.fields.remove(PATH_PARTS).is_some();
        let full = self.fields.remove(FULL_PATH).is_some();
        parts || full
    }

    /// Remove the `path_keys` entry and unpack it against `segments`.
    ///
    /// Each non-empty string at index `i` becomes a field holding
    /// `segments[i]`, or `null` when the path is shorter than the key list.
    /// A bare string is treated as a one-element list. Other entries are
    /// skipped. Returns the number of fields written.
    pub fn unpack_path_keys(&mut self, segments: &[String]) -> usize {
        let keys = match self.fields.remove(PATH_KEYS) {
            Some(Value::Array(keys)) => keys,
            Some(key @ Value::String(_)) => vec![key],
            _ => return 0,
        };

        let mut written = 0;
        for (idx, key) in keys.into_iter().enumerate() {
            let Value::String(name) = key else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let value = segments
                .get(idx)
                .map_or(Value::Null, |segment| Value::String(segment.clone()));
            self.fields.insert(name, value);
            written += 1;
        }
        written
    }
}

impl From<Map<String, Value>> for Context {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl TryFrom<Value> for Context {
    type Error = ContextError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from_value(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_reserved(key: &str) -> bool {
    key == PATH_PARTS || key == FULL_PATH
}

/// The view of a published context handed to one handler.
///
/// `path_parts` depends on the depth the handler was registered at; the
/// publisher's fields and `full_path` are shared by every handler of the
/// same publish.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    fields: &'a Context,
    path_parts: &'a [String],
    full_path: &'a str,
}

impl<'a> Delivery<'a> {
    /// Create a delivery view.
    pub fn new(fields: &'a Context, path_parts: &'a [String], full_path: &'a str) -> Self {
        Self {
            fields,
            path_parts,
            full_path,
        }
    }

    /// Segments of the published path not consumed to reach the handler.
    pub fn path_parts(&self) -> &'a [String] {
        self.path_parts
    }

    /// The published path, verbatim.
    pub fn full_path(&self) -> &'a str {
        self.full_path
    }

    /// The publisher's fields, including unpacked path keys.
    pub fn fields(&self) -> &'a Context {
        self.fields
    }

    /// Look up a publisher field.
    ///
    /// `path_parts` and `full_path` are never answered from the publisher's
    /// fields; read them through [`Self::path_parts`] and [`Self::full_path`].
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        if is_reserved(key) {
            return None;
        }
        self.fields.get(key)
    }

    /// Look up a string publisher field. `full_path` yields the published path.
    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        match key {
            FULL_PATH => Some(self.full_path),
            PATH_PARTS => None,
            _ => self.fields.get_str(key),
        }
    }

    /// An owned copy of the fields with `path_parts` and `full_path` set.
    pub fn to_context(&self) -> Context {
        let mut ctx = self.fields.clone();
        ctx.insert(
            PATH_PARTS,
            Value::Array(self.path_parts.iter().cloned().map(Value::String).collect()),
        );
        ctx.insert(FULL_PATH, self.full_path);
        ctx
    }
}
