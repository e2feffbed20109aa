//! The search state and typed paths into it.
//!
//! The search state is a plain JSON object holding every active refinement,
//! suitable for URL encoding. It comes in two shapes:
//!
//! - **flat**: `{"page": 2, "menu": {"brand": "Apple"}}`
//! - **namespaced**: `{"indices": {"products": {"page": 2}}, ...shared}`
//!
//! Widgets never walk the state with dotted strings. They resolve a
//! [`KeyPath`] from their id, optional namespace and [`Context`], and the
//! state answers lookups, writes and removals along that path. Writes and
//! removals return a new state; the receiver is never modified.

use crate::context::Context;
use crate::error::{FacetSyncError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which multi-index scopes keep their per-index state.
pub const INDICES_KEY: &str = "indices";

/// Location of one widget's refinement inside a [`SearchState`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    /// Index scope (Some only under a multi-index context)
    index: Option<String>,

    /// Namespace grouping keys of one widget kind (e.g. "menu")
    namespace: Option<&'static str>,

    /// The widget id
    id: String,
}

impl KeyPath {
    /// Resolve the path for a widget under the given context.
    pub fn resolve(ctx: &Context, namespace: Option<&'static str>, id: impl Into<String>) -> Self {
        KeyPath {
            index: ctx
                .is_multi_index()
                .then(|| ctx.resolve_index().to_string()),
            namespace,
            id: id.into(),
        }
    }

    /// Object keys leading to the map that holds the widget id.
    fn containers(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(3);
        if let Some(index) = &self.index {
            keys.push(INDICES_KEY);
            keys.push(index.as_str());
        }
        if let Some(namespace) = self.namespace {
            keys.push(namespace);
        }
        keys
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for key in self.containers() {
            write!(f, "{}.", key)?;
        }
        write!(f, "{}", self.id)
    }
}

/// Serializable snapshot of every active refinement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchState(Map<String, Value>);

impl SearchState {
    /// Create an empty search state
    pub fn new() -> Self {
        SearchState(Map::new())
    }

    /// Build a state from a JSON value, which must be an object.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(SearchState(map)),
            other => Err(FacetSyncError::InvalidState {
                found: json_type_name(&other).to_string(),
            }),
        }
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value
    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }

    /// True if no key is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a top-level key
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up the value stored at a path.
    ///
    /// A key holding `null` is still present and is returned as such.
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        container(&self.0, &path.containers())?.get(&path.id)
    }

    /// True if the path holds a value
    pub fn contains(&self, path: &KeyPath) -> bool {
        self.get(path).is_some()
    }

    /// Return a new state with `value` stored at `path`.
    ///
    /// Containers along the path are created when absent (or replaced when
    /// they are not objects); every sibling key and index is preserved.
    pub fn with_value(&self, path: &KeyPath, value: Value) -> SearchState {
        let mut next = self.0.clone();
        insert_at(&mut next, &path.containers(), &path.id, value);
        SearchState(next)
    }

    /// Return a new state with the path's key removed.
    ///
    /// If the key lived in a namespace that is now empty, the namespace key
    /// is removed too.
    pub fn without(&self, path: &KeyPath) -> SearchState {
        let mut next = self.0.clone();
        let containers = path.containers();

        if let Some(map) = container_mut(&mut next, &containers) {
            map.remove(&path.id);
        }

        if path.namespace.is_some() {
            if let Some((namespace, parents)) = containers.split_last() {
                if let Some(parent) = container_mut(&mut next, parents) {
                    let emptied = parent
                        .get(*namespace)
                        .and_then(Value::as_object)
                        .map_or(false, Map::is_empty);
                    if emptied {
                        parent.remove(*namespace);
                    }
                }
            }
        }

        SearchState(next)
    }
}

impl From<Map<String, Value>> for SearchState {
    fn from(map: Map<String, Value>) -> Self {
        SearchState(map)
    }
}

impl TryFrom<Value> for SearchState {
    type Error = FacetSyncError;

    fn try_from(value: Value) -> Result<Self> {
        SearchState::from_json(value)
    }
}

impl From<SearchState> for Value {
    fn from(state: SearchState) -> Self {
        state.into_json()
    }
}

/// Parse a stored numeric refinement.
///
/// Numbers are taken as integers (fractions truncate). Strings, which is how
/// numbers arrive after URL deserialization, parse their leading integer the
/// way a lenient URL decoder would: `"5"`, `" 12"` and `"3rd"` all parse,
/// `"yep"` does not.
pub fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_integer(s),
        _ => None,
    }
}

fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn container<'a>(mut map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    for key in keys {
        map = map.get(*key)?.as_object()?;
    }
    Some(map)
}

fn container_mut<'a>(
    mut map: &'a mut Map<String, Value>,
    keys: &[&str],
) -> Option<&'a mut Map<String, Value>> {
    for key in keys {
        map = map.get_mut(*key)?.as_object_mut()?;
    }
    Some(map)
}

fn insert_at(map: &mut Map<String, Value>, keys: &[&str], id: &str, value: Value) {
    match keys.split_first() {
        None => {
            map.insert(id.to_string(), value);
        }
        Some((head, rest)) => {
            let mut child = match map.remove(*head) {
                Some(Value::Object(child)) => child,
                _ => Map::new(),
            };
            insert_at(&mut child, rest, id, value);
            map.insert((*head).to_string(), Value::Object(child));
        }
    }
}
