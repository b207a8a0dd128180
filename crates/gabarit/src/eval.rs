//! Path evaluator
//!
//! Resolves dotted paths (`user.tags.0`) against a [`Context`]: a root value
//! shared by every scope, with local bindings layered on top by loops and
//! `with` blocks.

use crate::error::{Error, Result};
use facet_value::DestructuredRef;
use std::collections::HashMap;
use std::sync::Arc;

/// Re-export facet_value::Value as the template Value type
pub use facet_value::Value;

/// Helper trait to extend Value with template-specific coercions
pub trait ValueExt {
    /// Check if the value is truthy (for conditionals)
    fn is_truthy(&self) -> bool;

    /// Get a human-readable type name
    fn type_name(&self) -> &'static str;

    /// Numeric form of a scalar, `None` for sequences and mappings
    fn coerce_number(&self) -> Option<f64>;

    /// String form of a scalar, `None` for sequences and mappings
    fn coerce_string(&self) -> Option<String>;
}

impl ValueExt for Value {
    fn is_truthy(&self) -> bool {
        match self.destructure_ref() {
            DestructuredRef::Null => false,
            DestructuredRef::Bool(b) => b,
            DestructuredRef::Number(n) => {
                let f = n.to_f64_lossy();
                f != 0.0 && !f.is_nan()
            }
            DestructuredRef::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    fn type_name(&self) -> &'static str {
        match self.destructure_ref() {
            DestructuredRef::Null => "null",
            DestructuredRef::Bool(_) => "bool",
            DestructuredRef::Number(_) => "number",
            DestructuredRef::String(_) => "string",
            DestructuredRef::Bytes(_) => "bytes",
            DestructuredRef::Array(_) => "sequence",
            DestructuredRef::Object(_) => "mapping",
            DestructuredRef::DateTime(_) => "datetime",
            DestructuredRef::QName(_) => "qname",
            DestructuredRef::Uuid(_) => "uuid",
        }
    }

    fn coerce_number(&self) -> Option<f64> {
        match self.destructure_ref() {
            DestructuredRef::Null => Some(0.0),
            DestructuredRef::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            DestructuredRef::Number(n) => Some(n.to_f64_lossy()),
            DestructuredRef::String(s) => Some(parse_number(s.as_str())),
            DestructuredRef::Array(_) | DestructuredRef::Object(_) => None,
            _ => Some(f64::NAN),
        }
    }

    fn coerce_string(&self) -> Option<String> {
        match self.destructure_ref() {
            DestructuredRef::Null => Some("null".to_string()),
            DestructuredRef::Bool(b) => Some(b.to_string()),
            DestructuredRef::Number(n) => Some(match n.to_i64() {
                Some(i) => i.to_string(),
                None => match n.to_u64() {
                    Some(u) => u.to_string(),
                    None => format_number(n.to_f64_lossy()),
                },
            }),
            DestructuredRef::String(s) => Some(s.as_str().to_string()),
            DestructuredRef::Array(_) | DestructuredRef::Object(_) => None,
            DestructuredRef::Bytes(b) => Some(format!("<bytes: {} bytes>", b.len())),
            DestructuredRef::DateTime(dt) => Some(format!("{dt:?}")),
            DestructuredRef::QName(qn) => Some(format!("{qn:?}")),
            DestructuredRef::Uuid(uuid) => Some(format!("{uuid:?}")),
        }
    }
}

/// Parse a number the lenient way: surrounding whitespace is ignored, the
/// empty string is zero, anything else unparsable is NaN.
pub(crate) fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}

pub(crate) fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f == 0.0 {
        // Covers -0.0 as well
        "0".to_string()
    } else {
        // Display gives the shortest representation that round-trips
        f.to_string()
    }
}

/// Evaluation context (variables in scope)
///
/// Cloning is cheap: the root and the locals are both shared. A context is
/// never mutated once built; [`Context::derive`] produces a child scope.
#[derive(Clone, Debug)]
pub struct Context {
    root: Arc<Value>,
    locals: Arc<HashMap<String, Value>>,
}

impl Context {
    pub fn new(root: impl Into<Value>) -> Self {
        Self {
            root: Arc::new(root.into()),
            locals: Arc::new(HashMap::new()),
        }
    }

    pub fn with_locals(root: impl Into<Value>, locals: HashMap<String, Value>) -> Self {
        Self {
            root: Arc::new(root.into()),
            locals: Arc::new(locals),
        }
    }

    /// The root data this context was created from
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Names of the local bindings, sorted
    pub fn local_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.locals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// A child scope: this context's locals plus `bindings`, which win on
    /// collision. The root is shared, not copied.
    pub fn derive<I, K>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut locals = (*self.locals).clone();
        locals.extend(bindings.into_iter().map(|(k, v)| (k.into(), v)));
        Self {
            root: Arc::clone(&self.root),
            locals: Arc::new(locals),
        }
    }

    /// Resolve `path` to a borrowed value.
    ///
    /// Segments are separated by `.` and trimmed. The first one names a local
    /// binding, or failing that a key of the root mapping. Each following
    /// segment is a key into a mapping or an index into a sequence.
    pub fn lookup(&self, path: &str) -> Result<&Value> {
        let mut segments = path.split('.').map(str::trim);
        let first = segments.next().unwrap_or_default();

        let mut current = match self.locals.get(first) {
            Some(value) => value,
            None => self
                .root
                .as_object()
                .and_then(|obj| obj.get(first))
                .ok_or_else(|| self.undefined(path))?,
        };

        for segment in segments {
            current = child(current, segment).ok_or_else(|| self.undefined(path))?;
        }
        Ok(current)
    }

    /// Resolve `path` to an owned value
    pub fn resolve(&self, path: &str) -> Result<Value> {
        self.lookup(path).cloned()
    }

    pub fn as_bool(&self, path: &str) -> Result<bool> {
        Ok(self.lookup(path)?.is_truthy())
    }

    pub fn as_number(&self, path: &str) -> Result<f64> {
        let value = self.lookup(path)?;
        value
            .coerce_number()
            .ok_or_else(|| mismatch(path, "scalar", value))
    }

    pub fn as_string(&self, path: &str) -> Result<String> {
        let value = self.lookup(path)?;
        value
            .coerce_string()
            .ok_or_else(|| mismatch(path, "scalar", value))
    }

    /// Elements of a sequence, or the values of a mapping in insertion order.
    pub fn iterate(&self, path: &str) -> Result<Values> {
        let value = self.lookup(path)?;
        let items: Vec<Value> = if let Some(arr) = value.as_array() {
            arr.iter().cloned().collect()
        } else if let Some(obj) = value.as_object() {
            obj.values().cloned().collect()
        } else {
            return Err(mismatch(path, "sequence or mapping", value));
        };
        Ok(Values {
            inner: items.into_iter(),
        })
    }

    /// `(key, value)` pairs of a mapping in insertion order.
    pub fn iterate_with_key(&self, path: &str) -> Result<Entries> {
        let value = self.lookup(path)?;
        let obj = value
            .as_object()
            .ok_or_else(|| mismatch(path, "mapping", value))?;
        let entries: Vec<(String, Value)> = obj
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect();
        Ok(Entries {
            inner: entries.into_iter(),
        })
    }

    fn undefined(&self, path: &str) -> Error {
        let mut available: Vec<String> = self.local_names().into_iter().map(String::from).collect();
        if let Some(obj) = self.root.as_object() {
            for key in obj.keys() {
                if !self.locals.contains_key(key.as_str()) {
                    available.push(key.as_str().to_string());
                }
            }
        }
        Error::UndefinedPath {
            path: path.to_string(),
            available,
        }
    }
}

fn child<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    if let Some(obj) = value.as_object() {
        return obj.get(segment);
    }
    if let Some(arr) = value.as_array() {
        return segment.parse::<usize>().ok().and_then(|i| arr.get(i));
    }
    None
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        path: path.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// Values produced by [`Context::iterate`]
#[derive(Debug)]
pub struct Values {
    inner: std::vec::IntoIter<Value>,
}

impl Iterator for Values {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values {}

/// Entries produced by [`Context::iterate_with_key`]
#[derive(Debug)]
pub struct Entries {
    inner: std::vec::IntoIter<(String, Value)>,
}

impl Iterator for Entries {
    type Item = (String, Value);

    fn next(&mut self) -> Option<(String, Value)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries {}
