use serde::{Deserialize, Deserializer};
use std::fmt;

/// A single property value of a feature.
///
/// GeoJSON properties are dynamically typed; this mirrors the scalar JSON
/// types. A property that is "undefined" is simply absent from
/// [`Properties`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Real(v) if v.is_nan())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) if v.is_infinite() => {
                f.write_str(if v.is_sign_positive() { "INF" } else { "-INF" })
            }
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// Nested arrays and objects are kept as their JSON text.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// Ordered feature properties.
///
/// Field order in the generated XML follows insertion order, so this is a
/// sequence of `(name, value)` pairs rather than a hash map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(Vec<(String, Value)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. An existing property keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (k, v) in iter {
            properties.insert(k, v);
        }
        properties
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // serde_json is built with `preserve_order`, so this keeps document order.
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}

/// Build [`Properties`] from a fixed list of `name => value` pairs.
///
/// ```
/// use geojson_wfst::{Value, properties};
///
/// let props = properties! {
///     "TYPE" => "RnbwRd",
///     "lanes" => 2,
///     "note" => Option::<&str>::None,
/// };
/// assert_eq!(props.get("note"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! properties {
    () => {
        $crate::Properties::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut properties = $crate::Properties::new();
        $(properties.insert($name, $value);)+
        properties
    }};
}

/// `releaseAction` of a transaction (OGC 09-025r2 §15.2.3.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReleaseAction {
    All,
    Some,
}

impl ReleaseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseAction::All => "ALL",
            ReleaseAction::Some => "SOME",
        }
    }
}

/// `action` of a `wfs:ValueReference` in an update (OGC 09-025r2 §15.2.5.2.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateAction {
    Replace,
    InsertBefore,
    InsertAfter,
    Remove,
}

impl UpdateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateAction::Replace => "replace",
            UpdateAction::InsertBefore => "insertBefore",
            UpdateAction::InsertAfter => "insertAfter",
            UpdateAction::Remove => "remove",
        }
    }
}
