//! Property types for graph entities
//!
//! Provides property values, a key-unique property collection, and the
//! [`PropertyContainer`] contract that backings implement for nodes and
//! relationships.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property value that can be stored on nodes and relationships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Stored null. A present value, unlike an absent key.
    Null,

    /// Boolean value
    Boolean(bool),

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Array of property values
    Array(Vec<PropertyValue>),

    /// Map of string keys to property values
    Map(BTreeMap<String, PropertyValue>),

    /// Binary data
    Bytes(Vec<u8>),
}

impl PropertyValue {
    /// Returns true if the value is a stored null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Try to get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as array reference
    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get as map reference
    pub fn as_map(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get as bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::Array(_) => "array",
            PropertyValue::Map(_) => "map",
            PropertyValue::Bytes(_) => "bytes",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Boolean(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(v: Vec<u8>) -> Self {
        PropertyValue::Bytes(v)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;

        match v {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PropertyValue::String(s),
            Value::Array(items) => {
                PropertyValue::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => {
                PropertyValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// A collection of properties with unique keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    inner: BTreeMap<String, PropertyValue>,
}

impl Property {
    /// Create an empty property collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single property
    pub fn with<K: Into<String>, V: Into<PropertyValue>>(key: K, value: V) -> Self {
        let mut props = Self::new();
        props.set(key, value);
        props
    }

    /// Set a property value, returning the previous one
    pub fn set<K: Into<String>, V: Into<PropertyValue>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<PropertyValue> {
        self.inner.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.inner.get(key)
    }

    /// Remove a property
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.inner.remove(key)
    }

    /// Check if a property exists
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.inner.iter()
    }

    /// Property keys in key order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.inner.keys()
    }

    /// Property values in key order
    pub fn values(&self) -> impl Iterator<Item = &PropertyValue> {
        self.inner.values()
    }

    /// Merge with another property collection (other takes precedence)
    pub fn merge(&mut self, other: Property) {
        self.inner.extend(other.inner);
    }
}

impl IntoIterator for Property {
    type Item = (String, PropertyValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Property {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Property access on a graph entity.
///
/// Backings implement the primitive methods and signal an absent key with
/// [`Error::PropertyNotFound`](crate::Error::PropertyNotFound). Setters take
/// `&self` because entity handles are shared views onto their graph.
pub trait PropertyContainer {
    /// Stored value for `key`, or `PropertyNotFound`
    fn property(&self, key: &str) -> Result<PropertyValue>;

    /// Store a value, replacing any previous one
    fn set_property(&self, key: &str, value: PropertyValue) -> Result<()>;

    /// Remove `key`, returning its previous value, or `PropertyNotFound`
    fn remove_property(&self, key: &str) -> Result<PropertyValue>;

    /// All property keys
    fn property_keys(&self) -> Result<Vec<String>>;

    /// All property values
    fn property_values(&self) -> Result<Vec<PropertyValue>>;

    /// Stored value for `key`, or `fallback` when the key is absent.
    ///
    /// Only `PropertyNotFound` is recovered; every other error is returned
    /// unchanged.
    fn property_or(&self, key: &str, fallback: PropertyValue) -> Result<PropertyValue> {
        match self.property(key) {
            Err(e) if e.is_property_not_found() => Ok(fallback),
            other => other,
        }
    }

    /// Whether [`property`](Self::property) would succeed for `key`.
    ///
    /// Read-only: performs a single `property` read and nothing else.
    fn has_property(&self, key: &str) -> Result<bool> {
        match self.property(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_property_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
