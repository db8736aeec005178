//! Core value types for front matter handling
//!
//! Decoded YAML is narrowed into [`FrontMatterValue`] so that the rest of the
//! crate only deals with the shapes that are meaningful for flat metadata:
//! scalars, string lists, tag lists and timestamps. Anything deeper is kept
//! as [`FrontMatterValue::Other`] and only ever stringified.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::fmt;

/// Format used whenever a timestamp is written out as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatterValue {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    /// A sequence of scalars, each stringified
    List(Vec<String>),
    /// The normalized `tags` field
    Tags(TagList),
    Timestamp(NaiveDateTime),
    /// Nested mappings and mixed sequences
    Other(serde_yaml::Value),
}

impl FrontMatterValue {
    /// Narrow a decoded YAML value
    pub fn from_yaml(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => Self::Number(n),
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(seq) => {
                let items: Option<Vec<String>> = seq.iter().map(scalar_to_string).collect();
                match items {
                    Some(items) => Self::List(items),
                    None => Self::Other(serde_yaml::Value::Sequence(seq)),
                }
            }
            other => Self::Other(other),
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the timestamp payload, if this is a timestamp
    pub fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Borrow the tag list, if this is one
    pub fn as_tags(&self) -> Option<&TagList> {
        match self {
            Self::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    /// Text form of a scalar value; `None` for null and composite values
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
            _ => None,
        }
    }

    /// Membership test used by `Has` queries
    ///
    /// Strings match on substring, lists and tags on whole elements.
    pub fn contains(&self, needle: &FrontMatterValue) -> bool {
        let Some(needle) = needle.scalar_text() else {
            return false;
        };
        match self {
            Self::String(s) => s.contains(needle.as_str()),
            Self::List(items) => items.iter().any(|item| *item == needle),
            Self::Tags(tags) => tags.contains(&needle),
            _ => false,
        }
    }

    /// Convert to string with fallback representations
    pub fn to_string_representation(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::List(items) => items.join(","),
            Self::Tags(tags) => tags.to_string(),
            Self::Other(value) => serde_yaml::to_string(value)
                .unwrap_or_else(|_| "<invalid>".to_string())
                .trim()
                .to_string(),
            scalar => scalar.scalar_text().unwrap_or_default(),
        }
    }

    /// Record form: JSON null for null, a string for everything else
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            other => serde_json::Value::String(other.to_string_representation()),
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse the timestamp shapes accepted for `published`
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in [TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

impl fmt::Display for FrontMatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_representation())
    }
}

impl From<serde_yaml::Value> for FrontMatterValue {
    fn from(value: serde_yaml::Value) -> Self {
        Self::from_yaml(value)
    }
}

impl From<&str> for FrontMatterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FrontMatterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FrontMatterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FrontMatterValue {
    fn from(i: i64) -> Self {
        Self::Number(i.into())
    }
}

impl From<f64> for FrontMatterValue {
    fn from(f: f64) -> Self {
        Self::Number(serde_yaml::Number::from(f))
    }
}

impl From<Vec<String>> for FrontMatterValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<TagList> for FrontMatterValue {
    fn from(tags: TagList) -> Self {
        Self::Tags(tags)
    }
}

impl From<NaiveDateTime> for FrontMatterValue {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<FrontMatterValue>> From<Option<T>> for FrontMatterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Ordered tag list; appending an existing tag is a no-op
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a comma-joined string into trimmed tags
    pub fn from_delimited(text: &str) -> Self {
        text.split(',').collect()
    }

    /// Append a tag, trimming it first
    ///
    /// Returns false when the tag was empty or already present.
    pub fn push(&mut self, tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tags.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.join(","))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = TagList::new();
        for tag in iter {
            list.push(tag);
        }
        list
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// Ordered metadata map with explicit absent lookups
///
/// Keys keep their first insertion position; inserting an existing key
/// replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: IndexMap<String, FrontMatterValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FrontMatterValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FrontMatterValue> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FrontMatterValue>,
    ) -> Option<FrontMatterValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<FrontMatterValue> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontMatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The normalized tag list, when present
    pub fn tags(&self) -> Option<&TagList> {
        self.get("tags").and_then(FrontMatterValue::as_tags)
    }
}

impl<K: Into<String>, V: Into<FrontMatterValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl IntoIterator for Metadata {
    type Item = (String, FrontMatterValue);
    type IntoIter = indexmap::map::IntoIter<String, FrontMatterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
