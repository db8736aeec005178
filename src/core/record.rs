//! Flat string records produced from documents

/// Ordered key/value record handed to renderers and stores
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Which record keys to emit
///
/// `exclude` removes keys unconditionally; a non-empty `include` then keeps
/// only the keys it names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl FieldSelection {
    /// Select every field
    pub fn all() -> Self {
        Self::default()
    }

    pub fn include<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Check whether `key` survives the selection
    pub fn allows(&self, key: &str) -> bool {
        if self.exclude.iter().any(|k| k == key) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|k| k == key)
    }
}
