//! Query constraints for document collections
//!
//! A query is an ordered list of [`Constraint`]s, each naming a field, an
//! [`Operator`] and a value. Constraints are evaluated in order and combined
//! with AND. Fields absent from a document compare as null: `Eq` and `Has`
//! fail, `Ne` succeeds.

use crate::core::document::Document;
use crate::core::value::FrontMatterValue;
use crate::error::{CorpusError, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Separator between field and operator in lookup strings (`tags__has`)
pub const LOOKUP_SEPARATOR: &str = "__";

/// A queryable attribute of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Filename,
    Slug,
    /// A metadata key
    Meta(String),
}

impl Field {
    /// Resolve this field on a document; `None` when absent or null
    pub fn resolve<'a>(&self, document: &'a Document) -> Option<Cow<'a, FrontMatterValue>> {
        match self {
            Self::Title => document
                .title()
                .map(|t| Cow::Owned(FrontMatterValue::from(t))),
            Self::Filename => document
                .filename()
                .map(|f| Cow::Owned(FrontMatterValue::from(f))),
            Self::Slug => document.slug().map(|s| Cow::Owned(FrontMatterValue::from(s))),
            Self::Meta(key) => document
                .get(key)
                .filter(|value| !value.is_null())
                .map(Cow::Borrowed),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Filename => "filename",
            Self::Slug => "slug",
            Self::Meta(key) => key,
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        match name {
            "title" => Self::Title,
            "filename" => Self::Filename,
            "slug" => Self::Slug,
            other => Self::Meta(other.to_string()),
        }
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::from(name.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Exact equality
    Eq,
    /// Negated equality
    Ne,
    /// Substring of a string, or element of a list
    Has,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Has => "has",
        }
    }
}

impl FromStr for Operator {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "has" | "contains" => Ok(Self::Has),
            other => Err(CorpusError::invalid_query(format!(
                "unknown operator `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `field op value` test
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub field: Field,
    pub op: Operator,
    pub value: FrontMatterValue,
}

impl Constraint {
    pub fn new(
        field: impl Into<Field>,
        op: Operator,
        value: impl Into<FrontMatterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<Field>, value: impl Into<FrontMatterValue>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn ne(field: impl Into<Field>, value: impl Into<FrontMatterValue>) -> Self {
        Self::new(field, Operator::Ne, value)
    }

    pub fn has(field: impl Into<Field>, value: impl Into<FrontMatterValue>) -> Self {
        Self::new(field, Operator::Has, value)
    }

    /// Parse a `field__op` lookup; a bare field means `Eq`
    ///
    /// ```
    /// use mdcorpus::{Constraint, Operator};
    ///
    /// let c = Constraint::lookup("tags__has", "python").unwrap();
    /// assert_eq!(c.op, Operator::Has);
    /// assert!(Constraint::lookup("tags__like", "py").is_err());
    /// ```
    pub fn lookup(lookup: &str, value: impl Into<FrontMatterValue>) -> Result<Self> {
        let (field, op) = match lookup.rsplit_once(LOOKUP_SEPARATOR) {
            Some((field, op)) => (field, op.parse()?),
            None => (lookup, Operator::Eq),
        };
        if field.is_empty() {
            return Err(CorpusError::invalid_query(format!(
                "missing field name in `{}`",
                lookup
            )));
        }
        Ok(Self::new(field, op, value))
    }

    /// Evaluate against one document
    pub fn matches(&self, document: &Document) -> bool {
        let actual = self.field.resolve(document);
        match (self.op, actual) {
            (Operator::Eq, Some(actual)) => *actual == self.value,
            (Operator::Eq, None) => false,
            (Operator::Ne, Some(actual)) => *actual != self.value,
            (Operator::Ne, None) => true,
            (Operator::Has, Some(actual)) => actual.contains(&self.value),
            (Operator::Has, None) => false,
        }
    }
}

/// Ordered list of constraints, built fluently
///
/// ```
/// use mdcorpus::Query;
///
/// let query = Query::new().eq("author", "Ann").has("tags", "rust");
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    constraints: Vec<Constraint>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn eq(self, field: impl Into<Field>, value: impl Into<FrontMatterValue>) -> Self {
        self.and(Constraint::eq(field, value))
    }

    pub fn ne(self, field: impl Into<Field>, value: impl Into<FrontMatterValue>) -> Self {
        self.and(Constraint::ne(field, value))
    }

    pub fn has(self, field: impl Into<Field>, value: impl Into<FrontMatterValue>) -> Self {
        self.and(Constraint::has(field, value))
    }

    /// Add a constraint from `field__op` lookup syntax
    pub fn lookup(self, lookup: &str, value: impl Into<FrontMatterValue>) -> Result<Self> {
        Ok(self.and(Constraint::lookup(lookup, value)?))
    }

    /// Check all constraints in order
    pub fn matches(&self, document: &Document) -> bool {
        matches_all(&self.constraints, document)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl AsRef<[Constraint]> for Query {
    fn as_ref(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl FromIterator<Constraint> for Query {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}

/// Sequential AND over `constraints`; an empty list matches everything
pub fn matches_all(constraints: &[Constraint], document: &Document) -> bool {
    constraints.iter().all(|c| c.matches(document))
}
