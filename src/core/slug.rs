//! ASCII slug generation.
//!
//! Text is decomposed (NFKD), stripped to ASCII, lowercased and split on any
//! run of non-alphanumeric characters. The surviving tokens are joined with
//! the delimiter, so the output only ever contains `[a-z0-9]` and the
//! delimiter.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());

// Superset of the punctuation/whitespace class `[\t !"#$%&'()*\-/<=>?@[\]^_`{|},.]`:
// every other non-alphanumeric ASCII character splits as well.
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Options for [`slugify_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugOptions {
    /// Joins tokens, and sequence elements before normalization
    pub delimiter: String,
    /// Remove `<...>` tags before tokenizing
    pub strip_html: bool,
}

impl Default for SlugOptions {
    fn default() -> Self {
        Self {
            delimiter: "-".to_string(),
            strip_html: false,
        }
    }
}

impl SlugOptions {
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn strip_html(mut self, strip: bool) -> Self {
        self.strip_html = strip;
        self
    }
}

/// Anything that can be turned into slug input: a string or a sequence of strings
pub trait SlugSource {
    fn join_with(&self, delimiter: &str) -> String;
}

impl SlugSource for str {
    fn join_with(&self, _delimiter: &str) -> String {
        self.to_string()
    }
}

impl SlugSource for String {
    fn join_with(&self, _delimiter: &str) -> String {
        self.clone()
    }
}

impl<S: AsRef<str>> SlugSource for [S] {
    fn join_with(&self, delimiter: &str) -> String {
        self.iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(delimiter)
    }
}

impl<S: AsRef<str>> SlugSource for Vec<S> {
    fn join_with(&self, delimiter: &str) -> String {
        self.as_slice().join_with(delimiter)
    }
}

impl<S: AsRef<str>, const N: usize> SlugSource for [S; N] {
    fn join_with(&self, delimiter: &str) -> String {
        self.as_slice().join_with(delimiter)
    }
}

/// Slugify with the default `-` delimiter and no HTML stripping
///
/// # Examples
///
/// ```
/// use mdcorpus::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// assert_eq!(slugify(&["2021", "Intro Post"]), "2021-intro-post");
/// ```
pub fn slugify<S: SlugSource + ?Sized>(input: &S) -> String {
    slugify_with(input, &SlugOptions::default())
}

/// Slugify with explicit options
pub fn slugify_with<S: SlugSource + ?Sized>(input: &S, options: &SlugOptions) -> String {
    let joined = input.join_with(&options.delimiter);

    let ascii: String = joined.nfkd().filter(char::is_ascii).collect();
    let text = if options.strip_html {
        HTML_TAG_RE.replace_all(&ascii, "").into_owned()
    } else {
        ascii
    };

    let lowered = text.to_lowercase();
    SEPARATOR_RE
        .split(&lowered)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(&options.delimiter)
}
