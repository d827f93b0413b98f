//! Pattern-based field extraction from loosely structured text.
//!
//! This is not a JSON parser. Each field is located by its own
//! regular expression, so truncated, malformed, or non-JSON input still yields
//! whatever fields can be found and empty strings for the rest.
//!
//! # Example
//!
//! ```
//! use picfetch_core::extract::{FieldPatterns, extract, TITLE, URL};
//!
//! let text = r#"{"title": "Harbor", "url": "https://example.com/img/harbor.jpg""#;
//! let fields = extract(text, &FieldPatterns::image_metadata());
//! assert_eq!(fields.get(TITLE), "Harbor");
//! assert_eq!(fields.get(URL), "https://example.com/img/harbor.jpg");
//! ```

mod error;
mod pattern;

pub use error::PatternError;
pub use pattern::{ATTRIBUTION, FieldPattern, FieldPatterns, TITLE, URL};

use tracing::debug;

/// Field values extracted from one text.
///
/// Every field requested at extraction time is present; fields with no match
/// hold the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    fields: Vec<(String, String)>,
}

impl Extraction {
    /// Returns the value for `name`, or the empty string if it was not requested.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map_or("", |(_, value)| value.as_str())
    }

    /// Returns the value for `name`, or `placeholder` when it is empty.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, placeholder: &'a str) -> &'a str {
        let value = self.get(name);
        if value.is_empty() { placeholder } else { value }
    }

    /// Returns true if `name` was part of the request.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Iterates `(name, value)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns how many fields matched something non-empty.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.fields.iter().filter(|(_, v)| !v.is_empty()).count()
    }
}

/// Extracts every field in `patterns` from `text`.
///
/// Each field takes the first match of its own pattern; fields are matched
/// independently against the full text. This function never fails.
#[tracing::instrument(skip(text, patterns), fields(input_len = text.len(), fields = patterns.len()))]
#[must_use]
pub fn extract(text: &str, patterns: &FieldPatterns) -> Extraction {
    let fields: Vec<(String, String)> = patterns
        .iter()
        .map(|pattern| {
            let value = pattern.find(text).unwrap_or_default();
            (pattern.name().to_string(), value.to_string())
        })
        .collect();

    let extraction = Extraction { fields };
    debug!(
        found = extraction.found_count(),
        missing = extraction.len() - extraction.found_count(),
        "Extraction complete"
    );
    extraction
}
