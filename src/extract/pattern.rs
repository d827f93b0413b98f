//! Named field patterns.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::error::PatternError;

/// Field name for the image title.
pub const TITLE: &str = "title";

/// Field name for the image attribution (the `copyright` key in the source text).
pub const ATTRIBUTION: &str = "attribution";

/// Field name for the image URL.
pub const URL: &str = "url";

/// Compiled once; [`FieldPatterns::image_metadata`] hands out clones.
static IMAGE_METADATA: LazyLock<FieldPatterns> = LazyLock::new(|| {
    let mut patterns = FieldPatterns::new();
    for (name, key) in [(TITLE, "title"), (ATTRIBUTION, "copyright"), (URL, "url")] {
        // Static names are never blank, so construction cannot fail.
        if let Ok(pattern) = FieldPattern::quoted_key(name, key) {
            patterns.push(pattern);
        }
    }
    patterns
});

/// A field name paired with the pattern that locates its value.
///
/// When the pattern has a capture group, the first group is the value;
/// otherwise the whole match is.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    name: String,
    regex: Regex,
}

impl FieldPattern {
    /// Compiles a field pattern from a regex source string.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::EmptyFieldName`] for a blank name and
    /// [`PatternError::InvalidPattern`] if the source does not compile.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, PatternError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PatternError::EmptyFieldName);
        }
        let regex = Regex::new(pattern).map_err(|e| PatternError::invalid(&name, &e))?;
        trace!(field = %name, pattern, "compiled field pattern");
        Ok(Self { name, regex })
    }

    /// Builds the pattern for `"key": "value"`, capturing the quoted value.
    ///
    /// The value capture is lazy and stops at the first closing quote, so escaped
    /// quotes inside the value truncate it.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::EmptyFieldName`] for a blank name.
    pub fn quoted_key(name: impl Into<String>, key: &str) -> Result<Self, PatternError> {
        let source = format!(r#""{}"\s*:\s*"(.*?)""#, regex::escape(key));
        Self::new(name, &source)
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the first match in `text`, if any.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let captures = self.regex.captures(text)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str())
    }
}

/// Ordered set of field patterns.
#[derive(Debug, Clone, Default)]
pub struct FieldPatterns {
    patterns: Vec<FieldPattern>,
}

impl FieldPatterns {
    /// Creates an empty pattern set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The title / attribution / url set used for image metadata blobs.
    ///
    /// Attribution is read from the `copyright` key.
    #[must_use]
    pub fn image_metadata() -> Self {
        IMAGE_METADATA.clone()
    }

    /// Appends a pattern. A later pattern with an existing name replaces the earlier one
    /// in place, keeping the original position.
    pub fn push(&mut self, pattern: FieldPattern) {
        if let Some(existing) = self.patterns.iter_mut().find(|p| p.name == pattern.name) {
            *existing = pattern;
        } else {
            self.patterns.push(pattern);
        }
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, pattern: FieldPattern) -> Self {
        self.push(pattern);
        self
    }

    /// Iterates patterns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPattern> {
        self.patterns.iter()
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
