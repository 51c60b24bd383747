//! Default wildcard semantics: `*`, `?` and character classes.
//! Used by the resolver's include/exclude filters and available to providers
//! that have no pattern syntax of their own.

use globset::Glob;

use crate::errors::PropertyError;

/// Compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    matcher: globset::GlobMatcher,
}

impl WildcardPattern {
    /// Compile a pattern. Malformed syntax is an `InvalidArgument`.
    pub fn new(pattern: &str) -> Result<Self, PropertyError> {
        let glob = Glob::new(pattern).map_err(|e| {
            PropertyError::InvalidArgument(format!("malformed pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

/// Whether `s` contains any wildcard metacharacters.
pub fn contains_wildcards(s: &str) -> bool {
    s.chars().any(|c| matches!(c, '*' | '?' | '['))
}
