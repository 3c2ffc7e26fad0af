//! Path patterns
//!
//! A pattern is either a literal path or a regular expression with at most
//! one capture group.

use regex::Regex;
use thiserror::Error;

/// Characters that turn a pattern into a regular expression.
///
/// `.` is not one of them, so file-like routes such as `/index.html`
/// stay literal.
const REGEX_META: &[char] = &['^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\'];

/// Pattern compilation errors
#[derive(Debug, Error)]
pub enum PatternError {
    /// Not a valid regular expression
    #[error("invalid route pattern {pattern:?}: {reason}")]
    Invalid { pattern: String, reason: String },

    /// More than one capture group
    #[error("route pattern {pattern:?} has {groups} capture groups, at most one is supported")]
    TooManyCaptures { pattern: String, groups: usize },
}

/// Result of a successful path match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Text captured by the group, `None` for literal patterns, patterns
    /// without a group, or an optional group that did not participate
    pub capture: Option<String>,
}

#[derive(Debug, Clone)]
enum Kind {
    Literal,
    Regex(Regex),
}

/// Compiled route pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    kind: Kind,
}

impl Pattern {
    /// Compile a pattern
    ///
    /// A missing leading `/` is added, so `status` and `/status` are the
    /// same route.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let source = if pattern.starts_with('/') || pattern.starts_with('^') {
            pattern.to_string()
        } else {
            format!("/{pattern}")
        };

        if !source.contains(REGEX_META) {
            return Ok(Self {
                source,
                kind: Kind::Literal,
            });
        }

        let regex = Regex::new(&format!("^(?:{source})")).map_err(|e| PatternError::Invalid {
            pattern: source.clone(),
            reason: e.to_string(),
        })?;

        // Group 0 is the whole match
        let groups = regex.captures_len() - 1;
        if groups > 1 {
            return Err(PatternError::TooManyCaptures {
                pattern: source,
                groups,
            });
        }

        Ok(Self {
            source,
            kind: Kind::Regex(regex),
        })
    }

    /// Match a request path against this pattern
    ///
    /// Literal patterns must equal the path exactly. Regex patterns are
    /// anchored at the start of the path only; a trailing `$` in the pattern
    /// is needed to reject longer paths.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        match &self.kind {
            Kind::Literal => (self.source == path).then_some(PathMatch { capture: None }),
            Kind::Regex(regex) => {
                let caps = regex.captures(path)?;
                Some(PathMatch {
                    capture: caps.get(1).map(|m| m.as_str().to_string()),
                })
            }
        }
    }

    /// True if the pattern is compared literally
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, Kind::Literal)
    }

    /// Normalised pattern text
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
