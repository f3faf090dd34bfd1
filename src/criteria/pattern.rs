//! String patterns
//!
//! Every string predicate compiles to one anchored regex. LIKE takes the
//! argument as an extended regex that must match the whole value; the
//! substring predicates escape the argument. Ignore-case folds case with
//! the `(?i)` flag.

use std::fmt;

use regex::Regex;

use crate::error::{QueryError, QueryResult};

/// What a pattern checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Whole value equals the argument
    Exact,
    /// Whole value matches the argument regex
    Like,
    StartsWith,
    EndsWith,
    Contains,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Exact => "exact",
            PatternKind::Like => "like",
            PatternKind::StartsWith => "starts_with",
            PatternKind::EndsWith => "ends_with",
            PatternKind::Contains => "contains",
        }
    }
}

/// Compiled string predicate
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: PatternKind,
    source: String,
    ignore_case: bool,
    regex: Regex,
}

impl Pattern {
    pub fn new(kind: PatternKind, source: &str, ignore_case: bool) -> QueryResult<Self> {
        let escaped = regex::escape(source);
        let body = match kind {
            PatternKind::Exact => format!("^{}$", escaped),
            PatternKind::Like => format!("^(?:{})$", source),
            PatternKind::StartsWith => format!("^{}", escaped),
            PatternKind::EndsWith => format!("{}$", escaped),
            PatternKind::Contains => escaped,
        };
        let text = if ignore_case {
            format!("(?i){}", body)
        } else {
            body
        };
        let regex = Regex::new(&text).map_err(|e| {
            QueryError::invalid_arguments(format!("invalid pattern '{}': {}", source, e))
        })?;
        Ok(Self {
            kind,
            source: source.to_string(),
            ignore_case,
            regex,
        })
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.source == other.source
            && self.ignore_case == other.ignore_case
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}", self.kind.as_str(), self.source)?;
        if self.ignore_case {
            write!(f, ", ignore case")?;
        }
        write!(f, ")")
    }
}
