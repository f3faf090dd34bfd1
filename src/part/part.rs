//! Single predicate parts

use std::fmt;

use crate::error::{QueryError, QueryResult};
use crate::value::Value;

use super::keyword::Keyword;

/// Restricts a map criterion to keys or values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapCriteria {
    Key,
    Value,
}

impl MapCriteria {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapCriteria::Key => "KEY",
            MapCriteria::Value => "VALUE",
        }
    }
}

impl fmt::Display for MapCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic predicate: property path token, keyword and bound arguments.
///
/// The argument count is validated on construction. A map-typed property
/// may take one argument more than the keyword arity; the extra leading
/// argument is the map key the comparison targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    property: String,
    keyword: Keyword,
    ignore_case: bool,
    args: Vec<Value>,
    map_criteria: Option<MapCriteria>,
}

impl Part {
    /// Creates a part for `property` (PascalCase path token such as
    /// `FriendAddressZipCode`)
    pub fn new(
        property: impl Into<String>,
        keyword: Keyword,
        args: Vec<Value>,
    ) -> QueryResult<Self> {
        let property = property.into();
        if property.is_empty() {
            return Err(QueryError::invalid_arguments("empty property path"));
        }
        if !keyword.is_supported() {
            return Err(QueryError::unsupported_operator(keyword));
        }
        let arity = keyword.arity();
        if args.len() != arity && !(Self::allows_keyed_form(keyword) && args.len() == arity + 1)
        {
            return Err(QueryError::invalid_arguments(format!(
                "{} expects {} argument(s) for '{}', got {}",
                keyword.name(),
                arity,
                property,
                args.len()
            )));
        }
        Ok(Self {
            property,
            keyword,
            ignore_case: false,
            args,
            map_criteria: None,
        })
    }

    /// Parses a part source such as `FirstNameStartsWithIgnoreCase`
    pub fn parse(source: &str, args: Vec<Value>) -> QueryResult<Self> {
        let (source, ignore_case) = match source
            .strip_suffix("IgnoreCase")
            .or_else(|| source.strip_suffix("IgnoringCase"))
        {
            Some(stripped) => (stripped, true),
            None => (source, false),
        };
        let (property, keyword) = Keyword::split_suffix(source);
        let part = Self::new(property, keyword, args)?;
        Ok(if ignore_case { part.ignore_case() } else { part })
    }

    /// Marks string comparisons as case-insensitive
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Restricts the part to map keys or map values. Only meaningful for
    /// CONTAINING and only in the single-argument form.
    pub fn with_map_criteria(mut self, criteria: MapCriteria) -> QueryResult<Self> {
        if self.keyword != Keyword::Containing || self.args.len() != 1 {
            return Err(QueryError::invalid_arguments(format!(
                "map criteria {} requires CONTAINING with one argument",
                criteria
            )));
        }
        self.map_criteria = Some(criteria);
        Ok(self)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn keyword(&self) -> Keyword {
        self.keyword
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn map_criteria(&self) -> Option<MapCriteria> {
        self.map_criteria
    }

    /// Whether the arguments carry a leading map key
    pub fn is_keyed(&self) -> bool {
        self.args.len() == self.keyword.arity() + 1
    }

    fn allows_keyed_form(keyword: Keyword) -> bool {
        keyword.arity() > 0 && !matches!(keyword, Keyword::In | Keyword::NotIn)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.property, self.keyword.aliases()[0])?;
        if self.ignore_case {
            write!(f, "IgnoreCase")?;
        }
        Ok(())
    }
}
