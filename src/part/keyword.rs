//! Method-name keyword vocabulary
//!
//! Each keyword carries its argument arity and the aliases a method name may
//! spell it with. The display form, `NOT_IN (1): [IsNotIn, NotIn]`, is the
//! one used in error messages.

use std::fmt;

/// Predicate keyword of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Between,
    IsNotNull,
    IsNull,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Before,
    After,
    NotLike,
    Like,
    StartingWith,
    EndingWith,
    IsNotEmpty,
    IsEmpty,
    NotContaining,
    Containing,
    NotIn,
    In,
    Near,
    Within,
    Regex,
    Exists,
    True,
    False,
    NegatingSimpleProperty,
    SimpleProperty,
}

impl Keyword {
    /// All keywords, in alias-matching order: longer aliases sharing a
    /// suffix with shorter ones come first.
    pub const ALL: [Keyword; 27] = [
        Keyword::Between,
        Keyword::IsNotNull,
        Keyword::IsNull,
        Keyword::LessThanEqual,
        Keyword::LessThan,
        Keyword::GreaterThanEqual,
        Keyword::GreaterThan,
        Keyword::Before,
        Keyword::After,
        Keyword::NotLike,
        Keyword::Like,
        Keyword::StartingWith,
        Keyword::EndingWith,
        Keyword::IsNotEmpty,
        Keyword::IsEmpty,
        Keyword::NotContaining,
        Keyword::Containing,
        Keyword::NotIn,
        Keyword::In,
        Keyword::Near,
        Keyword::Within,
        Keyword::Regex,
        Keyword::Exists,
        Keyword::True,
        Keyword::False,
        Keyword::NegatingSimpleProperty,
        Keyword::SimpleProperty,
    ];

    /// Upper-snake name
    pub fn name(&self) -> &'static str {
        match self {
            Keyword::Between => "BETWEEN",
            Keyword::IsNotNull => "IS_NOT_NULL",
            Keyword::IsNull => "IS_NULL",
            Keyword::LessThan => "LESS_THAN",
            Keyword::LessThanEqual => "LESS_THAN_EQUAL",
            Keyword::GreaterThan => "GREATER_THAN",
            Keyword::GreaterThanEqual => "GREATER_THAN_EQUAL",
            Keyword::Before => "BEFORE",
            Keyword::After => "AFTER",
            Keyword::NotLike => "NOT_LIKE",
            Keyword::Like => "LIKE",
            Keyword::StartingWith => "STARTING_WITH",
            Keyword::EndingWith => "ENDING_WITH",
            Keyword::IsNotEmpty => "IS_NOT_EMPTY",
            Keyword::IsEmpty => "IS_EMPTY",
            Keyword::NotContaining => "NOT_CONTAINING",
            Keyword::Containing => "CONTAINING",
            Keyword::NotIn => "NOT_IN",
            Keyword::In => "IN",
            Keyword::Near => "NEAR",
            Keyword::Within => "WITHIN",
            Keyword::Regex => "REGEX",
            Keyword::Exists => "EXISTS",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::NegatingSimpleProperty => "NEGATING_SIMPLE_PROPERTY",
            Keyword::SimpleProperty => "SIMPLE_PROPERTY",
        }
    }

    /// Number of bound arguments the keyword consumes
    pub fn arity(&self) -> usize {
        match self {
            Keyword::Between => 2,
            Keyword::Near => 2,
            Keyword::IsNotNull
            | Keyword::IsNull
            | Keyword::IsNotEmpty
            | Keyword::IsEmpty
            | Keyword::Exists
            | Keyword::True
            | Keyword::False => 0,
            _ => 1,
        }
    }

    /// Spellings accepted in a method name
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Keyword::Between => &["IsBetween", "Between"],
            Keyword::IsNotNull => &["IsNotNull", "NotNull"],
            Keyword::IsNull => &["IsNull", "Null"],
            Keyword::LessThan => &["IsLessThan", "LessThan"],
            Keyword::LessThanEqual => &["IsLessThanEqual", "LessThanEqual"],
            Keyword::GreaterThan => &["IsGreaterThan", "GreaterThan"],
            Keyword::GreaterThanEqual => &["IsGreaterThanEqual", "GreaterThanEqual"],
            Keyword::Before => &["IsBefore", "Before"],
            Keyword::After => &["IsAfter", "After"],
            Keyword::NotLike => &["IsNotLike", "NotLike"],
            Keyword::Like => &["IsLike", "Like"],
            Keyword::StartingWith => &["IsStartingWith", "StartingWith", "StartsWith"],
            Keyword::EndingWith => &["IsEndingWith", "EndingWith", "EndsWith"],
            Keyword::IsNotEmpty => &["IsNotEmpty", "NotEmpty"],
            Keyword::IsEmpty => &["IsEmpty", "Empty"],
            Keyword::NotContaining => &["IsNotContaining", "NotContaining", "NotContains"],
            Keyword::Containing => &["IsContaining", "Containing", "Contains"],
            Keyword::NotIn => &["IsNotIn", "NotIn"],
            Keyword::In => &["IsIn", "In"],
            Keyword::Near => &["IsNear", "Near"],
            Keyword::Within => &["IsWithin", "Within"],
            Keyword::Regex => &["MatchesRegex", "Matches", "Regex"],
            Keyword::Exists => &["Exists"],
            Keyword::True => &["IsTrue", "True"],
            Keyword::False => &["IsFalse", "False"],
            Keyword::NegatingSimpleProperty => &["IsNot", "Not"],
            Keyword::SimpleProperty => &["Is", "Equals"],
        }
    }

    /// Finds the keyword spelled by `alias` exactly
    pub fn from_alias(alias: &str) -> Option<Keyword> {
        Keyword::ALL
            .iter()
            .copied()
            .find(|k| k.aliases().contains(&alias))
    }

    /// Splits a part source such as `FirstNameStartsWith` into its property
    /// token and keyword. A source without a keyword suffix is a
    /// [`Keyword::SimpleProperty`] part.
    pub fn split_suffix(source: &str) -> (&str, Keyword) {
        let mut best: Option<(usize, Keyword)> = None;
        for keyword in Keyword::ALL {
            for alias in keyword.aliases() {
                if source.len() > alias.len() && source.ends_with(alias) {
                    let longer = best.map_or(true, |(len, _)| alias.len() > len);
                    if longer {
                        best = Some((alias.len(), keyword));
                    }
                }
            }
        }
        match best {
            Some((len, keyword)) => (&source[..source.len() - len], keyword),
            None => (source, Keyword::SimpleProperty),
        }
    }

    /// Whether the derivation engine can compile this keyword
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            Keyword::NotIn
                | Keyword::NotLike
                | Keyword::NotContaining
                | Keyword::IsEmpty
                | Keyword::IsNotEmpty
                | Keyword::Near
                | Keyword::Within
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): [{}]", self.name(), self.arity(), self.aliases().join(", "))
    }
}
