//! Criteria builder
//!
//! Turns one part (resolved path, keyword, ignore-case flag, arguments)
//! into a [`Criterion`]. Pure: no store access, no shared state.

use super::criterion::{Criterion, Operation, Target};
use super::pattern::{Pattern, PatternKind};
use crate::error::{QueryError, QueryResult};
use crate::metadata::FieldKind;
use crate::part::{Keyword, MapCriteria, Part};
use crate::resolver::PropertyPath;
use crate::value::Value;

/// Builds criteria from parts
pub struct CriteriaBuilder;

impl CriteriaBuilder {
    /// Builds the criterion for a part whose property is already resolved
    pub fn from_part(path: PropertyPath, part: &Part) -> QueryResult<Criterion> {
        Self::build(
            path,
            part.keyword(),
            part.is_ignore_case(),
            part.args(),
            part.map_criteria(),
        )
    }

    /// Builds a criterion.
    ///
    /// A map-typed leaf accepts one leading argument more than the keyword
    /// arity: the key whose entry the comparison targets
    /// (`IntMapGreaterThan("key2", 0)`).
    pub fn build(
        path: PropertyPath,
        keyword: Keyword,
        ignore_case: bool,
        args: &[Value],
        map_criteria: Option<MapCriteria>,
    ) -> QueryResult<Criterion> {
        if !keyword.is_supported() {
            return Err(QueryError::unsupported_operator(keyword));
        }

        let kind = path.leaf().kind.clone();
        let arity = keyword.arity();
        let (entry_key, args) = if args.len() == arity + 1 && arity > 0 {
            if !kind.is_map_like() {
                return Err(QueryError::invalid_arguments(format!(
                    "{} on '{}' takes {} argument(s); only map fields accept a leading key",
                    keyword.name(),
                    path.dot_path(),
                    arity
                )));
            }
            (Some(args[0].clone()), &args[1..])
        } else if args.len() == arity {
            (None, args)
        } else {
            return Err(QueryError::invalid_arguments(format!(
                "{} on '{}' expects {} argument(s), got {}",
                keyword.name(),
                path.dot_path(),
                arity,
                args.len()
            )));
        };

        let (target, operation) = match keyword {
            Keyword::SimpleProperty => {
                Self::equality(&kind, entry_key, &args[0], ignore_case, false)?
            }
            Keyword::NegatingSimpleProperty => {
                Self::equality(&kind, entry_key, &args[0], ignore_case, true)?
            }
            Keyword::GreaterThan | Keyword::After => (
                scope(&kind, entry_key, &args[0]),
                Operation::GreaterThan(args[0].clone()),
            ),
            Keyword::GreaterThanEqual => (
                scope(&kind, entry_key, &args[0]),
                Operation::GreaterThanOrEqual(args[0].clone()),
            ),
            Keyword::LessThan | Keyword::Before => (
                scope(&kind, entry_key, &args[0]),
                Operation::LessThan(args[0].clone()),
            ),
            Keyword::LessThanEqual => (
                scope(&kind, entry_key, &args[0]),
                Operation::LessThanOrEqual(args[0].clone()),
            ),
            Keyword::Between => (
                scope(&kind, entry_key, &args[0]),
                Operation::Between(args[0].clone(), args[1].clone()),
            ),
            Keyword::In => Self::membership(&kind, entry_key, &args[0]),
            Keyword::Containing => {
                Self::containing(&kind, entry_key, &args[0], ignore_case, map_criteria)?
            }
            Keyword::Like | Keyword::Regex => {
                Self::string_match(&kind, entry_key, PatternKind::Like, &args[0], ignore_case)?
            }
            Keyword::StartingWith => Self::string_match(
                &kind,
                entry_key,
                PatternKind::StartsWith,
                &args[0],
                ignore_case,
            )?,
            Keyword::EndingWith => Self::string_match(
                &kind,
                entry_key,
                PatternKind::EndsWith,
                &args[0],
                ignore_case,
            )?,
            Keyword::True => (Target::Value, Operation::IsTrue),
            Keyword::False => (Target::Value, Operation::IsFalse),
            Keyword::IsNull => (Target::Value, Operation::IsNull),
            Keyword::IsNotNull | Keyword::Exists => (Target::Value, Operation::IsNotNull),
            Keyword::NotIn
            | Keyword::NotLike
            | Keyword::NotContaining
            | Keyword::IsEmpty
            | Keyword::IsNotEmpty
            | Keyword::Near
            | Keyword::Within => return Err(QueryError::unsupported_operator(keyword)),
        };

        Ok(Criterion {
            path,
            keyword,
            ignore_case,
            target,
            operation,
            map_criteria,
        })
    }

    fn equality(
        kind: &FieldKind,
        entry_key: Option<Value>,
        arg: &Value,
        ignore_case: bool,
        negate: bool,
    ) -> QueryResult<(Target, Operation)> {
        let target = scope(kind, entry_key, arg);
        let operation = match (ignore_case, arg.as_str()) {
            (true, Some(s)) => {
                let pattern = Pattern::new(PatternKind::Exact, s, true)?;
                if negate {
                    Operation::NotMatches(pattern)
                } else {
                    Operation::Matches(pattern)
                }
            }
            _ if negate => Operation::NotEquals(arg.clone()),
            _ => Operation::Equals(arg.clone()),
        };
        Ok((target, operation))
    }

    fn membership(kind: &FieldKind, entry_key: Option<Value>, arg: &Value) -> (Target, Operation) {
        let items = match arg {
            Value::List(items) => items.clone(),
            other => vec![other.clone()],
        };
        let target = match entry_key {
            Some(key) => Target::MapEntry(key),
            None if *kind == FieldKind::List => Target::AnyElement,
            None => Target::Value,
        };
        (target, Operation::In(items))
    }

    fn containing(
        kind: &FieldKind,
        entry_key: Option<Value>,
        arg: &Value,
        ignore_case: bool,
        map_criteria: Option<MapCriteria>,
    ) -> QueryResult<(Target, Operation)> {
        // key + value substring
        if let Some(key) = entry_key {
            let needle = require_string(arg, Keyword::Containing)?;
            let pattern = Pattern::new(PatternKind::Contains, needle, ignore_case)?;
            return Ok((Target::MapEntry(key), Operation::Matches(pattern)));
        }

        match kind {
            FieldKind::List => Self::member_equality(Target::AnyElement, arg, ignore_case),
            FieldKind::Map | FieldKind::Composite(_) => {
                let target = match map_criteria.unwrap_or(MapCriteria::Key) {
                    MapCriteria::Key => Target::MapKeys,
                    MapCriteria::Value => Target::MapValues,
                };
                Self::member_equality(target, arg, ignore_case)
            }
            FieldKind::Scalar | FieldKind::Id => {
                let needle = require_string(arg, Keyword::Containing)?;
                let pattern = Pattern::new(PatternKind::Contains, needle, ignore_case)?;
                Ok((Target::Value, Operation::Matches(pattern)))
            }
        }
    }

    fn member_equality(
        target: Target,
        arg: &Value,
        ignore_case: bool,
    ) -> QueryResult<(Target, Operation)> {
        let operation = match (ignore_case, arg.as_str()) {
            (true, Some(s)) => Operation::Matches(Pattern::new(PatternKind::Exact, s, true)?),
            _ => Operation::Equals(arg.clone()),
        };
        Ok((target, operation))
    }

    fn string_match(
        kind: &FieldKind,
        entry_key: Option<Value>,
        pattern_kind: PatternKind,
        arg: &Value,
        ignore_case: bool,
    ) -> QueryResult<(Target, Operation)> {
        let keyword = match pattern_kind {
            PatternKind::StartsWith => Keyword::StartingWith,
            PatternKind::EndsWith => Keyword::EndingWith,
            _ => Keyword::Like,
        };
        let source = require_string(arg, keyword)?;
        let pattern = Pattern::new(pattern_kind, source, ignore_case)?;
        Ok((scope(kind, entry_key, arg), Operation::Matches(pattern)))
    }
}

/// Target implied by the field kind and argument: a map key selects that
/// entry, a scalar argument against a list applies to each element
fn scope(kind: &FieldKind, entry_key: Option<Value>, arg: &Value) -> Target {
    match entry_key {
        Some(key) => Target::MapEntry(key),
        None if *kind == FieldKind::List && !matches!(arg, Value::List(_)) => Target::AnyElement,
        None => Target::Value,
    }
}

fn require_string(arg: &Value, keyword: Keyword) -> QueryResult<&str> {
    arg.as_str().ok_or_else(|| {
        QueryError::invalid_arguments(format!(
            "{} requires a string argument, got {}",
            keyword.name(),
            arg.type_name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FieldHop;
    use crate::store::Record;

    fn path(name: &str, kind: FieldKind) -> PropertyPath {
        PropertyPath::new(
            "Person",
            vec![FieldHop {
                name: name.to_string(),
                bin: name.to_string(),
                kind,
            }],
        )
    }

    fn record(bin: &str, value: Value) -> Record {
        Record::new("k").with_bin(bin, value)
    }

    fn build(name: &str, kind: FieldKind, keyword: Keyword, args: Vec<Value>) -> Criterion {
        CriteriaBuilder::build(path(name, kind), keyword, false, &args, None).unwrap()
    }

    #[test]
    fn test_not_in_is_rejected() {
        let err = CriteriaBuilder::build(
            path("firstName", FieldKind::Scalar),
            Keyword::NotIn,
            false,
            &[Value::list(Vec::<Value>::new())],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported keyword 'NOT_IN (1): [IsNotIn, NotIn]'"
        );
    }

    #[test]
    fn test_scalar_against_list_targets_elements() {
        let c = build("ints", FieldKind::List, Keyword::GreaterThan, vec![549.into()]);
        assert_eq!(c.target(), &Target::AnyElement);
        assert!(c.matches(&record("ints", Value::list([425, 550, 990]))));
        assert!(!c.matches(&record("ints", Value::list([1, 2]))));

        let c = build(
            "ints",
            FieldKind::List,
            Keyword::Between,
            vec![500.into(), 600.into()],
        );
        assert!(c.matches(&record("ints", Value::list([550, 600, 990]))));
        assert!(!c.matches(&record("ints", Value::list([425, 990]))));
    }

    #[test]
    fn test_list_argument_compares_whole_list() {
        let c = build(
            "strings",
            FieldKind::List,
            Keyword::GreaterThan,
            vec![Value::list(["str1", "str2"])],
        );
        assert_eq!(c.target(), &Target::Value);
        assert!(c.matches(&record("strings", Value::list(["str1", "str2", "str3"]))));
        assert!(!c.matches(&record("strings", Value::list(["str1", "str2"]))));
    }

    #[test]
    fn test_between_is_inclusive() {
        let c = build("age", FieldKind::Scalar, Keyword::Between, vec![40.into(), 45.into()]);
        assert!(c.matches(&record("age", 40.into())));
        assert!(c.matches(&record("age", 45.into())));
        assert!(!c.matches(&record("age", 46.into())));
    }

    #[test]
    fn test_no_cross_type_comparison() {
        let c = build("age", FieldKind::Scalar, Keyword::GreaterThan, vec![10.into()]);
        assert!(!c.matches(&record("age", "99".into())));
        assert!(!c.matches(&record("age", 99.5.into())));
    }

    #[test]
    fn test_not_equals_requires_presence() {
        let c = build(
            "age",
            FieldKind::Scalar,
            Keyword::NegatingSimpleProperty,
            vec![42.into()],
        );
        assert!(c.matches(&record("age", 41.into())));
        assert!(!c.matches(&record("age", 42.into())));
        assert!(!c.matches(&Record::new("k")));
    }

    #[test]
    fn test_map_keyed_comparison() {
        let c = build(
            "intMap",
            FieldKind::Map,
            Keyword::GreaterThan,
            vec!["key2".into(), 0.into()],
        );
        assert_eq!(c.target(), &Target::MapEntry("key2".into()));
        assert!(c.matches(&record("intMap", Value::map([("key1", 0), ("key2", 1)]))));
        assert!(!c.matches(&record("intMap", Value::map([("key1", 5)]))));
    }

    #[test]
    fn test_map_keyed_not_equals_missing_key() {
        let c = build(
            "intMap",
            FieldKind::Map,
            Keyword::NegatingSimpleProperty,
            vec!["key3".into(), 22.into()],
        );
        assert!(c.matches(&record("intMap", Value::map([("key1", 0)]))));
        assert!(!c.matches(&Record::new("k")));
    }

    #[test]
    fn test_map_keyed_negation_ignores_case_setting() {
        let map = Value::map([("key1", "val1")]);
        for ignore_case in [false, true] {
            let missing = CriteriaBuilder::build(
                path("stringMap", FieldKind::Map),
                Keyword::NegatingSimpleProperty,
                ignore_case,
                &["key3".into(), "x".into()],
                None,
            )
            .unwrap();
            assert!(missing.matches(&record("stringMap", map.clone())), "{ignore_case}");
            assert!(!missing.matches(&Record::new("k")), "{ignore_case}");

            let present = CriteriaBuilder::build(
                path("stringMap", FieldKind::Map),
                Keyword::NegatingSimpleProperty,
                ignore_case,
                &["key1".into(), "VAL1".into()],
                None,
            )
            .unwrap();
            // only the ignore-case form treats VAL1 as equal to val1
            assert_eq!(present.matches(&record("stringMap", map.clone())), !ignore_case);
        }
    }

    #[test]
    fn test_map_containing_key_and_value() {
        let map = Value::map([("key1", "val1")]);
        let keys = CriteriaBuilder::build(
            path("stringMap", FieldKind::Map),
            Keyword::Containing,
            false,
            &["key1".into()],
            Some(MapCriteria::Key),
        )
        .unwrap();
        assert!(keys.matches(&record("stringMap", map.clone())));

        let values = CriteriaBuilder::build(
            path("stringMap", FieldKind::Map),
            Keyword::Containing,
            false,
            &["val1".into()],
            Some(MapCriteria::Value),
        )
        .unwrap();
        assert!(values.matches(&record("stringMap", map.clone())));

        let substring = build(
            "stringMap",
            FieldKind::Map,
            Keyword::Containing,
            vec!["key1".into(), "al".into()],
        );
        assert!(substring.matches(&record("stringMap", map.clone())));
        let other_key = build(
            "stringMap",
            FieldKind::Map,
            Keyword::Containing,
            vec!["key2".into(), "al".into()],
        );
        assert!(!other_key.matches(&record("stringMap", map)));
    }

    #[test]
    fn test_leading_key_on_scalar_is_invalid() {
        let err = CriteriaBuilder::build(
            path("age", FieldKind::Scalar),
            Keyword::GreaterThan,
            false,
            &["key".into(), 1.into()],
            None,
        )
        .unwrap_err();
        assert_eq!(err.code(), "PQ_INVALID_ARGUMENTS");
    }

    #[test]
    fn test_string_predicates() {
        let c = build("firstName", FieldKind::Scalar, Keyword::Containing, vec!["er".into()]);
        assert!(c.matches(&record("firstName", "Oliver August".into())));
        assert!(!c.matches(&record("firstName", "Dave".into())));

        let c = CriteriaBuilder::build(
            path("firstName", FieldKind::Scalar),
            Keyword::SimpleProperty,
            true,
            &["dAvE".into()],
            None,
        )
        .unwrap();
        assert!(c.matches(&record("firstName", "Dave".into())));

        let err = CriteriaBuilder::build(
            path("age", FieldKind::Scalar),
            Keyword::Like,
            false,
            &[42.into()],
            None,
        )
        .unwrap_err();
        assert_eq!(err.code(), "PQ_INVALID_ARGUMENTS");
    }

    #[test]
    fn test_boolean_and_null_keywords() {
        let c = build("active", FieldKind::Scalar, Keyword::True, vec![]);
        assert!(c.matches(&record("active", true.into())));
        assert!(!c.matches(&record("active", false.into())));

        let c = build("address", FieldKind::Map, Keyword::IsNull, vec![]);
        assert!(c.matches(&Record::new("k")));
        let c = build("address", FieldKind::Map, Keyword::Exists, vec![]);
        assert!(!c.matches(&Record::new("k")));
    }

    #[test]
    fn test_in_membership() {
        let c = build(
            "firstName",
            FieldKind::Scalar,
            Keyword::In,
            vec![Value::list(["Dave", "Carter"])],
        );
        assert!(c.matches(&record("firstName", "Carter".into())));
        assert!(!c.matches(&record("firstName", "Boyd".into())));
    }

    #[test]
    fn test_id_targets_record_key() {
        let c = build("id", FieldKind::Id, Keyword::SimpleProperty, vec!["k".into()]);
        assert!(c.matches(&Record::new("k")));
        assert!(!c.matches(&Record::new("other")));
    }
}
