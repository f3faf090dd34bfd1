//! CDT ordering over store values
//!
//! Values of different types order by type rank:
//! NIL < BOOL < INTEGER < STRING < LIST < MAP < DOUBLE.
//!
//! Within a type:
//! - lists order by length first, then element by element
//! - maps order by entry count first, then entry by entry in key order
//!   (key, then value)
//! - doubles use IEEE total ordering

use std::cmp::Ordering;

use super::Value;

/// Rank of a value's type in the store ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeRank {
    Nil = 1,
    Bool = 2,
    Integer = 3,
    String = 4,
    List = 5,
    Map = 6,
    Double = 7,
}

impl TypeRank {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Nil => TypeRank::Nil,
            Value::Bool(_) => TypeRank::Bool,
            Value::Int(_) => TypeRank::Integer,
            Value::String(_) => TypeRank::String,
            Value::List(_) => TypeRank::List,
            Value::Map(_) => TypeRank::Map,
            Value::Float(_) => TypeRank::Double,
        }
    }
}

/// Compares two values using the store ordering
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::String(x), Value::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::List(x), Value::List(y)) => x.len().cmp(&y.len()).then_with(|| {
            x.iter()
                .zip(y.iter())
                .map(|(l, r)| compare(l, r))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        }),
        (Value::Map(x), Value::Map(y)) => x.len().cmp(&y.len()).then_with(|| {
            x.iter()
                .zip(y.iter())
                .map(|((lk, lv), (rk, rv))| compare(lk, rk).then_with(|| compare(lv, rv)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        }),
        _ => TypeRank::of(a).cmp(&TypeRank::of(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_rank_order() {
        let values = [
            Value::Nil,
            Value::Bool(true),
            Value::Int(i64::MAX),
            Value::from("a"),
            Value::list([0]),
            Value::map([("k", 0)]),
            Value::Float(-1.0),
        ];
        for pair in values.windows(2) {
            assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn test_shorter_list_orders_first() {
        let short = Value::list(["str1", "str2"]);
        let long = Value::list(["str1", "str2", "str3"]);
        assert_eq!(compare(&short, &long), Ordering::Less);

        // length wins over element values
        let short_high = Value::list([999]);
        let long_low = Value::list([0, 0]);
        assert_eq!(compare(&short_high, &long_low), Ordering::Less);
    }

    #[test]
    fn test_list_elementwise() {
        assert_eq!(
            compare(&Value::list([1, 2, 3]), &Value::list([1, 3, 0])),
            Ordering::Less
        );
        assert_eq!(
            compare(&Value::list([1, 2]), &Value::list([1, 2])),
            Ordering::Equal
        );
    }

    #[test]
    fn test_map_size_then_entries() {
        let one = Value::map([("key1", "val1")]);
        let two = Value::map([("key1", "val1"), ("key2", "val2")]);
        let upper = Value::map([("Key", "Val"), ("Key2", "Val2")]);

        assert_eq!(compare(&one, &upper), Ordering::Less);
        // "key1" > "Key" bytewise
        assert_eq!(compare(&two, &upper), Ordering::Greater);
    }

    #[test]
    fn test_composite_ordering_by_sorted_keys() {
        let dave = Value::map([
            ("street", Value::from("Foo Street 1")),
            ("apartment", Value::from(1)),
            ("zipCode", Value::from("C0123")),
            ("city", Value::from("Bar")),
        ]);
        let carter = Value::map([
            ("street", Value::from("Foo Street 2")),
            ("apartment", Value::from(2)),
            ("zipCode", Value::from("C0124")),
            ("city", Value::from("C0123")),
        ]);
        let empty = Value::map(Vec::<(String, Value)>::new());

        assert_eq!(compare(&dave, &carter), Ordering::Less);
        assert_eq!(compare(&empty, &carter), Ordering::Less);
    }

    #[test]
    fn test_no_cross_type_equality() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::Int(1));
    }
}
