//! Filter expression trees
//!
//! The tree mirrors the AND/OR sequence of the parts exactly: a left-deep
//! fold in declaration order, with no AND-over-OR precedence.
//! `A OR B AND C` is `(A OR B) AND C`.

use std::fmt;

use crate::criteria::Criterion;
use crate::part::Join;
use crate::store::Record;

/// Boolean tree over criterion indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Leaf(usize),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
}

impl FilterExpr {
    /// Folds `count` leaves with `joins[i]` between leaf `i` and `i + 1`.
    /// Returns `None` for zero leaves.
    pub fn fold(count: usize, joins: &[Join]) -> Option<FilterExpr> {
        let mut tree = (count > 0).then_some(FilterExpr::Leaf(0))?;
        for (i, join) in joins.iter().enumerate().take(count.saturating_sub(1)) {
            let right = Box::new(FilterExpr::Leaf(i + 1));
            tree = match join {
                Join::And => FilterExpr::And(Box::new(tree), right),
                Join::Or => FilterExpr::Or(Box::new(tree), right),
            };
        }
        Some(tree)
    }

    /// Evaluates the tree against a record, short-circuiting per node
    pub fn evaluate(&self, criteria: &[Criterion], record: &Record) -> bool {
        match self {
            FilterExpr::Leaf(i) => criteria.get(*i).is_some_and(|c| c.matches(record)),
            FilterExpr::And(l, r) => l.evaluate(criteria, record) && r.evaluate(criteria, record),
            FilterExpr::Or(l, r) => l.evaluate(criteria, record) || r.evaluate(criteria, record),
        }
    }

    /// Leaves that must hold for the whole tree to hold: those reachable
    /// from the root through AND nodes only
    pub fn required_leaves(&self) -> Vec<usize> {
        match self {
            FilterExpr::Leaf(i) => vec![*i],
            FilterExpr::And(l, r) => {
                let mut leaves = l.required_leaves();
                leaves.extend(r.required_leaves());
                leaves
            }
            FilterExpr::Or(_, _) => Vec::new(),
        }
    }

    /// Renders the tree with criterion text
    pub fn render(&self, criteria: &[Criterion]) -> String {
        match self {
            FilterExpr::Leaf(i) => criteria
                .get(*i)
                .map_or_else(|| format!("#{}", i), ToString::to_string),
            FilterExpr::And(l, r) => format!("({} AND {})", l.render(criteria), r.render(criteria)),
            FilterExpr::Or(l, r) => format!("({} OR {})", l.render(criteria), r.render(criteria)),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Leaf(i) => write!(f, "#{}", i),
            FilterExpr::And(l, r) => write!(f, "({} AND {})", l, r),
            FilterExpr::Or(l, r) => write!(f, "({} OR {})", l, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_is_left_deep_in_declared_order() {
        let tree = FilterExpr::fold(3, &[Join::Or, Join::And]).unwrap();
        assert_eq!(tree.to_string(), "((#0 OR #1) AND #2)");

        let tree = FilterExpr::fold(3, &[Join::And, Join::Or]).unwrap();
        assert_eq!(tree.to_string(), "((#0 AND #1) OR #2)");

        assert_eq!(FilterExpr::fold(1, &[]), Some(FilterExpr::Leaf(0)));
        assert_eq!(FilterExpr::fold(0, &[]), None);
    }

    #[test]
    fn test_required_leaves_follow_last_or() {
        let tree = FilterExpr::fold(4, &[Join::And, Join::Or, Join::And]).unwrap();
        assert_eq!(tree.required_leaves(), vec![3]);

        let tree = FilterExpr::fold(3, &[Join::And, Join::And]).unwrap();
        assert_eq!(tree.required_leaves(), vec![0, 1, 2]);

        let tree = FilterExpr::fold(2, &[Join::Or]).unwrap();
        assert!(tree.required_leaves().is_empty());
    }
}
