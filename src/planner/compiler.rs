//! Predicate compiler
//!
//! Folds criteria into a filter tree and picks at most one driving index.
//!
//! A criterion can drive an index when:
//! - it must hold for the whole tree to hold (it follows the last OR)
//! - it is case-sensitive and not on the id field
//! - its operation is equality on a string or integer, or an integer range
//! - the catalog holds an index on the same set, bin, value type,
//!   collection kind and nested context
//!
//! The first such criterion wins. Everything else is residual.

use super::filter::FilterExpr;
use super::plan::{IndexScan, QueryPlan};
use crate::criteria::{Criterion, Operation, Target};
use crate::error::{QueryError, QueryResult};
use crate::index::CatalogSnapshot;
use crate::metadata::EntityMetadata;
use crate::observability::{log_event_with_fields, Event};
use crate::part::Join;
use crate::store::{CollectionType, CtxStep, IndexRange, IndexType};
use crate::value::Value;

/// Compiles criteria against one catalog snapshot
pub struct PredicateCompiler<'a> {
    namespace: &'a str,
    catalog: &'a CatalogSnapshot,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(namespace: &'a str, catalog: &'a CatalogSnapshot) -> Self {
        Self { namespace, catalog }
    }

    /// Compiles criteria joined by `joins` (`joins[i]` sits between
    /// criterion `i` and `i + 1`).
    ///
    /// A missing index is not an error; the plan falls back to a full scan.
    pub fn compile(
        &self,
        entity: &EntityMetadata,
        criteria: Vec<Criterion>,
        joins: &[Join],
    ) -> QueryResult<QueryPlan> {
        if joins.len() != criteria.len().saturating_sub(1) {
            return Err(QueryError::invalid_arguments(format!(
                "{} criteria need {} joins, got {}",
                criteria.len(),
                criteria.len().saturating_sub(1),
                joins.len()
            )));
        }

        let set = entity.set_name().to_string();
        let filter = FilterExpr::fold(criteria.len(), joins);
        let required = filter
            .as_ref()
            .map(FilterExpr::required_leaves)
            .unwrap_or_default();

        let mut index_scan = None;
        for position in required {
            let Some(candidate) = criteria.get(position).and_then(IndexCandidate::of) else {
                continue;
            };
            if let Some(index) = self.catalog.find(
                &set,
                &candidate.bin,
                candidate.index_type,
                candidate.collection,
                &candidate.ctx,
            ) {
                index_scan = Some(IndexScan {
                    index: index.clone(),
                    range: candidate.range,
                    criterion: position,
                });
                break;
            }
        }

        let plan = QueryPlan {
            namespace: self.namespace.to_string(),
            set,
            type_name: entity.type_name.clone(),
            criteria,
            filter,
            index_scan,
        };

        log_event_with_fields(
            Event::QueryPlanned,
            &[
                ("type", &plan.type_name),
                ("set", &plan.set),
                ("scan", plan.scan_type().as_str()),
                ("filter", &plan.describe_filter()),
            ],
        );
        match &plan.index_scan {
            Some(scan) => log_event_with_fields(
                Event::IndexScanSelected,
                &[("index", &scan.index.name), ("range", &scan.range.to_string())],
            ),
            None => log_event_with_fields(Event::FullScanFallback, &[("set", &plan.set)]),
        }

        Ok(plan)
    }
}

/// Index attributes a criterion would need
struct IndexCandidate {
    bin: String,
    index_type: IndexType,
    collection: CollectionType,
    ctx: Vec<CtxStep>,
    range: IndexRange,
}

impl IndexCandidate {
    fn of(criterion: &Criterion) -> Option<Self> {
        let path = criterion.path();
        if criterion.is_ignore_case() || path.is_id() {
            return None;
        }

        let (index_type, range) = index_range(criterion.operation())?;

        let keys: Vec<CtxStep> = path
            .nested_keys()
            .map(|k| CtxStep::MapKey(k.to_string()))
            .collect();
        let (collection, ctx) = match criterion.target() {
            Target::Value if keys.is_empty() => (CollectionType::Default, keys),
            // the leaf is one value of its parent map
            Target::Value => {
                let parent = keys[..keys.len() - 1].to_vec();
                (CollectionType::MapValues, parent)
            }
            Target::AnyElement => (CollectionType::List, keys),
            Target::MapKeys => (CollectionType::MapKeys, keys),
            Target::MapValues | Target::MapEntry(_) => (CollectionType::MapValues, keys),
        };

        Some(Self {
            bin: path.bin().to_string(),
            index_type,
            collection,
            ctx,
            range,
        })
    }
}

fn index_range(operation: &Operation) -> Option<(IndexType, IndexRange)> {
    let numeric = |lo: i64, hi: i64| Some((IndexType::Numeric, IndexRange::Between { lo, hi }));
    match operation {
        Operation::Equals(v @ Value::String(_)) => {
            Some((IndexType::String, IndexRange::Equal(v.clone())))
        }
        Operation::Equals(v @ Value::Int(_)) => {
            Some((IndexType::Numeric, IndexRange::Equal(v.clone())))
        }
        Operation::GreaterThan(Value::Int(n)) => numeric(n.checked_add(1)?, i64::MAX),
        Operation::GreaterThanOrEqual(Value::Int(n)) => numeric(*n, i64::MAX),
        Operation::LessThan(Value::Int(n)) => numeric(i64::MIN, n.checked_sub(1)?),
        Operation::LessThanOrEqual(Value::Int(n)) => numeric(i64::MIN, *n),
        Operation::Between(Value::Int(lo), Value::Int(hi)) => numeric(*lo, *hi),
        _ => None,
    }
}
