//! Explain output
//!
//! Deterministic, human-readable rendering of a compiled plan or of the
//! error that rejected it.

use std::fmt;

use super::plan::QueryPlan;
use crate::error::QueryError;
use crate::part::Sort;

/// Explain plan output
#[derive(Debug, Clone)]
pub struct ExplainPlan {
    /// Whether compilation succeeded
    pub accepted: bool,
    /// Set the query reads
    pub set: Option<String>,
    pub scan_type: Option<String>,
    /// Driving index (if any)
    pub selected_index: Option<String>,
    /// Index range of the driving criterion
    pub index_range: Option<String>,
    /// Criteria in declaration order
    pub criteria: Vec<String>,
    /// Filter tree evaluated per record
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a compiled query plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        Self {
            accepted: true,
            set: Some(format!("{}.{}", plan.namespace, plan.set)),
            scan_type: Some(plan.scan_type().as_str().to_string()),
            selected_index: plan.index_scan.as_ref().map(|s| s.index.to_string()),
            index_range: plan.index_scan.as_ref().map(|s| s.range.to_string()),
            criteria: plan.criteria.iter().map(ToString::to_string).collect(),
            filter: plan.filter.as_ref().map(|f| f.render(&plan.criteria)),
            sort: None,
            offset: None,
            limit: None,
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a compilation error
    pub fn from_error(err: &QueryError) -> Self {
        Self {
            accepted: false,
            set: None,
            scan_type: None,
            selected_index: None,
            index_range: None,
            criteria: Vec::new(),
            filter: None,
            sort: None,
            offset: None,
            limit: None,
            rejection_reason: Some(err.to_string()),
            rejection_code: Some(err.code().to_string()),
        }
    }

    pub fn with_sort(mut self, sort: &Sort) -> Self {
        self.sort = sort.is_sorted().then(|| sort.to_string());
        self
    }

    pub fn with_paging(mut self, offset: u64, limit: Option<u64>) -> Self {
        self.offset = Some(offset);
        self.limit = limit;
        self
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(set) = &self.set {
                writeln!(f, "Set: {}", set)?;
            }
            if let Some(scan) = &self.scan_type {
                writeln!(f, "Scan Type: {}", scan)?;
            }
            if let Some(index) = &self.selected_index {
                writeln!(f, "Driving Index: {}", index)?;
            }
            if let Some(range) = &self.index_range {
                writeln!(f, "Index Range: {}", range)?;
            }
            if !self.criteria.is_empty() {
                writeln!(f, "Criteria:")?;
                for (i, criterion) in self.criteria.iter().enumerate() {
                    writeln!(f, "  #{} {}", i, criterion)?;
                }
            }
            if let Some(filter) = &self.filter {
                writeln!(f, "Record Filter: {}", filter)?;
            }
            if let Some(sort) = &self.sort {
                writeln!(f, "Sort: {}", sort)?;
            }
            if let Some(offset) = self.offset {
                writeln!(f, "Offset: {}", offset)?;
            }
            if let Some(limit) = self.limit {
                writeln!(f, "Limit: {}", limit)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaBuilder;
    use crate::index::CatalogSnapshot;
    use crate::metadata::{EntityMetadata, FieldDescriptor, TypeRegistry};
    use crate::part::{Keyword, Order};
    use crate::planner::PredicateCompiler;
    use crate::resolver::PathResolver;
    use crate::store::{IndexDescriptor, IndexType};

    fn plan(catalog: &CatalogSnapshot) -> QueryPlan {
        let entity = EntityMetadata::new("Person")
            .with_set("person")
            .field(FieldDescriptor::scalar("lastName"))
            .field(FieldDescriptor::scalar("age"));
        let registry = TypeRegistry::new().with(entity.clone());
        let resolver = PathResolver::new(&registry, "Person").unwrap();
        let criterion = CriteriaBuilder::build(
            resolver.resolve("age").unwrap(),
            Keyword::Between,
            false,
            &[40.into(), 45.into()],
            None,
        )
        .unwrap();
        PredicateCompiler::new("test", catalog)
            .compile(&entity, vec![criterion], &[])
            .unwrap()
    }

    #[test]
    fn test_explain_index_plan() {
        let catalog = CatalogSnapshot::new([IndexDescriptor::new(
            "age_idx",
            "test",
            "person",
            "age",
            IndexType::Numeric,
        )]);
        let explain = ExplainPlan::from_plan(&plan(&catalog))
            .with_sort(&Sort::by(Order::asc("lastName")))
            .with_paging(0, Some(10));

        assert!(explain.accepted);
        assert_eq!(explain.scan_type.as_deref(), Some("INDEX_RANGE"));
        assert_eq!(explain.index_range.as_deref(), Some("[40, 45]"));

        let output = explain.to_string();
        assert!(output.starts_with("=== EXPLAIN PLAN ==="));
        assert!(output.contains("Driving Index: age_idx ON test.person(age) NUMERIC DEFAULT"));
        assert!(output.contains("Limit: 10"));
    }

    #[test]
    fn test_explain_full_scan_plan() {
        let explain = ExplainPlan::from_plan(&plan(&CatalogSnapshot::default()));
        assert_eq!(explain.scan_type.as_deref(), Some("FULL_SCAN"));
        assert!(explain.selected_index.is_none());
        assert_eq!(explain.criteria.len(), 1);
    }

    #[test]
    fn test_explain_rejected() {
        let err = QueryError::unsupported_operator(Keyword::NotIn);
        let explain = ExplainPlan::from_error(&err);

        assert!(!explain.accepted);
        let output = explain.to_string();
        assert!(output.contains("REJECTED"));
        assert!(output.contains(err.code()));
        assert!(output.contains("NOT_IN"));
    }

    #[test]
    fn test_explain_deterministic() {
        let catalog = CatalogSnapshot::default();
        let first = ExplainPlan::from_plan(&plan(&catalog)).to_string();
        let second = ExplainPlan::from_plan(&plan(&catalog)).to_string();
        assert_eq!(first, second);
    }
}
