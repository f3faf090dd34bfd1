//! Compiled query plans

use std::sync::Arc;

use super::filter::FilterExpr;
use crate::criteria::Criterion;
use crate::store::{IndexDescriptor, IndexRange, Record, RecordFilter};

/// How the store is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    /// Whole set, every record checked against the filter
    FullScan,
    /// Secondary index equality lookup
    IndexEquality,
    /// Secondary index numeric range
    IndexRange,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::FullScan => "FULL_SCAN",
            ScanType::IndexEquality => "INDEX_EQ",
            ScanType::IndexRange => "INDEX_RANGE",
        }
    }
}

/// The driving index of a plan
#[derive(Debug, Clone, PartialEq)]
pub struct IndexScan {
    pub index: IndexDescriptor,
    pub range: IndexRange,
    /// Position of the criterion the index answers
    pub criterion: usize,
}

/// Immutable query plan. Computed per execution, never cached.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub namespace: String,
    pub set: String,
    pub type_name: String,
    /// Criteria in declaration order
    pub criteria: Vec<Criterion>,
    /// `None` when the query has no criteria and matches every record
    pub filter: Option<FilterExpr>,
    pub index_scan: Option<IndexScan>,
}

impl QueryPlan {
    pub fn scan_type(&self) -> ScanType {
        match &self.index_scan {
            None => ScanType::FullScan,
            Some(IndexScan {
                range: IndexRange::Equal(_),
                ..
            }) => ScanType::IndexEquality,
            Some(_) => ScanType::IndexRange,
        }
    }

    /// Criterion answered by the driving index
    pub fn driving_criterion(&self) -> Option<&Criterion> {
        self.index_scan
            .as_ref()
            .and_then(|scan| self.criteria.get(scan.criterion))
    }

    /// Evaluates the whole filter tree. The driving criterion is checked
    /// again: index entries only narrow the candidates.
    pub fn matches(&self, record: &Record) -> bool {
        match &self.filter {
            Some(filter) => filter.evaluate(&self.criteria, record),
            None => true,
        }
    }

    /// The filter tree as a store-side record filter
    pub fn residual_filter(&self) -> Option<RecordFilter> {
        let filter = self.filter.clone()?;
        let criteria = Arc::new(self.criteria.clone());
        Some(Arc::new(move |record: &Record| {
            filter.evaluate(&criteria, record)
        }))
    }

    /// Filter tree rendered with criterion text
    pub fn describe_filter(&self) -> String {
        match &self.filter {
            Some(filter) => filter.render(&self.criteria),
            None => "*".to_string(),
        }
    }
}
