//! Part tree queries

use std::sync::Arc;

use crate::config::QueryConfig;
use crate::criteria::{CriteriaBuilder, Criterion};
use crate::error::{QueryError, QueryResult};
use crate::executor::{Page, PageRequest, QueryExecutor, ResultSorter, Results, Slice};
use crate::index::IndexCatalog;
use crate::metadata::MetadataProvider;
use crate::observability::{log_event_with_fields, metrics, Event};
use crate::part::{PartTree, Sort};
use crate::planner::{ExplainPlan, PredicateCompiler, QueryPlan};
use crate::resolver::PathResolver;
use crate::store::StoreClient;

/// Requested result shape
#[derive(Debug, Clone, PartialEq)]
pub enum ResultShape {
    /// Lazy sequence
    All { sort: Sort },
    /// Window without a total count
    Slice {
        offset: usize,
        size: usize,
        sort: Sort,
    },
    /// Window with the total count
    Page(PageRequest),
    Count,
}

/// Result of [`PartTreeQuery::execute`]
pub enum QueryOutput {
    All(Results),
    Slice(Slice),
    Page(Page),
    Count(u64),
}

/// Plan plus sorter for one invocation
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub plan: QueryPlan,
    pub sorter: ResultSorter,
    /// `Top N` cap of the method
    pub limit: Option<usize>,
}

/// Derives and runs the query of a part tree.
///
/// Every invocation resolves, compiles and plans afresh against the
/// current index catalog snapshot; only the catalog is shared.
#[derive(Clone)]
pub struct PartTreeQuery {
    metadata: Arc<dyn MetadataProvider>,
    catalog: Arc<IndexCatalog>,
    executor: QueryExecutor,
    config: QueryConfig,
}

impl PartTreeQuery {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        client: Arc<dyn StoreClient>,
        catalog: Arc<IndexCatalog>,
        config: QueryConfig,
    ) -> Self {
        Self {
            metadata,
            catalog,
            executor: QueryExecutor::new(client),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<IndexCatalog> {
        &self.catalog
    }

    /// Runs the tree in the requested shape
    pub fn execute(&self, tree: &PartTree, shape: ResultShape) -> QueryResult<QueryOutput> {
        Ok(match shape {
            ResultShape::All { sort } => QueryOutput::All(self.find_all(tree, &sort)?),
            ResultShape::Slice { offset, size, sort } => {
                QueryOutput::Slice(self.find_slice(tree, offset, size, &sort)?)
            }
            ResultShape::Page(request) => QueryOutput::Page(self.find_page(tree, &request)?),
            ResultShape::Count => QueryOutput::Count(self.count(tree)?),
        })
    }

    /// Lazy sequence of matching records
    pub fn find_all(&self, tree: &PartTree, sort: &Sort) -> QueryResult<Results> {
        let prepared = self.prepare(tree, sort)?;
        self.executor
            .find_all(&prepared.plan, &prepared.sorter, prepared.limit)
    }

    /// Bounded slice; never reports a next slice
    pub fn find_slice(
        &self,
        tree: &PartTree,
        offset: usize,
        size: usize,
        sort: &Sort,
    ) -> QueryResult<Slice> {
        let prepared = self.prepare(tree, sort)?;
        self.executor
            .find_slice(&prepared.plan, &prepared.sorter, offset, size, prepared.limit)
    }

    /// Counted page
    pub fn find_page(&self, tree: &PartTree, request: &PageRequest) -> QueryResult<Page> {
        let prepared = self.prepare(tree, &request.sort)?;
        self.executor
            .find_page(&prepared.plan, &prepared.sorter, request, prepared.limit)
    }

    /// Always fails: counting by criteria is not supported against the store
    pub fn count(&self, tree: &PartTree) -> QueryResult<u64> {
        self.executor.count(&tree.qualified_name())
    }

    /// Explain output for the tree, or for the error that rejects it
    pub fn explain(&self, tree: &PartTree, sort: &Sort) -> ExplainPlan {
        match self.prepare(tree, sort) {
            Ok(prepared) => {
                let sort = tree.order_by().clone().and(sort);
                ExplainPlan::from_plan(&prepared.plan)
                    .with_sort(&sort)
                    .with_paging(0, prepared.limit.map(|n| n as u64))
            }
            Err(e) => ExplainPlan::from_error(&e),
        }
    }

    /// Resolves, builds and compiles the tree. The static `OrderBy` sort
    /// orders ahead of the dynamic `sort`.
    pub fn prepare(&self, tree: &PartTree, sort: &Sort) -> QueryResult<PreparedQuery> {
        self.try_prepare(tree, sort).inspect_err(|e| {
            metrics().increment_queries_rejected();
            log_event_with_fields(
                Event::QueryRejected,
                &[
                    ("method", &tree.qualified_name()),
                    ("code", e.code()),
                    ("reason", &e.to_string()),
                ],
            );
        })
    }

    fn try_prepare(&self, tree: &PartTree, sort: &Sort) -> QueryResult<PreparedQuery> {
        if tree.is_count() {
            return Err(QueryError::unsupported_operation(tree.qualified_name()));
        }

        let entity = self.metadata.require(tree.type_name())?;
        let resolver = PathResolver::new(self.metadata.as_ref(), tree.type_name())?;

        let criteria = tree
            .parts()
            .iter()
            .map(|part| {
                let path = resolver.resolve(part.property())?;
                CriteriaBuilder::from_part(path, part)
            })
            .collect::<QueryResult<Vec<Criterion>>>()?;

        let snapshot = self.catalog.snapshot();
        let plan = PredicateCompiler::new(&self.config.namespace, &snapshot).compile(
            entity,
            criteria,
            tree.joins(),
        )?;
        if plan.index_scan.is_none() && !self.config.scans_enabled {
            return Err(QueryError::unsupported_operation(format!(
                "{} (no index drives it and scans are disabled)",
                tree.qualified_name()
            )));
        }

        let sort = tree.order_by().clone().and(sort);
        let sorter = ResultSorter::resolve(&resolver, &sort)?;

        Ok(PreparedQuery {
            plan,
            sorter,
            limit: tree.max_results(),
        })
    }
}
