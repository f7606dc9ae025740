//! The query command accumulated by builder calls and consumed by the
//! generator.

use std::sync::Arc;

use stratadb_query_metadata::metadata::StructureSchema;

use crate::translation::error::Error;
use crate::translation::expr::{Expr, IncludeExpr, SortExpr};
use crate::translation::nodes::ParsedLambda;
use crate::translation::parser::{IncludeParser, SortingParser, WhereParser};

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page_index: usize,
    pub page_size: usize,
}

impl Paging {
    pub fn new(page_index: usize, page_size: usize) -> Result<Paging, Error> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        Ok(Paging {
            page_index,
            page_size,
        })
    }

    /// One-based inclusive row-number window start.
    pub fn from_row(&self) -> usize {
        self.page_index * self.page_size + 1
    }

    /// One-based inclusive row-number window end.
    pub fn to_row(&self) -> usize {
        self.page_index * self.page_size + self.page_size
    }
}

/// One query under construction: parsed clauses plus take/paging. Populated
/// by successive builder calls, consumed once by the generator. Each parse
/// failure is surfaced at the builder call that caused it.
#[derive(Debug, Clone)]
pub struct Query {
    schema: Arc<StructureSchema>,
    where_lambda: ParsedLambda,
    sortings: ParsedLambda,
    includes: Vec<ParsedLambda>,
    take_count: Option<usize>,
    paging: Option<Paging>,
}

impl Query {
    pub fn new(schema: Arc<StructureSchema>) -> Query {
        Query {
            schema,
            where_lambda: ParsedLambda::empty(),
            sortings: ParsedLambda::empty(),
            includes: vec![],
            take_count: None,
            paging: None,
        }
    }

    /// Parses and sets the predicate. A second call replaces the first;
    /// chaining predicates is done with [`Expr::and`] before the call.
    pub fn where_(mut self, expr: &Expr) -> Result<Query, Error> {
        self.where_lambda = WhereParser::parse(expr)?;
        Ok(self)
    }

    pub fn sort_by(mut self, sortings: &[SortExpr]) -> Result<Query, Error> {
        self.sortings = SortingParser::parse(sortings)?;
        Ok(self)
    }

    pub fn include(mut self, includes: &[IncludeExpr]) -> Result<Query, Error> {
        self.includes.push(IncludeParser::parse(includes)?);
        Ok(self)
    }

    pub fn take(mut self, count: usize) -> Result<Query, Error> {
        if count == 0 {
            return Err(Error::InvalidTakeCount(count));
        }
        self.take_count = Some(count);
        Ok(self)
    }

    pub fn page(mut self, page_index: usize, page_size: usize) -> Result<Query, Error> {
        self.paging = Some(Paging::new(page_index, page_size)?);
        Ok(self)
    }

    pub fn structure_schema(&self) -> &StructureSchema {
        &self.schema
    }

    pub fn where_lambda(&self) -> &ParsedLambda {
        &self.where_lambda
    }

    pub fn sortings(&self) -> &ParsedLambda {
        &self.sortings
    }

    pub fn includes(&self) -> &[ParsedLambda] {
        &self.includes
    }

    pub fn take_count(&self) -> Option<usize> {
        self.take_count
    }

    pub fn paging(&self) -> Option<Paging> {
        self.paging
    }

    pub fn has_where(&self) -> bool {
        !self.where_lambda.is_empty()
    }

    pub fn has_sortings(&self) -> bool {
        !self.sortings.is_empty()
    }

    pub fn has_includes(&self) -> bool {
        self.includes.iter().any(|lambda| !lambda.is_empty())
    }

    pub fn has_take(&self) -> bool {
        self.take_count.is_some()
    }

    pub fn has_paging(&self) -> bool {
        self.paging.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_where()
            && !self.has_sortings()
            && !self.has_includes()
            && !self.has_take()
            && !self.has_paging()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::expr::member;
    use stratadb_query_metadata::metadata::DataType;

    fn query() -> Query {
        Query::new(Arc::new(StructureSchema::new(
            "MyClass",
            [("Int1", DataType::Integer)],
        )))
    }

    #[test]
    fn a_fresh_query_is_empty() {
        let query = query();

        assert!(query.is_empty());
        assert!(!query.has_where());
        assert!(!query.has_sortings());
        assert!(!query.has_includes());
        assert!(!query.has_take());
        assert!(!query.has_paging());
    }

    #[test]
    fn builder_calls_flip_the_flags() {
        let query = query()
            .where_(&member("Int1", DataType::Integer).eq(1))
            .unwrap()
            .sort_by(&[member("Int1", DataType::Integer).asc()])
            .unwrap()
            .take(5)
            .unwrap();

        assert!(!query.is_empty());
        assert!(query.has_where());
        assert!(query.has_sortings());
        assert!(query.has_take());
    }

    #[test]
    fn zero_take_is_rejected_eagerly() {
        let err = query().take(0).unwrap_err();

        assert_eq!(err, Error::InvalidTakeCount(0));
    }

    #[test]
    fn zero_page_size_is_rejected_eagerly() {
        let err = query().page(0, 0).unwrap_err();

        assert_eq!(err, Error::InvalidPageSize(0));
    }

    #[test]
    fn paging_window_is_one_based_inclusive() {
        let paging = Paging::new(1, 10).unwrap();

        assert_eq!(paging.from_row(), 11);
        assert_eq!(paging.to_row(), 20);
    }
}
