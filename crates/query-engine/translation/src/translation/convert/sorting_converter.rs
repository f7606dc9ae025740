//! Compiles parsed sortings into ordered member descriptors.

use stratadb_query_sql::sql::SqlWhereMember;

use crate::translation::error::Error;
use crate::translation::expr::SortDirection;
use crate::translation::nodes::{Node, ParsedLambda};

use super::members::MemberJoinRegistry;

/// One order-by term: the joined member and its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlSortingMember {
    pub member: SqlWhereMember,
    pub direction: SortDirection,
}

pub struct LambdaToSqlSortingConverter;

impl LambdaToSqlSortingConverter {
    /// Emits one descriptor per sorting node, preserving declared order.
    /// Members already joined by the where-clause reuse their alias.
    pub fn convert(
        lambda: &ParsedLambda,
        registry: &mut MemberJoinRegistry,
    ) -> Result<Vec<SqlSortingMember>, Error> {
        let mut sortings = Vec::with_capacity(lambda.nodes().len());
        for node in lambda.nodes() {
            let sorting = match node {
                Node::Sorting(sorting) => sorting,
                other => {
                    return Err(Error::MalformedNodeSequence(format!(
                        "expected a sorting node, found {other:?}"
                    )))
                }
            };
            sortings.push(SqlSortingMember {
                member: registry.resolve(&sorting.path, sorting.data_type)?,
                direction: sorting.direction,
            });
        }
        Ok(sortings)
    }
}
