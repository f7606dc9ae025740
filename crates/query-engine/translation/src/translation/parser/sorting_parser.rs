//! Parses sorting expressions into sorting nodes.

use crate::translation::error::Error;
use crate::translation::expr::SortExpr;
use crate::translation::nodes::{Node, ParsedLambda, SortingNode};

pub struct SortingParser;

impl SortingParser {
    /// Emits one sorting node per expression, preserving order. Case
    /// transformations have no meaning in an ordering key and are rejected.
    pub fn parse(sortings: &[SortExpr]) -> Result<ParsedLambda, Error> {
        let mut nodes = Vec::with_capacity(sortings.len());
        for sorting in sortings {
            if sorting.member.modifier.is_some() {
                return Err(Error::NotSupported(
                    "case transformations on sorting members".to_string(),
                ));
            }
            nodes.push(Node::Sorting(SortingNode {
                path: sorting.member.path.clone(),
                data_type: sorting.member.data_type,
                direction: sorting.direction,
            }));
        }
        Ok(ParsedLambda::new(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::expr::{member, SortDirection};
    use stratadb_query_metadata::metadata::{DataType, MemberPath};

    #[test]
    fn emits_one_node_per_sorting_in_order() {
        let lambda = SortingParser::parse(&[
            member("Int1", DataType::Integer).desc(),
            member("String1", DataType::String).asc(),
        ])
        .unwrap();

        assert_eq!(
            lambda.nodes(),
            [
                Node::Sorting(SortingNode {
                    path: MemberPath::parse("Int1"),
                    data_type: DataType::Integer,
                    direction: SortDirection::Desc,
                }),
                Node::Sorting(SortingNode {
                    path: MemberPath::parse("String1"),
                    data_type: DataType::String,
                    direction: SortDirection::Asc,
                }),
            ]
        );
    }

    #[test]
    fn no_sortings_yields_an_empty_lambda() {
        let lambda = SortingParser::parse(&[]).unwrap();

        assert!(lambda.is_empty());
    }

    #[test]
    fn rejects_case_transformed_sorting_members() {
        let result = SortingParser::parse(&[member("String1", DataType::String)
            .to_lower()
            .asc()]);

        assert!(matches!(result, Err(Error::NotSupported(_))));
    }
}
