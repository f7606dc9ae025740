//! Rewrite passes normalizing ambiguous constructs in a node sequence.

use stratadb_query_sql::sql::ParamValue;

use crate::translation::nodes::{Node, NullableMemberNode, Operator, ParsedLambda};

/// A pure, total rewrite over a node sequence. Transformers must never
/// leave the sequence malformed.
pub trait NodesTransformer {
    fn transform(&self, lambda: ParsedLambda) -> ParsedLambda;
}

/// Rewrites nullable has-value checks into explicit `is [not] null`
/// comparisons so the SQL converter never special-cases nullability.
///
/// A flagged nullable member followed by an equality against a boolean
/// literal is rewritten as a triplet (member, `is`/`is not`, null); a flagged
/// member followed by anything else defaults to `is not null` and consumes
/// only itself. Rewritten members have the flag cleared, which makes the
/// pass idempotent: a sequence with no flagged nodes is returned unchanged.
pub struct NullableNodesTransformer;

impl NodesTransformer for NullableNodesTransformer {
    fn transform(&self, lambda: ParsedLambda) -> ParsedLambda {
        let flagged = lambda.nodes().iter().any(|node| {
            matches!(node, Node::NullableMember(n) if n.is_for_has_value_check)
        });
        if !flagged {
            return lambda;
        }

        let nodes = lambda.nodes();
        let mut rewritten = Vec::with_capacity(nodes.len());
        let mut i = 0;
        while i < nodes.len() {
            let member = match &nodes[i] {
                Node::NullableMember(n) if n.is_for_has_value_check => n,
                other => {
                    rewritten.push(other.clone());
                    i += 1;
                    continue;
                }
            };

            let comparison = match (nodes.get(i + 1), nodes.get(i + 2)) {
                (
                    Some(Node::Operator(op @ (Operator::Equal | Operator::NotEqual))),
                    Some(Node::Value(ParamValue::Bool(value))),
                ) => Some((*op, *value)),
                _ => None,
            };

            let operator = match comparison {
                Some((Operator::Equal, false) | (Operator::NotEqual, true)) => Operator::Is,
                // A bare check, or anything that is not a boolean-literal
                // equality, defaults to the presence test.
                _ => Operator::IsNot,
            };

            rewritten.push(Node::NullableMember(NullableMemberNode {
                path: member.path.clone(),
                data_type: member.data_type,
                is_for_has_value_check: false,
            }));
            rewritten.push(Node::Operator(operator));
            rewritten.push(Node::Null);

            i += if comparison.is_some() { 3 } else { 1 };
        }

        ParsedLambda::new(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratadb_query_metadata::metadata::{DataType, MemberPath};

    fn flagged(path: &str) -> Node {
        Node::NullableMember(NullableMemberNode {
            path: MemberPath::parse(path),
            data_type: DataType::Integer,
            is_for_has_value_check: true,
        })
    }

    fn cleared(path: &str) -> Node {
        Node::NullableMember(NullableMemberNode {
            path: MemberPath::parse(path),
            data_type: DataType::Integer,
            is_for_has_value_check: false,
        })
    }

    fn transform(nodes: Vec<Node>) -> ParsedLambda {
        NullableNodesTransformer.transform(ParsedLambda::new(nodes))
    }

    #[test]
    fn bare_check_becomes_is_not_null() {
        let result = transform(vec![flagged("N")]);

        assert_eq!(
            result.nodes(),
            [cleared("N"), Node::Operator(Operator::IsNot), Node::Null]
        );
    }

    #[test]
    fn equals_true_becomes_is_not_null() {
        let result = transform(vec![
            flagged("N"),
            Node::Operator(Operator::Equal),
            Node::Value(ParamValue::Bool(true)),
        ]);

        assert_eq!(
            result.nodes(),
            [cleared("N"), Node::Operator(Operator::IsNot), Node::Null]
        );
    }

    #[test]
    fn not_equals_false_becomes_is_not_null() {
        let result = transform(vec![
            flagged("N"),
            Node::Operator(Operator::NotEqual),
            Node::Value(ParamValue::Bool(false)),
        ]);

        assert_eq!(result.nodes()[1], Node::Operator(Operator::IsNot));
    }

    #[test]
    fn equals_false_becomes_is_null() {
        let result = transform(vec![
            flagged("N"),
            Node::Operator(Operator::Equal),
            Node::Value(ParamValue::Bool(false)),
        ]);

        assert_eq!(
            result.nodes(),
            [cleared("N"), Node::Operator(Operator::Is), Node::Null]
        );
    }

    #[test]
    fn not_equals_true_becomes_is_null() {
        let result = transform(vec![
            flagged("N"),
            Node::Operator(Operator::NotEqual),
            Node::Value(ParamValue::Bool(true)),
        ]);

        assert_eq!(result.nodes()[1], Node::Operator(Operator::Is));
    }

    #[test]
    fn surrounding_nodes_keep_their_positions() {
        let result = transform(vec![
            flagged("N"),
            Node::Operator(Operator::And),
            Node::Member(crate::translation::nodes::MemberNode {
                path: MemberPath::parse("Int1"),
                data_type: DataType::Integer,
                modifier: None,
            }),
            Node::Operator(Operator::Equal),
            Node::Value(ParamValue::Integer(42)),
        ]);

        assert_eq!(result.nodes().len(), 7);
        assert_eq!(result.nodes()[3], Node::Operator(Operator::And));
        assert_eq!(result.nodes()[6], Node::Value(ParamValue::Integer(42)));
    }

    #[test]
    fn transform_is_idempotent() {
        let once = transform(vec![
            flagged("N"),
            Node::Operator(Operator::Equal),
            Node::Value(ParamValue::Bool(false)),
        ]);
        let twice = NullableNodesTransformer.transform(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn unflagged_sequences_pass_through() {
        let nodes = vec![
            cleared("N"),
            Node::Operator(Operator::Equal),
            Node::Value(ParamValue::Integer(1)),
        ];
        let result = transform(nodes.clone());

        assert_eq!(result.nodes(), nodes.as_slice());
    }
}
