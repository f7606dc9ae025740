//! Parse boolean predicates into node sequences.

use stratadb_query_metadata::metadata::DataType;
use stratadb_query_sql::sql::ParamValue;

use crate::translation::error::Error;
use crate::translation::expr::{CompareOp, Expr, MemberRef, Operand, StringFunction};
use crate::translation::nodes::{MemberNode, Node, NullableMemberNode, Operator, ParsedLambda};

use super::transformers::{NodesTransformer, NullableNodesTransformer};

/// Parses a predicate by depth-first traversal, emitting nodes in traversal
/// order, then runs the normalizing transformers.
///
/// The flat sequence carries no grouping tokens, so node order must encode
/// grouping through operator precedence (`not` over `and` over `or`). The
/// tree is normalized first: `not` is pushed down to the comparisons and
/// `and` is distributed over `or`, after which an in-order emission is
/// reconstructible without loss.
pub struct WhereParser;

impl WhereParser {
    pub fn parse(expr: &Expr) -> Result<ParsedLambda, Error> {
        let mut nodes = Vec::new();
        visit(&normalize(expr), &mut nodes)?;
        Ok(NullableNodesTransformer.transform(ParsedLambda::new(nodes)))
    }
}

fn normalize(expr: &Expr) -> Expr {
    match expr {
        Expr::Not(inner) => negate(inner),
        Expr::And(left, right) => conjoin(normalize(left), normalize(right)),
        Expr::Or(left, right) => Expr::Or(Box::new(normalize(left)), Box::new(normalize(right))),
        leaf => leaf.clone(),
    }
}

fn negate(expr: &Expr) -> Expr {
    match expr {
        Expr::Not(inner) => normalize(inner),
        Expr::And(left, right) => Expr::Or(Box::new(negate(left)), Box::new(negate(right))),
        Expr::Or(left, right) => conjoin(negate(left), negate(right)),
        leaf => Expr::Not(Box::new(leaf.clone())),
    }
}

/// Conjoins two normalized sub-trees, distributing over any top-level `or`
/// so an `or` never ends up beneath an `and`.
fn conjoin(left: Expr, right: Expr) -> Expr {
    match (left, right) {
        (Expr::Or(a, b), right) => Expr::Or(
            Box::new(conjoin(*a, right.clone())),
            Box::new(conjoin(*b, right)),
        ),
        (left, Expr::Or(a, b)) => Expr::Or(
            Box::new(conjoin(left.clone(), *a)),
            Box::new(conjoin(left, *b)),
        ),
        (left, right) => Expr::And(Box::new(left), Box::new(right)),
    }
}

fn visit(expr: &Expr, nodes: &mut Vec<Node>) -> Result<(), Error> {
    match expr {
        Expr::And(left, right) => {
            visit(left, nodes)?;
            nodes.push(Node::Operator(Operator::And));
            visit(right, nodes)
        }
        Expr::Or(left, right) => {
            visit(left, nodes)?;
            nodes.push(Node::Operator(Operator::Or));
            visit(right, nodes)
        }
        Expr::Not(inner) => {
            nodes.push(Node::Operator(Operator::Not));
            visit(inner, nodes)
        }
        Expr::Compare { left, op, right } => visit_compare(left, *op, right, nodes),
        Expr::StringCall {
            member,
            function,
            value,
        } => visit_string_call(member, *function, value, nodes),
        Expr::HasValue { member, compare } => visit_has_value(member, *compare, nodes),
    }
}

fn visit_compare(
    left: &MemberRef,
    op: CompareOp,
    right: &Operand,
    nodes: &mut Vec<Node>,
) -> Result<(), Error> {
    match right {
        Operand::Value(ParamValue::Null) => {
            let operator = match op {
                CompareOp::Eq => Operator::Is,
                CompareOp::Ne => Operator::IsNot,
                _ => {
                    return Err(Error::NotSupported(
                        "ordered comparisons against null".to_string(),
                    ))
                }
            };
            nodes.push(member_node(left)?);
            nodes.push(Node::Operator(operator));
            nodes.push(Node::Null);
            Ok(())
        }
        Operand::Value(value) => {
            nodes.push(member_node(left)?);
            nodes.push(Node::Operator(operator_for(op)));
            nodes.push(Node::Value(value.clone()));
            Ok(())
        }
        Operand::Member(other) => {
            if op == CompareOp::Like {
                return Err(Error::NotSupported(
                    "`like` between two members".to_string(),
                ));
            }
            nodes.push(member_node(left)?);
            nodes.push(Node::Operator(operator_for(op)));
            nodes.push(member_node(other)?);
            Ok(())
        }
    }
}

fn visit_string_call(
    member: &MemberRef,
    function: StringFunction,
    value: &str,
    nodes: &mut Vec<Node>,
) -> Result<(), Error> {
    if member.data_type != DataType::String {
        return Err(Error::NotSupported(
            "string functions on non-string members".to_string(),
        ));
    }
    // Wildcards are injected positionally; the like comparison itself is a
    // plain member comparison.
    let pattern = match function {
        StringFunction::StartsWith => format!("{value}%"),
        StringFunction::EndsWith => format!("%{value}"),
        StringFunction::Contains => format!("%{value}%"),
    };
    nodes.push(member_node(member)?);
    nodes.push(Node::Operator(Operator::Like));
    nodes.push(Node::Value(ParamValue::String(pattern)));
    Ok(())
}

fn visit_has_value(
    member: &MemberRef,
    compare: Option<(CompareOp, bool)>,
    nodes: &mut Vec<Node>,
) -> Result<(), Error> {
    if !member.nullable {
        return Err(Error::NotSupported(
            "has-value checks on non-nullable members".to_string(),
        ));
    }
    nodes.push(Node::NullableMember(NullableMemberNode {
        path: member.path.clone(),
        data_type: member.data_type,
        is_for_has_value_check: true,
    }));
    if let Some((op, value)) = compare {
        let operator = match op {
            CompareOp::Eq => Operator::Equal,
            CompareOp::Ne => Operator::NotEqual,
            _ => {
                return Err(Error::NotSupported(
                    "ordered comparisons on has-value checks".to_string(),
                ))
            }
        };
        nodes.push(Node::Operator(operator));
        nodes.push(Node::Value(ParamValue::Bool(value)));
    }
    Ok(())
}

fn member_node(member: &MemberRef) -> Result<Node, Error> {
    if member.modifier.is_some() && member.data_type != DataType::String {
        return Err(Error::NotSupported(
            "case transformations on non-string members".to_string(),
        ));
    }
    if member.nullable {
        if member.modifier.is_some() {
            return Err(Error::NotSupported(
                "case transformations on nullable members".to_string(),
            ));
        }
        return Ok(Node::NullableMember(NullableMemberNode {
            path: member.path.clone(),
            data_type: member.data_type,
            is_for_has_value_check: false,
        }));
    }
    Ok(Node::Member(MemberNode {
        path: member.path.clone(),
        data_type: member.data_type,
        modifier: member.modifier,
    }))
}

fn operator_for(op: CompareOp) -> Operator {
    match op {
        CompareOp::Eq => Operator::Equal,
        CompareOp::Ne => Operator::NotEqual,
        CompareOp::Gt => Operator::GreaterThan,
        CompareOp::Gte => Operator::GreaterThanOrEqual,
        CompareOp::Lt => Operator::LessThan,
        CompareOp::Lte => Operator::LessThanOrEqual,
        CompareOp::Like => Operator::Like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::expr::{member, nullable_member, StringModifier};
    use stratadb_query_metadata::metadata::MemberPath;

    fn string1() -> MemberRef {
        member("String1", DataType::String)
    }

    #[test]
    fn equality_emits_member_operator_value() {
        let lambda = WhereParser::parse(&member("Int1", DataType::Integer).eq(42)).unwrap();

        assert_eq!(
            lambda.nodes(),
            [
                Node::Member(MemberNode {
                    path: MemberPath::parse("Int1"),
                    data_type: DataType::Integer,
                    modifier: None,
                }),
                Node::Operator(Operator::Equal),
                Node::Value(ParamValue::Integer(42)),
            ]
        );
    }

    #[test]
    fn starts_with_appends_wildcard() {
        let lambda = WhereParser::parse(&string1().starts_with("Foo")).unwrap();

        assert_eq!(
            lambda.nodes()[1..],
            [
                Node::Operator(Operator::Like),
                Node::Value(ParamValue::String("Foo%".to_string())),
            ]
        );
    }

    #[test]
    fn ends_with_prepends_wildcard() {
        let lambda = WhereParser::parse(&string1().ends_with("bar")).unwrap();

        assert_eq!(
            lambda.nodes()[2],
            Node::Value(ParamValue::String("%bar".to_string()))
        );
    }

    #[test]
    fn contains_wraps_in_wildcards() {
        let lambda = WhereParser::parse(&string1().contains("Foo")).unwrap();

        assert_eq!(
            lambda.nodes()[2],
            Node::Value(ParamValue::String("%Foo%".to_string()))
        );
    }

    #[test]
    fn to_lower_marks_the_member_and_leaves_the_literal() {
        let lambda = WhereParser::parse(&string1().to_lower().eq("foo")).unwrap();

        assert_eq!(
            lambda.nodes(),
            [
                Node::Member(MemberNode {
                    path: MemberPath::parse("String1"),
                    data_type: DataType::String,
                    modifier: Some(StringModifier::ToLower),
                }),
                Node::Operator(Operator::Equal),
                Node::Value(ParamValue::String("foo".to_string())),
            ]
        );
    }

    #[test]
    fn nested_member_paths_are_dot_joined() {
        let lambda =
            WhereParser::parse(&member("NestedItem.Int1", DataType::Integer).eq(1)).unwrap();

        match &lambda.nodes()[0] {
            Node::Member(m) => assert_eq!(m.path.to_string(), "NestedItem.Int1"),
            other => panic!("expected member node, got {other:?}"),
        }
    }

    #[test]
    fn and_joins_two_sub_sequences() {
        let expr = member("Int1", DataType::Integer)
            .gte(40)
            .and(member("Int1", DataType::Integer).lte(42));
        let lambda = WhereParser::parse(&expr).unwrap();

        assert_eq!(lambda.nodes()[3], Node::Operator(Operator::And));
        assert_eq!(lambda.nodes().len(), 7);
    }

    #[test]
    fn or_nested_under_and_is_distributed() {
        let a = || member("Int1", DataType::Integer).eq(1);
        let b = || member("Int1", DataType::Integer).eq(2);
        let c = || member("String1", DataType::String).eq("x");
        let lambda = WhereParser::parse(&a().or(b()).and(c())).unwrap();
        let distributed = WhereParser::parse(&a().and(c()).or(b().and(c()))).unwrap();

        assert_eq!(lambda, distributed);
    }

    #[test]
    fn negated_conjunction_is_pushed_to_the_comparisons() {
        let a = || member("Int1", DataType::Integer).eq(1);
        let b = || member("Int1", DataType::Integer).eq(2);
        let lambda = WhereParser::parse(&a().and(b()).not()).unwrap();
        let pushed = WhereParser::parse(&a().not().or(b().not())).unwrap();

        assert_eq!(lambda, pushed);
    }

    #[test]
    fn double_negation_cancels() {
        let expr = member("Int1", DataType::Integer).eq(1);
        let plain = WhereParser::parse(&expr).unwrap();
        let doubled = WhereParser::parse(&expr.clone().not().not()).unwrap();

        assert_eq!(plain, doubled);
    }

    #[test]
    fn equals_null_becomes_is_null() {
        let lambda =
            WhereParser::parse(&nullable_member("N", DataType::Integer).eq(ParamValue::Null))
                .unwrap();

        assert_eq!(lambda.nodes()[1], Node::Operator(Operator::Is));
        assert_eq!(lambda.nodes()[2], Node::Null);
    }

    #[test]
    fn string_functions_on_non_string_members_are_rejected() {
        let err = WhereParser::parse(&member("Int1", DataType::Integer).starts_with("x"))
            .unwrap_err();

        assert_eq!(
            err,
            Error::NotSupported("string functions on non-string members".to_string())
        );
    }

    #[test]
    fn has_value_on_non_nullable_members_is_rejected() {
        let err = WhereParser::parse(&member("Int1", DataType::Integer).has_value()).unwrap_err();

        assert_eq!(
            err,
            Error::NotSupported("has-value checks on non-nullable members".to_string())
        );
    }

    #[test]
    fn like_between_two_members_is_rejected() {
        let err = WhereParser::parse(
            &string1().compare_member(CompareOp::Like, member("String2", DataType::String)),
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::NotSupported("`like` between two members".to_string())
        );
    }
}
