//! Compiles a parsed where-clause into a SQL predicate fragment.

use stratadb_query_metadata::metadata::IndexStorageSchema;
use stratadb_query_sql::sql::{DbQuery, ParamValue, Sql};

use crate::translation::error::Error;
use crate::translation::expr::StringModifier;
use crate::translation::nodes::{Node, Operator, ParsedLambda};

use super::members::MemberJoinRegistry;

/// Evaluates the flat node sequence left to right with an operand/operator
/// stack. Comparisons collapse to parenthesized fragments as they complete;
/// `and`/`or`/`not` reduce under the precedence `not` > `and` > `or`. Member
/// references resolve through a shared [`MemberJoinRegistry`], values become
/// positional parameters (`@p0`, `@p1`, ...) in declaration order.
pub struct LambdaToSqlWhereConverter;

impl LambdaToSqlWhereConverter {
    pub fn convert(
        lambda: &ParsedLambda,
        registry: &mut MemberJoinRegistry,
    ) -> Result<DbQuery, Error> {
        if lambda.is_empty() {
            return Ok(DbQuery::empty());
        }

        let mut state = ConvertState {
            registry,
            operands: Vec::new(),
            operators: Vec::new(),
            params: Sql::new(),
        };

        let nodes = lambda.nodes();
        let mut i = 0;
        while i < nodes.len() {
            match &nodes[i] {
                Node::Member(..) | Node::NullableMember(..) => {
                    state.push_comparison(nodes, i)?;
                    i += 3;
                }
                Node::Operator(op @ (Operator::And | Operator::Or)) => {
                    state.reduce_down_to(precedence(*op))?;
                    state.operators.push(*op);
                    i += 1;
                }
                Node::Operator(Operator::Not) => {
                    state.operators.push(Operator::Not);
                    i += 1;
                }
                other => {
                    return Err(Error::MalformedNodeSequence(format!(
                        "expected an operand or connective, found {other:?}"
                    )))
                }
            }
        }
        state.reduce_down_to(0)?;

        match (state.operands.pop(), state.operands.is_empty()) {
            (Some(sql), true) => Ok(DbQuery::new(sql, state.params.params)),
            _ => Err(Error::MalformedNodeSequence(
                "predicate did not reduce to a single expression".to_string(),
            )),
        }
    }
}

struct ConvertState<'r, 'a> {
    registry: &'r mut MemberJoinRegistry<'a>,
    operands: Vec<String>,
    operators: Vec<Operator>,
    // Parameter sink only; the predicate text lives on the operand stack.
    params: Sql,
}

impl ConvertState<'_, '_> {
    /// Consumes the (member, operator, operand) triplet starting at `i` and
    /// pushes the resulting parenthesized fragment.
    fn push_comparison(&mut self, nodes: &[Node], i: usize) -> Result<(), Error> {
        let left = self.column(&nodes[i])?;
        let operator = match nodes.get(i + 1) {
            Some(Node::Operator(op)) if op.is_comparison() => *op,
            other => {
                return Err(Error::MalformedNodeSequence(format!(
                    "member not followed by a comparison operator: {other:?}"
                )))
            }
        };
        let right = match nodes.get(i + 2) {
            Some(Node::Value(value)) => self.parameter(value),
            Some(Node::Null) => "null".to_string(),
            Some(node @ (Node::Member(..) | Node::NullableMember(..))) => self.column(node)?,
            other => {
                return Err(Error::MalformedNodeSequence(format!(
                    "comparison without a right-hand operand: {other:?}"
                )))
            }
        };

        self.push_operand(format!("({left} {} {right})", operator.token()));
        Ok(())
    }

    fn push_operand(&mut self, mut operand: String) {
        while self.operators.last() == Some(&Operator::Not) {
            self.operators.pop();
            operand = format!("not {operand}");
        }
        self.operands.push(operand);
    }

    fn reduce_down_to(&mut self, floor: u8) -> Result<(), Error> {
        while let Some(&top) = self.operators.last() {
            if precedence(top) < floor {
                break;
            }
            self.operators.pop();
            let (right, left) = (self.operands.pop(), self.operands.pop());
            match (left, right) {
                (Some(left), Some(right)) => {
                    let joined = format!("({left} {} {right})", top.token());
                    self.push_operand(joined);
                }
                _ => {
                    return Err(Error::MalformedNodeSequence(format!(
                        "`{top}` without operands on both sides"
                    )))
                }
            }
        }
        Ok(())
    }

    fn column(&mut self, node: &Node) -> Result<String, Error> {
        let (path, data_type, modifier) = match node {
            Node::Member(m) => (&m.path, m.data_type, m.modifier),
            Node::NullableMember(m) => (&m.path, m.data_type, None),
            other => {
                return Err(Error::MalformedNodeSequence(format!(
                    "expected a member reference, found {other:?}"
                )))
            }
        };
        let member = self.registry.resolve(path, data_type)?;
        let column = format!("{}.[{}]", member.alias, IndexStorageSchema::VALUE);
        Ok(match modifier {
            Some(StringModifier::ToLower) => format!("lower({column})"),
            Some(StringModifier::ToUpper) => format!("upper({column})"),
            None => column,
        })
    }

    fn parameter(&mut self, value: &ParamValue) -> String {
        self.params.push_param(value.clone())
    }
}

fn precedence(op: Operator) -> u8 {
    match op {
        Operator::Or => 1,
        Operator::And => 2,
        Operator::Not => 3,
        // Comparisons never sit on the operator stack.
        _ => 0,
    }
}
