//! The intermediate node sequence produced by the parsers.
//!
//! A sequence is infix-like: operand, operator, operand, optionally chained
//! with `and`/`or`. Every operator has operands on both sides except the
//! unary `is`/`is not` forms, which follow a single operand.

use std::fmt;

use stratadb_query_metadata::metadata::{DataType, MemberPath};
use stratadb_query_sql::sql::ParamValue;

use super::expr::{SortDirection, StringModifier};

/// Operators appearing in parsed where-clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    Is,
    IsNot,
    And,
    Or,
    Not,
}

impl Operator {
    /// The SQL token for this operator.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Like => "like",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }

    /// Whether this operator compares two operands (as opposed to joining
    /// sub-expressions).
    pub fn is_comparison(self) -> bool {
        !matches!(self, Operator::And | Operator::Or | Operator::Not)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A member reference within a clause.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberNode {
    pub path: MemberPath,
    pub data_type: DataType,
    /// Case transformation applied to the column before comparison.
    pub modifier: Option<StringModifier>,
}

/// A nullable member reference. `is_for_has_value_check` marks occurrences
/// originating from a presence check; the nullable transformer rewrites
/// those into explicit `is [not] null` comparisons and clears the flag.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableMemberNode {
    pub path: MemberPath,
    pub data_type: DataType,
    pub is_for_has_value_check: bool,
}

/// One sorting term.
#[derive(Debug, Clone, PartialEq)]
pub struct SortingNode {
    pub path: MemberPath,
    pub data_type: DataType,
    pub direction: SortDirection,
}

/// One include term.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    pub child_structure_name: String,
    pub id_reference_path: MemberPath,
    pub object_reference_path: MemberPath,
}

/// An atomic unit of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Member(MemberNode),
    NullableMember(NullableMemberNode),
    Operator(Operator),
    Value(ParamValue),
    Null,
    Sorting(SortingNode),
    Include(IncludeNode),
}

/// An immutable ordered node sequence representing one clause. Rebuilt,
/// never mutated, by transformer passes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLambda {
    nodes: Vec<Node>,
}

impl ParsedLambda {
    pub fn new(nodes: Vec<Node>) -> ParsedLambda {
        ParsedLambda { nodes }
    }

    pub fn empty() -> ParsedLambda {
        ParsedLambda::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
