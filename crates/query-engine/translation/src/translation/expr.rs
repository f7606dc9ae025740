//! The closed, typed expression surface queries are built from.
//!
//! Supported call shapes are a fixed set of variants; new shapes are added
//! by extending the enums, not through open-ended dispatch.

use std::fmt;

use stratadb_query_metadata::metadata::{DataType, MemberPath};
use stratadb_query_sql::sql::ParamValue;

use crate::translation::error::Error;
use crate::translation::values::param_value_from_json;

/// A comparison between a member and an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

/// String functions that compile to a `like` comparison with positionally
/// injected wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFunction {
    StartsWith,
    EndsWith,
    Contains,
}

/// Case transformations applied to the member before comparison. The
/// compared literal is left unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringModifier {
    ToLower,
    ToUpper,
}

/// A reference to a (possibly nested) member, with its declared category.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRef {
    pub path: MemberPath,
    pub data_type: DataType,
    pub nullable: bool,
    pub modifier: Option<StringModifier>,
}

/// A member reference for a dotted path, e.g. `member("NestedItem.Int1",
/// DataType::Integer)`.
pub fn member(path: &str, data_type: DataType) -> MemberRef {
    MemberRef {
        path: MemberPath::parse(path),
        data_type,
        nullable: false,
        modifier: None,
    }
}

/// A reference to a nullable member, enabling has-value checks.
pub fn nullable_member(path: &str, data_type: DataType) -> MemberRef {
    MemberRef {
        nullable: true,
        ..member(path, data_type)
    }
}

impl MemberRef {
    pub fn to_lower(mut self) -> MemberRef {
        self.modifier = Some(StringModifier::ToLower);
        self
    }

    pub fn to_upper(mut self) -> MemberRef {
        self.modifier = Some(StringModifier::ToUpper);
        self
    }

    fn compare(self, op: CompareOp, right: Operand) -> Expr {
        Expr::Compare {
            left: self,
            op,
            right,
        }
    }

    pub fn eq(self, value: impl Into<ParamValue>) -> Expr {
        self.compare(CompareOp::Eq, Operand::Value(value.into()))
    }

    /// Equality against a JSON scalar, for callers holding untyped document
    /// values. Arrays and objects are rejected.
    pub fn eq_json(self, value: &serde_json::Value) -> Result<Expr, Error> {
        Ok(self.eq(param_value_from_json(value)?))
    }

    pub fn ne(self, value: impl Into<ParamValue>) -> Expr {
        self.compare(CompareOp::Ne, Operand::Value(value.into()))
    }

    pub fn gt(self, value: impl Into<ParamValue>) -> Expr {
        self.compare(CompareOp::Gt, Operand::Value(value.into()))
    }

    pub fn gte(self, value: impl Into<ParamValue>) -> Expr {
        self.compare(CompareOp::Gte, Operand::Value(value.into()))
    }

    pub fn lt(self, value: impl Into<ParamValue>) -> Expr {
        self.compare(CompareOp::Lt, Operand::Value(value.into()))
    }

    pub fn lte(self, value: impl Into<ParamValue>) -> Expr {
        self.compare(CompareOp::Lte, Operand::Value(value.into()))
    }

    /// A raw `like` pattern; no wildcards are injected.
    pub fn like(self, pattern: &str) -> Expr {
        self.compare(CompareOp::Like, Operand::Value(pattern.into()))
    }

    pub fn starts_with(self, value: &str) -> Expr {
        Expr::StringCall {
            member: self,
            function: StringFunction::StartsWith,
            value: value.to_string(),
        }
    }

    pub fn ends_with(self, value: &str) -> Expr {
        Expr::StringCall {
            member: self,
            function: StringFunction::EndsWith,
            value: value.to_string(),
        }
    }

    pub fn contains(self, value: &str) -> Expr {
        Expr::StringCall {
            member: self,
            function: StringFunction::Contains,
            value: value.to_string(),
        }
    }

    /// Compare against another member of the same structure.
    pub fn compare_member(self, op: CompareOp, other: MemberRef) -> Expr {
        self.compare(op, Operand::Member(other))
    }

    pub fn eq_member(self, other: MemberRef) -> Expr {
        self.compare_member(CompareOp::Eq, other)
    }

    /// A bare presence check on a nullable member.
    pub fn has_value(self) -> Expr {
        Expr::HasValue {
            member: self,
            compare: None,
        }
    }

    /// A presence check compared against a boolean literal, e.g.
    /// `has_value_is(CompareOp::Eq, false)`.
    pub fn has_value_is(self, op: CompareOp, value: bool) -> Expr {
        Expr::HasValue {
            member: self,
            compare: Some((op, value)),
        }
    }

    pub fn asc(self) -> SortExpr {
        SortExpr {
            member: self,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(self) -> SortExpr {
        SortExpr {
            member: self,
            direction: SortDirection::Desc,
        }
    }
}

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(ParamValue),
    Member(MemberRef),
}

/// A boolean predicate over one structure's members.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        left: MemberRef,
        op: CompareOp,
        right: Operand,
    },
    StringCall {
        member: MemberRef,
        function: StringFunction,
        value: String,
    },
    HasValue {
        member: MemberRef,
        compare: Option<(CompareOp, bool)>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "Asc"),
            SortDirection::Desc => write!(f, "Desc"),
        }
    }
}

/// One sorting term; direction defaults to ascending via
/// [`MemberRef::asc`].
#[derive(Debug, Clone, PartialEq)]
pub struct SortExpr {
    pub member: MemberRef,
    pub direction: SortDirection,
}

/// A request to join in a referenced child structure's document.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeExpr {
    pub child_structure_name: String,
    /// The parent member holding the child's structure id.
    pub id_reference_path: MemberPath,
    /// The parent member the reconstituted child is assigned to.
    pub object_reference_path: MemberPath,
}

pub fn include(
    child_structure_name: &str,
    id_reference_path: &str,
    object_reference_path: &str,
) -> IncludeExpr {
    IncludeExpr {
        child_structure_name: child_structure_name.to_string(),
        id_reference_path: MemberPath::parse(id_reference_path),
        object_reference_path: MemberPath::parse(object_reference_path),
    }
}
