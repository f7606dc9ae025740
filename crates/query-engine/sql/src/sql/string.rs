//! Type definitions of a low-level SQL string representation.

use std::fmt;

use serde::Serialize;

/// An accumulating SQL statement plus the parameters extracted for it.
///
/// Parameters are named `@p0`, `@p1`, ... strictly in declaration order;
/// a name is never reused even when the same literal value recurs.
#[derive(Debug, Default, PartialEq)]
pub struct Sql {
    pub sql: String,
    pub params: Vec<DacParameter>,
    param_index: usize,
}

impl Sql {
    pub fn new() -> Sql {
        Sql::default()
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a bracket-quoted identifier, e.g. `[StructureId]`.
    pub fn append_identifier(&mut self, ident: &str) {
        self.sql.push('[');
        self.sql.push_str(ident);
        self.sql.push(']');
    }

    /// Append a single-quoted string literal, doubling embedded quotes.
    pub fn append_string_literal(&mut self, literal: &str) {
        self.sql.push('\'');
        self.sql.push_str(&literal.replace('\'', "''"));
        self.sql.push('\'');
    }

    /// Record the next positional parameter and return its marker. Used when
    /// the marker is embedded in a fragment assembled out of line; the
    /// counter is shared with [`append_param`](Self::append_param).
    pub fn push_param(&mut self, value: ParamValue) -> String {
        let name = format!("@p{}", self.param_index);
        self.param_index += 1;
        self.params.push(DacParameter::new(name.as_str(), value));
        name
    }

    /// Append the next positional parameter marker and record its value.
    pub fn append_param(&mut self, value: ParamValue) {
        let name = self.push_param(value);
        self.sql.push_str(&name);
    }

    /// Record a parameter with an explicit name, e.g. `@pagingFrom`, without
    /// emitting a marker.
    pub fn push_named_param(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.params.push(DacParameter::new(name, value));
    }

    /// Append a named parameter marker and record its value.
    pub fn append_named_param(&mut self, name: &str, value: ParamValue) {
        self.sql.push_str(name);
        self.push_named_param(name, value);
    }
}

/// A (name, value) pair handed to the parameterized-command interface of the
/// execution layer. Two parameters are equal when both name and value are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DacParameter {
    pub name: String,
    pub value: ParamValue,
}

impl DacParameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> DacParameter {
        DacParameter {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parameter value, covering the member value categories plus null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamValue {
    Integer(i64),
    Fraction(f64),
    Bool(bool),
    String(String),
    Null,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Fraction(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::String(s) => write!(f, "{s}"),
            ParamValue::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> ParamValue {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> ParamValue {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> ParamValue {
        ParamValue::Fraction(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> ParamValue {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> ParamValue {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> ParamValue {
        ParamValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_numbered_in_declaration_order() {
        let mut sql = Sql::new();
        sql.append_param(ParamValue::Integer(42));
        sql.append_param(ParamValue::Integer(42));

        assert_eq!(sql.sql, "@p0@p1");
        assert_eq!(sql.params[0], DacParameter::new("@p0", 42));
        assert_eq!(sql.params[1], DacParameter::new("@p1", 42));
    }

    #[test]
    fn pushed_and_appended_params_share_one_counter() {
        let mut sql = Sql::new();
        let marker = sql.push_param(ParamValue::Integer(1));
        sql.append_param(ParamValue::Integer(2));

        assert_eq!(marker, "@p0");
        assert_eq!(sql.sql, "@p1");
        assert_eq!(sql.params[0], DacParameter::new("@p0", 1));
        assert_eq!(sql.params[1], DacParameter::new("@p1", 2));
    }

    #[test]
    fn identifiers_are_bracket_quoted() {
        let mut sql = Sql::new();
        sql.append_identifier("StructureId");
        assert_eq!(sql.sql, "[StructureId]");
    }

    #[test]
    fn string_literals_double_embedded_quotes() {
        let mut sql = Sql::new();
        sql.append_string_literal("O'Brien");
        assert_eq!(sql.sql, "'O''Brien'");
    }
}
