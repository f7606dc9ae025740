//! The compiled output handed to the execution layer, and the descriptor
//! correlating a member reference with its synthesized join alias.

use stratadb_query_metadata::metadata::{DataType, MemberPath};

use super::string::DacParameter;

/// An immutable (sql-text, parameter-list) pair, or an explicit empty
/// sentinel when a clause produced no SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct DbQuery {
    sql: String,
    parameters: Vec<DacParameter>,
    is_empty: bool,
}

impl DbQuery {
    /// Structurally equal (name, value) pairs are deduplicated, keeping the
    /// first occurrence.
    pub fn new(sql: String, parameters: Vec<DacParameter>) -> DbQuery {
        let mut distinct: Vec<DacParameter> = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if !distinct.contains(&parameter) {
                distinct.push(parameter);
            }
        }
        DbQuery {
            sql,
            parameters: distinct,
            is_empty: false,
        }
    }

    pub fn empty() -> DbQuery {
        DbQuery {
            sql: String::new(),
            parameters: vec![],
            is_empty: true,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[DacParameter] {
        &self.parameters
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}

/// Correlates one referenced member path with its join against the
/// type-appropriate index table.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlWhereMember {
    /// Zero-based join index; joins are emitted in this order.
    pub index: usize,
    pub member_path: MemberPath,
    /// The generated correlation name, `mem{index}`.
    pub alias: String,
    pub data_type: DataType,
    is_empty: bool,
}

impl SqlWhereMember {
    pub fn new(index: usize, member_path: MemberPath, data_type: DataType) -> SqlWhereMember {
        SqlWhereMember {
            index,
            alias: format!("mem{index}"),
            member_path,
            data_type,
            is_empty: false,
        }
    }

    pub fn empty() -> SqlWhereMember {
        SqlWhereMember {
            index: 0,
            member_path: MemberPath::new::<_, String>([]),
            alias: String::new(),
            data_type: DataType::String,
            is_empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}
