//! Handle the translation of literal values.

use stratadb_query_sql::sql::ParamValue;

use super::error::Error;

/// Convert a JSON value into a SQL parameter value.
pub fn param_value_from_json(value: &serde_json::Value) -> Result<ParamValue, Error> {
    match value {
        serde_json::Value::Number(num) => match num.as_i64() {
            Some(i) => Ok(ParamValue::Integer(i)),
            None => num
                .as_f64()
                .map(ParamValue::Fraction)
                .ok_or_else(|| Error::NotSupported(format!("the numeric literal {num}"))),
        },
        serde_json::Value::Bool(b) => Ok(ParamValue::Bool(*b)),
        serde_json::Value::String(s) => Ok(ParamValue::String(s.to_string())),
        serde_json::Value::Null => Ok(ParamValue::Null),
        serde_json::Value::Array(_) => Err(Error::NotSupported("array values".to_string())),
        serde_json::Value::Object(_) => Err(Error::NotSupported("object values".to_string())),
    }
}
