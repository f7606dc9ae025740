//! Compile typed query expressions over document structures into
//! parameterized SQL against the vertically-partitioned index schema.

pub mod translation;
