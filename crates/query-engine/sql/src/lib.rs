//! Low-level SQL string representation and dialect fragments.

pub mod sql;
