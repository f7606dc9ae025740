//! The query translation pipeline.
//!
//! Data flow: expression types ([`expr`]) are parsed into flat node
//! sequences ([`nodes`], [`parser`]), normalized by transformers, converted
//! into SQL fragments ([`convert`]), and assembled into one executable
//! statement by the generator ([`generator`]). The whole pipeline is pure
//! and synchronous; a query either fully compiles or fails with an
//! [`error::Error`].

pub mod convert;
pub mod error;
pub mod expr;
pub mod generator;
pub mod nodes;
pub mod parser;
pub mod query;
pub mod values;

pub use error::Error;
pub use generator::SqlQueryGenerator;
pub use query::Query;
