pub mod db_query;
pub mod statements;
pub mod string;

pub use db_query::*;
pub use statements::*;
pub use string::*;
