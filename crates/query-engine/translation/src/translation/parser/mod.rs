//! Parsers turning expressions into node sequences.

pub mod include_parser;
pub mod sorting_parser;
pub mod transformers;
pub mod where_parser;

pub use include_parser::IncludeParser;
pub use sorting_parser::SortingParser;
pub use transformers::{NodesTransformer, NullableNodesTransformer};
pub use where_parser::WhereParser;
