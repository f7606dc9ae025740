//! Converters from parsed node sequences to SQL fragments.

pub mod include_converter;
pub mod members;
pub mod sorting_converter;
pub mod where_converter;

pub use include_converter::{LambdaToSqlIncludeConverter, SqlInclude};
pub use members::MemberJoinRegistry;
pub use sorting_converter::{LambdaToSqlSortingConverter, SqlSortingMember};
pub use where_converter::LambdaToSqlWhereConverter;
