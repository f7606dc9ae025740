//! Swappable per-dialect SQL syntax fragments.

/// The dialect-specific fragments the query generator cannot spell out
/// itself. One implementation per backing engine.
pub trait SqlStatements {
    /// Row-limit clause emitted right after `select`, e.g. `top (11) `.
    fn take(&self, count: usize) -> String;

    /// Row-numbering projection over the given order-by terms.
    fn row_number(&self, order_by: &str) -> String;

    /// Predicate filtering numbered rows to the paging window.
    fn paging_filter(&self) -> &'static str;

    fn paging_from_param(&self) -> &'static str {
        "@pagingFrom"
    }

    fn paging_to_param(&self) -> &'static str {
        "@pagingTo"
    }
}

/// Transact-SQL flavored statements.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactSqlStatements;

impl SqlStatements for TransactSqlStatements {
    fn take(&self, count: usize) -> String {
        format!("top ({count}) ")
    }

    fn row_number(&self, order_by: &str) -> String {
        format!("row_number() over (order by {order_by}) RowNum")
    }

    fn paging_filter(&self) -> &'static str {
        "rs.RowNum between @pagingFrom and @pagingTo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transact_sql_fragments() {
        let statements = TransactSqlStatements;
        assert_eq!(statements.take(11), "top (11) ");
        assert_eq!(
            statements.row_number("min(mem0.[Value]) Asc"),
            "row_number() over (order by min(mem0.[Value]) Asc) RowNum"
        );
        assert_eq!(
            statements.paging_filter(),
            "rs.RowNum between @pagingFrom and @pagingTo"
        );
    }
}
