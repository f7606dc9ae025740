//! Orchestrates the converters into the final executable statement.

use stratadb_query_metadata::metadata::{
    structure_table_name, IndexStorageSchema, StructureStorageSchema,
};
use stratadb_query_sql::sql::{DbQuery, Sql, SqlStatements, TransactSqlStatements};

use crate::translation::convert::{
    LambdaToSqlIncludeConverter, LambdaToSqlSortingConverter, LambdaToSqlWhereConverter,
    MemberJoinRegistry, SqlInclude, SqlSortingMember,
};
use crate::translation::error::Error;
use crate::translation::query::Query;

/// What the outer select projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectTarget {
    Documents,
    StructureIds,
}

/// Builds executable SQL from a [`Query`] against its structure's storage
/// schema. The statement provider supplies the dialect-specific fragments.
///
/// All statements share one inner/outer shape: the inner select resolves
/// matching structure ids (with one join per referenced member against the
/// type-appropriate index table), the outer select joins back to the
/// structure table for the projection. Grouping on the structure id is
/// emitted exactly when at least one member join exists, collapsing the
/// one-row-per-member index tables back to one row per document.
pub struct SqlQueryGenerator<S = TransactSqlStatements> {
    statements: S,
}

impl Default for SqlQueryGenerator<TransactSqlStatements> {
    fn default() -> Self {
        SqlQueryGenerator::new(TransactSqlStatements)
    }
}

impl<S: SqlStatements> SqlQueryGenerator<S> {
    pub fn new(statements: S) -> SqlQueryGenerator<S> {
        SqlQueryGenerator { statements }
    }

    /// The document query: outer select projects `s.[Json]` plus one item
    /// per include.
    pub fn generate_query(&self, query: &Query) -> Result<DbQuery, Error> {
        let mut sql = self.generate(query, SelectTarget::Documents)?;
        sql.append_syntax(";");
        tracing::info!("Generated query: {}", sql.sql);
        Ok(DbQuery::new(sql.sql, sql.params))
    }

    /// Same shape as [`generate_query`](Self::generate_query) but the outer
    /// select projects the structure id only; includes are not compiled.
    pub fn generate_query_returning_structure_ids(
        &self,
        query: &Query,
    ) -> Result<DbQuery, Error> {
        let mut sql = self.generate(query, SelectTarget::StructureIds)?;
        sql.append_syntax(";");
        tracing::info!("Generated structure-id query: {}", sql.sql);
        Ok(DbQuery::new(sql.sql, sql.params))
    }

    /// Deletes every structure row matched by the query. Index and uniques
    /// rows follow through cascading deletes on the structure table.
    pub fn generate_delete_by_query(&self, query: &Query) -> Result<DbQuery, Error> {
        let ids = self.generate(query, SelectTarget::StructureIds)?;

        let mut sql = Sql::new();
        sql.append_syntax("delete from ");
        sql.append_identifier(&query.structure_schema().structure.table_name);
        sql.append_syntax(" where ");
        sql.append_identifier(StructureStorageSchema::ID);
        sql.append_syntax(" in (");
        sql.append_syntax(&ids.sql);
        sql.append_syntax(");");
        sql.params = ids.params;

        tracing::info!("Generated delete: {}", sql.sql);
        Ok(DbQuery::new(sql.sql, sql.params))
    }

    fn generate(&self, query: &Query, target: SelectTarget) -> Result<Sql, Error> {
        let schema = query.structure_schema();
        let mut registry = MemberJoinRegistry::new(schema);

        let where_query = LambdaToSqlWhereConverter::convert(query.where_lambda(), &mut registry)?;
        let sortings = LambdaToSqlSortingConverter::convert(query.sortings(), &mut registry)?;
        let includes = match target {
            SelectTarget::Documents => {
                LambdaToSqlIncludeConverter::convert(query.includes(), &mut registry)?
            }
            SelectTarget::StructureIds => vec![],
        };

        // Paging takes precedence over take when both are set.
        let paging = query.paging();
        let take = if paging.is_some() {
            None
        } else {
            query.take_count()
        };

        let mut inner = Sql::new();
        inner.append_syntax("select s.");
        inner.append_identifier(StructureStorageSchema::ID);
        self.append_exports(&mut inner, &sortings, &includes, paging.is_some());
        if paging.is_some() {
            inner.append_syntax(", ");
            inner.append_syntax(&self.statements.row_number(&row_number_order_by(&sortings)));
        }

        inner.append_syntax(" from ");
        inner.append_identifier(&schema.structure.table_name);
        inner.append_syntax(" s");
        for member in registry.members() {
            let index_table = &schema.index_storage_schema(member.data_type).table_name;
            inner.append_syntax(" inner join ");
            inner.append_identifier(index_table);
            inner.append_syntax(&format!(" {} on {}.", member.alias, member.alias));
            inner.append_identifier(IndexStorageSchema::STRUCTURE_ID);
            inner.append_syntax(" = s.");
            inner.append_identifier(StructureStorageSchema::ID);
            inner.append_syntax(&format!(" and {}.", member.alias));
            inner.append_identifier(IndexStorageSchema::MEMBER_PATH);
            inner.append_syntax(" = ");
            inner.append_string_literal(&member.member_path.to_string());
        }

        if !where_query.is_empty() {
            inner.append_syntax(" where ");
            inner.append_syntax(where_query.sql());
        }

        if !registry.is_empty() {
            inner.append_syntax(" group by s.");
            inner.append_identifier(StructureStorageSchema::ID);
        }

        let mut sql = Sql::new();
        sql.append_syntax("select ");
        if let Some(count) = take {
            sql.append_syntax(&self.statements.take(count));
        }
        match target {
            SelectTarget::Documents => {
                sql.append_syntax("s.");
                sql.append_identifier(StructureStorageSchema::JSON);
                for include in &includes {
                    sql.append_syntax(&format!(", {}.", include.alias));
                    sql.append_identifier(StructureStorageSchema::JSON);
                    sql.append_syntax(" ");
                    sql.append_identifier(&include.object_reference_path.to_string());
                }
            }
            SelectTarget::StructureIds => {
                sql.append_syntax("s.");
                sql.append_identifier(StructureStorageSchema::ID);
            }
        }
        sql.append_syntax(" from (");
        sql.append_syntax(&inner.sql);
        sql.append_syntax(") rs inner join ");
        sql.append_identifier(&schema.structure.table_name);
        sql.append_syntax(" s on s.");
        sql.append_identifier(StructureStorageSchema::ID);
        sql.append_syntax(" = rs.");
        sql.append_identifier(StructureStorageSchema::ID);
        for include in &includes {
            sql.append_syntax(" inner join ");
            sql.append_identifier(&structure_table_name(&include.child_structure_name));
            sql.append_syntax(&format!(" {} on {}.", include.alias, include.alias));
            sql.append_identifier(StructureStorageSchema::ID);
            sql.append_syntax(&format!(" = rs.{}", include.member.alias));
        }

        sql.params = where_query.parameters().to_vec();
        if let Some(paging) = paging {
            sql.append_syntax(" where ");
            sql.append_syntax(self.statements.paging_filter());
            sql.push_named_param(self.statements.paging_from_param(), paging.from_row() as i64);
            sql.push_named_param(self.statements.paging_to_param(), paging.to_row() as i64);
        } else if !sortings.is_empty() {
            sql.append_syntax(" order by ");
            let terms: Vec<String> = sortings
                .iter()
                .map(|sorting| format!("{} {}", sorting.member.alias, sorting.direction))
                .collect();
            sql.append_syntax(&terms.join(", "));
        }

        Ok(sql)
    }

    /// Inner-select exports making joined member values visible to the outer
    /// select: sorting members (unless paging numbers rows instead) and
    /// include members, deduplicated by alias.
    fn append_exports(
        &self,
        inner: &mut Sql,
        sortings: &[SqlSortingMember],
        includes: &[SqlInclude],
        paging: bool,
    ) {
        let mut exported: Vec<&str> = Vec::new();
        let sorting_members = sortings.iter().map(|sorting| &sorting.member);
        let include_members = includes.iter().map(|include| &include.member);
        let members = sorting_members
            .filter(|_| !paging)
            .chain(include_members);
        for member in members {
            if exported.contains(&member.alias.as_str()) {
                continue;
            }
            inner.append_syntax(&format!(", min({}.", member.alias));
            inner.append_identifier(IndexStorageSchema::VALUE);
            inner.append_syntax(&format!(") {}", member.alias));
            exported.push(member.alias.as_str());
        }
    }
}

/// Order-by terms for the row-numbering projection; without explicit
/// sortings rows are numbered by the structure id for a deterministic
/// window.
fn row_number_order_by(sortings: &[SqlSortingMember]) -> String {
    if sortings.is_empty() {
        return format!("s.[{}] Asc", StructureStorageSchema::ID);
    }
    let terms: Vec<String> = sortings
        .iter()
        .map(|sorting| {
            format!(
                "min({}.[{}]) {}",
                sorting.member.alias,
                IndexStorageSchema::VALUE,
                sorting.direction
            )
        })
        .collect();
    terms.join(", ")
}
