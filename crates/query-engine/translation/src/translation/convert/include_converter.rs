//! Compiles parsed includes into join descriptors.

use stratadb_query_metadata::metadata::{DataType, MemberPath};
use stratadb_query_sql::sql::SqlWhereMember;

use crate::translation::error::Error;
use crate::translation::nodes::{Node, ParsedLambda};

use super::members::MemberJoinRegistry;

/// One include: the parent's id-reference member joined against the child
/// structure table, exposing the child document under the object-reference
/// path.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlInclude {
    /// The generated correlation name for the child structure table,
    /// `inc{k}`.
    pub alias: String,
    pub child_structure_name: String,
    /// The parent member holding the child's structure id.
    pub member: SqlWhereMember,
    pub object_reference_path: MemberPath,
}

pub struct LambdaToSqlIncludeConverter;

impl LambdaToSqlIncludeConverter {
    /// Emits one descriptor per include node across all supplied lambdas,
    /// preserving order. Id-reference members are guid-typed by contract.
    pub fn convert(
        lambdas: &[ParsedLambda],
        registry: &mut MemberJoinRegistry,
    ) -> Result<Vec<SqlInclude>, Error> {
        let mut includes = Vec::new();
        for lambda in lambdas {
            for node in lambda.nodes() {
                let include = match node {
                    Node::Include(include) => include,
                    other => {
                        return Err(Error::MalformedNodeSequence(format!(
                            "expected an include node, found {other:?}"
                        )))
                    }
                };
                let member = registry.resolve(&include.id_reference_path, DataType::Guid)?;
                includes.push(SqlInclude {
                    alias: format!("inc{}", includes.len()),
                    child_structure_name: include.child_structure_name.clone(),
                    member,
                    object_reference_path: include.object_reference_path.clone(),
                });
            }
        }
        Ok(includes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::expr::include;
    use crate::translation::parser::IncludeParser;
    use stratadb_query_metadata::metadata::StructureSchema;

    fn schema() -> StructureSchema {
        StructureSchema::new(
            "MyClass",
            [
                ("ChildOneId", DataType::Guid),
                ("ChildTwoId", DataType::Guid),
                ("Int1", DataType::Integer),
            ],
        )
    }

    #[test]
    fn emits_one_descriptor_per_include_across_lambdas() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);
        let lambdas = vec![
            IncludeParser::parse(&[include("ChildOne", "ChildOneId", "ChildOne")]).unwrap(),
            IncludeParser::parse(&[include("ChildTwo", "ChildTwoId", "ChildTwo")]).unwrap(),
        ];

        let includes = LambdaToSqlIncludeConverter::convert(&lambdas, &mut registry).unwrap();

        assert_eq!(includes.len(), 2);
        assert_eq!(includes[0].alias, "inc0");
        assert_eq!(includes[0].member.alias, "mem0");
        assert_eq!(includes[1].alias, "inc1");
        assert_eq!(includes[1].member.alias, "mem1");
    }

    #[test]
    fn id_references_must_be_guid_indexed() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);
        let lambdas = vec![IncludeParser::parse(&[include("Child", "Int1", "Child")]).unwrap()];

        let result = LambdaToSqlIncludeConverter::convert(&lambdas, &mut registry);

        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
    }

    #[test]
    fn no_includes_yields_an_empty_list() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);

        let includes = LambdaToSqlIncludeConverter::convert(&[], &mut registry).unwrap();

        assert!(includes.is_empty());
    }
}
