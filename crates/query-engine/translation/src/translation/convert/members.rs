//! Shared member-join bookkeeping for the converters.

use indexmap::IndexMap;

use stratadb_query_metadata::metadata::{DataType, MemberPath, StructureSchema};
use stratadb_query_sql::sql::SqlWhereMember;

use crate::translation::error::Error;

/// Assigns each distinct member path one join alias (`mem0`, `mem1`, ...) and
/// hands the same alias back on every later resolution of that path. All
/// converters running against one query share a single registry, which is
/// what keeps a member referenced from both a predicate and a sorting down
/// to one index-table join.
pub struct MemberJoinRegistry<'a> {
    schema: &'a StructureSchema,
    members: IndexMap<MemberPath, SqlWhereMember>,
}

impl<'a> MemberJoinRegistry<'a> {
    pub fn new(schema: &'a StructureSchema) -> Self {
        MemberJoinRegistry {
            schema,
            members: IndexMap::new(),
        }
    }

    /// Resolves a member path against the structure schema, validating that
    /// the path is indexed and that its declared type matches the index.
    pub fn resolve(
        &mut self,
        path: &MemberPath,
        declared: DataType,
    ) -> Result<SqlWhereMember, Error> {
        let indexed = self
            .schema
            .member_type(path)
            .ok_or_else(|| Error::MemberNotFound {
                path: path.to_string(),
                structure: self.schema.name.clone(),
            })?;
        if indexed != declared {
            return Err(Error::SchemaMismatch {
                path: path.to_string(),
                declared,
                indexed,
            });
        }

        if let Some(member) = self.members.get(path) {
            return Ok(member.clone());
        }

        let member = SqlWhereMember::new(self.members.len(), path.clone(), declared);
        self.members.insert(path.clone(), member.clone());
        Ok(member)
    }

    /// The resolved members in first-seen order.
    pub fn members(&self) -> impl Iterator<Item = &SqlWhereMember> {
        self.members.values()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> StructureSchema {
        StructureSchema::new(
            "MyClass",
            [
                ("Int1", DataType::Integer),
                ("String1", DataType::String),
            ],
        )
    }

    #[test]
    fn assigns_aliases_in_first_seen_order() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);

        let int1 = registry
            .resolve(&MemberPath::parse("Int1"), DataType::Integer)
            .unwrap();
        let string1 = registry
            .resolve(&MemberPath::parse("String1"), DataType::String)
            .unwrap();

        assert_eq!(int1.alias, "mem0");
        assert_eq!(string1.alias, "mem1");
    }

    #[test]
    fn resolving_the_same_path_twice_reuses_the_alias() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);
        let path = MemberPath::parse("Int1");

        let first = registry.resolve(&path, DataType::Integer).unwrap();
        let second = registry.resolve(&path, DataType::Integer).unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.members().count(), 1);
    }

    #[test]
    fn unknown_members_are_rejected() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);

        let result = registry.resolve(&MemberPath::parse("Missing"), DataType::Integer);

        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
    }

    #[test]
    fn type_mismatches_are_rejected() {
        let schema = schema();
        let mut registry = MemberJoinRegistry::new(&schema);

        let result = registry.resolve(&MemberPath::parse("Int1"), DataType::String);

        assert_eq!(
            result,
            Err(Error::SchemaMismatch {
                path: "Int1".to_string(),
                declared: DataType::String,
                indexed: DataType::Integer,
            })
        );
    }
}
