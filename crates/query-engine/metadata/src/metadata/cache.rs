//! A write-once-read-many cache of structure schemas.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::database::StructureSchema;

/// A thread-safe read-through cache of [`StructureSchema`]s keyed by
/// structure name.
///
/// Schemas are built at most once per structure; every caller for the same
/// name observes the same shared instance. Owned and injected by the hosting
/// application rather than held as global state.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<BTreeMap<String, Arc<StructureSchema>>>,
}

impl SchemaCache {
    pub fn new() -> SchemaCache {
        SchemaCache::default()
    }

    /// Look up a cached schema.
    pub fn get(&self, name: &str) -> Option<Arc<StructureSchema>> {
        self.schemas
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Look up a schema, building and caching it on first use.
    pub fn get_or_create<F>(&self, name: &str, build: F) -> Arc<StructureSchema>
    where
        F: FnOnce() -> StructureSchema,
    {
        if let Some(schema) = self.get(name) {
            return schema;
        }
        let mut schemas = self
            .schemas
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        schemas
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(build()))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::database::DataType;

    #[test]
    fn builds_each_schema_once() {
        let cache = SchemaCache::new();

        let first = cache.get_or_create("MyClass", || {
            StructureSchema::new("MyClass", [("Int1", DataType::Integer)])
        });
        let second =
            cache.get_or_create("MyClass", || unreachable!("schema must not be rebuilt"));

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_names_get_distinct_schemas() {
        let cache = SchemaCache::new();

        let a = cache.get_or_create("A", || StructureSchema::new("A", [("X", DataType::Guid)]));
        let b = cache.get_or_create("B", || StructureSchema::new("B", [("X", DataType::Guid)]));

        assert_eq!(a.structure.table_name, "AStructure");
        assert_eq!(b.structure.table_name, "BStructure");
    }
}
