//! Metadata information regarding structure storage: which tables exist for a
//! document structure and how its indexed members route to them.

use std::collections::BTreeMap;
use std::fmt;

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The member value categories the index tables are partitioned by.
///
/// Every indexed member of a structure is stored as one row in the index
/// table matching its category ("vertical partitioning by type").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Fraction,
    Boolean,
    DateTime,
    Guid,
    String,
}

impl DataType {
    /// The suffix of the index table holding values of this category, e.g.
    /// `Integers` in `MyClassIntegers`.
    pub fn index_table_suffix(self) -> &'static str {
        match self {
            DataType::Integer => "Integers",
            DataType::Fraction => "Fractals",
            DataType::Boolean => "Booleans",
            DataType::DateTime => "Dates",
            DataType::Guid => "Guids",
            DataType::String => "Strings",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A dotted path locating a (possibly nested) member within a document's
/// shape, e.g. `NestedItem.Int1`.
///
/// Paths are resolved once per clause and compared structurally; segments
/// never contain dots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MemberPath {
    segments: Vec<String>,
}

impl MemberPath {
    /// Build a path from its segments. Empty segments are dropped.
    pub fn new<I, S>(segments: I) -> MemberPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemberPath {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Parse a dot-joined path such as `Parent.Child.Grandchild`.
    pub fn parse(dotted: &str) -> MemberPath {
        MemberPath::new(dotted.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for MemberPath {
    fn from(dotted: &str) -> MemberPath {
        MemberPath::parse(dotted)
    }
}

impl From<String> for MemberPath {
    fn from(dotted: String) -> MemberPath {
        MemberPath::parse(&dotted)
    }
}

impl From<MemberPath> for String {
    fn from(path: MemberPath) -> String {
        path.to_string()
    }
}

impl JsonSchema for MemberPath {
    fn schema_name() -> String {
        "MemberPath".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// One physical column of a storage table, with its position in the table's
/// ordered field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaField {
    pub ordinal: usize,
    pub name: String,
}

impl SchemaField {
    pub fn new(ordinal: usize, name: &str) -> SchemaField {
        SchemaField {
            ordinal,
            name: name.to_string(),
        }
    }
}

/// The structure table: one row per stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructureStorageSchema {
    pub table_name: String,
    pub fields: Vec<SchemaField>,
}

impl StructureStorageSchema {
    pub const ID: &'static str = "StructureId";
    pub const JSON: &'static str = "Json";

    pub fn new(structure_name: &str) -> StructureStorageSchema {
        StructureStorageSchema {
            table_name: structure_table_name(structure_name),
            fields: vec![
                SchemaField::new(0, Self::ID),
                SchemaField::new(1, Self::JSON),
            ],
        }
    }
}

/// An index table: one row per indexed member per document, for one value
/// category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IndexStorageSchema {
    pub data_type: DataType,
    pub table_name: String,
    pub fields: Vec<SchemaField>,
}

impl IndexStorageSchema {
    pub const STRUCTURE_ID: &'static str = "StructureId";
    pub const MEMBER_PATH: &'static str = "MemberPath";
    pub const VALUE: &'static str = "Value";
    pub const STRING_VALUE: &'static str = "StringValue";

    pub fn new(structure_name: &str, data_type: DataType) -> IndexStorageSchema {
        IndexStorageSchema {
            data_type,
            table_name: format!("{structure_name}{}", data_type.index_table_suffix()),
            fields: vec![
                SchemaField::new(0, Self::STRUCTURE_ID),
                SchemaField::new(1, Self::MEMBER_PATH),
                SchemaField::new(2, Self::VALUE),
                SchemaField::new(3, Self::STRING_VALUE),
            ],
        }
    }
}

/// The uniques table, holding unique-constraint rows for the structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UniquesStorageSchema {
    pub table_name: String,
    pub fields: Vec<SchemaField>,
}

impl UniquesStorageSchema {
    pub const STRUCTURE_ID: &'static str = "StructureId";
    pub const UQ_STRUCTURE_ID: &'static str = "UqStructureId";
    pub const UQ_MEMBER_PATH: &'static str = "UqMemberPath";
    pub const UQ_VALUE: &'static str = "UqValue";

    pub fn new(structure_name: &str) -> UniquesStorageSchema {
        UniquesStorageSchema {
            table_name: format!("{structure_name}Uniques"),
            fields: vec![
                SchemaField::new(0, Self::STRUCTURE_ID),
                SchemaField::new(1, Self::UQ_STRUCTURE_ID),
                SchemaField::new(2, Self::UQ_MEMBER_PATH),
                SchemaField::new(3, Self::UQ_VALUE),
            ],
        }
    }
}

/// The name of the structure table for a structure name, e.g.
/// `MyClassStructure` for `MyClass`.
pub fn structure_table_name(structure_name: &str) -> String {
    format!("{structure_name}Structure")
}

/// Static, per-structure storage metadata: table names and the indexed-member
/// map. Created once per document type, read-only thereafter, shared across
/// all queries for that type.
///
/// Only the structure name and the member map are authoritative; the table
/// schemas are derived from them on construction and rebuilt on
/// deserialization, so a partial or hand-edited `indexes` map can never
/// reach query generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(from = "StructureSchemaData")]
pub struct StructureSchema {
    pub name: String,
    pub structure: StructureStorageSchema,
    pub uniques: UniquesStorageSchema,
    indexes: BTreeMap<DataType, IndexStorageSchema>,
    members: BTreeMap<MemberPath, DataType>,
}

/// The authoritative fields of a serialized [`StructureSchema`]; the derived
/// table schemas are rebuilt from these on load.
#[derive(Deserialize, JsonSchema)]
struct StructureSchemaData {
    name: String,
    members: BTreeMap<MemberPath, DataType>,
}

impl From<StructureSchemaData> for StructureSchema {
    fn from(data: StructureSchemaData) -> StructureSchema {
        StructureSchema::new(&data.name, data.members)
    }
}

impl StructureSchema {
    pub fn new<I, P>(name: &str, members: I) -> StructureSchema
    where
        I: IntoIterator<Item = (P, DataType)>,
        P: Into<MemberPath>,
    {
        StructureSchema {
            name: name.to_string(),
            structure: StructureStorageSchema::new(name),
            uniques: UniquesStorageSchema::new(name),
            indexes: enum_iterator::all::<DataType>()
                .map(|data_type| (data_type, IndexStorageSchema::new(name, data_type)))
                .collect(),
            members: members
                .into_iter()
                .map(|(path, data_type)| (path.into(), data_type))
                .collect(),
        }
    }

    /// The index table routing for one value category.
    pub fn index_storage_schema(&self, data_type: DataType) -> &IndexStorageSchema {
        // `new` populates every variant.
        &self.indexes[&data_type]
    }

    /// All index tables of this structure, in `DataType` order.
    pub fn index_storage_schemas(&self) -> impl Iterator<Item = &IndexStorageSchema> {
        self.indexes.values()
    }

    /// The declared category of an indexed member, if the path is indexed.
    pub fn member_type(&self, path: &MemberPath) -> Option<DataType> {
        self.members.get(path).copied()
    }

    pub fn member_paths(&self) -> impl Iterator<Item = &MemberPath> {
        self.members.keys()
    }
}
