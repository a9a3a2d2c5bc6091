//! Physical schema as handed over by a schema loader.
//!
//! Nothing here knows about generated code; these are the raw, as-scanned
//! tables, columns, keys and indexes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalSchema {
    pub tables: Vec<PhysicalTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalTable {
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub kind: TableKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<PhysicalColumn>,
    /// Outgoing keys: this table is the child side.
    #[serde(default)]
    pub foreign_keys: Vec<PhysicalForeignKey>,
    /// Incoming keys: mirror entries of other tables' outgoing keys.
    #[serde(default)]
    pub child_keys: Vec<PhysicalForeignKey>,
    #[serde(default)]
    pub indexes: Vec<PhysicalIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    #[default]
    BaseTable,
    View,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalColumn {
    pub name: String,
    /// SQL type tag, e.g. `nvarchar` or `decimal`.
    pub sql_type: String,
    /// Value-type descriptor, e.g. `System.Int32`.
    pub value_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    pub ordinal: u32,
    /// `-1` means unbounded (`max`).
    #[serde(default)]
    pub max_length: Option<i32>,
    #[serde(default)]
    pub precision: Option<u8>,
    #[serde(default)]
    pub scale: Option<u8>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalForeignKey {
    pub constraint: String,
    pub columns: Vec<ColumnPair>,
    pub parent_schema: String,
    pub parent_table: String,
    pub child_schema: String,
    pub child_table: String,
    #[serde(default)]
    pub on_delete: DeleteAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub child: String,
    pub parent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalIndex {
    pub name: String,
    #[serde(default)]
    pub kind: IndexKind,
    #[serde(default)]
    pub unique: bool,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Clustered,
    #[default]
    NonClustered,
    PrimaryKey,
    UniqueConstraint,
}
