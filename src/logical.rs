//! Logical schema: the physical schema plus generated names and type decisions.

use crate::naming::{identifier_for, Language, TableNames};
use crate::schema::{
    ColumnPair, DeleteAction, IndexKind, PhysicalColumn, PhysicalForeignKey, PhysicalIndex,
    PhysicalSchema, PhysicalTable, TableKind,
};
use crate::types::TypeDecision;
use serde::Serialize;

/// Naming progress of a table. Relationship naming requires every table in
/// the schema to be at least [`NamingPhase::ColumnsNamed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPhase {
    Unprocessed,
    ColumnsNamed,
    FullyNamed,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogicalSchema {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
    pub description: Option<String>,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub child_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
    pub(crate) names: TableNames,
    pub(crate) phase: NamingPhase,
}

/// A physical column, read-only, plus what the enricher derived for it.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    #[serde(flatten)]
    source: PhysicalColumn,
    pub identifier: Option<String>,
    pub type_decision: Option<TypeDecision>,
    pub verbose_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    pub constraint: String,
    pub columns: Vec<ColumnPair>,
    pub parent_schema: String,
    pub parent_table: String,
    pub child_schema: String,
    pub child_table: String,
    pub on_delete: DeleteAction,
    pub navigation_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub name: String,
    pub kind: IndexKind,
    pub unique: bool,
    pub columns: Vec<String>,
}

impl LogicalSchema {
    /// Build the logical copy of a physical schema. Registries start empty.
    pub fn from_physical(physical: &PhysicalSchema, language: Language) -> Self {
        let tables = physical
            .tables
            .iter()
            .map(|t| Table::from_physical(t, language))
            .collect();
        LogicalSchema { tables }
    }

    pub fn table_index(&self, schema: &str, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| t.schema == schema && t.name == name)
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.table_index(schema, name).map(|i| &self.tables[i])
    }
}

impl Table {
    fn from_physical(table: &PhysicalTable, language: Language) -> Self {
        let mut columns: Vec<Column> = table.columns.iter().map(Column::from_physical).collect();
        columns.sort_by_key(Column::ordinal);

        Table {
            schema: table.schema.clone(),
            name: table.name.clone(),
            kind: table.kind,
            description: table.description.clone(),
            columns,
            foreign_keys: table.foreign_keys.iter().map(ForeignKey::from_physical).collect(),
            child_keys: table.child_keys.iter().map(ForeignKey::from_physical).collect(),
            indexes: table.indexes.iter().map(Index::from_physical).collect(),
            names: TableNames::new(identifier_for(&table.name, language)),
            phase: NamingPhase::Unprocessed,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn class_name(&self) -> &str {
        self.names.class_name()
    }

    pub fn names(&self) -> &TableNames {
        &self.names
    }

    pub fn phase(&self) -> NamingPhase {
        self.phase
    }

    pub fn is_view(&self) -> bool {
        self.kind == TableKind::View
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn primary_key(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_primary_key()).collect()
    }
}

impl Column {
    fn from_physical(column: &PhysicalColumn) -> Self {
        Column {
            source: column.clone(),
            identifier: None,
            type_decision: None,
            verbose_type: None,
        }
    }

    pub fn source(&self) -> &PhysicalColumn {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn ordinal(&self) -> u32 {
        self.source.ordinal
    }

    pub fn is_primary_key(&self) -> bool {
        self.source.primary_key
    }
}

impl ForeignKey {
    fn from_physical(fk: &PhysicalForeignKey) -> Self {
        ForeignKey {
            constraint: fk.constraint.clone(),
            columns: fk.columns.clone(),
            parent_schema: fk.parent_schema.clone(),
            parent_table: fk.parent_table.clone(),
            child_schema: fk.child_schema.clone(),
            child_table: fk.child_table.clone(),
            on_delete: fk.on_delete,
            navigation_name: None,
        }
    }

    pub fn cascades_delete(&self) -> bool {
        self.on_delete == DeleteAction::Cascade
    }

    /// Child-side column of the first pair; composite keys are named after it.
    pub fn first_child_column(&self) -> Option<&str> {
        self.columns.first().map(|p| p.child.as_str())
    }
}

impl Index {
    fn from_physical(index: &PhysicalIndex) -> Self {
        Index {
            name: index.name.clone(),
            kind: index.kind,
            unique: index.unique,
            columns: index.columns.clone(),
        }
    }
}
