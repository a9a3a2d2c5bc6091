//! Schema enrichment.
//!
//! A run builds a [`LogicalSchema`] from the physical one, then makes two
//! passes over it:
//! 1. every table gets column identifiers and type decisions
//! 2. every foreign key gets forward and reverse navigation names
//!
//! Pass 2 compares navigation names against finished column registries, so
//! it refuses to start until pass 1 has covered every table.

use crate::error::EnrichError;
use crate::logical::{LogicalSchema, NamingPhase, Table};
use crate::naming::{identifier_for, Language, Namespace, TableNames, DEFAULT_COLLISION_BOUND};
use crate::relations;
use crate::schema::PhysicalSchema;
use crate::types::{map_value_type, verbose_type_name};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichOptions {
    pub language: Language,
    /// Numeric suffixes tried before a colliding name is accepted.
    pub collision_bound: usize,
    /// Drop a trailing `Id` from the column a forward navigation is named after.
    pub strip_id_suffix: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            collision_bound: DEFAULT_COLLISION_BOUND,
            strip_id_suffix: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub table: String,
    pub message: String,
}

/// Everything that went wrong without stopping the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnrichReport {
    diagnostics: Vec<Diagnostic>,
}

impl EnrichReport {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.by_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.by_severity(Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }
}

/// State of one run, handed to every naming step.
#[derive(Debug, Clone, Default)]
pub struct EnrichContext {
    pub options: EnrichOptions,
    pub report: EnrichReport,
}

impl EnrichContext {
    pub fn new(options: EnrichOptions) -> Self {
        Self {
            options,
            report: EnrichReport::default(),
        }
    }

    pub fn warn(&mut self, table: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(table = %table, "{message}");
        self.push(Severity::Warning, table, message);
    }

    pub fn error(&mut self, table: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(table = %table, "{message}");
        self.push(Severity::Error, table, message);
    }

    fn push(&mut self, severity: Severity, table: &str, message: String) {
        self.report.diagnostics.push(Diagnostic {
            severity,
            table: table.to_string(),
            message,
        });
    }

    /// Allocate a name in `names`, warning when the collision bound runs out.
    pub fn allocate(
        &mut self,
        names: &mut TableNames,
        table: &str,
        namespace: Namespace,
        key: &str,
        base: &str,
    ) -> String {
        let bound = self.options.collision_bound;
        let allocation = names.allocate(namespace, key, base, bound);
        if allocation.exhausted {
            self.warn(
                table,
                format!(
                    "no unique name for {key} after {bound} suffixes, keeping {}",
                    allocation.name
                ),
            );
        }
        allocation.name
    }
}

/// Result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct Enriched {
    pub schema: LogicalSchema,
    pub diagnostics: EnrichReport,
}

pub struct SchemaEnricher {
    ctx: EnrichContext,
}

impl Default for SchemaEnricher {
    fn default() -> Self {
        Self::new(EnrichOptions::default())
    }
}

impl SchemaEnricher {
    pub fn new(options: EnrichOptions) -> Self {
        Self {
            ctx: EnrichContext::new(options),
        }
    }

    pub fn options(&self) -> &EnrichOptions {
        &self.ctx.options
    }

    pub fn report(&self) -> &EnrichReport {
        &self.ctx.report
    }

    pub fn into_report(self) -> EnrichReport {
        self.ctx.report
    }

    /// Logical copy of `physical` with empty registries.
    pub fn build(&self, physical: &PhysicalSchema) -> LogicalSchema {
        LogicalSchema::from_physical(physical, self.ctx.options.language)
    }

    /// Build and fully name a logical schema.
    pub fn enrich(mut self, physical: &PhysicalSchema) -> Result<Enriched, EnrichError> {
        let mut schema = self.build(physical);
        self.name_columns(&mut schema);
        self.name_relationships(&mut schema)?;

        tracing::debug!(
            tables = schema.tables.len(),
            diagnostics = self.ctx.report.diagnostics().len(),
            "schema enriched"
        );

        Ok(Enriched {
            schema,
            diagnostics: self.ctx.report,
        })
    }

    /// Pass 1: column identifiers and type decisions for every table.
    pub fn name_columns(&mut self, schema: &mut LogicalSchema) {
        for table in &mut schema.tables {
            self.name_table_columns(table);
        }
    }

    fn name_table_columns(&mut self, table: &mut Table) {
        if table.phase != NamingPhase::Unprocessed {
            return;
        }

        let label = table.qualified_name();
        let language = self.ctx.options.language;

        for column in &mut table.columns {
            let base = identifier_for(column.name(), language);
            let identifier = self.ctx.allocate(
                &mut table.names,
                &label,
                Namespace::Columns,
                column.name(),
                &base,
            );

            let source = column.source();
            let decision = map_value_type(&source.value_type, source.nullable);
            if !decision.resolved {
                self.ctx.warn(
                    &label,
                    format!(
                        "column {}: unmapped type {}, treated as a reference type",
                        source.name, source.value_type
                    ),
                );
            }

            column.verbose_type = verbose_type_name(source);
            column.type_decision = Some(decision);
            column.identifier = Some(identifier);
        }

        table.phase = NamingPhase::ColumnsNamed;
    }

    /// Identifier of `column` in `table`; the same string on every call.
    pub fn column_identifier(&mut self, table: &mut Table, column: &str) -> Option<String> {
        table.column(column)?;
        let label = table.qualified_name();
        let base = identifier_for(column, self.ctx.options.language);
        Some(
            self.ctx
                .allocate(&mut table.names, &label, Namespace::Columns, column, &base),
        )
    }

    /// Pass 2: navigation names for every foreign key.
    ///
    /// Relationships that cannot be paired are reported and skipped.
    pub fn name_relationships(&mut self, schema: &mut LogicalSchema) -> Result<(), EnrichError> {
        if let Some(table) = schema
            .tables
            .iter()
            .find(|t| t.phase < NamingPhase::ColumnsNamed)
        {
            return Err(EnrichError::PhaseOrder {
                table: table.qualified_name(),
                found: table.phase,
            });
        }

        for child in 0..schema.tables.len() {
            if schema.tables[child].phase == NamingPhase::FullyNamed {
                continue;
            }
            for fk in relations::ordered_keys(schema, child) {
                if let Err(err) = relations::name_relationship(schema, child, fk, &mut self.ctx) {
                    let label = schema.tables[child].qualified_name();
                    if err.is_schema_violation() {
                        self.ctx.error(&label, err.to_string());
                    } else {
                        self.ctx.warn(&label, err.to_string());
                    }
                }
            }
        }

        for table in &mut schema.tables {
            table.phase = NamingPhase::FullyNamed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::same_name;
    use crate::schema::{
        ColumnPair, DeleteAction, PhysicalColumn, PhysicalForeignKey, PhysicalTable, TableKind,
    };
    use crate::types::TypeKind;

    fn col(name: &str, value_type: &str, nullable: bool) -> PhysicalColumn {
        PhysicalColumn {
            name: name.to_string(),
            sql_type: match value_type {
                "System.String" => "nvarchar".to_string(),
                "System.Decimal" => "money".to_string(),
                _ => "int".to_string(),
            },
            value_type: value_type.to_string(),
            nullable,
            primary_key: false,
            ordinal: 0,
            max_length: None,
            precision: None,
            scale: None,
            description: None,
            default_value: None,
        }
    }

    fn table(name: &str, columns: Vec<PhysicalColumn>) -> PhysicalTable {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.ordinal = i as u32 + 1;
                c.primary_key = i == 0;
                c
            })
            .collect();
        PhysicalTable {
            schema: "dbo".to_string(),
            name: name.to_string(),
            kind: TableKind::BaseTable,
            description: None,
            columns,
            foreign_keys: vec![],
            child_keys: vec![],
            indexes: vec![],
        }
    }

    fn int(name: &str) -> PhysicalColumn {
        col(name, "System.Int32", false)
    }

    fn foreign_key(
        constraint: &str,
        child: &str,
        child_col: &str,
        parent: &str,
        parent_col: &str,
    ) -> PhysicalForeignKey {
        PhysicalForeignKey {
            constraint: constraint.to_string(),
            columns: vec![ColumnPair {
                child: child_col.to_string(),
                parent: parent_col.to_string(),
            }],
            parent_schema: "dbo".to_string(),
            parent_table: parent.to_string(),
            child_schema: "dbo".to_string(),
            child_table: child.to_string(),
            on_delete: DeleteAction::NoAction,
        }
    }

    /// Add a foreign key to the child and its mirror entry to the parent.
    fn link(
        schema: &mut PhysicalSchema,
        constraint: &str,
        (child, child_col): (&str, &str),
        (parent, parent_col): (&str, &str),
    ) {
        let fk = foreign_key(constraint, child, child_col, parent, parent_col);
        for t in &mut schema.tables {
            if t.name == parent {
                t.child_keys.push(fk.clone());
            }
        }
        for t in &mut schema.tables {
            if t.name == child {
                t.foreign_keys.push(fk.clone());
            }
        }
    }

    fn enrich(physical: &PhysicalSchema) -> Enriched {
        SchemaEnricher::default().enrich(physical).unwrap()
    }

    fn column_ident<'a>(schema: &'a LogicalSchema, table: &str, column: &str) -> &'a str {
        schema
            .table("dbo", table)
            .and_then(|t| t.column(column))
            .and_then(|c| c.identifier.as_deref())
            .unwrap()
    }

    fn forward<'a>(schema: &'a LogicalSchema, table: &str, constraint: &str) -> Option<&'a str> {
        schema
            .table("dbo", table)?
            .foreign_keys
            .iter()
            .find(|k| k.constraint == constraint)?
            .navigation_name
            .as_deref()
    }

    fn reverse<'a>(schema: &'a LogicalSchema, table: &str, constraint: &str) -> Option<&'a str> {
        schema
            .table("dbo", table)?
            .child_keys
            .iter()
            .find(|k| k.constraint == constraint)?
            .navigation_name
            .as_deref()
    }

    fn assert_unique_names(schema: &LogicalSchema) {
        for t in &schema.tables {
            let names: Vec<&str> = t.names().all_names().collect();
            for (i, a) in names.iter().enumerate() {
                for b in &names[i + 1..] {
                    assert!(!same_name(a, b), "{} has duplicate name {a}", t.qualified_name());
                }
            }
        }
    }

    fn address_schema() -> PhysicalSchema {
        let mut schema = PhysicalSchema {
            tables: vec![
                table(
                    "Person",
                    vec![int("PersonID"), int("BillToAddressTypeID"), int("ShipToAddressTypeID")],
                ),
                table(
                    "AddressType",
                    vec![int("AddressTypeID"), col("Name", "System.String", false)],
                ),
            ],
        };
        link(
            &mut schema,
            "FK_Person_AddressType_BillTo",
            ("Person", "BillToAddressTypeID"),
            ("AddressType", "AddressTypeID"),
        );
        link(
            &mut schema,
            "FK_Person_AddressType_ShipTo",
            ("Person", "ShipToAddressTypeID"),
            ("AddressType", "AddressTypeID"),
        );
        schema
    }

    #[test]
    fn test_column_identifier_is_stable() {
        let physical = PhysicalSchema {
            tables: vec![table("Employee", vec![int("BusinessEntityID"), int("Employee_SSN")])],
        };
        let mut enricher = SchemaEnricher::default();
        let mut schema = enricher.build(&physical);
        enricher.name_columns(&mut schema);

        let table = &mut schema.tables[0];
        let first = enricher.column_identifier(table, "BusinessEntityID");
        let second = enricher.column_identifier(table, "BusinessEntityID");
        assert_eq!(first.as_deref(), Some("BusinessEntityId"));
        assert_eq!(first, second);
        assert_eq!(table.columns[0].identifier, first);
        assert_eq!(enricher.column_identifier(table, "Missing"), None);
    }

    #[test]
    fn test_column_named_like_class() {
        let physical = PhysicalSchema {
            tables: vec![table("Class", vec![int("ClassID"), col("Class", "System.String", true)])],
        };
        let enriched = enrich(&physical);

        assert_eq!(column_ident(&enriched.schema, "Class", "Class"), "Class1");
        assert_eq!(column_ident(&enriched.schema, "Class", "ClassID"), "ClassId");
        assert_unique_names(&enriched.schema);
    }

    #[test]
    fn test_type_decisions() {
        let physical = PhysicalSchema {
            tables: vec![table(
                "Product",
                vec![
                    int("ProductID"),
                    col("Weight", "System.Int32", true),
                    col("Color", "System.String", true),
                    col("ListPrice", "System.Decimal", true),
                ],
            )],
        };
        let enriched = enrich(&physical);
        let product = &enriched.schema.tables[0];

        let weight = product.column("Weight").unwrap().type_decision.as_ref().unwrap();
        assert_eq!(weight.kind, TypeKind::Value);
        assert_eq!(weight.designator(), "int?");

        let color = product.column("Color").unwrap().type_decision.as_ref().unwrap();
        assert_eq!(color.kind, TypeKind::Reference);
        assert_eq!(color.designator(), "string");

        let price = product.column("ListPrice").unwrap();
        assert_eq!(price.type_decision.as_ref().unwrap().designator(), "decimal?");
        assert_eq!(price.verbose_type.as_deref(), Some("money"));
        assert!(enriched.diagnostics.is_empty());
    }

    #[test]
    fn test_unmapped_type_warns() {
        let physical = PhysicalSchema {
            tables: vec![table(
                "Address",
                vec![
                    int("AddressID"),
                    col("SpatialLocation", "Microsoft.SqlServer.Types.SqlGeography", true),
                ],
            )],
        };
        let enriched = enrich(&physical);
        let location = enriched.schema.tables[0].column("SpatialLocation").unwrap();

        assert_eq!(
            location.type_decision.as_ref().unwrap().designator(),
            "Microsoft.SqlServer.Types.SqlGeography"
        );
        assert_eq!(enriched.diagnostics.warnings().count(), 1);
        assert!(!enriched.diagnostics.has_errors());
    }

    #[test]
    fn test_two_keys_to_same_parent() {
        let enriched = enrich(&address_schema());
        let schema = &enriched.schema;

        assert_eq!(
            forward(schema, "Person", "FK_Person_AddressType_BillTo"),
            Some("BillToAddressType")
        );
        assert_eq!(
            forward(schema, "Person", "FK_Person_AddressType_ShipTo"),
            Some("ShipToAddressType")
        );

        let bill = reverse(schema, "AddressType", "FK_Person_AddressType_BillTo").unwrap();
        let ship = reverse(schema, "AddressType", "FK_Person_AddressType_ShipTo").unwrap();
        assert_eq!(bill, "Person");
        assert_eq!(ship, "Person1");

        let address_type = schema.table("dbo", "AddressType").unwrap();
        for name in [bill, ship] {
            assert!(!same_name(name, address_type.class_name()));
            assert!(address_type.columns.iter().all(|c| c.identifier.as_deref() != Some(name)));
        }
        assert_unique_names(schema);
        assert!(enriched.diagnostics.is_empty());
    }

    #[test]
    fn test_reverse_names_have_own_registry() {
        let enriched = enrich(&address_schema());
        let names = enriched.schema.table("dbo", "AddressType").unwrap().names();

        assert_eq!(names.registry(Namespace::ReverseKeys).len(), 2);
        assert!(names.registry(Namespace::ForwardKeys).is_empty());
    }

    #[test]
    fn test_missing_parent_skips_one_relationship() {
        let mut physical = address_schema();
        physical.tables[0].foreign_keys.push(foreign_key(
            "FK_Person_Region",
            "Person",
            "RegionID",
            "Region",
            "RegionID",
        ));
        let enriched = enrich(&physical);
        let schema = &enriched.schema;

        assert_eq!(enriched.diagnostics.warnings().count(), 1);
        assert!(!enriched.diagnostics.has_errors());
        assert_eq!(forward(schema, "Person", "FK_Person_Region"), None);
        assert_eq!(
            forward(schema, "Person", "FK_Person_AddressType_BillTo"),
            Some("BillToAddressType")
        );
        assert_eq!(reverse(schema, "AddressType", "FK_Person_AddressType_ShipTo"), Some("Person1"));
    }

    #[test]
    fn test_missing_reverse_entry_is_an_error() {
        let mut physical = address_schema();
        physical.tables[1]
            .child_keys
            .retain(|k| k.constraint != "FK_Person_AddressType_BillTo");
        let enriched = enrich(&physical);
        let schema = &enriched.schema;

        assert_eq!(enriched.diagnostics.errors().count(), 1);
        assert_eq!(forward(schema, "Person", "FK_Person_AddressType_BillTo"), None);
        assert_eq!(
            forward(schema, "Person", "FK_Person_AddressType_ShipTo"),
            Some("ShipToAddressType")
        );
        assert_eq!(reverse(schema, "AddressType", "FK_Person_AddressType_ShipTo"), Some("Person"));
    }

    #[test]
    fn test_duplicate_reverse_entry_is_an_error() {
        let mut physical = address_schema();
        let duplicate = physical.tables[1].child_keys[0].clone();
        physical.tables[1].child_keys.push(duplicate);
        let enriched = enrich(&physical);

        assert_eq!(enriched.diagnostics.errors().count(), 1);
        assert_eq!(forward(&enriched.schema, "Person", "FK_Person_AddressType_BillTo"), None);
    }

    #[test]
    fn test_self_reference() {
        let mut physical = PhysicalSchema {
            tables: vec![table("Employee", vec![int("EmployeeID"), int("ManagerID")])],
        };
        link(
            &mut physical,
            "FK_Employee_Manager",
            ("Employee", "ManagerID"),
            ("Employee", "EmployeeID"),
        );
        let enriched = enrich(&physical);
        let schema = &enriched.schema;

        assert_eq!(forward(schema, "Employee", "FK_Employee_Manager"), Some("Manager"));
        assert_eq!(reverse(schema, "Employee", "FK_Employee_Manager"), Some("Employee1"));
        assert_unique_names(schema);
    }

    #[test]
    fn test_forward_name_avoids_column() {
        let mut physical = PhysicalSchema {
            tables: vec![
                table(
                    "Order",
                    vec![int("OrderID"), int("CustomerID"), col("Customer", "System.String", true)],
                ),
                table("Customer", vec![int("CustomerID")]),
            ],
        };
        link(
            &mut physical,
            "FK_Order_Customer",
            ("Order", "CustomerID"),
            ("Customer", "CustomerID"),
        );
        let enriched = enrich(&physical);

        assert_eq!(column_ident(&enriched.schema, "Order", "Customer"), "Customer");
        assert_eq!(forward(&enriched.schema, "Order", "FK_Order_Customer"), Some("Customer1"));
        assert_eq!(reverse(&enriched.schema, "Customer", "FK_Order_Customer"), Some("Order"));
    }

    #[test]
    fn test_bare_id_column_names_after_parent() {
        let mut physical = PhysicalSchema {
            tables: vec![
                table("Person", vec![int("ID")]),
                table("Employee", vec![int("ID")]),
            ],
        };
        link(&mut physical, "FK_Employee_Person", ("Employee", "ID"), ("Person", "ID"));
        let enriched = enrich(&physical);

        assert_eq!(forward(&enriched.schema, "Employee", "FK_Employee_Person"), Some("Person"));
    }

    #[test]
    fn test_relationships_before_columns_rejected() {
        let mut enricher = SchemaEnricher::default();
        let mut schema = enricher.build(&address_schema());

        let err = enricher.name_relationships(&mut schema).unwrap_err();
        assert!(matches!(err, EnrichError::PhaseOrder { found: NamingPhase::Unprocessed, .. }));

        enricher.name_columns(&mut schema);
        enricher.name_relationships(&mut schema).unwrap();
        assert!(schema.tables.iter().all(|t| t.phase() == NamingPhase::FullyNamed));
    }

    #[test]
    fn test_collision_bound_exhausted() {
        let physical = PhysicalSchema {
            tables: vec![table("Item", vec![int("Value"), int("VALUE"), int("value_")])],
        };
        let options = EnrichOptions {
            collision_bound: 1,
            ..EnrichOptions::default()
        };
        let enriched = SchemaEnricher::new(options).enrich(&physical).unwrap();

        assert_eq!(column_ident(&enriched.schema, "Item", "VALUE"), "Value1");
        assert_eq!(column_ident(&enriched.schema, "Item", "value_"), "Value1");
        assert_eq!(enriched.diagnostics.warnings().count(), 1);
    }

    #[test]
    fn test_rust_language() {
        let physical = PhysicalSchema {
            tables: vec![table("Node", vec![int("NodeID"), int("self")])],
        };
        let options = EnrichOptions {
            language: Language::Rust,
            ..EnrichOptions::default()
        };
        let enriched = SchemaEnricher::new(options).enrich(&physical).unwrap();

        assert_eq!(column_ident(&enriched.schema, "Node", "self"), "Self_");
    }

    #[test]
    fn test_output_is_deterministic() {
        let physical = address_schema();
        let first = serde_json::to_string(&enrich(&physical)).unwrap();
        let second = serde_json::to_string(&enrich(&physical)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_key_order_does_not_change_names() {
        let mut reordered = address_schema();
        reordered.tables[0].foreign_keys.reverse();
        reordered.tables[1].child_keys.reverse();

        let a = enrich(&address_schema());
        let b = enrich(&reordered);
        for constraint in ["FK_Person_AddressType_BillTo", "FK_Person_AddressType_ShipTo"] {
            assert_eq!(
                reverse(&a.schema, "AddressType", constraint),
                reverse(&b.schema, "AddressType", constraint)
            );
        }
    }

    #[test]
    fn test_options_from_json() {
        let options: EnrichOptions = serde_json::from_str(r#"{"language": "rs"}"#).unwrap();
        assert_eq!(options.language, Language::Rust);
        assert_eq!(options.collision_bound, DEFAULT_COLLISION_BOUND);
        assert!(options.strip_id_suffix);
    }
}
