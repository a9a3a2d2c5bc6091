//! Pairing outgoing foreign keys with their mirror entries and naming both
//! navigation properties.

use crate::enrich::EnrichContext;
use crate::error::RelationError;
use crate::logical::LogicalSchema;
use crate::naming::{identifier_for, Namespace};

/// Names given to one relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationNames {
    pub forward: String,
    pub reverse: String,
}

/// Name the relationship `schema.tables[child].foreign_keys[fk]`.
///
/// The forward name goes on the child table, the reverse (collection) name on
/// the parent. Nothing is allocated unless the parent table and exactly one
/// mirror entry are found.
pub(crate) fn name_relationship(
    schema: &mut LogicalSchema,
    child: usize,
    fk: usize,
    ctx: &mut EnrichContext,
) -> Result<NavigationNames, RelationError> {
    let key = &schema.tables[child].foreign_keys[fk];
    let constraint = key.constraint.clone();
    let first_column = key.first_child_column().map(str::to_string);

    let parent = schema
        .table_index(&key.parent_schema, &key.parent_table)
        .ok_or_else(|| RelationError::ParentTableMissing {
            constraint: constraint.clone(),
            parent: format!("{}.{}", key.parent_schema, key.parent_table),
        })?;

    let mirror = find_reverse_key(schema, parent, &constraint)?;

    let strip_id = ctx.options.strip_id_suffix;
    let forward_base = match first_column.as_deref().map(|c| forward_base_name(c, strip_id)) {
        Some(base) if !base.is_empty() => identifier_for(base, ctx.options.language),
        // No usable column: name it after the parent entity.
        _ => schema.tables[parent].class_name().to_string(),
    };
    let reverse_base = schema.tables[child].class_name().to_string();

    let forward = {
        let table = &mut schema.tables[child];
        let label = table.qualified_name();
        let name = ctx.allocate(
            &mut table.names,
            &label,
            Namespace::ForwardKeys,
            &constraint,
            &forward_base,
        );
        table.foreign_keys[fk].navigation_name = Some(name.clone());
        name
    };

    let reverse = {
        let table = &mut schema.tables[parent];
        let label = table.qualified_name();
        let name = ctx.allocate(
            &mut table.names,
            &label,
            Namespace::ReverseKeys,
            &constraint,
            &reverse_base,
        );
        table.child_keys[mirror].navigation_name = Some(name.clone());
        name
    };

    tracing::debug!(
        constraint = %constraint,
        forward = %forward,
        reverse = %reverse,
        "named relationship"
    );

    Ok(NavigationNames { forward, reverse })
}

fn find_reverse_key(
    schema: &LogicalSchema,
    parent: usize,
    constraint: &str,
) -> Result<usize, RelationError> {
    let table = &schema.tables[parent];
    let matches: Vec<usize> = table
        .child_keys
        .iter()
        .enumerate()
        .filter(|(_, k)| k.constraint == constraint)
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(RelationError::ReverseKeyMissing {
            constraint: constraint.to_string(),
            parent: table.qualified_name(),
        }),
        many => Err(RelationError::DuplicateReverseKey {
            constraint: constraint.to_string(),
            parent: table.qualified_name(),
            count: many.len(),
        }),
    }
}

/// Column name with a trailing `Id` (any case) removed.
pub fn forward_base_name(column: &str, strip_id: bool) -> &str {
    if !strip_id {
        return column;
    }
    let Some(at) = column.len().checked_sub(2) else {
        return column;
    };
    match column.get(at..) {
        Some(tail) if tail.eq_ignore_ascii_case("id") => &column[..at],
        _ => column,
    }
}

/// Foreign keys of a table in constraint-name order.
pub(crate) fn ordered_keys(schema: &LogicalSchema, table: usize) -> Vec<usize> {
    let keys = &schema.tables[table].foreign_keys;
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].constraint.cmp(&keys[b].constraint));
    order
}
