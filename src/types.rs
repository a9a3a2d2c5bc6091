//! Value-type descriptor to target type mapping.

use crate::schema::PhysicalColumn;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Needs an explicit nullable marker when the column is nullable.
    Value,
    /// Implicitly nullable; never marked.
    Reference,
}

/// Resolved target type for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDecision {
    pub token: String,
    pub kind: TypeKind,
    /// The nullable marker applies (nullable column of a value type).
    pub nullable: bool,
    /// False when the descriptor was unknown and kept verbatim.
    pub resolved: bool,
}

impl TypeDecision {
    /// Type as written in generated code, e.g. `int?` or `string`.
    pub fn designator(&self) -> String {
        if self.nullable {
            format!("{}?", self.token)
        } else {
            self.token.clone()
        }
    }
}

/// Map a value-type descriptor (e.g. `System.Int32`) to a target type.
pub fn map_value_type(descriptor: &str, nullable: bool) -> TypeDecision {
    let descriptor = descriptor.trim();

    let (token, kind, resolved) = if let Some((short, kind)) = alias(descriptor) {
        (short.to_string(), kind, true)
    } else if let Some((element, _)) = descriptor.strip_suffix("[]").and_then(alias) {
        (format!("{element}[]"), TypeKind::Reference, true)
    } else if let Some(name) = framework_value_type(descriptor) {
        (name.to_string(), TypeKind::Value, true)
    } else {
        // Vendor extensions (geography, hierarchyid, ...) are assumed to be classes.
        (descriptor.to_string(), TypeKind::Reference, false)
    };

    TypeDecision {
        nullable: nullable && kind == TypeKind::Value,
        token,
        kind,
        resolved,
    }
}

fn short_name(descriptor: &str) -> Option<&str> {
    match descriptor.strip_prefix("System.") {
        Some(rest) => Some(rest),
        None if !descriptor.contains('.') => Some(descriptor),
        None => None,
    }
}

fn alias(descriptor: &str) -> Option<(&'static str, TypeKind)> {
    let alias = match short_name(descriptor)? {
        "Boolean" => ("bool", TypeKind::Value),
        "Byte" => ("byte", TypeKind::Value),
        "SByte" => ("sbyte", TypeKind::Value),
        "Char" => ("char", TypeKind::Value),
        "Decimal" => ("decimal", TypeKind::Value),
        "Double" => ("double", TypeKind::Value),
        "Single" => ("float", TypeKind::Value),
        "Int16" => ("short", TypeKind::Value),
        "UInt16" => ("ushort", TypeKind::Value),
        "Int32" => ("int", TypeKind::Value),
        "UInt32" => ("uint", TypeKind::Value),
        "Int64" => ("long", TypeKind::Value),
        "UInt64" => ("ulong", TypeKind::Value),
        "Object" => ("object", TypeKind::Reference),
        "String" => ("string", TypeKind::Reference),
        // void never takes a nullable marker
        "Void" => ("void", TypeKind::Reference),
        _ => return None,
    };
    Some(alias)
}

fn framework_value_type(descriptor: &str) -> Option<&'static str> {
    match short_name(descriptor)? {
        "DateTime" => Some("DateTime"),
        "DateTimeOffset" => Some("DateTimeOffset"),
        "TimeSpan" => Some("TimeSpan"),
        "Guid" => Some("Guid"),
        _ => None,
    }
}

/// Descriptive SQL type annotation, independent of [`map_value_type`].
pub fn verbose_type_name(column: &PhysicalColumn) -> Option<String> {
    let tag = column.sql_type.trim().to_lowercase();

    match tag.as_str() {
        "decimal" | "numeric" => {
            let precision = column.precision.unwrap_or(18);
            let scale = column.scale.unwrap_or(0);
            Some(format!("{tag}({precision}, {scale})"))
        }

        // Temporal, currency and XML-like
        "date" | "datetime" | "datetime2" | "smalldatetime" | "time" | "datetimeoffset"
        | "money" | "smallmoney" | "xml" | "image" | "text" | "ntext" => Some(tag),

        "char" | "nchar" | "varchar" | "nvarchar" | "binary" | "varbinary" => {
            match column.max_length {
                Some(-1) => Some(format!("{tag}(max)")),
                Some(n) if n > 0 => Some(format!("{tag}({n})")),
                _ => None,
            }
        }

        _ => None,
    }
}
