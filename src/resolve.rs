//! Name and type resolution.
//!
//! A [`Resolver`] turns a table into an interface name and a column into a
//! target-language type. The decorator calls it once per entity, in schema
//! order, so implementations may keep state between calls.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::config::Config;
use crate::model::{Column, Database, Table};

/// Placeholder replaced by the PascalCase table name.
pub const TABLE_PLACEHOLDER: &str = "${table}";

/// Interface name pattern used when the config sets none.
pub const DEFAULT_INTERFACE_FORMAT: &str = "${table}Entity";

/// Failure to resolve a table or column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No type mapping for column '{table}.{column}' of type '{source_type}'")]
    UnknownType {
        table: String,
        column: String,
        source_type: String,
    },

    #[error("Cannot derive an interface name for table '{table}': {reason}")]
    InvalidName { table: String, reason: String },
}

/// Capability producing target-language names and types.
pub trait Resolver {
    /// Called once before a database is decorated. Not a resolution: use it
    /// to learn database-wide facts such as the declared enums.
    fn prepare(&mut self, _database: &Database, _config: &Config) {}

    /// Interface name for a table.
    fn resolve_interface_name(
        &mut self,
        table_name: &str,
        config: &Config,
    ) -> Result<String, ResolveError>;

    /// Target type for a column of `table`.
    fn resolve_column_type(
        &mut self,
        column: &Column,
        table: &Table,
        config: &Config,
    ) -> Result<String, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for &mut R {
    fn prepare(&mut self, database: &Database, config: &Config) {
        (**self).prepare(database, config)
    }

    fn resolve_interface_name(
        &mut self,
        table_name: &str,
        config: &Config,
    ) -> Result<String, ResolveError> {
        (**self).resolve_interface_name(table_name, config)
    }

    fn resolve_column_type(
        &mut self,
        column: &Column,
        table: &Table,
        config: &Config,
    ) -> Result<String, ResolveError> {
        (**self).resolve_column_type(column, table, config)
    }
}

/// PostgreSQL → TypeScript resolver.
///
/// Interface names are the PascalCase table name substituted into
/// `interfaceNameFormat`. Column types consult `typeMap` first, then the
/// database's own enums (a column of enum type resolves to the enum name),
/// then [`builtin_type`].
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    enums: BTreeSet<String>,
}

impl DefaultResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that already knows the enums declared by `database`.
    pub fn for_database(database: &Database) -> Self {
        let mut resolver = Self::new();
        resolver.prepare(database, &Config::default());
        resolver
    }
}

impl Resolver for DefaultResolver {
    fn prepare(&mut self, database: &Database, _config: &Config) {
        self.enums = database.enums.iter().map(|e| e.name.clone()).collect();
    }

    fn resolve_interface_name(
        &mut self,
        table_name: &str,
        config: &Config,
    ) -> Result<String, ResolveError> {
        let pascal = to_pascal_case(table_name);
        if pascal.is_empty() {
            return Err(ResolveError::InvalidName {
                table: table_name.to_string(),
                reason: "name has no alphanumeric characters".to_string(),
            });
        }

        let format = config
            .interface_name_format
            .as_deref()
            .unwrap_or(DEFAULT_INTERFACE_FORMAT);
        Ok(format.replace(TABLE_PLACEHOLDER, &pascal))
    }

    fn resolve_column_type(
        &mut self,
        column: &Column,
        table: &Table,
        config: &Config,
    ) -> Result<String, ResolveError> {
        map_type(&column.typ, config, &self.enums).ok_or_else(|| ResolveError::UnknownType {
            table: table.name.clone(),
            column: column.name.clone(),
            source_type: column.typ.clone(),
        })
    }
}

/// Map a source type, honouring `typeMap` overrides and declared enums.
/// Array types (`_int4`, `text[]`) map to an array of their element type.
fn map_type(source: &str, config: &Config, enums: &BTreeSet<String>) -> Option<String> {
    if let Some(target) = config.type_map.get(source) {
        return Some(target.clone());
    }
    if enums.contains(source) {
        return Some(source.to_string());
    }

    let element = source
        .strip_prefix('_')
        .or_else(|| source.strip_suffix("[]"));
    if let Some(element) = element {
        return map_type(element, config, enums).map(|t| format!("{}[]", t));
    }

    builtin_type(source).map(str::to_string)
}

/// Built-in PostgreSQL → TypeScript mapping.
pub fn builtin_type(source: &str) -> Option<&'static str> {
    let ty = match source.to_ascii_lowercase().as_str() {
        "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint" | "serial" | "bigserial"
        | "float4" | "float8" | "real" | "double precision" | "numeric" | "decimal" | "money"
        | "oid" => "number",
        "bool" | "boolean" => "boolean",
        "json" | "jsonb" => "Object",
        "date" | "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => "Date",
        "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "name"
        | "citext" | "uuid" | "inet" | "cidr" | "macaddr" | "time" | "timetz" | "interval"
        | "tsvector" | "xml" => "string",
        "bytea" => "Buffer",
        _ => return None,
    };
    Some(ty)
}

/// Every source type [`builtin_type`] knows, in display order.
pub const BUILTIN_TYPES: &[&str] = &[
    "int2", "int4", "int8", "serial", "bigserial", "float4", "float8", "numeric", "money", "oid",
    "bool", "json", "jsonb", "date", "timestamp", "timestamptz", "text", "varchar", "char",
    "bpchar", "name", "citext", "uuid", "inet", "cidr", "macaddr", "time", "timetz", "interval",
    "tsvector", "xml", "bytea",
];

/// `user_accounts` → `UserAccounts`. Separators are `_`, `-`, `.` and spaces.
pub fn to_pascal_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Words TypeScript rejects as identifiers, strict-mode reserved words included.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Make `name` usable as a TypeScript identifier: invalid characters become
/// `_`, a leading digit gets a `_` prefix, reserved words get a `_` suffix.
pub fn safe_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();

    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}
