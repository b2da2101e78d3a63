//! Schema model handed to the generator.
//!
//! A [`Database`] is the raw output of an introspection step: tables grouped by
//! schema namespace, plus the enum types they may reference. The decorator
//! fills in [`Table::interface_name`] and [`Column::decorated_type`]; nothing
//! else is ever changed.
//!
//! # Example
//! ```
//! use sqlts::model::Database;
//!
//! let json = r#"{
//!     "enums": [],
//!     "tables": [{
//!         "name": "users",
//!         "schema": "public",
//!         "columns": [
//!             { "name": "id", "type": "uuid" },
//!             { "name": "email", "type": "varchar", "nullable": true }
//!         ]
//!     }]
//! }"#;
//!
//! let db = Database::from_json(json).unwrap();
//! assert_eq!(db.tables[0].columns[1].typ, "varchar");
//! ```

use serde::{Deserialize, Serialize};

/// Root aggregate: every enum and table of an introspected database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Table definition, keyed into a namespace by `schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub schema: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Target-language interface name, set by the decorator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
}

/// Column definition with its source (database) type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", alias = "typ")]
    pub typ: String,
    #[serde(default)]
    pub nullable: bool,
    /// Target-language type, set by the decorator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorated_type: Option<String>,
}

/// Enum type carried through to the template untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add a table.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Add an enum.
    pub fn add_enum(&mut self, e: Enum) {
        self.enums.push(e);
    }

    /// Builder: add a table.
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Builder: add an enum.
    pub fn with_enum(mut self, e: Enum) -> Self {
        self.enums.push(e);
        self
    }

    /// True once every table and column carries its decorated field.
    pub fn is_decorated(&self) -> bool {
        self.tables.iter().all(|t| {
            t.interface_name.is_some() && t.columns.iter().all(|c| c.decorated_type.is_some())
        })
    }
}

impl Table {
    /// Create a new table in the given schema.
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: schema.to_string(),
            columns: Vec::new(),
            interface_name: None,
        }
    }

    /// Add a column to the table.
    pub fn add_column(&mut self, col: Column) {
        self.columns.push(col);
    }

    /// Builder: add a non-null column.
    pub fn column(mut self, name: &str, typ: &str) -> Self {
        self.columns.push(Column::new(name, typ));
        self
    }

    /// Builder: add a nullable column.
    pub fn nullable(mut self, name: &str, typ: &str) -> Self {
        let mut col = Column::new(name, typ);
        col.nullable = true;
        self.columns.push(col);
        self
    }
}

impl Column {
    pub fn new(name: &str, typ: &str) -> Self {
        Self {
            name: name.to_string(),
            typ: typ.to_string(),
            nullable: false,
            decorated_type: None,
        }
    }
}

impl Enum {
    pub fn new(schema: &str, name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            schema: schema.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}
