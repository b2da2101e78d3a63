//! Partition a database's tables by schema namespace.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::model::{Database, Enum, Table};

/// Tables of one namespace plus the database-wide enum list.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGroup<'a> {
    pub name: &'a str,
    /// Always the full `Database::enums`, never filtered by namespace.
    pub enums: &'a [Enum],
    pub tables: Vec<&'a Table>,
}

/// Namespace name → [`SchemaGroup`], in first-seen order.
///
/// Serializes as a map so templates can `{{#each grouped}}` over it and read
/// the namespace from `@key`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSchema<'a> {
    groups: Vec<SchemaGroup<'a>>,
}

impl<'a> GroupedSchema<'a> {
    pub fn get(&self, name: &str) -> Option<&SchemaGroup<'a>> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Namespace names in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|g| g.name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a, 'g> IntoIterator for &'g GroupedSchema<'a> {
    type Item = &'g SchemaGroup<'a>;
    type IntoIter = std::slice::Iter<'g, SchemaGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group `database.tables` by `schema`, keeping the original relative order
/// inside each group. Namespaces compare by exact string equality.
pub fn group_by_schema(database: &Database) -> GroupedSchema<'_> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SchemaGroup<'_>> = Vec::new();

    for table in &database.tables {
        let slot = *index.entry(table.schema.as_str()).or_insert_with(|| {
            groups.push(SchemaGroup {
                name: table.schema.as_str(),
                enums: &database.enums,
                tables: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].tables.push(table);
    }

    tracing::debug!(
        "Grouped {} tables into {} schema(s)",
        database.tables.len(),
        groups.len()
    );

    GroupedSchema { groups }
}

impl Serialize for SchemaGroup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SchemaGroup", 2)?;
        s.serialize_field("enums", self.enums)?;
        s.serialize_field("tables", &self.tables)?;
        s.end()
    }
}

impl Serialize for GroupedSchema<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(group.name, group)?;
        }
        map.end()
    }
}
