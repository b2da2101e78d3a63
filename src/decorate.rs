//! Decoration: attach target-language names and types to a database.

use crate::config::Config;
use crate::model::Database;
use crate::resolve::{ResolveError, Resolver};

/// Set `interface_name` on every table and `decorated_type` on every column.
///
/// Tables are visited in order; for each, the interface name is resolved
/// first and then every column in order. The resolver is asked exactly once
/// per entity, after a single [`Resolver::prepare`] with the whole database.
/// The first resolver error aborts decoration and is returned as is, leaving
/// the database partially decorated.
pub fn decorate_database<R>(
    database: &mut Database,
    config: &Config,
    resolver: &mut R,
) -> Result<(), ResolveError>
where
    R: Resolver + ?Sized,
{
    resolver.prepare(database, config);

    for table in database.tables.iter_mut() {
        table.interface_name = Some(resolver.resolve_interface_name(&table.name, config)?);

        for i in 0..table.columns.len() {
            let decorated = resolver.resolve_column_type(&table.columns[i], table, config)?;
            table.columns[i].decorated_type = Some(decorated);
        }

        tracing::debug!(
            "Decorated {}.{} as {} ({} columns)",
            table.schema,
            table.name,
            table.interface_name.as_deref().unwrap_or_default(),
            table.columns.len()
        );
    }

    Ok(())
}
