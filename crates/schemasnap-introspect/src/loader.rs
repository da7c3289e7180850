use std::collections::HashMap;

use futures_util::{StreamExt, TryStreamExt, stream};

use schemasnap_core::{ColumnRef, Error, Result, SchemaSnapshot, Table};

use crate::options::IntrospectOptions;
use crate::reader::CatalogReader;

/// A fully materialized catalog: the snapshot plus the flattened column list
/// used for relationship inference.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub snapshot: SchemaSnapshot,
    /// Bulk (table, column) listing in catalog order.
    pub columns: Vec<ColumnRef>,
}

/// Read the whole catalog through `reader`.
///
/// Tables are described with at most `opts.concurrency` queries in flight and
/// come back in catalog order. The first failing query aborts the load.
pub async fn load_catalog<R>(reader: &R, opts: &IntrospectOptions) -> Result<LoadedCatalog>
where
    R: CatalogReader + ?Sized,
{
    let database = reader.database_name().await?;

    let tables: Vec<String> = reader
        .list_tables(opts)
        .await?
        .into_iter()
        .filter(|name| opts.table_enabled(name))
        .collect();
    tracing::debug!(event = "tables_listed", engine = reader.engine(), count = tables.len());

    let described: Vec<Table> = stream::iter(tables.iter())
        .map(|name| async move {
            let columns = reader.describe_table(name).await?;
            tracing::trace!(event = "table_described", table = %name, columns = columns.len());
            Ok::<_, Error>(Table::new(name.clone(), columns))
        })
        .buffered(opts.effective_concurrency())
        .try_collect()
        .await?;

    let snapshot = SchemaSnapshot::new(database, described)?;

    let positions: HashMap<&str, usize> = snapshot
        .table_names()
        .enumerate()
        .map(|(idx, name)| (name, idx))
        .collect();

    let mut columns: Vec<ColumnRef> = reader
        .list_all_columns(opts)
        .await?
        .into_iter()
        .filter(|column| positions.contains_key(column.table.as_str()))
        .collect();
    columns.sort_by_key(|column| positions.get(column.table.as_str()).copied());

    ensure_consistent(&snapshot, &columns)?;

    Ok(LoadedCatalog { snapshot, columns })
}

/// The bulk listing must describe exactly the columns the per-table queries
/// returned. A mismatch means the schema changed during the run.
fn ensure_consistent(snapshot: &SchemaSnapshot, columns: &[ColumnRef]) -> Result<()> {
    let mut listed: HashMap<&str, Vec<&str>> = HashMap::new();
    for column in columns {
        listed
            .entry(column.table.as_str())
            .or_default()
            .push(column.column.as_str());
    }

    for table in snapshot.tables() {
        let described: Vec<&str> = table.columns.iter().map(|col| col.name.as_str()).collect();
        let bulk = listed.get(table.name.as_str()).cloned().unwrap_or_default();
        if bulk != described {
            return Err(Error::catalog_table(
                "list_all_columns",
                &table.name,
                format!(
                    "bulk listing [{}] does not match description [{}]",
                    bulk.join(", "),
                    described.join(", ")
                ),
            ));
        }
    }

    Ok(())
}
