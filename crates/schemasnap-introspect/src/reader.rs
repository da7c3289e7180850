use async_trait::async_trait;

use schemasnap_core::{Column, ColumnRef, Result};

use crate::options::IntrospectOptions;

/// Read-only access to a database catalog.
///
/// Implementations must tolerate concurrent `describe_table` calls for
/// distinct tables.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Returns the engine identifier (e.g. `mysql`).
    fn engine(&self) -> &'static str;

    /// Name of the database being introspected, when one is selected.
    async fn database_name(&self) -> Result<Option<String>>;

    /// Table names in catalog order.
    async fn list_tables(&self, opts: &IntrospectOptions) -> Result<Vec<String>>;

    /// Columns of one table in declaration order. Fails for an unknown table.
    async fn describe_table(&self, table: &str) -> Result<Vec<Column>>;

    /// Every (table, column) pair of the tables `list_tables` would return,
    /// fetched in one query.
    async fn list_all_columns(&self, opts: &IntrospectOptions) -> Result<Vec<ColumnRef>>;
}
