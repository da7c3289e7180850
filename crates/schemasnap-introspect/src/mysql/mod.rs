use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use schemasnap_core::{Column, ColumnRef, Error, Result};

use crate::options::IntrospectOptions;
use crate::reader::CatalogReader;

mod mapper;
mod queries;
mod utils;

/// Catalog reader for MySQL and MariaDB.
///
/// Owns its connection pool; call [`MySqlCatalog::close`] when done.
#[derive(Debug, Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Create a reader over a pre-configured pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connect with a pool sized for `max_connections` concurrent queries.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(|err| Error::Connectivity(err.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Close every pooled connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CatalogReader for MySqlCatalog {
    fn engine(&self) -> &'static str {
        "mysql"
    }

    async fn database_name(&self) -> Result<Option<String>> {
        queries::fetch_database_name(&self.pool).await
    }

    async fn list_tables(&self, opts: &IntrospectOptions) -> Result<Vec<String>> {
        queries::list_tables(&self.pool, opts.include_views).await
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<Column>> {
        let raw = queries::list_columns(&self.pool, table).await?;
        if raw.is_empty() {
            return Err(Error::catalog_table(
                "describe_table",
                table,
                "table not found in the current database",
            ));
        }
        Ok(mapper::map_columns(raw))
    }

    async fn list_all_columns(&self, opts: &IntrospectOptions) -> Result<Vec<ColumnRef>> {
        let raw = queries::list_all_columns(&self.pool, opts.include_views).await?;
        Ok(mapper::map_column_refs(raw))
    }
}
