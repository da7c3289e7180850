use thiserror::Error;

/// Core error type shared across schemasnap crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The database could not be reached.
    #[error("connectivity error: {0}")]
    Connectivity(String),
    /// An introspection query failed or returned unusable data.
    #[error(
        "catalog error in {operation}{}: {message}",
        .table.as_deref().map(|table| format!(" (table `{table}`)")).unwrap_or_default()
    )]
    Catalog {
        operation: &'static str,
        table: Option<String>,
        message: String,
    },
    /// A rendered artifact could not be persisted.
    #[error("failed to write artifact {artifact}: {message}")]
    Write { artifact: String, message: String },
    /// The snapshot violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl Error {
    /// Build a catalog error scoped to one table.
    pub fn catalog_table(
        operation: &'static str,
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Catalog {
            operation,
            table: Some(table.into()),
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by schemasnap crates.
pub type Result<T> = std::result::Result<T, Error>;
