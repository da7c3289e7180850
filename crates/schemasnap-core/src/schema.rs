use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::validate_snapshot;

/// Top-level schema snapshot for one run.
///
/// Built once through [`SchemaSnapshot::new`] and read-only afterwards. Tables
/// keep the order the catalog listed them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    /// Database name when available.
    database: Option<String>,
    /// Tables in catalog order.
    tables: Vec<Table>,
}

impl SchemaSnapshot {
    /// Create a snapshot, rejecting duplicate or empty table names.
    pub fn new(database: Option<String>, tables: Vec<Table>) -> Result<Self> {
        let snapshot = Self { database, tables };
        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.name.as_str())
    }

    /// Flattened (table, column) projection in catalog order.
    pub fn column_refs(&self) -> Vec<ColumnRef> {
        self.tables
            .iter()
            .flat_map(|table| {
                table
                    .columns
                    .iter()
                    .map(|column| ColumnRef::new(&table.name, &column.name))
            })
            .collect()
    }
}

/// A table with its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Column metadata as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Raw catalog type, e.g. `int(11) unsigned`.
    pub declared_type: String,
    pub key_role: KeyRole,
    pub is_nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            key_role: KeyRole::None,
            is_nullable: true,
        }
    }

    pub fn primary(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            key_role: KeyRole::Primary,
            is_nullable: false,
            ..Self::new(name, declared_type)
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.key_role == KeyRole::Primary
    }
}

/// Index role of a column, mirroring MySQL's `COLUMN_KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    Primary,
    Unique,
    Multiple,
    #[default]
    None,
}

impl KeyRole {
    /// Map a `COLUMN_KEY` value (`PRI`, `UNI`, `MUL`, or empty).
    pub fn from_catalog(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            _ => Self::None,
        }
    }
}

/// A fully qualified column reference, displayed as `table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}
