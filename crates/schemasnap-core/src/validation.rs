use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::SchemaSnapshot;

/// Validate snapshot invariants: table names are non-empty and unique, and
/// column names are non-empty and unique within their table.
pub fn validate_snapshot(snapshot: &SchemaSnapshot) -> Result<()> {
    let mut seen_tables = BTreeSet::new();

    for table in snapshot.tables() {
        if table.name.is_empty() {
            return Err(Error::InvalidSchema("table name is empty".to_string()));
        }
        if !seen_tables.insert(table.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}",
                table.name
            )));
        }

        let mut seen_columns = BTreeSet::new();
        for column in &table.columns {
            if column.name.is_empty() {
                return Err(Error::InvalidSchema(format!(
                    "empty column name in table {}",
                    table.name
                )));
            }
            if !seen_columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column {} in table {}",
                    column.name, table.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::schema::{Column, SchemaSnapshot, Table};

    #[test]
    fn rejects_duplicate_tables() {
        let err = SchemaSnapshot::new(
            None,
            vec![Table::new("users", Vec::new()), Table::new("users", Vec::new())],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(message) if message.contains("users")));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = SchemaSnapshot::new(
            None,
            vec![Table::new(
                "users",
                vec![Column::new("id", "int"), Column::new("id", "int")],
            )],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
    }

    #[test]
    fn accepts_empty_schema() {
        let snapshot = SchemaSnapshot::new(None, Vec::new()).expect("empty schema is valid");
        assert!(snapshot.tables().is_empty());
    }
}
