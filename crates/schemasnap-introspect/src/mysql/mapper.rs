use schemasnap_core::{Column, ColumnRef, KeyRole};

use super::queries::{RawColumn, RawColumnRef};
use super::utils::is_nullable_from_text;

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<Column> {
    raw.into_iter()
        .map(|col| Column {
            name: col.name,
            declared_type: col.column_type,
            key_role: KeyRole::from_catalog(&col.column_key),
            is_nullable: is_nullable_from_text(&col.is_nullable),
        })
        .collect()
}

pub fn map_column_refs(raw: Vec<RawColumnRef>) -> Vec<ColumnRef> {
    raw.into_iter()
        .map(|item| ColumnRef::new(item.table, item.column))
        .collect()
}
