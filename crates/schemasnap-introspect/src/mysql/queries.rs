use sqlx::mysql::MySqlPool;
use sqlx::Row;

use schemasnap_core::Result;

use super::utils::map_sqlx_error;

// information_schema columns decode as binary on some servers; every text
// column is cast to CHAR so it reads as a String.

pub async fn fetch_database_name(pool: &MySqlPool) -> Result<Option<String>> {
    sqlx::query_scalar::<_, Option<String>>("select cast(database() as char)")
        .fetch_one(pool)
        .await
        .map_err(|err| map_sqlx_error("database_name", None, err))
}

pub async fn list_tables(pool: &MySqlPool, include_views: bool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        select cast(t.table_name as char) as name
        from information_schema.tables t
        where t.table_schema = database()
          and (t.table_type = 'BASE TABLE' or (? and t.table_type = 'VIEW'))
        order by t.table_name
        "#,
    )
    .bind(include_views)
    .fetch_all(pool)
    .await
    .map_err(|err| map_sqlx_error("list_tables", None, err))?;

    rows.into_iter()
        .map(|row| {
            row.try_get::<String, _>("name")
                .map_err(|err| map_sqlx_error("list_tables", None, err))
        })
        .collect()
}

pub struct RawColumn {
    pub name: String,
    pub column_type: String,
    pub column_key: String,
    pub is_nullable: String,
}

pub async fn list_columns(pool: &MySqlPool, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(
        r#"
        select
          cast(c.column_name as char) as name,
          cast(c.column_type as char) as column_type,
          cast(c.column_key as char) as column_key,
          cast(c.is_nullable as char) as is_nullable
        from information_schema.columns c
        where c.table_schema = database()
          and c.table_name = ?
        order by c.ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| map_sqlx_error("describe_table", Some(table), err))?;

    rows.into_iter()
        .map(|row| {
            let decode = |column: &str| {
                row.try_get::<String, _>(column)
                    .map_err(|err| map_sqlx_error("describe_table", Some(table), err))
            };
            Ok(RawColumn {
                name: decode("name")?,
                column_type: decode("column_type")?,
                column_key: decode("column_key")?,
                is_nullable: decode("is_nullable")?,
            })
        })
        .collect()
}

pub struct RawColumnRef {
    pub table: String,
    pub column: String,
}

pub async fn list_all_columns(pool: &MySqlPool, include_views: bool) -> Result<Vec<RawColumnRef>> {
    let rows = sqlx::query(
        r#"
        select
          cast(c.table_name as char) as table_name,
          cast(c.column_name as char) as column_name
        from information_schema.columns c
        join information_schema.tables t
          on t.table_schema = c.table_schema and t.table_name = c.table_name
        where c.table_schema = database()
          and (t.table_type = 'BASE TABLE' or (? and t.table_type = 'VIEW'))
        order by c.table_name, c.ordinal_position
        "#,
    )
    .bind(include_views)
    .fetch_all(pool)
    .await
    .map_err(|err| map_sqlx_error("list_all_columns", None, err))?;

    rows.into_iter()
        .map(|row| {
            let table = row
                .try_get::<String, _>("table_name")
                .map_err(|err| map_sqlx_error("list_all_columns", None, err))?;
            let column = row
                .try_get::<String, _>("column_name")
                .map_err(|err| map_sqlx_error("list_all_columns", Some(&table), err))?;
            Ok(RawColumnRef { table, column })
        })
        .collect()
}
