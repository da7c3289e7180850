use schemasnap_core::Error;

/// Classify a driver error: transport failures are connectivity errors,
/// everything else is a failed catalog query.
pub fn map_sqlx_error(operation: &'static str, table: Option<&str>, err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Error::Connectivity(format!("{operation}: {err}")),
        other => Error::Catalog {
            operation,
            table: table.map(str::to_string),
            message: other.to_string(),
        },
    }
}

pub fn is_nullable_from_text(value: &str) -> bool {
    value.eq_ignore_ascii_case("YES")
}
