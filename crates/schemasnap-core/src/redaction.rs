use serde::{Deserialize, Serialize};

/// Connection metadata that is safe to log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedConnection {
    pub engine: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    /// The connection string with password and secret parameters masked.
    pub redacted: String,
}

const MASK: &str = "***";

/// Mask secrets in a URL-style connection string and pull out the parts that
/// are useful in logs.
pub fn redact_connection_string(conn: &str) -> RedactedConnection {
    let Some((scheme, rest)) = conn.split_once("://") else {
        return RedactedConnection {
            redacted: mask_query(conn),
            ..RedactedConnection::default()
        };
    };

    let (before_query, query) = match rest.split_once('?') {
        Some((head, query)) => (head, Some(query)),
        None => (rest, None),
    };
    let (authority, path) = before_query.split_once('/').unwrap_or((before_query, ""));
    let (userinfo, host_port) = match authority.rsplit_once('@') {
        Some((userinfo, host_port)) => (Some(userinfo), host_port),
        None => (None, authority),
    };

    let (user, masked_userinfo) = match userinfo {
        Some(info) => match info.split_once(':') {
            Some((user, _password)) => (Some(user.to_string()), Some(format!("{user}:{MASK}"))),
            None => (Some(info.to_string()), Some(info.to_string())),
        },
        None => (None, None),
    };

    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.parse::<u16>().ok()),
        None => (host_port.to_string(), None),
    };

    let mut redacted = format!("{scheme}://");
    if let Some(info) = &masked_userinfo {
        redacted.push_str(info);
        redacted.push('@');
    }
    redacted.push_str(host_port);
    if before_query.contains('/') {
        redacted.push('/');
        redacted.push_str(path);
    }
    if let Some(query) = query {
        redacted.push('?');
        redacted.push_str(&mask_params(query));
    }

    RedactedConnection {
        engine: Some(scheme.to_string()),
        user,
        host: Some(host).filter(|value| !value.is_empty()),
        port,
        database: Some(path.to_string()).filter(|value| !value.is_empty()),
        redacted,
    }
}

fn mask_query(conn: &str) -> String {
    match conn.split_once('?') {
        Some((base, query)) => format!("{base}?{}", mask_params(query)),
        None => conn.to_string(),
    }
}

fn mask_params(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}={MASK}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "password" | "pass" | "pwd" | "token" | "api_key" | "apikey"
    )
}
