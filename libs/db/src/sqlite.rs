//! SQLite DSN helpers: path preparation and the PRAGMA whitelist.

use std::path::Path;

/// SQLite-specific query parameters stripped from the DSN before sqlx sees it.
const SQLITE_PRAGMA_PARAMS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

/// PRAGMA settings accepted from DSN query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SqlitePragmas {
    pub(crate) journal_mode: Option<String>,
    pub(crate) synchronous: Option<String>,
    pub(crate) busy_timeout: Option<i64>,
}

/// True for private or shared in-memory SQLite DSNs.
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Create the parent directory of a file-backed SQLite DSN.
pub(crate) fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> std::io::Result<()> {
    if !create_dirs || is_memory_dsn(dsn) {
        return Ok(());
    }

    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    // URI forms like "sqlite:file:..." have no directory to create.
    if raw.starts_with("file:") {
        return Ok(());
    }
    let path = raw.split_once('?').map_or(raw, |(p, _)| p);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Remove SQLite PRAGMA parameters from the DSN; sqlx rejects unknown keys.
pub(crate) fn remove_sqlite_pragmas_from_dsn(dsn: &str) -> String {
    let Some((base, query)) = dsn.split_once('?') else {
        return dsn.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(k, _)| k);
            !key.is_empty() && !SQLITE_PRAGMA_PARAMS.contains(&key.to_lowercase().as_str())
        })
        .collect();

    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept.join("&"))
    }
}

/// Parse and validate PRAGMA settings from DSN query parameters.
/// Invalid values are logged and ignored.
pub(crate) fn parse_sqlite_pragmas_from_dsn(dsn: &str) -> SqlitePragmas {
    let mut pragmas = SqlitePragmas::default();
    let Some((_, query)) = dsn.split_once('?') else {
        return pragmas;
    };

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key.to_lowercase().as_str() {
            // journal_mode wins over the wal shorthand regardless of order
            "wal" => match validate_wal_pragma(value) {
                Some(mode) => {
                    if pragmas.journal_mode.is_none() {
                        pragmas.journal_mode = Some(mode);
                    }
                }
                None => tracing::warn!("Invalid 'wal' PRAGMA value '{}', ignoring", value),
            },
            "journal_mode" => match validate_journal_mode_pragma(value) {
                Some(mode) => pragmas.journal_mode = Some(mode),
                None => {
                    tracing::warn!("Invalid 'journal_mode' PRAGMA value '{}', ignoring", value)
                }
            },
            "synchronous" => match validate_synchronous_pragma(value) {
                Some(mode) => pragmas.synchronous = Some(mode),
                None => tracing::warn!("Invalid 'synchronous' PRAGMA value '{}', ignoring", value),
            },
            "busy_timeout" => match value.parse::<i64>().ok().filter(|t| *t >= 0) {
                Some(ms) => pragmas.busy_timeout = Some(ms),
                None => {
                    tracing::warn!("Invalid 'busy_timeout' PRAGMA value '{}', ignoring", value)
                }
            },
            _ => {}
        }
    }

    pragmas
}

/// Accepts "true"/"false"/"1"/"0"; returns the journal mode it stands for.
fn validate_wal_pragma(value: &str) -> Option<String> {
    match value.to_lowercase().as_str() {
        "true" | "1" => Some("WAL".to_string()),
        "false" | "0" => Some("DELETE".to_string()),
        _ => None,
    }
}

fn validate_synchronous_pragma(value: &str) -> Option<String> {
    match value.to_uppercase().as_str() {
        "OFF" | "NORMAL" | "FULL" | "EXTRA" => Some(value.to_uppercase()),
        _ => None,
    }
}

fn validate_journal_mode_pragma(value: &str) -> Option<String> {
    match value.to_uppercase().as_str() {
        "DELETE" | "WAL" | "MEMORY" | "TRUNCATE" | "PERSIST" | "OFF" => Some(value.to_uppercase()),
        _ => None,
    }
}
