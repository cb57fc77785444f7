//! Resolution of the server home directory.
//!
//! The home directory anchors relative paths such as log files and SQLite
//! databases. It is either configured explicitly (with `~` expansion) or
//! derived from the platform default:
//! - Windows: `%APPDATA%/<subdir>`
//! - Unix/macOS: `$HOME/<subdir>`

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("environment variable {0} is not set; cannot resolve home directory")]
    MissingEnv(&'static str),

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

#[cfg(target_os = "windows")]
const BASE_ENV: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const BASE_ENV: &str = "HOME";

fn platform_base() -> Result<PathBuf, HomeDirError> {
    std::env::var_os(BASE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::MissingEnv(BASE_ENV))
}

/// Expand a leading `~` against the platform base directory.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_base();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: PathBuf) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        return Ok(p);
    }
    let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
    Ok(cwd.join(p))
}

/// Resolve the home directory to an absolute path, optionally creating it.
///
/// `configured` of `None` (or blank) selects `<platform base>/<default_subdir>`.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match configured.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => absolutize(expand_tilde(raw)?)?,
        None => absolutize(platform_base()?.join(default_subdir))?,
    };

    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), HomeDirError> {
    std::fs::create_dir_all(path).map_err(|source| HomeDirError::Create {
        path: path.to_path_buf(),
        source,
    })
}
