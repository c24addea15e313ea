//! Resolution of the server home directory.
//!
//! The home directory anchors every relative path the server touches: the
//! SQLite database file and rotating log files.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

#[cfg(target_os = "windows")]
const HOME_ENV: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const HOME_ENV: &str = "HOME";

fn platform_home() -> Result<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{HOME_ENV} is not set; cannot resolve home directory"))
}

/// Expand a leading `~` (alone or followed by a separator) to the platform home.
fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let cwd = std::env::current_dir().context("current_dir unavailable")?;
    Ok(cwd.join(p))
}

/// Resolve the server home directory.
///
/// - `configured = Some(path)`: `~` is expanded, relative paths are joined to the cwd.
/// - `configured = None`: `<platform home>/<default_subdir>`.
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => absolutize(&expand_tilde(raw.trim())?)?,
        None => platform_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create home dir {}", path.display()))?;
    }
    Ok(path)
}
