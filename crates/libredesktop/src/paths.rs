//! Resolves where the wallpaper lives: an explicit override, or the fixed
//! `wallpaper.png` sitting in the same directory as the running executable.
//!
//! Functions:
//!
//! - `resolve_wallpaper_path` applies the override-or-default precedence.
//! - `wallpaper_beside` joins the fixed file name onto an executable path.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

pub const WALLPAPER_FILE_NAME: &str = "wallpaper.png";

/// Returns the override when given; otherwise locates the executable. Not
/// being able to locate the executable is fatal since no default exists.
pub fn resolve_wallpaper_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let exe = env::current_exe().context("failed to resolve the executable's own path")?;
    wallpaper_beside(&exe)
}

pub fn wallpaper_beside(executable: &Path) -> Result<PathBuf> {
    let dir = executable.parent().ok_or_else(|| {
        anyhow!(
            "executable path {} has no parent directory",
            executable.display()
        )
    })?;
    Ok(dir.join(WALLPAPER_FILE_NAME))
}
