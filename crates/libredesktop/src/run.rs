//! Startup orchestration: resolves the wallpaper, builds the scene, and either
//! opens the desktop window or renders a single still frame to disk.
//!
//! Functions:
//!
//! - `run` drives the main execution path.
//! - `initialise_tracing` configures logging.
//! - `desktop_config` translates CLI input into `DesktopConfig`.
//! - `export_frame` renders one frame headlessly.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use renderer::{DesktopConfig, DesktopEvent, DesktopScene, Renderer, SurfaceSize, Wallpaper};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ExportMode};
use crate::paths::resolve_wallpaper_path;

/// Canvas size for exports when `--size` is not given.
const DEFAULT_EXPORT_SIZE: SurfaceSize = SurfaceSize::new(1920, 1080);

pub fn run(cli: Cli) -> Result<()> {
    let wallpaper_path = resolve_wallpaper_path(cli.wallpaper.as_deref())?;
    tracing::debug!(wallpaper = %wallpaper_path.display(), "resolved wallpaper path");

    let wallpaper = Wallpaper::load_optional(&wallpaper_path);
    let user = cli.user.as_deref();
    if user.is_none() {
        tracing::debug!("no user name available; greeting without a name");
    }
    let scene = DesktopScene::new(wallpaper, user);

    if let Some(target) = cli.export.as_deref() {
        let size = cli.size.unwrap_or(DEFAULT_EXPORT_SIZE);
        return export_frame(scene, size, cli.export_mode, target);
    }

    let config = desktop_config(&cli);
    tracing::info!(
        welcome = %humantime::format_duration(config.welcome_duration),
        "starting libredesktop"
    );
    Renderer::new(config).run(scene)
}

pub fn initialise_tracing() {
    let default_filter =
        "warn,libredesktop=info,renderer=info,scheduler=info,winit=error,cosmic_text=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn desktop_config(cli: &Cli) -> DesktopConfig {
    DesktopConfig {
        surface_size: cli.size,
        welcome_duration: cli.welcome_duration,
        desktop_hints: !cli.window,
        ..DesktopConfig::default()
    }
}

fn export_frame(
    mut scene: DesktopScene,
    size: SurfaceSize,
    mode: ExportMode,
    target: &Path,
) -> Result<()> {
    if mode == ExportMode::Clock {
        scene.handle(DesktopEvent::WelcomeTimeout);
    }
    let now = Local::now().naive_local();
    let frame = scene.render(size, &now)?;
    frame
        .save_png(target)
        .with_context(|| format!("failed to write still frame to {}", target.display()))?;
    tracing::info!(path = %target.display(), size = %size, ?mode, "still frame exported");
    Ok(())
}
