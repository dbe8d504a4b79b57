use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use renderer::SurfaceSize;

#[derive(Parser, Debug)]
#[command(
    name = "libredesktop",
    author,
    version,
    about = "X11 desktop background with a welcome greeting and a live clock"
)]
pub struct Cli {
    /// Wallpaper image; defaults to `wallpaper.png` next to the executable.
    #[arg(long, value_name = "PATH", env = "LIBREDESKTOP_WALLPAPER")]
    pub wallpaper: Option<PathBuf>,

    /// Override the window size (e.g. `1920x1080`); defaults to the screen size.
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<SurfaceSize>,

    /// How long the greeting stays up before the clock replaces it.
    #[arg(
        long,
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        default_value = "2s"
    )]
    pub welcome_duration: Duration,

    /// Name shown in the greeting.
    #[arg(long, value_name = "NAME", env = "USER")]
    pub user: Option<String>,

    /// Open an ordinary decorated window instead of a desktop background.
    #[arg(long)]
    pub window: bool,

    /// Render a single frame to this PNG file and exit without opening a window.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Overlay shown in the exported frame.
    #[arg(long, value_enum, value_name = "MODE", default_value_t = ExportMode::Welcome)]
    pub export_mode: ExportMode,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Welcome,
    Clock,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(spec: &str) -> Result<SurfaceSize, String> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in size specification '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in size specification '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".to_string());
    }

    Ok(SurfaceSize::new(width, height))
}
