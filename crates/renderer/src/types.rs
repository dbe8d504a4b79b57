use std::fmt;
use std::time::Duration;

use tracing::info;

/// Pixel dimensions of a drawable area or a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Runtime knobs for the desktop window, gathered from the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopConfig {
    /// Forces the window/canvas size instead of the default screen's size.
    pub surface_size: Option<SurfaceSize>,
    /// Delay between showing the window and replacing the greeting with the clock.
    pub welcome_duration: Duration,
    /// Period of the repaint tick that keeps the clock current.
    pub tick_interval: Duration,
    /// When false the window is a plain decorated preview without EWMH desktop hints.
    pub desktop_hints: bool,
    pub title: String,
}

pub const DEFAULT_WELCOME_DURATION: Duration = Duration::from_secs(2);
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            surface_size: None,
            welcome_duration: DEFAULT_WELCOME_DURATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            desktop_hints: true,
            title: "LibreDesktop".to_string(),
        }
    }
}

/// What the overlay layer shows on top of the wallpaper.
///
/// The only transition is `Welcome -> Clock`; once the clock is up it stays
/// for the rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Welcome,
    Clock,
}

impl DisplayMode {
    /// Switches to the clock. Returns `true` only on the first call.
    pub fn dismiss_welcome(&mut self) -> bool {
        match self {
            DisplayMode::Welcome => {
                *self = DisplayMode::Clock;
                info!("welcome greeting dismissed; showing clock");
                true
            }
            DisplayMode::Clock => false,
        }
    }

    pub fn is_welcome(&self) -> bool {
        matches!(self, DisplayMode::Welcome)
    }
}

/// Events the window loop feeds into the scene, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopEvent {
    TimerTick,
    WelcomeTimeout,
    Destroy,
}

/// What the window loop should do after the scene handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Redraw,
    Idle,
    Exit,
}
