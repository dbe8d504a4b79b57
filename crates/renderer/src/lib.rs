//! Renderer crate for LibreDesktop.
//!
//! Paints the desktop background on an X11 session: a cover-fitted wallpaper
//! under a short welcome greeting, then a live clock and date. The flow is:
//!
//! ```text
//!   libredesktop (CLI)
//!          │ DesktopConfig + DesktopScene
//!          ▼
//!   Renderer::run ──▶ winit event loop ──▶ RedrawRequested ──▶ DesktopScene::paint()
//!          │                 ▲                                        │
//!          │                 └── TimerQueue (tick, welcome dismiss)   ▼
//!          └─▶ X11Display::declare_as_desktop_background     X11Display::present()
//! ```
//!
//! Rasterisation happens on the CPU into a `tiny_skia::Pixmap`; text is shaped
//! with `cosmic-text`. The window itself belongs to `winit`, while a separate
//! `x11rb` connection sets the EWMH hints and uploads finished frames.

use anyhow::Result;

mod hints;
mod layout;
mod overlay;
mod scene;
mod text;
mod types;
mod wallpaper;
mod window;
mod x11;

pub use hints::{DesktopHints, DESKTOP_WINDOW_STATES, DESKTOP_WINDOW_TYPES};
pub use layout::{centered_origin, CoverFit, TextExtents};
pub use overlay::{clock_text, date_text, greeting, TextColor, TextStyle};
pub use scene::{DesktopScene, PlacedText};
pub use text::{ShapedLine, TextPainter};
pub use types::{
    DesktopConfig, DesktopEvent, DisplayMode, Reaction, SurfaceSize, DEFAULT_TICK_INTERVAL,
    DEFAULT_WELCOME_DURATION,
};
pub use wallpaper::Wallpaper;
pub use window::{desktop_timers, dispatch_timers, DesktopTimer};
pub use x11::{encode_zpixmap, FramePresenter, PixelOrder, SurfaceError, X11Display};

/// Entry point that owns the window configuration.
pub struct Renderer {
    config: DesktopConfig,
}

impl Renderer {
    pub fn new(config: DesktopConfig) -> Self {
        Self { config }
    }

    /// Shows the desktop window and blocks until it is closed. The scene,
    /// and with it the wallpaper surface, is released before returning.
    pub fn run(self, scene: DesktopScene) -> Result<()> {
        window::run(self.config, scene)
    }
}
