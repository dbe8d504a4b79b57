use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use tiny_skia::{Color, Pixmap};
use tracing::{debug, trace};

use crate::layout::{centered_origin, TextExtents};
use crate::overlay::{
    clock_text, date_text, greeting, TextStyle, CLOCK_LIFT, CLOCK_STYLE, DATE_LIFT, DATE_STYLE,
    WELCOME_STYLE,
};
use crate::text::{ShapedLine, TextPainter};
use crate::types::{DesktopEvent, DisplayMode, Reaction, SurfaceSize};
use crate::wallpaper::Wallpaper;

/// A line of overlay text with its resolved position.
#[derive(Debug, Clone)]
pub struct PlacedText {
    pub text: String,
    pub style: TextStyle,
    pub extents: TextExtents,
    /// Top-left corner of the line's layout box.
    pub origin: (f32, f32),
    shaped: ShapedLine,
}

/// Everything the paint routine reads: the wallpaper, the overlay mode and
/// the greeting. Owned by the window loop and only touched from its thread.
pub struct DesktopScene {
    wallpaper: Option<Wallpaper>,
    mode: DisplayMode,
    greeting: String,
    text: TextPainter,
}

impl DesktopScene {
    pub fn new(wallpaper: Option<Wallpaper>, user: Option<&str>) -> Self {
        Self {
            wallpaper,
            mode: DisplayMode::default(),
            greeting: greeting(user),
            text: TextPainter::new(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn has_wallpaper(&self) -> bool {
        self.wallpaper.is_some()
    }

    pub fn handle(&mut self, event: DesktopEvent) -> Reaction {
        match event {
            DesktopEvent::TimerTick => Reaction::Redraw,
            DesktopEvent::WelcomeTimeout => {
                if self.mode.dismiss_welcome() {
                    Reaction::Redraw
                } else {
                    Reaction::Idle
                }
            }
            DesktopEvent::Destroy => {
                debug!("desktop window destroyed");
                Reaction::Exit
            }
        }
    }

    /// Positions the overlay lines for the current mode in `area`.
    pub fn layout(&mut self, area: SurfaceSize, now: &NaiveDateTime) -> Vec<PlacedText> {
        match self.mode {
            DisplayMode::Welcome => {
                let text = self.greeting.clone();
                vec![self.place(area, text, WELCOME_STYLE, 0.0)]
            }
            DisplayMode::Clock => vec![
                self.place(area, clock_text(now), CLOCK_STYLE, CLOCK_LIFT),
                self.place(area, date_text(now), DATE_STYLE, DATE_LIFT),
            ],
        }
    }

    /// Repaints the whole canvas from scratch.
    pub fn paint(&mut self, canvas: &mut Pixmap, now: &NaiveDateTime) {
        canvas.fill(Color::BLACK);
        if let Some(wallpaper) = &self.wallpaper {
            wallpaper.paint(canvas);
        }
        let area = SurfaceSize::new(canvas.width(), canvas.height());
        for line in self.layout(area, now) {
            self.text.draw(canvas, &line.shaped, line.origin);
        }
        trace!(mode = ?self.mode, area = %area, "painted desktop");
    }

    /// Renders one frame into a fresh canvas.
    pub fn render(&mut self, size: SurfaceSize, now: &NaiveDateTime) -> Result<Pixmap> {
        let mut canvas = Pixmap::new(size.width, size.height)
            .ok_or_else(|| anyhow!("cannot allocate a {size} canvas"))?;
        self.paint(&mut canvas, now);
        Ok(canvas)
    }

    fn place(&mut self, area: SurfaceSize, text: String, style: TextStyle, lift: f32) -> PlacedText {
        let shaped = self.text.shape(&text, &style);
        let extents = shaped.extents();
        let origin = centered_origin(area, extents, lift);
        PlacedText {
            text,
            style,
            extents,
            origin,
            shaped,
        }
    }
}
