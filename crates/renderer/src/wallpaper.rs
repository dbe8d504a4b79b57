use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint};
use tracing::{debug, info, warn};

use crate::layout::CoverFit;
use crate::types::SurfaceSize;

/// Decoded wallpaper raster, stored premultiplied and ready to composite.
pub struct Wallpaper {
    pixmap: Pixmap,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for Wallpaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallpaper")
            .field("size", &self.size())
            .field("source", &self.source)
            .finish()
    }
}

impl Wallpaper {
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode wallpaper at {}", path.display()))?;
        let mut wallpaper = Self::from_rgba(&decoded.to_rgba8())?;
        wallpaper.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            size = %wallpaper.size(),
            "loaded wallpaper"
        );
        Ok(wallpaper)
    }

    /// Loads the wallpaper, degrading to `None` when the file is missing or
    /// not a decodable image.
    pub fn load_optional(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(wallpaper) => Some(wallpaper),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "wallpaper unavailable; painting text only"
                );
                None
            }
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("wallpaper has unusable dimensions {width}x{height}"))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self {
            pixmap,
            source: None,
        })
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Paints the wallpaper cover-fitted and centered onto `canvas`.
    pub fn paint(&self, canvas: &mut Pixmap) {
        let area = SurfaceSize::new(canvas.width(), canvas.height());
        let Some(fit) = CoverFit::compute(area, self.size()) else {
            return;
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        canvas.draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, fit.transform(), None);
    }
}

impl Drop for Wallpaper {
    fn drop(&mut self) {
        debug!(size = %self.size(), "releasing wallpaper surface");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    fn pixel(canvas: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * canvas.width() + x) * 4) as usize;
        let data = canvas.data();
        [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 2, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn converts_to_premultiplied_pixels() {
        let wallpaper = Wallpaper::from_rgba(&solid(2, 2, [200, 100, 50, 128])).unwrap();
        let first = wallpaper.pixmap.pixels()[0];
        assert_eq!(first.alpha(), 128);
        assert!(first.red() <= 128);
        assert_eq!(wallpaper.size(), SurfaceSize::new(2, 2));
    }

    #[test]
    fn cover_painting_fills_every_pixel() {
        let wallpaper = Wallpaper::from_rgba(&solid(4, 2, [255, 0, 0, 255])).unwrap();
        let mut canvas = Pixmap::new(10, 30).unwrap();
        wallpaper.paint(&mut canvas);
        for (x, y) in [(0, 0), (9, 0), (0, 29), (9, 29), (5, 15)] {
            assert_close(pixel(&canvas, x, y), [255, 0, 0, 255]);
        }
    }

    #[test]
    fn cover_painting_handles_single_pixel_canvas() {
        let wallpaper = Wallpaper::from_rgba(&solid(640, 480, [0, 0, 255, 255])).unwrap();
        let mut canvas = Pixmap::new(1, 1).unwrap();
        wallpaper.paint(&mut canvas);
        assert_close(pixel(&canvas, 0, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn missing_file_degrades_to_none() {
        let path = Path::new("/nonexistent/libredesktop/wallpaper.png");
        assert!(Wallpaper::load_optional(path).is_none());
        assert!(Wallpaper::load(path).is_err());
    }
}
