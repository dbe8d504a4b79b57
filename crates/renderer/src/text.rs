use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, Weight,
};
use tiny_skia::Pixmap;

use crate::layout::TextExtents;
use crate::overlay::{TextColor, TextStyle};

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.0;

/// Shapes and rasterises single lines of bold sans-serif text onto a pixmap.
pub struct TextPainter {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

/// A line shaped once and reused for both measuring and drawing.
#[derive(Debug, Clone)]
pub struct ShapedLine {
    buffer: Buffer,
    color: TextColor,
    extents: TextExtents,
}

impl ShapedLine {
    pub fn extents(&self) -> TextExtents {
        self.extents
    }
}

impl TextPainter {
    /// Loads the system font database. This scans installed fonts, so build
    /// one painter per process and reuse it.
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    pub fn shape(&mut self, text: &str, style: &TextStyle) -> ShapedLine {
        let metrics = Metrics::new(style.size, style.size * LINE_HEIGHT);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, &overlay_attrs(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        let extents = extents_of(&buffer);
        ShapedLine {
            buffer,
            color: style.color,
            extents,
        }
    }

    /// Draws `line` with its layout box's top-left corner at `origin`.
    pub fn draw(&mut self, canvas: &mut Pixmap, line: &ShapedLine, origin: (f32, f32)) {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;
        let data = canvas.data_mut();

        for run in line.buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((origin.0, origin.1 + run.line_y), 1.0);
                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                let target = GlyphTarget {
                    x: physical.x + image.placement.left,
                    y: physical.y - image.placement.top,
                    width: image.placement.width as i32,
                    height: image.placement.height as i32,
                };
                match image.content {
                    SwashContent::Mask => {
                        blend_mask(data, width, height, &target, &image.data, line.color)
                    }
                    SwashContent::Color => blend_color(data, width, height, &target, &image.data),
                    SwashContent::SubpixelMask => {}
                }
            }
        }
    }
}

impl Default for TextPainter {
    fn default() -> Self {
        Self::new()
    }
}

fn overlay_attrs() -> Attrs<'static> {
    Attrs::new().family(Family::SansSerif).weight(Weight::BOLD)
}

/// Widest run by the bottom of the last run, as laid out by cosmic-text.
fn extents_of(buffer: &Buffer) -> TextExtents {
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
        height = height.max(run.line_top + run.line_height);
    }
    TextExtents { width, height }
}

struct GlyphTarget {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl GlyphTarget {
    /// Yields `(glyph_index, canvas_byte_offset)` for every glyph pixel that
    /// lands inside the canvas.
    fn visible_pixels(
        &self,
        canvas_width: i32,
        canvas_height: i32,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |gy| {
            (0..self.width).filter_map(move |gx| {
                let px = self.x + gx;
                let py = self.y + gy;
                if px < 0 || py < 0 || px >= canvas_width || py >= canvas_height {
                    return None;
                }
                Some((
                    (gy * self.width + gx) as usize,
                    (py * canvas_width + px) as usize * 4,
                ))
            })
        })
    }
}

/// Source-over of a coverage mask tinted with `color` onto premultiplied RGBA.
fn blend_mask(
    data: &mut [u8],
    width: i32,
    height: i32,
    target: &GlyphTarget,
    mask: &[u8],
    color: TextColor,
) {
    for (src, dst) in target.visible_pixels(width, height) {
        let coverage = u32::from(mask[src]);
        if coverage == 0 {
            continue;
        }
        let alpha = coverage * u32::from(color.a) / 255;
        let source = [
            u32::from(color.r) * alpha / 255,
            u32::from(color.g) * alpha / 255,
            u32::from(color.b) * alpha / 255,
            alpha,
        ];
        composite(&mut data[dst..dst + 4], source);
    }
}

/// Source-over of straight-alpha RGBA glyph pixels (color emoji).
fn blend_color(data: &mut [u8], width: i32, height: i32, target: &GlyphTarget, rgba: &[u8]) {
    for (src, dst) in target.visible_pixels(width, height) {
        let pixel = &rgba[src * 4..src * 4 + 4];
        let alpha = u32::from(pixel[3]);
        if alpha == 0 {
            continue;
        }
        let source = [
            u32::from(pixel[0]) * alpha / 255,
            u32::from(pixel[1]) * alpha / 255,
            u32::from(pixel[2]) * alpha / 255,
            alpha,
        ];
        composite(&mut data[dst..dst + 4], source);
    }
}

fn composite(dst: &mut [u8], source: [u32; 4]) {
    let inverse = 255 - source[3];
    for (channel, value) in dst.iter_mut().zip(source) {
        *channel = (value + u32::from(*channel) * inverse / 255).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_over_opaque_black_keeps_premultiplied_alpha() {
        let mut pixel = [0, 0, 0, 255];
        composite(&mut pixel, [230, 230, 230, 230]);
        assert_eq!(pixel, [230, 230, 230, 255]);
    }

    #[test]
    fn mask_blend_clips_to_canvas() {
        let mut data = vec![0u8; 2 * 2 * 4];
        let target = GlyphTarget {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let mask = [255u8; 4];
        let white = TextColor {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        };
        blend_mask(&mut data, 2, 2, &target, &mask, white);
        assert_eq!(&data[0..12], &[0u8; 12]);
        assert_eq!(&data[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn empty_text_measures_no_width() {
        let mut painter = TextPainter::new();
        let extents = painter.shape("", &crate::overlay::WELCOME_STYLE).extents();
        assert_eq!(extents.width, 0.0);
    }

    #[test]
    fn longer_text_measures_wider() {
        let mut painter = TextPainter::new();
        let style = crate::overlay::WELCOME_STYLE;
        let short = painter.shape("Bem Vindo, a!", &style).extents();
        let long = painter.shape("Bem Vindo, abcdefghijkl!", &style).extents();
        assert!(short.width > 0.0, "{short:?}");
        assert!(long.width > short.width, "{short:?} vs {long:?}");
    }

    #[test]
    fn height_follows_laid_out_lines() {
        let mut painter = TextPainter::new();
        let style = crate::overlay::CLOCK_STYLE;
        let one = painter.shape("12:34:56", &style).extents();
        let two = painter.shape("12:34:56\n12:34:56", &style).extents();
        assert!((one.height - style.size * LINE_HEIGHT).abs() < 0.5, "{one:?}");
        assert!((two.height - 2.0 * one.height).abs() < 0.5, "{two:?}");
    }

    #[test]
    fn drawing_lights_pixels_inside_the_layout_box() {
        let mut painter = TextPainter::new();
        let style = crate::overlay::WELCOME_STYLE;
        let line = painter.shape("Bem Vindo!", &style);
        let extents = line.extents();
        let mut canvas = Pixmap::new(400, 120).unwrap();
        canvas.fill(tiny_skia::Color::BLACK);
        let origin = (20.0, 30.0);
        painter.draw(&mut canvas, &line, origin);

        let mut lit = 0;
        for (index, pixel) in canvas.data().chunks_exact(4).enumerate() {
            if pixel[0] == 0 {
                continue;
            }
            lit += 1;
            let x = (index % 400) as f32;
            let y = (index / 400) as f32;
            assert!(x >= origin.0 - 2.0 && x <= origin.0 + extents.width + 2.0, "x {x}");
            assert!(y >= origin.1 - 2.0 && y <= origin.1 + extents.height + 2.0, "y {y}");
        }
        assert!(lit > 0, "no glyph pixels were drawn");
    }
}
