use anyhow::{Context, Result};
use tiny_skia::Pixmap;
use tracing::{debug, trace};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{
    AtomEnum, ConnectionExt as _, CreateGCAux, Gcontext, ImageFormat, ImageOrder, PropMode,
    Window,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::hints::{
    DesktopHints, DESKTOP_WINDOW_STATES, DESKTOP_WINDOW_TYPES, NET_WM_STATE, NET_WM_WINDOW_TYPE,
};
use crate::types::SurfaceSize;

/// Fixed part of a `PutImage` request, in bytes.
const PUT_IMAGE_HEADER: usize = 24;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("window depth {depth} has no 32-bit Z-pixmap format")]
    UnsupportedDepth { depth: u8 },
    #[error("frame {size} exceeds X11 image limits")]
    TooLarge { size: SurfaceSize },
}

/// Byte layout of one 32-bit pixel in the server's Z-pixmap format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    /// `B G R A` in memory.
    LsbFirst,
    /// `A R G B` in memory.
    MsbFirst,
}

/// Connection to the X server used for desktop hints and frame upload.
///
/// `winit` owns the window itself; this second client only sets properties
/// on it and draws into it.
pub struct X11Display {
    conn: RustConnection,
    screen_num: usize,
}

/// Per-window state needed to upload frames.
#[derive(Debug, Clone, Copy)]
pub struct FramePresenter {
    window: Window,
    gc: Gcontext,
    depth: u8,
    order: PixelOrder,
}

impl X11Display {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) =
            x11rb::connect(None).context("failed to connect to the X11 display")?;
        debug!(screen = screen_num, "connected to X11 display");
        Ok(Self { conn, screen_num })
    }

    /// Size the default screen reports for itself.
    pub fn screen_size(&self) -> SurfaceSize {
        let screen = &self.conn.setup().roots[self.screen_num];
        SurfaceSize::new(
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        )
    }

    pub fn presenter(&self, window: Window) -> Result<FramePresenter> {
        let geometry = self
            .conn
            .get_geometry(window)?
            .reply()
            .context("failed to query window geometry")?;
        let depth = geometry.depth;
        let setup = self.conn.setup();
        let has_32bpp = setup
            .pixmap_formats
            .iter()
            .any(|format| format.depth == depth && format.bits_per_pixel == 32);
        if !has_32bpp {
            return Err(SurfaceError::UnsupportedDepth { depth }.into());
        }
        let order = if setup.image_byte_order == ImageOrder::MSB_FIRST {
            PixelOrder::MsbFirst
        } else {
            PixelOrder::LsbFirst
        };

        let gc = self.conn.generate_id()?;
        self.conn.create_gc(gc, window, &CreateGCAux::new())?;
        debug!(window, depth, ?order, "prepared frame presenter");
        Ok(FramePresenter {
            window,
            gc,
            depth,
            order,
        })
    }

    /// Uploads `frame` to the window, split into strips that fit the
    /// server's maximum request length.
    pub fn present(&self, presenter: &FramePresenter, frame: &Pixmap) -> Result<()> {
        let size = SurfaceSize::new(frame.width(), frame.height());
        let width = u16::try_from(size.width).map_err(|_| SurfaceError::TooLarge { size })?;
        if i16::try_from(size.height).is_err() {
            return Err(SurfaceError::TooLarge { size }.into());
        }

        let pixels = encode_zpixmap(frame.data(), presenter.order);
        let stride = size.width as usize * 4;
        let rows = rows_per_request(self.conn.maximum_request_bytes(), stride);
        for (index, strip) in pixels.chunks(rows * stride).enumerate() {
            let strip_rows = strip.len() / stride;
            let y = (index * rows) as i16;
            self.conn.put_image(
                ImageFormat::Z_PIXMAP,
                presenter.window,
                presenter.gc,
                width,
                strip_rows as u16,
                0,
                y,
                0,
                presenter.depth,
                strip,
            )?;
        }
        self.conn.flush()?;
        trace!(size = %size, rows_per_request = rows, "presented frame");
        Ok(())
    }

    fn intern(&self, name: &str) -> Result<u32> {
        let atom = self
            .conn
            .intern_atom(false, name.as_bytes())?
            .reply()
            .with_context(|| format!("failed to intern atom {name}"))?
            .atom;
        Ok(atom)
    }

    fn intern_all(&self, names: &[&str]) -> Result<Vec<u32>> {
        names.iter().map(|name| self.intern(name)).collect()
    }
}

impl DesktopHints for X11Display {
    fn declare_as_desktop_background(&self, window: u32) -> Result<()> {
        let window_type = self.intern(NET_WM_WINDOW_TYPE)?;
        let types = self.intern_all(&DESKTOP_WINDOW_TYPES)?;
        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            window_type,
            AtomEnum::ATOM,
            &types,
        )?;

        let state = self.intern(NET_WM_STATE)?;
        let states = self.intern_all(&DESKTOP_WINDOW_STATES)?;
        self.conn
            .change_property32(PropMode::REPLACE, window, state, AtomEnum::ATOM, &states)?;
        self.conn.flush()?;
        debug!(window, "declared window as desktop background");
        Ok(())
    }
}

/// Converts premultiplied RGBA into the server's 32-bit Z-pixmap layout.
pub fn encode_zpixmap(rgba: &[u8], order: PixelOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len());
    for pixel in rgba.chunks_exact(4) {
        let [r, g, b, a] = [pixel[0], pixel[1], pixel[2], pixel[3]];
        match order {
            PixelOrder::LsbFirst => out.extend_from_slice(&[b, g, r, a]),
            PixelOrder::MsbFirst => out.extend_from_slice(&[a, r, g, b]),
        }
    }
    out
}

fn rows_per_request(max_request_bytes: usize, stride: usize) -> usize {
    if stride == 0 {
        return 1;
    }
    (max_request_bytes.saturating_sub(PUT_IMAGE_HEADER) / stride).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsb_first_swaps_red_and_blue() {
        let encoded = encode_zpixmap(&[10, 20, 30, 255, 1, 2, 3, 4], PixelOrder::LsbFirst);
        assert_eq!(encoded, vec![30, 20, 10, 255, 3, 2, 1, 4]);
    }

    #[test]
    fn msb_first_leads_with_alpha() {
        let encoded = encode_zpixmap(&[10, 20, 30, 255], PixelOrder::MsbFirst);
        assert_eq!(encoded, vec![255, 10, 20, 30]);
    }

    #[test]
    fn strips_respect_request_budget() {
        let stride = 1920 * 4;
        let rows = rows_per_request(262_140, stride);
        assert_eq!(rows, (262_140 - PUT_IMAGE_HEADER) / stride);
        assert!(rows * stride + PUT_IMAGE_HEADER <= 262_140);
    }

    #[test]
    fn strips_never_drop_below_one_row() {
        assert_eq!(rows_per_request(100, 16_000), 1);
        assert_eq!(rows_per_request(0, 0), 1);
    }
}
