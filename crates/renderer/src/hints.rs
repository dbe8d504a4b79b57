//! EWMH hints that turn an ordinary top-level window into the desktop
//! background.

use anyhow::Result;

pub const NET_WM_WINDOW_TYPE: &str = "_NET_WM_WINDOW_TYPE";
pub const NET_WM_STATE: &str = "_NET_WM_STATE";

/// Values written to `_NET_WM_WINDOW_TYPE`.
pub const DESKTOP_WINDOW_TYPES: [&str; 1] = ["_NET_WM_WINDOW_TYPE_DESKTOP"];

/// Values written to `_NET_WM_STATE`.
pub const DESKTOP_WINDOW_STATES: [&str; 4] = [
    "_NET_WM_STATE_BELOW",
    "_NET_WM_STATE_STICKY",
    "_NET_WM_STATE_SKIP_TASKBAR",
    "_NET_WM_STATE_SKIP_PAGER",
];

/// Backend that can mark a native window as the desktop background.
///
/// Must be called once, after the window exists and before it is mapped, so
/// the window manager reads the hints when it first manages the window. The
/// window stays a normal managed window; compliance is up to the WM.
pub trait DesktopHints {
    fn declare_as_desktop_background(&self, window: u32) -> Result<()>;
}
