use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use scheduler::TimerQueue;
use tiny_skia::Pixmap;
use tracing::{error, info, trace, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::platform::x11::EventLoopBuilderExtX11;
use winit::window::{Window, WindowBuilder};

use crate::hints::DesktopHints;
use crate::scene::DesktopScene;
use crate::types::{DesktopConfig, DesktopEvent, Reaction, SurfaceSize};
use crate::x11::X11Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopTimer {
    Tick,
    WelcomeDismiss,
}

impl DesktopTimer {
    fn event(self) -> DesktopEvent {
        match self {
            DesktopTimer::Tick => DesktopEvent::TimerTick,
            DesktopTimer::WelcomeDismiss => DesktopEvent::WelcomeTimeout,
        }
    }
}

/// Arms the repaint tick and the one-shot welcome dismissal relative to the
/// moment the window is shown.
pub fn desktop_timers(config: &DesktopConfig, shown_at: Instant) -> Result<TimerQueue<DesktopTimer>> {
    let mut timers = TimerQueue::new();
    timers
        .every(DesktopTimer::Tick, config.tick_interval, shown_at)
        .context("invalid clock tick interval")?;
    timers.once(DesktopTimer::WelcomeDismiss, config.welcome_duration, shown_at);
    Ok(timers)
}

/// Feeds due timers into the scene and reports whether a repaint is needed
/// or the loop should stop.
pub fn dispatch_timers(
    timers: &mut TimerQueue<DesktopTimer>,
    scene: &mut DesktopScene,
    now: Instant,
) -> Reaction {
    let mut outcome = Reaction::Idle;
    for fired in timers.poll(now) {
        match scene.handle(fired.key.event()) {
            Reaction::Exit => return Reaction::Exit,
            Reaction::Redraw => outcome = Reaction::Redraw,
            Reaction::Idle => {}
        }
    }
    outcome
}

/// Opens the desktop window and runs the event loop until it is closed.
pub(crate) fn run(config: DesktopConfig, mut scene: DesktopScene) -> Result<()> {
    let display = X11Display::connect()?;
    let size = config
        .surface_size
        .unwrap_or_else(|| display.screen_size());
    info!(size = %size, hints = config.desktop_hints, "opening desktop window");

    let mut builder = EventLoopBuilder::new();
    builder.with_x11();
    let event_loop = builder
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(size.width, size.height))
        .with_decorations(!config.desktop_hints)
        .with_visible(false)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create desktop window: {err}"))?;

    let xid = x11_window_id(&window)?;
    if config.desktop_hints {
        if let Err(err) = display.declare_as_desktop_background(xid) {
            warn!(error = %format!("{err:#}"), "failed to apply desktop window hints");
        }
    }
    window.set_visible(true);

    let presenter = display.presenter(xid)?;
    let mut canvas = allocate_canvas(window.inner_size())?;
    let mut timers = desktop_timers(&config, Instant::now())?;
    window.request_redraw();

    let mut failure = None;
    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                if scene.handle(DesktopEvent::Destroy) == Reaction::Exit {
                    elwt.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                match allocate_canvas(new_size) {
                    Ok(resized) => canvas = resized,
                    Err(err) => {
                        failure = Some(err);
                        elwt.exit();
                        return;
                    }
                }
                trace!(width = new_size.width, height = new_size.height, "canvas resized");
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let now = Local::now().naive_local();
                scene.paint(&mut canvas, &now);
                if let Err(err) = display.present(&presenter, &canvas) {
                    error!(error = %format!("{err:#}"), "failed to present frame");
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            match dispatch_timers(&mut timers, &mut scene, Instant::now()) {
                Reaction::Redraw => window.request_redraw(),
                Reaction::Exit => elwt.exit(),
                Reaction::Idle => {}
            }
            match timers.next_deadline() {
                Some(deadline) => elwt.set_control_flow(ControlFlow::WaitUntil(deadline)),
                None => elwt.set_control_flow(ControlFlow::Wait),
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))?;
    if let Some(err) = failure {
        return Err(err);
    }
    info!("desktop window closed");
    Ok(())
}

fn allocate_canvas(size: PhysicalSize<u32>) -> Result<Pixmap> {
    let size = SurfaceSize::new(size.width.max(1), size.height.max(1));
    Pixmap::new(size.width, size.height).ok_or_else(|| anyhow!("cannot allocate a {size} canvas"))
}

fn x11_window_id(window: &Window) -> Result<u32> {
    let handle = window
        .window_handle()
        .map_err(|err| anyhow!("native window handle unavailable: {err}"))?;
    match handle.as_raw() {
        RawWindowHandle::Xlib(handle) => {
            u32::try_from(handle.window).context("X11 window id out of range")
        }
        RawWindowHandle::Xcb(handle) => Ok(handle.window.get()),
        other => bail!("desktop window requires an X11 session, got {other:?}"),
    }
}
