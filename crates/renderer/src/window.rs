use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::frame::{FrameLoop, FrameSink};
use crate::gpu::GpuState;
use crate::runtime::FrameScheduler;
use crate::types::RendererConfig;
use crate::uniforms::{Resolution, UniformState};

const SOFTWARE_FPS_CAP: f32 = 15.0;

impl From<PhysicalSize<u32>> for Resolution {
    fn from(size: PhysicalSize<u32>) -> Self {
        Resolution::new(size.width, size.height)
    }
}

/// Frame sink backed by a winit window and its wgpu surface.
///
/// The surface holds its own `Arc` of the window; `gpu` is still declared
/// first so it drops before the sink's handle.
pub(crate) struct WindowSink {
    gpu: GpuState,
    window: Arc<Window>,
    scheduler: FrameScheduler,
}

impl WindowSink {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = Resolution::from(window.inner_size());
        let gpu = GpuState::new(Arc::clone(&window), size, config.antialiasing, &config.field)?;

        let mut target_fps = config.policy.target_fps();
        if gpu.is_software() && target_fps.is_none() && config.policy.is_continuous() {
            warn!(
                cap = SOFTWARE_FPS_CAP,
                "software rasterizer detected; capping animation to {} FPS (override with --fps)",
                SOFTWARE_FPS_CAP
            );
            target_fps = Some(SOFTWARE_FPS_CAP);
        }

        Ok(Self {
            gpu,
            window,
            scheduler: FrameScheduler::new(target_fps),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    /// Current drawable size as reported by the window system.
    pub(crate) fn viewport(&self) -> Resolution {
        Resolution::from(self.window.inner_size())
    }
}

impl FrameSink for WindowSink {
    type Error = wgpu::SurfaceError;

    fn request_frame(&mut self) {
        if redraw_due(self.viewport(), &self.scheduler, Instant::now()) {
            self.window.request_redraw();
        }
    }

    fn resize_surface(&mut self, size: Resolution) -> Result<(), Self::Error> {
        self.gpu.resize(size);
        self.scheduler.reset();
        Ok(())
    }

    fn draw(&mut self, uniforms: &UniformState) -> Result<(), Self::Error> {
        self.gpu.draw(uniforms)?;
        self.scheduler.mark_rendered(Instant::now());
        Ok(())
    }
}

/// Opens the window and drives [`FrameLoop`] from winit's event loop until the
/// window is closed.
pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.surface_size;
    let mut builder = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)));
    if config.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = builder
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut sink = WindowSink::new(window, &config)?;
    let mut frames = FrameLoop::new(config.policy, &config.field.time, Instant::now());
    info!(
        width,
        height,
        policy = ?config.policy,
        "driftwall window ready"
    );
    sink.window().request_redraw();

    let mut failure: Option<anyhow::Error> = None;
    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == sink.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                WindowEvent::KeyboardInput { event, .. } if is_exit_key(&event) => elwt.exit(),
                WindowEvent::Resized(new_size) => {
                    let size = Resolution::from(new_size);
                    match frames.handle_resize(&mut sink, size, Instant::now()) {
                        Ok(true) if !size.is_empty() => sink.window().request_redraw(),
                        Ok(_) => {}
                        Err(err) => error!("failed to resize surface: {err:?}"),
                    }
                }
                WindowEvent::RedrawRequested => {
                    let size = sink.viewport();
                    if let Err(err) = frames.tick(&mut sink, size, Instant::now()) {
                        match err {
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                sink.gpu.reconfigure();
                                sink.window().request_redraw();
                            }
                            wgpu::SurfaceError::OutOfMemory => {
                                failure = Some(anyhow!("surface out of memory"));
                                elwt.exit();
                            }
                            wgpu::SurfaceError::Timeout => {
                                warn!("surface timeout; retrying next frame");
                                sink.window().request_redraw();
                            }
                            other => {
                                warn!("surface error: {other:?}; retrying next frame");
                                sink.window().request_redraw();
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            if !frames.policy().is_continuous() {
                elwt.set_control_flow(ControlFlow::Wait);
                return;
            }
            let viewport = sink.viewport();
            if viewport.is_empty() {
                // Minimized; the next Resized event restarts drawing.
                elwt.set_control_flow(ControlFlow::Wait);
                return;
            }
            let now = Instant::now();
            if redraw_due(viewport, &sink.scheduler, now) {
                sink.window().request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = sink.scheduler.next_deadline() {
                tracing::trace!(
                    deadline_ms = deadline.saturating_duration_since(now).as_millis(),
                    "scheduler: waiting until next frame"
                );
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    if let Err(err) = run_result {
        return Err(anyhow!("window event loop error: {err}"));
    }
    info!(frames = frames.frames(), "window closed");
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// A redraw is only worth requesting for a visible surface whose frame cap
/// has elapsed.
fn redraw_due(viewport: Resolution, scheduler: &FrameScheduler, now: Instant) -> bool {
    !viewport.is_empty() && scheduler.ready_for_frame(now)
}

fn is_exit_key(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && !event.repeat
        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
}
