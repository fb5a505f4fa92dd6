use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::platform::RawEvent;

use super::platform::WinitPlatform;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "frameloop".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            title: title.into(),
            initial_size: LogicalSize::new(width, height),
        }
    }
}

/// Entry point for the windowed runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and runs the event loop until it is closed.
    ///
    /// `setup` is called once the window exists. Whatever it returns (usually
    /// a started `Application`) is kept alive for the lifetime of the window
    /// and dropped when it closes. A setup error ends the loop and is returned.
    pub fn run<A, F>(config: RuntimeConfig, setup: F) -> Result<()>
    where
        A: 'static,
        F: FnOnce(WinitPlatform) -> Result<A> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            setup: Some(setup),
            window: None,
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct WindowEntry<A> {
    id: WindowId,
    platform: WinitPlatform,
    // Held until the window closes.
    _app: A,
}

struct RuntimeState<A, F> {
    config: RuntimeConfig,
    setup: Option<F>,
    window: Option<WindowEntry<A>>,
    failure: Option<anyhow::Error>,
}

impl<A, F> RuntimeState<A, F>
where
    F: FnOnce(WinitPlatform) -> Result<A>,
{
    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(setup) = self.setup.take() else {
            return Ok(());
        };

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let window = Arc::new(window);
        let id = window.id();

        let platform = WinitPlatform::new(window);
        let app = setup(platform.clone()).context("application setup failed")?;

        log::debug!("window {id:?} ready");

        self.window = Some(WindowEntry {
            id,
            platform,
            _app: app,
        });
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.window = None;
        event_loop.exit();
    }
}

impl<A, F> ApplicationHandler for RuntimeState<A, F>
where
    F: FnOnce(WinitPlatform) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Frames are only drawn on demand. Some backends drop a redraw
        // requested from inside RedrawRequested, so re-arm while callbacks wait.
        if let Some(entry) = self.window.as_ref() {
            if entry.platform.has_pending_frames() {
                entry.platform.window().request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.window.as_ref() else {
            return;
        };
        if entry.id != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                // Dropping the app releases its frame callback and subscriptions.
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                entry.platform.emit(&RawEvent::Resize);
            }

            WindowEvent::CursorMoved { position, .. } => {
                entry.platform.pointer_moved(position);
            }

            WindowEvent::RedrawRequested => {
                let ran = entry.platform.run_frame();
                log::trace!("redraw ran {ran} frame callback(s)");
            }

            _ => {}
        }
    }
}
