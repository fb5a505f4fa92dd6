use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::coords::{Vec2, Viewport};
use crate::input::{normalize_pointer, InputSampler, PointerSample};
use crate::platform::{FrameHandle, FrameScheduler, Platform, RawEvent};
use crate::render::{chunks, FrameUniforms, RenderSurface, UNIFORMS_CHUNK, UNIFORMS_WGSL};
use crate::scene::{NodeRef, PerspectiveCamera, Scene};
use crate::time::{FrameClock, TimeSource};
use crate::viewport::ViewportManager;

use super::config::AppConfig;
use super::error::AppError;
use super::events::{AppEvent, EventDispatcher, ListenerHandle};

/// Render-loop orchestrator.
///
/// `Application` is a cheap handle: clones share one instance. Listeners that
/// need to reach the application should capture a [`WeakApplication`] to avoid
/// a reference cycle.
///
/// Lifecycle: constructed stopped; `start`/`stop` toggle between running and
/// stopped any number of times and are no-ops when already in the target
/// state. While running, one frame callback is always pending with the
/// platform scheduler.
///
/// ```rust,ignore
/// let app = Application::new(platform, surface)?;
/// app.add_event_listener(EventKind::Update, |ev| {
///     if let AppEvent::Update { delta, .. } = ev { spin(*delta) }
/// });
/// app.start();
/// ```
pub struct Application<R: RenderSurface + 'static> {
    shared: Rc<Shared<R>>,
}

impl<R: RenderSurface + 'static> Clone for Application<R> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

/// Non-owning handle to an [`Application`].
pub struct WeakApplication<R: RenderSurface + 'static> {
    shared: Weak<Shared<R>>,
}

impl<R: RenderSurface + 'static> Clone for WeakApplication<R> {
    fn clone(&self) -> Self {
        Self { shared: Weak::clone(&self.shared) }
    }
}

impl<R: RenderSurface + 'static> WeakApplication<R> {
    pub fn upgrade(&self) -> Option<Application<R>> {
        self.shared.upgrade().map(|shared| Application { shared })
    }
}

struct Shared<R> {
    platform: Rc<dyn Platform>,
    scheduler: Rc<dyn FrameScheduler>,

    renderer: RefCell<R>,
    scene: RefCell<Scene>,
    camera: Rc<RefCell<PerspectiveCamera>>,
    pointer: RefCell<Vec2>,
    uniforms: RefCell<FrameUniforms>,

    clock: RefCell<FrameClock>,
    sampler: RefCell<InputSampler>,
    viewport: RefCell<ViewportManager>,

    /// `Some` iff running.
    frame: Cell<Option<FrameHandle>>,
    /// Bumped on every start; frame callbacks from an earlier run do nothing.
    run: Cell<u64>,

    events: EventDispatcher,
}

/// Builder for [`Application`].
pub struct ApplicationBuilder<R: RenderSurface + 'static> {
    platform: Rc<dyn Platform>,
    renderer: R,
    config: AppConfig,
    clock: Option<FrameClock>,
}

impl<R: RenderSurface + 'static> ApplicationBuilder<R> {
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// See [`AppConfig::add_shader_chunk`].
    pub fn add_shader_chunk(mut self, enabled: bool) -> Self {
        self.config.add_shader_chunk = enabled;
        self
    }

    /// See [`AppConfig::max_delta`].
    pub fn max_delta(mut self, max_delta: Duration) -> Self {
        self.config.max_delta = Some(max_delta);
        self
    }

    /// Drives the frame clock from `source` instead of wall-clock time.
    pub fn time_source(mut self, source: impl TimeSource + 'static) -> Self {
        self.clock = Some(FrameClock::with_source(source));
        self
    }

    /// Acquires the frame scheduler and builds the stopped application.
    pub fn build(self) -> Result<Application<R>, AppError> {
        let Self { platform, renderer, config, clock } = self;

        let scheduler = platform
            .frame_scheduler()
            .ok_or(AppError::SchedulerUnavailable)?;

        if config.add_shader_chunk {
            chunks::register_chunk(UNIFORMS_CHUNK, UNIFORMS_WGSL);
        }

        let mut clock = clock.unwrap_or_default();
        if let Some(max_delta) = config.max_delta {
            clock = clock.with_max_delta(max_delta);
        }

        // The scene's camera slot starts out holding the default camera;
        // clients swap it to render through another one.
        let camera = Rc::new(RefCell::new(PerspectiveCamera::default()));
        let mut scene = Scene::new();
        let default_node: NodeRef = camera.clone();
        scene.camera = Some(default_node);

        log::debug!("application constructed");

        Ok(Application {
            shared: Rc::new(Shared {
                platform,
                scheduler,
                renderer: RefCell::new(renderer),
                scene: RefCell::new(scene),
                camera,
                pointer: RefCell::new(Vec2::zero()),
                uniforms: RefCell::new(FrameUniforms::default()),
                clock: RefCell::new(clock),
                sampler: RefCell::new(InputSampler::new()),
                viewport: RefCell::new(ViewportManager::new()),
                frame: Cell::new(None),
                run: Cell::new(0),
                events: EventDispatcher::new(),
            }),
        })
    }
}

impl<R: RenderSurface + 'static> Application<R> {
    /// Builds an application with the default configuration.
    ///
    /// Fails with [`AppError::SchedulerUnavailable`] when `platform` cannot
    /// schedule frames.
    pub fn new(platform: Rc<dyn Platform>, renderer: R) -> Result<Self, AppError> {
        Self::builder(platform, renderer).build()
    }

    pub fn builder(platform: Rc<dyn Platform>, renderer: R) -> ApplicationBuilder<R> {
        ApplicationBuilder {
            platform,
            renderer,
            config: AppConfig::default(),
            clock: None,
        }
    }

    pub fn downgrade(&self) -> WeakApplication<R> {
        WeakApplication { shared: Rc::downgrade(&self.shared) }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.shared.frame.get().is_some()
    }

    /// Starts the loop. No-op while running.
    ///
    /// Subscribes to raw resize/pointer events, starts the clock, schedules the
    /// first frame, applies a forced resize (emitting `resize`) so the first
    /// frame sees current dimensions, then emits `start`.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }

        let shared = &self.shared;
        shared.sampler.borrow_mut().attach(shared.platform.as_ref());
        shared.clock.borrow_mut().start();

        let run = shared.run.get().wrapping_add(1);
        shared.run.set(run);
        Shared::schedule(shared, run);

        log::debug!("application started (run {run})");

        shared.resize_viewport();

        // A resize listener may have stopped (or restarted) the loop.
        if !shared.is_current(run) {
            return;
        }

        shared.events.dispatch(&AppEvent::Start);
    }

    /// Stops the loop. No-op while stopped.
    ///
    /// Safe to call from a listener running inside the frame being cancelled.
    pub fn stop(&self) {
        let shared = &self.shared;
        let Some(handle) = shared.frame.take() else {
            return;
        };

        shared.clock.borrow_mut().stop();
        shared.sampler.borrow_mut().detach(shared.platform.as_ref());
        shared.scheduler.cancel_frame(handle);

        log::debug!("application stopped");

        shared.events.dispatch(&AppEvent::Stop);
    }

    /// Renders one frame: drains pending resize/pointer samples, validates the
    /// scene camera, then renders. Usable while stopped.
    pub fn render(&self) {
        self.shared.render();
    }

    // ── listeners ─────────────────────────────────────────────────────────

    /// Registers `listener` for events named `name` (see [`EventKind`](super::EventKind)).
    pub fn add_event_listener(
        &self,
        name: impl AsRef<str>,
        listener: impl FnMut(&AppEvent) + 'static,
    ) -> ListenerHandle {
        self.shared.events.add(name.as_ref(), listener)
    }

    pub fn remove_event_listener(&self, handle: ListenerHandle) -> bool {
        self.shared.events.remove(handle)
    }

    pub fn has_event_listener(&self, name: impl AsRef<str>) -> bool {
        self.shared.events.has(name.as_ref())
    }

    // ── derived, read-only ────────────────────────────────────────────────

    /// Current surface width in logical pixels.
    pub fn width(&self) -> u32 {
        self.shared.renderer.borrow().size().width
    }

    /// Current surface height in logical pixels.
    pub fn height(&self) -> u32 {
        self.shared.renderer.borrow().size().height
    }

    /// Window size and pixel density applied by the most recent resize.
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport.borrow().current()
    }

    /// Seconds elapsed on the frame clock since the last `start`.
    pub fn time(&self) -> f64 {
        self.shared.clock.borrow().elapsed_time()
    }

    /// Always fails: `width` is derived from the surface.
    pub fn set_width(&self, _width: u32) -> Result<(), AppError> {
        Err(AppError::ReadOnlyProperty { property: "width" })
    }

    /// Always fails: `height` is derived from the surface.
    pub fn set_height(&self, _height: u32) -> Result<(), AppError> {
        Err(AppError::ReadOnlyProperty { property: "height" })
    }

    /// Always fails: `time` is derived from the clock.
    pub fn set_time(&self, _time: f64) -> Result<(), AppError> {
        Err(AppError::ReadOnlyProperty { property: "time" })
    }

    // ── owned state ───────────────────────────────────────────────────────

    /// The render surface. Do not hold the borrow across `render()`.
    pub fn renderer(&self) -> RefMut<'_, R> {
        self.shared.renderer.borrow_mut()
    }

    /// The scene. Assign `scene().camera` to render through another camera.
    pub fn scene(&self) -> RefMut<'_, Scene> {
        self.shared.scene.borrow_mut()
    }

    /// The default camera created with the application.
    pub fn camera(&self) -> Rc<RefCell<PerspectiveCamera>> {
        Rc::clone(&self.shared.camera)
    }

    /// Whether the scene currently renders through the default camera.
    pub fn uses_default_camera(&self) -> bool {
        self.shared.scene.borrow().camera.as_ref().is_some_and(|node| {
            crate::scene::same_node(node, &self.shared.camera)
        })
    }

    /// Normalized pointer position as of the last consumed pointer move.
    pub fn pointer(&self) -> Vec2 {
        *self.shared.pointer.borrow()
    }

    /// Uniform block as of the last frame.
    pub fn uniforms(&self) -> Ref<'_, FrameUniforms> {
        self.shared.uniforms.borrow()
    }
}

impl<R: RenderSurface + 'static> Shared<R> {
    fn schedule(shared: &Rc<Self>, run: u64) {
        let weak = Rc::downgrade(shared);
        let handle = shared.scheduler.request_frame(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Shared::frame(&shared, run);
            }
        }));
        shared.frame.set(Some(handle));
    }

    fn frame(shared: &Rc<Self>, run: u64) {
        if !shared.is_current(run) {
            return;
        }

        let ft = shared.clock.borrow_mut().tick();
        {
            let mut uniforms = shared.uniforms.borrow_mut();
            uniforms.time = ft.elapsed as f32;
            uniforms.dt = ft.dt;
        }

        shared.events.dispatch(&AppEvent::Update {
            delta: ft.dt,
            elapsed_time: ft.elapsed,
        });

        shared.render();

        // A listener may have stopped (or stopped and restarted) the loop.
        if shared.is_current(run) {
            Shared::schedule(shared, run);
        }
    }

    fn is_current(&self, run: u64) -> bool {
        self.frame.get().is_some() && self.run.get() == run
    }

    fn render(&self) {
        if !self.owned_state_free() {
            log::error!("render skipped: surface or scene is still borrowed by the caller");
            return;
        }

        let resize_pending = self.sampler.borrow().take_resize();
        if resize_pending {
            self.resize_viewport();
        }

        let pointer_pending = self.sampler.borrow().take_pointer();
        if let Some(sample) = pointer_pending {
            self.apply_pointer(sample);
        }

        if !self.ensure_camera() {
            return;
        }

        let (Ok(mut renderer), Ok(scene)) = (self.renderer.try_borrow_mut(), self.scene.try_borrow())
        else {
            log::error!("render skipped: surface or scene is still borrowed by the caller");
            return;
        };

        renderer.sync_uniforms(&self.uniforms.borrow());

        let Some(node) = scene.camera.clone() else {
            return;
        };
        let node = node.borrow();
        if let Some(camera) = node.as_camera() {
            renderer.render(&scene, camera);
        }
    }

    /// True when neither the surface nor the scene is borrowed outside the loop.
    fn owned_state_free(&self) -> bool {
        self.renderer.try_borrow_mut().is_ok() && self.scene.try_borrow_mut().is_ok()
    }

    fn resize_viewport(&self) {
        let viewport = {
            let (Ok(mut renderer), Ok(scene)) =
                (self.renderer.try_borrow_mut(), self.scene.try_borrow())
            else {
                // Keep the signal so the next render applies it.
                self.sampler.borrow().record(&RawEvent::Resize);
                log::error!("resize deferred: surface or scene is still borrowed by the caller");
                return;
            };

            // A forced resize also satisfies any pending signal.
            self.sampler.borrow().take_resize();

            self.viewport.borrow_mut().apply(
                self.platform.as_ref(),
                &mut *renderer,
                scene.camera.as_ref(),
                &self.camera,
            )
        };

        self.uniforms.borrow_mut().screen = [viewport.width as f32, viewport.height as f32];

        self.events.dispatch(&AppEvent::Resize {
            width: viewport.width,
            height: viewport.height,
        });
    }

    fn apply_pointer(&self, sample: PointerSample) {
        let (width, height) = self.platform.window_size();
        let normalized = normalize_pointer(sample, width, height);

        let pointer = {
            let mut pointer = self.pointer.borrow_mut();
            pointer.set(normalized.x, normalized.y);
            *pointer
        };

        self.uniforms.borrow_mut().pointer = pointer.to_array();

        self.events.dispatch(&AppEvent::MouseMove { pointer });
    }

    /// Puts the default camera back if the scene's camera slot is empty or
    /// holds something that is not a camera. Returns false if the scene or
    /// the camera node is borrowed elsewhere.
    fn ensure_camera(&self) -> bool {
        let Ok(mut scene) = self.scene.try_borrow_mut() else {
            log::error!("render skipped: scene is still borrowed by the caller");
            return false;
        };

        let valid = match scene.camera.as_ref().map(|node| node.try_borrow()) {
            Some(Ok(node)) => node.as_camera().is_some(),
            Some(Err(_)) => {
                log::error!("render skipped: scene camera is mutably borrowed");
                return false;
            }
            None => false,
        };

        if !valid {
            log::warn!(
                "scene camera is missing or does not implement the camera capability; \
                 falling back to the default camera"
            );
            let default_node: NodeRef = self.camera.clone();
            scene.camera = Some(default_node);
        }

        true
    }
}

impl<R> Drop for Shared<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
            self.sampler.get_mut().detach(self.platform.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;
    use crate::render::HeadlessSurface;

    fn app() -> (Rc<HeadlessPlatform>, Application<HeadlessSurface>) {
        let platform = Rc::new(HeadlessPlatform::new(800, 600));
        let app = Application::builder(platform.clone(), HeadlessSurface::new())
            .add_shader_chunk(false)
            .build()
            .unwrap();
        (platform, app)
    }

    #[test]
    fn missing_scheduler_fails_construction() {
        let platform = Rc::new(HeadlessPlatform::without_scheduler(800, 600));
        let err = Application::new(platform, HeadlessSurface::new()).err();
        assert_eq!(err, Some(AppError::SchedulerUnavailable));
    }

    #[test]
    fn read_only_properties_reject_writes() {
        let (_, app) = app();
        assert_eq!(app.set_width(1), Err(AppError::ReadOnlyProperty { property: "width" }));
        assert_eq!(app.set_height(1), Err(AppError::ReadOnlyProperty { property: "height" }));
        assert_eq!(app.set_time(1.0), Err(AppError::ReadOnlyProperty { property: "time" }));
    }

    #[test]
    fn scene_starts_with_default_camera() {
        let (_, app) = app();
        assert!(app.uses_default_camera());
        assert!(!app.is_running());
    }

    #[test]
    fn start_sizes_surface_before_first_frame() {
        let (platform, app) = app();
        app.start();

        assert_eq!((app.width(), app.height()), (800, 600));
        assert_eq!(platform.pending_frames(), 1);
        assert_eq!(app.uniforms().screen, [800.0, 600.0]);
        assert_eq!(app.viewport(), Viewport::new(800, 600, 1.0));
    }

    #[test]
    fn shader_chunk_registered_on_request() {
        let platform = Rc::new(HeadlessPlatform::new(1, 1));
        let _app = Application::new(platform, HeadlessSurface::new()).unwrap();
        assert!(chunks::is_registered(UNIFORMS_CHUNK));
    }

    // ── outstanding borrows ───────────────────────────────────────────────

    #[test]
    fn render_with_scene_borrowed_is_skipped() {
        let (_, app) = app();
        let scene = app.scene();
        app.render();
        drop(scene);

        assert_eq!(app.renderer().render_count(), 0);
        app.render();
        assert_eq!(app.renderer().render_count(), 1);
    }

    #[test]
    fn render_with_surface_borrowed_is_skipped() {
        let (platform, app) = app();
        app.start();
        platform.resize_window(1024, 768);

        let surface = app.renderer();
        platform.run_frame();
        drop(surface);

        assert_eq!(app.renderer().render_count(), 0);
        assert_eq!(app.width(), 800);

        // The pending resize survives the skipped frame.
        platform.run_frame();
        assert_eq!(app.renderer().render_count(), 1);
        assert_eq!(app.width(), 1024);
    }

    #[test]
    fn start_with_scene_borrowed_defers_the_resize() {
        let (platform, app) = app();
        {
            let _scene = app.scene();
            app.start();
        }
        assert!(app.is_running());
        assert_eq!(app.width(), 0);

        platform.run_frame();
        assert_eq!((app.width(), app.height()), (800, 600));
    }

    #[test]
    fn dropping_a_running_app_releases_platform_hooks() {
        let (platform, app) = app();
        app.start();
        drop(app);

        assert_eq!(platform.pending_frames(), 0);
        assert_eq!(platform.subscriber_count(crate::platform::RawEventKind::Resize), 0);
    }
}
