use std::rc::Rc;

use anyhow::Result;
use clap::Parser;

use frameloop_engine::coords::ColorRgba;
use frameloop_engine::device::{GpuInit, GpuSurface};
use frameloop_engine::logging::{init_logging, LoggingConfig};
use frameloop_engine::platform::HeadlessPlatform;
use frameloop_engine::render::HeadlessSurface;
use frameloop_engine::time::ManualTime;
use frameloop_engine::window::{Runtime, RuntimeConfig};
use frameloop_engine::{AppEvent, Application, EventKind};

/// Backdrop fragment: a colour wash that drifts with time and follows the pointer.
const BACKDROP_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let p = in.uv * 2.0 - vec2<f32>(1.0, 1.0);
    let d = distance(vec2<f32>(p.x, -p.y), frame.pointer);
    let t = frame.time;
    let base = 0.5 + 0.5 * cos(vec3<f32>(t, t + 2.0, t + 4.0) + vec3<f32>(in.uv.x, in.uv.y, 0.0) * 3.0);
    let glow = 0.35 / (1.0 + 8.0 * d * d);
    return vec4<f32>(base * 0.6 + vec3<f32>(glow), 1.0);
}
"#;

#[derive(Parser)]
#[command(name = "frameloop-demo", about = "Render-loop demo: animated backdrop or headless run")]
struct Cli {
    /// Run without a window, pumping frames by hand.
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 960.0)]
    width: f64,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 540.0)]
    height: f64,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.verbose.then(|| "debug,wgpu_core=warn,wgpu_hal=warn".to_string()),
        ..Default::default()
    });

    if cli.headless {
        run_headless(&cli)
    } else {
        run_windowed(&cli)
    }
}

fn run_windowed(cli: &Cli) -> Result<()> {
    let config = RuntimeConfig::new("frameloop", cli.width, cli.height);

    Runtime::run(config, |platform| {
        let platform = Rc::new(platform);
        let surface = GpuSurface::new_blocking(platform.window().clone(), GpuInit::default())?;

        let app = Application::new(platform, surface)?;
        app.scene().background = ColorRgba::from_hex(0x10141c);

        // The uniform chunk is registered by the application, so the backdrop
        // can only be assembled after construction.
        app.renderer().set_backdrop(BACKDROP_FRAGMENT)?;

        let weak = app.downgrade();
        app.add_event_listener(EventKind::Resize, move |event| {
            if let (AppEvent::Resize { width, height }, Some(app)) = (event, weak.upgrade()) {
                log::info!("resize {width}x{height} @{}x", app.viewport().pixel_density);
            }
        });

        app.add_event_listener(EventKind::MouseMove, |event| {
            if let AppEvent::MouseMove { pointer } = event {
                log::trace!("pointer ({:.3}, {:.3})", pointer.x, pointer.y);
            }
        });

        let mut frames = 0u64;
        app.add_event_listener(EventKind::Update, move |event| {
            if let AppEvent::Update { elapsed_time, .. } = event {
                frames += 1;
                if frames % 600 == 0 {
                    log::info!("{frames} frames in {elapsed_time:.1}s");
                }
            }
        });

        app.start();
        Ok(app)
    })
}

fn run_headless(cli: &Cli) -> Result<()> {
    let platform = Rc::new(HeadlessPlatform::new(cli.width as u32, cli.height as u32));
    let time = ManualTime::new();

    let app = Application::builder(platform.clone(), HeadlessSurface::new())
        .time_source(time.clone())
        .build()?;

    app.add_event_listener(EventKind::Update, |event| {
        if let AppEvent::Update { delta, elapsed_time } = event {
            log::debug!("update dt={delta:.4} t={elapsed_time:.3}");
        }
    });

    app.start();

    for _ in 0..cli.frames {
        time.advance_secs(1.0 / 60.0);
        platform.run_frame();
    }

    let elapsed = app.time();
    let renders = app.renderer().render_count();
    app.stop();

    log::info!(
        "headless run: {} frames, {renders} renders, {elapsed:.3}s simulated",
        cli.frames
    );
    Ok(())
}
