use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use twinview::{
    App, AppEvent, CpuRenderer, EventSource, FixedFrames, FrameScheduler, FsResolver,
    IntervalScheduler, MotionPreference, PendingModels, RenderLoop, Renderer, ResizeHandler, Stage,
    StageConfig, StopToken, SurfaceSize, Timeline, WindowSize, resolve_all,
};

#[derive(Parser, Debug)]
#[command(name = "twinview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the page at one scroll progress as a PNG.
    Still(StillArgs),
    /// Render evenly spaced progress values into a directory of PNGs.
    Sweep(SweepArgs),
    /// Print sampled timeline values as JSON.
    Timeline(TimelineArgs),
    /// Run the event loop, scrolling from top to bottom of the page.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct StageArgs {
    /// Stage configuration JSON. Defaults to the built-in page.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory for model files.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Override the configured surface width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the configured surface height.
    #[arg(long)]
    height: Option<u32>,

    /// Device pixel ratio. Overrides the configured `device_pixel_ratio`.
    #[arg(long)]
    dpr: Option<f64>,

    /// Motion preference (`no-preference` or `reduce`). Falls back to `TWINVIEW_MOTION`.
    #[arg(long)]
    motion: Option<MotionPreference>,
}

#[derive(Parser, Debug)]
struct StillArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Scroll progress in `[0, 1]`.
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Number of frames; progress runs from 0 to 1 inclusive.
    #[arg(long, default_value_t = 8)]
    frames: u32,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Number of evenly spaced samples.
    #[arg(long, default_value_t = 5)]
    samples: u32,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Frames to draw. Without it the loop runs in real time until the page is scrolled through.
    /// Either way it ends once the bottom of the page is reached.
    #[arg(long)]
    frames: Option<u64>,

    /// Scroll distance per frame in pixels.
    #[arg(long, default_value_t = 24.0)]
    scroll_step: f64,

    /// Write the last frame to this PNG.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

impl StageArgs {
    fn load_config(&self) -> anyhow::Result<StageConfig> {
        let mut cfg = match &self.config {
            Some(path) => StageConfig::from_path(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => StageConfig::default(),
        };
        if self.width.is_some() || self.height.is_some() {
            cfg.surface = SurfaceSize::new(
                self.width.unwrap_or(cfg.surface.width),
                self.height.unwrap_or(cfg.surface.height),
            )
            .context("surface size override")?;
        }
        if let Some(dpr) = self.dpr {
            cfg.device_pixel_ratio = dpr;
            cfg.validate().context("device pixel ratio override")?;
        }
        Ok(cfg)
    }

    fn motion(&self) -> Option<MotionPreference> {
        self.motion.or_else(MotionPreference::from_env)
    }

    fn window(cfg: &StageConfig) -> WindowSize {
        WindowSize {
            width: cfg.surface.width,
            height: cfg.surface.height,
            device_pixel_ratio: cfg.device_pixel_ratio,
        }
    }
}

/// Stage with models loaded and the timeline built, sized for offline rendering.
struct Offline {
    stage: Stage,
    timeline: Timeline,
    renderer: CpuRenderer,
    animate: bool,
}

fn offline(args: &StageArgs) -> anyhow::Result<Offline> {
    let cfg = args.load_config()?;
    let mut stage = Stage::from_config(&cfg).context("build stage")?;
    let resolver = FsResolver::new(&args.assets);
    let resolved = resolve_all(&resolver, &cfg.models);
    let entities = stage.populate(resolved);
    let timeline =
        Timeline::build(&mut stage, &entities, &cfg.timeline).context("build timeline")?;

    let mut renderer = CpuRenderer::new(cfg.surface).context("create renderer")?;
    let resized = ResizeHandler::new(cfg.pixel_ratio_cap)
        .handle(&mut stage, &mut renderer, StageArgs::window(&cfg))
        .context("initial resize")?;
    anyhow::ensure!(resized, "surface size must be non-zero");

    Ok(Offline {
        stage,
        timeline,
        renderer,
        animate: MotionPreference::allows_motion(args.motion()),
    })
}

impl Offline {
    fn render_at(&mut self, progress: f64, out: &Path) -> anyhow::Result<()> {
        if self.animate {
            self.timeline.sample(progress).apply(&mut self.stage);
        }
        let report =
            RenderLoop::render_frame(&mut self.stage, &mut self.renderer, Duration::ZERO);
        anyhow::ensure!(
            report.failures == 0,
            "{} of {} viewport draws failed",
            report.failures,
            report.draws
        );
        let frame = self.renderer.read_frame()?;
        frame
            .write_png(out)
            .with_context(|| format!("write {}", out.display()))?;
        Ok(())
    }
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let mut off = offline(&args.stage)?;
    off.render_at(args.progress, &args.out)?;
    tracing::info!(progress = args.progress, out = %args.out.display(), "wrote frame");
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.frames > 0, "--frames must be > 0");
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create {}", args.out_dir.display()))?;
    let mut off = offline(&args.stage)?;
    let denom = f64::from(args.frames.saturating_sub(1).max(1));
    for i in 0..args.frames {
        let progress = f64::from(i) / denom;
        let out = args.out_dir.join(format!("frame_{i:04}.png"));
        off.render_at(progress, &out)?;
    }
    tracing::info!(frames = args.frames, dir = %args.out_dir.display(), "sweep finished");
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.samples > 0, "--samples must be > 0");
    let off = offline(&args.stage)?;
    let denom = f64::from(args.samples.saturating_sub(1).max(1));
    let samples: Vec<serde_json::Value> = (0..args.samples)
        .map(|i| off.timeline.sample(f64::from(i) / denom).to_json())
        .collect();
    let out = serde_json::json!({
        "total": off.timeline.total(),
        "sections": off.timeline.section_count(),
        "samples": samples,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = args.stage.load_config()?;
    let resolver = Arc::new(FsResolver::new(&args.stage.assets));
    let pending = PendingModels::spawn(resolver, cfg.models.clone());
    let renderer = CpuRenderer::new(cfg.surface).context("create renderer")?;
    let mut app = App::new(&cfg, renderer, pending, args.stage.motion()).context("build app")?;

    let step = if args.scroll_step.is_finite() && args.scroll_step > 0.0 {
        args.scroll_step
    } else {
        24.0
    };
    let mut script = ScrollScript {
        resize: Some(StageArgs::window(&cfg)),
        offset: 0.0,
        step,
        end: cfg.trigger.offset_for(1.0, f64::from(cfg.surface.height)),
    };

    let token = StopToken::new();
    let mut scheduler: Box<dyn FrameScheduler> = match args.frames {
        Some(frames) => Box::new(FixedFrames::new(frames, Duration::from_millis(16))),
        None => Box::new(IntervalScheduler::display_rate()),
    };
    let drawn = app.run(&mut script, scheduler.as_mut(), &token);
    tracing::info!(frames = drawn, ready = app.is_ready(), "run finished");

    if let Some(out) = args.out {
        app.renderer()
            .read_frame()?
            .write_png(&out)
            .with_context(|| format!("write {}", out.display()))?;
    }
    Ok(())
}

/// Scrolls the page by a fixed step per frame and quits one frame after reaching the end.
struct ScrollScript {
    resize: Option<WindowSize>,
    offset: f64,
    step: f64,
    end: f64,
}

impl EventSource for ScrollScript {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        let mut events: Vec<AppEvent> =
            self.resize.take().map(AppEvent::Resize).into_iter().collect();
        if self.offset >= self.end {
            events.push(AppEvent::Quit);
            return events;
        }
        self.offset = (self.offset + self.step).min(self.end);
        events.push(AppEvent::Scroll {
            offset: self.offset,
        });
        events
    }
}
