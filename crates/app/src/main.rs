use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Parser, Subcommand};
use serde_json::json;
use storefront_core::{
    AnimationLoop, AppConfig, AuroraRenderer, Carousel, Click, FixedRateScheduler, Gallery,
    GalleryManifest, HostEvent, Key, Navigation, PointerState, RecordingCanvas, Section,
};
use tracing_subscriber::EnvFilter;

/// Display refresh interval used for headless rendering.
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() -> storefront_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Render {
            width,
            height,
            frames,
            seed,
            pointer,
            output,
        } => run_render(&config, width, height, frames, seed, pointer, output),
        Commands::Carousel { slides, steps } => run_carousel(&config, slides, &steps),
        Commands::Gallery { manifest, steps } => run_gallery(manifest, &steps),
        Commands::Nav {
            sections,
            navbar_height,
            steps,
        } => run_nav(&config, sections, navbar_height, &steps),
    }
}

fn run_render(
    config: &AppConfig,
    width: u32,
    height: u32,
    frames: u64,
    seed: Option<u64>,
    pointer: Option<PointerArg>,
    output: Option<PathBuf>,
) -> storefront_core::Result<()> {
    tracing::info!(width, height, frames, seed, "rendering aurora frames");

    let mut renderer = match seed {
        Some(seed) => AuroraRenderer::seeded(config.aurora.clone(), seed, width, height)?,
        None => AuroraRenderer::from_entropy(config.aurora.clone(), width, height)?,
    };
    let mut canvas = RecordingCanvas::new(width, height);
    let mut pointer_state = PointerState::new(config.aurora.pointer_radius);
    let mut scheduler = FixedRateScheduler::new(frames, FRAME_INTERVAL);
    if let Some(PointerArg { x, y }) = pointer {
        scheduler = scheduler.with_event(0, HostEvent::PointerMove { x, y });
    }

    let rendered = renderer.run(
        &mut canvas,
        &mut pointer_state,
        &mut scheduler,
        &AnimationLoop::new(),
    );
    tracing::info!(rendered, clock = renderer.clock().time(), "finished rendering");

    let frame = canvas.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(&path, frame)?;
            tracing::info!(path = %path.display(), "wrote last frame");
        }
        None => println!("{frame}"),
    }
    Ok(())
}

fn run_carousel(
    config: &AppConfig,
    slides: Vec<String>,
    steps: &[CarouselStep],
) -> storefront_core::Result<()> {
    let mut now = Duration::ZERO;
    let mut carousel = Carousel::new(slides, &config.carousel, now)?;

    for step in steps {
        match *step {
            CarouselStep::Next => carousel.next_button(now),
            CarouselStep::Previous => carousel.previous_button(now),
            CarouselStep::GoTo(index) => carousel.go_to(index, now),
            CarouselStep::Enter => carousel.pointer_enter(),
            CarouselStep::Leave => carousel.pointer_leave(now),
            CarouselStep::Swipe { from, to } => {
                carousel.touch_start(from);
                carousel.touch_end(to, now);
            }
            CarouselStep::Wait(ms) => {
                now += Duration::from_millis(ms);
                carousel.tick(now);
            }
        }
        tracing::debug!(?step, index = carousel.index(), "applied carousel step");
    }

    print_json(&json!({
        "index": carousel.index(),
        "slide": carousel.active_slide(),
        "auto_advancing": carousel.is_auto_advancing(),
        "view": carousel.view(),
        "elapsed_ms": now.as_millis() as u64,
    }))
}

fn run_gallery(manifest: Option<PathBuf>, steps: &[GalleryStep]) -> storefront_core::Result<()> {
    let manifest = match manifest {
        Some(path) => GalleryManifest::from_json_file(path)?,
        None => GalleryManifest::default(),
    };
    let mut gallery = Gallery::from_manifest(manifest);

    for step in steps {
        match step {
            GalleryStep::Click(click) => gallery.handle_click(*click),
            GalleryStep::Key(key) => {
                gallery.handle_key(*key);
            }
        }
    }

    print_json(&json!({
        "modal": gallery.modal(),
        "image": gallery.current_image(),
        "scroll_locked": gallery.is_scroll_locked(),
        "images": gallery.images().len(),
    }))
}

fn run_nav(
    config: &AppConfig,
    sections: Vec<SectionArg>,
    navbar_height: f64,
    steps: &[NavStep],
) -> storefront_core::Result<()> {
    let sections = sections.into_iter().map(|arg| arg.0).collect();
    let mut nav = Navigation::new(sections, navbar_height, &config.navigation);
    let mut scroll_target = None;

    for step in steps {
        match step {
            NavStep::Toggle => {
                nav.toggle_menu();
            }
            NavStep::Select(id) => scroll_target = nav.select(id),
            NavStep::Scroll(y) => {
                nav.on_scroll(*y);
            }
        }
    }

    print_json(&json!({
        "active": nav.active(),
        "menu_open": nav.is_menu_open(),
        "scroll_target": scroll_target,
    }))
}

fn print_json(value: &serde_json::Value) -> storefront_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless host for the storefront presentation core", long_about = None)]
struct Cli {
    /// JSON configuration file; missing values use defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render aurora frames and emit the last one as a JSON draw list.
    Render {
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Full scrollable content height.
        #[arg(long, default_value_t = 2400)]
        height: u32,
        #[arg(short, long, default_value_t = 60)]
        frames: u64,
        /// Seed for wave and particle parameters.
        #[arg(short, long)]
        seed: Option<u64>,
        /// Pointer position as `x,y` in viewport coordinates.
        #[arg(short, long)]
        pointer: Option<PointerArg>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay carousel input: next, prev, goto:N, enter, leave,
    /// swipe:FROM:TO, wait:MS.
    Carousel {
        #[arg(long, value_delimiter = ',', default_value = "slide0,slide1,slide2,slide3,slide4")]
        slides: Vec<String>,
        steps: Vec<CarouselStep>,
    },
    /// Replay gallery input: open:N, next, prev, close, backdrop, key:NAME.
    Gallery {
        /// JSON manifest of images; defaults to the site's images.
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        steps: Vec<GalleryStep>,
    },
    /// Replay navigation input: toggle, select:ID, scroll:Y.
    Nav {
        /// Sections as `id:top:height`.
        #[arg(long, value_delimiter = ',', required = true)]
        sections: Vec<SectionArg>,
        #[arg(long, default_value_t = 70.0)]
        navbar_height: f64,
        steps: Vec<NavStep>,
    },
}

#[derive(Debug, Clone, Copy)]
struct PointerArg {
    x: f64,
    y: f64,
}

impl FromStr for PointerArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
        Ok(Self {
            x: parse_number(x)?,
            y: parse_number(y)?,
        })
    }
}

#[derive(Debug, Clone)]
struct SectionArg(Section);

impl FromStr for SectionArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(top), Some(height)) if !id.is_empty() => Ok(Self(Section::new(
                id,
                parse_number(top)?,
                parse_number(height)?,
            ))),
            _ => Err(format!("expected `id:top:height`, got `{value}`")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CarouselStep {
    Next,
    Previous,
    GoTo(i64),
    Enter,
    Leave,
    Swipe { from: f64, to: f64 },
    Wait(u64),
}

impl FromStr for CarouselStep {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, arg) = split_step(value);
        match (name, arg) {
            ("next", None) => Ok(Self::Next),
            ("prev", None) => Ok(Self::Previous),
            ("enter", None) => Ok(Self::Enter),
            ("leave", None) => Ok(Self::Leave),
            ("goto", Some(index)) => index
                .parse()
                .map(Self::GoTo)
                .map_err(|err| format!("invalid slide index `{index}`: {err}")),
            ("wait", Some(ms)) => ms
                .parse()
                .map(Self::Wait)
                .map_err(|err| format!("invalid wait `{ms}`: {err}")),
            ("swipe", Some(range)) => {
                let (from, to) = range
                    .split_once(':')
                    .ok_or_else(|| format!("expected `swipe:FROM:TO`, got `{value}`"))?;
                Ok(Self::Swipe {
                    from: parse_number(from)?,
                    to: parse_number(to)?,
                })
            }
            _ => Err(format!("unknown carousel step `{value}`")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum GalleryStep {
    Click(Click),
    Key(Key),
}

impl FromStr for GalleryStep {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, arg) = split_step(value);
        match (name, arg) {
            ("open", Some(index)) => index
                .parse()
                .map(|index| Self::Click(Click::Item(index)))
                .map_err(|err| format!("invalid image index `{index}`: {err}")),
            ("next", None) => Ok(Self::Click(Click::NextButton)),
            ("prev", None) => Ok(Self::Click(Click::PreviousButton)),
            ("close", None) => Ok(Self::Click(Click::CloseButton)),
            ("backdrop", None) => Ok(Self::Click(Click::Backdrop)),
            ("key", Some(key)) => Ok(Self::Key(key.parse().unwrap_or(Key::Other))),
            _ => Err(format!("unknown gallery step `{value}`")),
        }
    }
}

#[derive(Debug, Clone)]
enum NavStep {
    Toggle,
    Select(String),
    Scroll(f64),
}

impl FromStr for NavStep {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match split_step(value) {
            ("toggle", None) => Ok(Self::Toggle),
            ("select", Some(id)) => Ok(Self::Select(id.to_string())),
            ("scroll", Some(y)) => parse_number(y).map(Self::Scroll),
            _ => Err(format!("unknown navigation step `{value}`")),
        }
    }
}

fn split_step(value: &str) -> (&str, Option<&str>) {
    match value.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (value, None),
    }
}

fn parse_number(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse()
        .map_err(|err| format!("invalid number `{value}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_carousel_steps() {
        assert!(matches!("goto:-3".parse::<CarouselStep>(), Ok(CarouselStep::GoTo(-3))));
        assert!(matches!("wait:1500".parse::<CarouselStep>(), Ok(CarouselStep::Wait(1500))));
        assert!(matches!(
            "swipe:200:140".parse::<CarouselStep>(),
            Ok(CarouselStep::Swipe { from, to }) if from == 200.0 && to == 140.0
        ));
        assert!("jump".parse::<CarouselStep>().is_err());
    }

    #[test]
    fn parses_gallery_steps() {
        assert!(matches!(
            "open:3".parse::<GalleryStep>(),
            Ok(GalleryStep::Click(Click::Item(3)))
        ));
        assert!(matches!(
            "key:Escape".parse::<GalleryStep>(),
            Ok(GalleryStep::Key(Key::Escape))
        ));
        assert!(matches!("key:Tab".parse::<GalleryStep>(), Ok(GalleryStep::Key(Key::Other))));
    }

    #[test]
    fn parses_sections_and_pointer() {
        let section: SectionArg = "about:800:600".parse().unwrap();
        assert_eq!(section.0, Section::new("about", 800.0, 600.0));
        assert!("about:800".parse::<SectionArg>().is_err());

        let pointer: PointerArg = "10, 20.5".parse().unwrap();
        assert_eq!((pointer.x, pointer.y), (10.0, 20.5));
    }

    #[test]
    fn cli_accepts_render_arguments() {
        let cli = Cli::try_parse_from([
            "storefront", "render", "--width", "320", "--frames", "2", "--seed", "9", "--pointer",
            "5,5",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Render { width: 320, frames: 2, seed: Some(9), .. }
        ));
    }
}
