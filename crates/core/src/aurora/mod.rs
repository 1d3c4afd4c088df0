//! Layered aurora background.
//!
//! Each frame paints translucent sinusoidal bands back to front, a twinkling
//! star field, and a hue-cycling glow that follows the pointer. Band and
//! particle parameters are drawn once from a [`ParamSource`] and regenerated
//! wholesale whenever the surface is resized.

use std::f64::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    render::{Canvas, Color, ColorStop, Hsl, LinearGradient, Paint, Point, RadialGradient},
    timeline::{AnimationClock, AnimationLoop, FrameScheduler, HostEvent},
    AuroraConfig, Result,
};

/// Soft site colours assigned to wave layers round-robin.
pub const PALETTE: [Hsl; 5] = [
    Hsl::new(340.0, 60.0, 70.0),
    Hsl::new(280.0, 55.0, 75.0),
    Hsl::new(45.0, 70.0, 75.0),
    Hsl::new(160.0, 50.0, 70.0),
    Hsl::new(195.0, 60.0, 75.0),
];

const CURSOR_GLOW_SATURATION: f64 = 70.0;
const CURSOR_GLOW_LIGHTNESS: f64 = 75.0;
const CURSOR_HUE_RATE: f64 = 20.0;

/// Supplies uniformly distributed values in `[0, 1)` for parameter
/// generation.
pub trait ParamSource {
    fn unit(&mut self) -> f64;

    fn range(&mut self, min: f64, span: f64) -> f64 {
        min + self.unit() * span
    }
}

impl ParamSource for StdRng {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl ParamSource for SequenceSource {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveLayer {
    /// Vertical centre line of the band.
    pub base_y: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub speed: f64,
    pub phase: f64,
    pub opacity: f64,
    pub thickness: f64,
    pub color: Hsl,
}

impl WaveLayer {
    fn generate(index: usize, count: usize, height: f64, source: &mut dyn ParamSource) -> Self {
        Self {
            base_y: height / count as f64 * index as f64,
            amplitude: source.range(80.0, 120.0),
            frequency: source.range(0.003, 0.002),
            speed: source.range(0.3, 0.4),
            phase: source.range(0.0, TAU),
            opacity: source.range(0.08, 0.12),
            thickness: source.range(100.0, 150.0),
            color: PALETTE[index % PALETTE.len()],
        }
    }

    /// Centre line height at horizontal position `x` and clock time `time`.
    pub fn sample(&self, x: f64, time: f64) -> f64 {
        self.base_y + (self.frequency * x + time * self.speed + self.phase).sin() * self.amplitude
    }

    fn gradient(&self) -> Paint {
        let half = self.thickness / 2.0;
        Paint::Linear(LinearGradient {
            start: Point::new(0.0, self.base_y - half),
            end: Point::new(0.0, self.base_y + half),
            stops: vec![
                ColorStop::new(0.0, self.color.with_alpha(0.0)),
                ColorStop::new(0.5, self.color.with_alpha(self.opacity)),
                ColorStop::new(1.0, self.color.with_alpha(0.0)),
            ],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Opacity at generation time; frames use [`Particle::opacity_at`].
    pub opacity: f64,
    pub twinkle_speed: f64,
}

impl Particle {
    fn generate(width: f64, height: f64, source: &mut dyn ParamSource) -> Self {
        Self {
            x: source.range(0.0, width),
            y: source.range(0.0, height),
            radius: source.range(0.0, 2.0),
            opacity: source.range(0.0, 0.5),
            twinkle_speed: source.range(0.5, 1.5),
        }
    }

    pub fn opacity_at(&self, time: f64) -> f64 {
        0.3 + (time * self.twinkle_speed).sin() * 0.3
    }
}

/// Pointer position as the renderer sees it.
///
/// The host writes it from pointer and scroll events; the renderer only
/// reads it. Positions are in page space: viewport coordinates plus the
/// current vertical scroll offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    client: Option<Point>,
    scroll_y: f64,
    influence_radius: f64,
}

impl PointerState {
    pub fn new(influence_radius: f64) -> Self {
        Self {
            client: None,
            scroll_y: 0.0,
            influence_radius,
        }
    }

    pub fn influence_radius(&self) -> f64 {
        self.influence_radius
    }

    /// Page-space position, or `None` while the pointer is outside the page.
    pub fn position(&self) -> Option<Point> {
        self.client
            .map(|client| Point::new(client.x, client.y + self.scroll_y))
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.client = Some(Point::new(x, y));
    }

    pub fn leave(&mut self) {
        self.client = None;
    }

    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    /// Applies a pointer or scroll event; returns `false` for events that
    /// do not concern the pointer.
    pub fn apply(&mut self, event: &HostEvent) -> bool {
        match *event {
            HostEvent::PointerMove { x, y } => self.move_to(x, y),
            HostEvent::PointerLeave => self.leave(),
            HostEvent::Scroll { scroll_y } => self.scroll_to(scroll_y),
            HostEvent::Resize { .. } => return false,
        }
        true
    }
}

/// Paints the aurora onto a [`Canvas`].
#[derive(Debug)]
pub struct AuroraRenderer<R = StdRng> {
    config: AuroraConfig,
    source: R,
    clock: AnimationClock,
    width: u32,
    height: u32,
    waves: Vec<WaveLayer>,
    particles: Vec<Particle>,
}

impl AuroraRenderer<StdRng> {
    /// Creates a renderer whose parameters derive from `seed`.
    pub fn seeded(config: AuroraConfig, seed: u64, width: u32, height: u32) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed), width, height)
    }

    pub fn from_entropy(config: AuroraConfig, width: u32, height: u32) -> Result<Self> {
        Self::new(config, StdRng::from_entropy(), width, height)
    }
}

impl<R: ParamSource> AuroraRenderer<R> {
    pub fn new(config: AuroraConfig, source: R, width: u32, height: u32) -> Result<Self> {
        config.validate()?;
        let clock = AnimationClock::new(config.time_step);
        let mut renderer = Self {
            config,
            source,
            clock,
            width,
            height,
            waves: Vec::new(),
            particles: Vec::new(),
        };
        renderer.regenerate();
        Ok(renderer)
    }

    pub fn config(&self) -> &AuroraConfig {
        &self.config
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Replaces the animation clock, e.g. to render a specific moment.
    pub fn set_clock(&mut self, clock: AnimationClock) {
        self.clock = clock;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn waves(&self) -> &[WaveLayer] {
        &self.waves
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Resizes the surface to the viewport width and full content height and
    /// draws a fresh set of parameters. Nothing survives a resize.
    pub fn resize<C: Canvas + ?Sized>(&mut self, canvas: &mut C, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        canvas.resize(width, height);
        self.regenerate();
        tracing::info!(width, height, "aurora surface resized");
    }

    fn regenerate(&mut self) {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let count = self.config.wave_count;

        self.waves = (0..count)
            .map(|index| WaveLayer::generate(index, count, height, &mut self.source))
            .collect();
        self.particles = (0..self.config.particle_count)
            .map(|_| Particle::generate(width, height, &mut self.source))
            .collect();
    }

    /// Advances the clock by one step and paints a frame.
    pub fn render_frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C, pointer: &PointerState) {
        self.clock.advance();
        self.draw(canvas, pointer);
    }

    /// Paints the scene at the current clock time without advancing it.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, pointer: &PointerState) {
        let [r, g, b] = self.config.background;
        canvas.clear(Color::rgb(r, g, b));

        // Earlier layers end up on top.
        for wave in self.waves.iter().rev() {
            self.draw_wave(canvas, wave, pointer);
        }

        self.draw_particles(canvas);
        self.draw_cursor_glow(canvas, pointer);
    }

    fn sample_points(&self, wave: &WaveLayer) -> Vec<Point> {
        let time = self.clock.time();
        let step = self.config.sample_step.max(AuroraConfig::MIN_SAMPLE_STEP);
        let samples = ((f64::from(self.width) / step).floor() as usize).saturating_add(1);

        (0..samples)
            .map(|i| {
                let x = i as f64 * step;
                Point::new(x, wave.sample(x, time))
            })
            .collect()
    }

    fn draw_wave<C: Canvas + ?Sized>(&self, canvas: &mut C, wave: &WaveLayer, pointer: &PointerState) {
        let centre_line = self.sample_points(wave);
        let half = wave.thickness / 2.0;

        let outline: Vec<Point> = centre_line
            .iter()
            .map(|p| Point::new(p.x, p.y - half))
            .chain(centre_line.iter().rev().map(|p| Point::new(p.x, p.y + half)))
            .collect();
        canvas.fill_polygon(&outline, &wave.gradient());

        let (Some(cursor), Some(midpoint)) =
            (pointer.position(), centre_line.get(centre_line.len() / 2))
        else {
            return;
        };

        let radius = pointer.influence_radius();
        let distance = cursor.distance(*midpoint);
        if distance < radius {
            let intensity = 1.0 - distance / radius;
            canvas.fill_surface(&Paint::Radial(RadialGradient {
                center: cursor,
                radius,
                stops: vec![
                    ColorStop::new(
                        0.0,
                        wave.color
                            .with_alpha(intensity * self.config.band_glow_strength),
                    ),
                    ColorStop::new(1.0, wave.color.with_alpha(0.0)),
                ],
            }));
        }
    }

    fn draw_particles<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let time = self.clock.time();
        for particle in &self.particles {
            let color = Color::Rgba {
                r: 255,
                g: 255,
                b: 255,
                a: particle.opacity_at(time).clamp(0.0, 1.0),
            };
            canvas.fill_circle(Point::new(particle.x, particle.y), particle.radius, color);
        }
    }

    fn draw_cursor_glow<C: Canvas + ?Sized>(&self, canvas: &mut C, pointer: &PointerState) {
        let Some(cursor) = pointer.position() else {
            return;
        };

        let hue = cursor_hue(self.clock.time());
        let tone = |h: f64| Hsl::new(h, CURSOR_GLOW_SATURATION, CURSOR_GLOW_LIGHTNESS);
        canvas.fill_surface(&Paint::Radial(RadialGradient {
            center: cursor,
            radius: pointer.influence_radius() * self.config.cursor_glow_scale,
            stops: vec![
                ColorStop::new(0.0, tone(hue).with_alpha(0.15)),
                ColorStop::new(0.5, tone(hue + 60.0).with_alpha(0.08)),
                ColorStop::new(1.0, tone(hue + 120.0).with_alpha(0.0)),
            ],
        }));
    }

    /// Drives the renderer from a host frame scheduler until it stops or
    /// `animation` is cancelled. Pointer and scroll events update `pointer`;
    /// resize events regenerate the scene.
    pub fn run<C, S>(
        &mut self,
        canvas: &mut C,
        pointer: &mut PointerState,
        scheduler: &mut S,
        animation: &AnimationLoop,
    ) -> u64
    where
        C: Canvas + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        animation.run(scheduler, |events| {
            for event in events {
                if let HostEvent::Resize { width, height } = *event {
                    self.resize(canvas, width, height);
                } else {
                    pointer.apply(event);
                }
            }
            self.render_frame(canvas, pointer);
        })
    }
}

/// Hue of the cursor glow's inner stop at clock time `time`.
pub fn cursor_hue(time: f64) -> f64 {
    (time * CURSOR_HUE_RATE).rem_euclid(360.0)
}
