//! Time sources for the presentation core.
//!
//! Nothing in here reads the wall clock. Hosts pass a monotonic `Duration`
//! (time since page load) into timers, and frame pacing comes from a
//! [`FrameScheduler`] the host supplies, so every component can be driven
//! deterministically from tests.

use std::{cell::Cell, collections::VecDeque, rc::Rc, time::Duration};

use serde::{Deserialize, Serialize};

/// Shared animation time, advanced by a fixed step once per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationClock {
    time: f64,
    step: f64,
}

impl AnimationClock {
    pub fn new(step: f64) -> Self {
        Self::at(0.0, step)
    }

    /// Creates a clock positioned at an arbitrary time.
    pub fn at(time: f64, step: f64) -> Self {
        Self {
            time,
            step: step.max(0.0),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn advance(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

/// A single repeating schedule with cancel.
///
/// The timer holds at most one schedule: `start` overwrites whatever was
/// armed before, so there is no way to end up with two live cadences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    next_due: Option<Duration>,
}

impl IntervalTimer {
    const MIN_PERIOD: Duration = Duration::from_millis(1);

    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Self::MIN_PERIOD),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arms the timer so that it first fires one period after `now`.
    pub fn start(&mut self, now: Duration) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Cancels the current schedule and arms a fresh one in one step.
    pub fn restart(&mut self, now: Duration) {
        self.stop();
        self.start(now);
    }

    /// Returns how many periods elapsed up to and including `now`.
    /// Saturates at `u32::MAX` for very long gaps.
    pub fn poll(&mut self, now: Duration) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }

        let period = self.period.as_nanos();
        let overshoot = (now - due).as_nanos();
        let periods = overshoot / period + 1;
        self.next_due = Some(now + duration_from_nanos(period - overshoot % period));
        u32::try_from(periods).unwrap_or(u32::MAX)
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

/// Input a host delivers between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Pointer moved; coordinates are viewport-relative.
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Scroll { scroll_y: f64 },
    /// Viewport resized; `height` is the full scrollable content height.
    Resize { width: u32, height: u32 },
}

/// Frame pacing supplied by the host environment.
pub trait FrameScheduler {
    /// Waits for the next display refresh and drains pending input into
    /// `events`. Returns `false` once the host will not schedule more frames.
    fn next_frame(&mut self, events: &mut Vec<HostEvent>) -> bool;
}

/// Headless scheduler that hands out a fixed number of frames immediately,
/// with optional scripted input attached to specific frame indices.
#[derive(Debug, Clone)]
pub struct FixedRateScheduler {
    frame_interval: Duration,
    remaining: u64,
    frame: u64,
    script: VecDeque<(u64, HostEvent)>,
}

impl FixedRateScheduler {
    pub fn new(frames: u64, frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            remaining: frames,
            frame: 0,
            script: VecDeque::new(),
        }
    }

    /// Delivers `event` just before frame `frame` (0-based) is rendered.
    pub fn with_event(mut self, frame: u64, event: HostEvent) -> Self {
        let position = self
            .script
            .iter()
            .position(|(at, _)| *at > frame)
            .unwrap_or(self.script.len());
        self.script.insert(position, (frame, event));
        self
    }

    /// Simulated host time of the frame most recently handed out.
    pub fn elapsed(&self) -> Duration {
        u32::try_from(self.frame.saturating_sub(1))
            .ok()
            .and_then(|frames| self.frame_interval.checked_mul(frames))
            .unwrap_or(Duration::MAX)
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frame
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn next_frame(&mut self, events: &mut Vec<HostEvent>) -> bool {
        if self.remaining == 0 {
            return false;
        }

        while let Some((at, _)) = self.script.front() {
            if *at > self.frame {
                break;
            }
            if let Some((_, event)) = self.script.pop_front() {
                events.push(event);
            }
        }

        self.remaining -= 1;
        self.frame += 1;
        true
    }
}

/// Cancels a running [`AnimationLoop`] from inside a frame callback or
/// from any other code on the same thread.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Self-re-arming frame task bound to a [`FrameScheduler`].
#[derive(Debug, Default)]
pub struct AnimationLoop {
    handle: LoopHandle,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Runs `on_frame` once per scheduled frame until the scheduler stops or
    /// the loop is cancelled. Returns the number of frames rendered.
    pub fn run<S, F>(&self, scheduler: &mut S, mut on_frame: F) -> u64
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(&[HostEvent]),
    {
        let mut events = Vec::new();
        let mut frames = 0;
        tracing::info!("animation loop started");

        while !self.handle.is_cancelled() {
            events.clear();
            if !scheduler.next_frame(&mut events) {
                break;
            }
            on_frame(&events);
            frames += 1;
        }

        tracing::info!(frames, cancelled = self.handle.is_cancelled(), "animation loop stopped");
        frames
    }
}
