use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Result, StorefrontError};

/// Top-level configuration structure for the site core.
///
/// Every section falls back to its defaults, so a JSON file only needs to
/// name the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub carousel: CarouselConfig,
    pub aurora: AuroraConfig,
    pub navigation: NavigationConfig,
    pub reveal: RevealConfig,
}

impl AppConfig {
    /// Reads and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would stall timers or sampling loops.
    pub fn validate(&self) -> Result<()> {
        self.carousel.validate()?;
        self.aurora.validate()?;
        self.reveal.validate()
    }
}

/// Auto-advance cadence and gesture tuning for carousels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64,
    /// Minimum horizontal travel before a touch counts as a swipe.
    pub swipe_threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            swipe_threshold: 50.0,
        }
    }
}

impl CarouselConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(StorefrontError::config(
                "carousel.interval_ms must be greater than zero",
            ));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(StorefrontError::config(
                "carousel.swipe_threshold must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Parameters of the layered aurora background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    pub wave_count: usize,
    pub particle_count: usize,
    /// Clock increment per rendered frame.
    pub time_step: f64,
    /// Horizontal distance between wave samples.
    pub sample_step: f64,
    pub pointer_radius: f64,
    pub band_glow_strength: f64,
    /// Cursor glow radius as a multiple of `pointer_radius`.
    pub cursor_glow_scale: f64,
    pub background: [u8; 3],
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            wave_count: 8,
            particle_count: 50,
            time_step: 0.01,
            sample_step: 5.0,
            pointer_radius: 200.0,
            band_glow_strength: 0.3,
            cursor_glow_scale: 1.5,
            background: [15, 10, 20],
        }
    }
}

impl AuroraConfig {
    /// Smallest horizontal distance between wave samples.
    pub const MIN_SAMPLE_STEP: f64 = 1.0;

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.sample_step.is_finite() && self.sample_step >= Self::MIN_SAMPLE_STEP) {
            return Err(StorefrontError::config(format!(
                "aurora.sample_step must be at least {}",
                Self::MIN_SAMPLE_STEP
            )));
        }
        if !(self.time_step.is_finite() && self.time_step >= 0.0) {
            return Err(StorefrontError::config(
                "aurora.time_step must be a non-negative number",
            ));
        }
        if !(self.pointer_radius.is_finite() && self.pointer_radius > 0.0) {
            return Err(StorefrontError::config(
                "aurora.pointer_radius must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Extra distance above a section at which its link becomes active.
    pub activation_margin: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            activation_margin: 100.0,
        }
    }
}

/// Visibility rules for animate-on-scroll elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of an element that must be visible before it is revealed.
    pub threshold: f64,
    /// Distance the viewport's bottom edge is pulled in by.
    pub bottom_margin: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
        }
    }
}

impl RevealConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(StorefrontError::config(
                "reveal.threshold must lie within [0, 1]",
            ));
        }
        Ok(())
    }
}
