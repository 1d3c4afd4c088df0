use serde::{Deserialize, Serialize};

use crate::RevealConfig;

/// Identifier handed out by [`RevealTracker::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealTarget {
    pub top: f64,
    pub height: f64,
    pub revealed: bool,
}

/// One-shot "animate on scroll" bookkeeping.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    threshold: f64,
    bottom_margin: f64,
    targets: Vec<RevealTarget>,
}

impl RevealTracker {
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin,
            targets: Vec::new(),
        }
    }

    pub fn observe(&mut self, top: f64, height: f64) -> RevealId {
        self.targets.push(RevealTarget {
            top,
            height,
            revealed: false,
        });
        RevealId(self.targets.len() - 1)
    }

    pub fn target(&self, id: RevealId) -> Option<&RevealTarget> {
        self.targets.get(id.0)
    }

    pub fn is_revealed(&self, id: RevealId) -> bool {
        self.target(id).is_some_and(|target| target.revealed)
    }

    /// Reveals targets that became visible enough and returns them. Targets
    /// stay revealed once shown.
    pub fn on_viewport(&mut self, scroll_y: f64, viewport_height: f64) -> Vec<RevealId> {
        let top = scroll_y;
        let bottom = scroll_y + (viewport_height - self.bottom_margin).max(0.0);
        let threshold = self.threshold;

        let mut revealed = Vec::new();
        for (index, target) in self.targets.iter_mut().enumerate() {
            if target.revealed {
                continue;
            }
            if visible_fraction(target, top, bottom) >= threshold.max(f64::EPSILON) {
                target.revealed = true;
                revealed.push(RevealId(index));
            }
        }

        if !revealed.is_empty() {
            tracing::debug!(count = revealed.len(), scroll_y, "revealed elements");
        }
        revealed
    }
}

fn visible_fraction(target: &RevealTarget, top: f64, bottom: f64) -> f64 {
    let overlap = (target.top + target.height).min(bottom) - target.top.max(top);
    if overlap <= 0.0 {
        return 0.0;
    }
    if target.height <= 0.0 {
        return 1.0;
    }
    overlap / target.height
}
