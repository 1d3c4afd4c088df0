use serde::{Deserialize, Serialize};

use crate::NavigationConfig;

/// A page section reachable from the navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    /// Offset of the section's top edge from the top of the page.
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Mobile menu and active-link state of the fixed navigation bar.
#[derive(Debug, Clone)]
pub struct Navigation {
    sections: Vec<Section>,
    navbar_height: f64,
    activation_margin: f64,
    menu_open: bool,
    active: Option<String>,
}

impl Navigation {
    pub fn new(sections: Vec<Section>, navbar_height: f64, config: &NavigationConfig) -> Self {
        Self {
            sections,
            navbar_height,
            activation_margin: config.activation_margin,
            menu_open: false,
            active: None,
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Handles a click on the link for `id`: closes the mobile menu, marks
    /// the link active and returns the scroll position that puts the section
    /// just below the navigation bar.
    pub fn select(&mut self, id: &str) -> Option<f64> {
        self.menu_open = false;
        self.active = Some(id.to_string());

        let target = self
            .sections
            .iter()
            .find(|section| section.id == id)
            .map(|section| section.top - self.navbar_height);
        if target.is_none() {
            tracing::warn!(id, "navigation link points at an unknown section");
        }
        target
    }

    /// Marks the last section that scrolled past the activation line.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<&str> {
        let line = self.navbar_height + self.activation_margin;
        self.active = self
            .sections
            .iter()
            .rev()
            .find(|section| scroll_y >= section.top - line)
            .map(|section| section.id.clone());
        self.active()
    }
}
