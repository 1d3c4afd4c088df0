use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

impl GalleryImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Ordered list of gallery images, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryManifest {
    pub images: Vec<GalleryImage>,
}

impl Default for GalleryManifest {
    /// The images shipped with the site.
    fn default() -> Self {
        let numbered = (0..18).map(|i| {
            let extension = if i == 0 { "jpg" } else { "png" };
            GalleryImage::new(
                format!("images/img{i}.{extension}"),
                format!("Bakevans creation {i}"),
            )
        });
        let featured = [
            ("images/pd1.png", "Safari themed cake"),
            ("images/pd2.png", "Decorated cookies"),
            ("images/pd3.png", "Elegant cake"),
            ("images/pd4.png", "Gourmet cupcakes"),
        ]
        .into_iter()
        .map(|(src, alt)| GalleryImage::new(src, alt));

        Self {
            images: numbered.chain(featured).collect(),
        }
    }
}

impl GalleryManifest {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Accepts either `{ "images": [...] }` or a bare array of images.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Manifest(GalleryManifest),
            List(Vec<GalleryImage>),
        }

        Ok(match serde_json::from_str(raw)? {
            Shape::Manifest(manifest) => manifest,
            Shape::List(images) => Self { images },
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalState {
    pub is_open: bool,
    /// Only meaningful while `is_open`.
    pub current_index: usize,
}

/// Page-level scroll behaviour the modal suspends while open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageScroll {
    /// CSS `overflow` of the page body; empty means the stylesheet default.
    pub overflow: String,
    saved: Option<String>,
}

impl PageScroll {
    pub fn new(overflow: impl Into<String>) -> Self {
        Self {
            overflow: overflow.into(),
            saved: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    fn lock(&mut self) {
        if self.saved.is_none() {
            self.saved = Some(std::mem::replace(&mut self.overflow, "hidden".to_string()));
        }
    }

    fn release(&mut self) {
        if let Some(previous) = self.saved.take() {
            self.overflow = previous;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    /// Parses DOM `KeyboardEvent.key` names; unknown keys map to `Other`.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match value {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            _ => Self::Other,
        })
    }
}

/// Where a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Click {
    /// A thumbnail in the gallery grid.
    Item(usize),
    CloseButton,
    PreviousButton,
    NextButton,
    /// The overlay outside the image.
    Backdrop,
    Image,
}

/// Gallery grid plus its full-screen viewer.
#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    modal: ModalState,
    scroll: PageScroll,
}

impl Gallery {
    pub fn from_manifest(manifest: GalleryManifest) -> Self {
        tracing::debug!(images = manifest.images.len(), "gallery initialised");
        Self {
            images: manifest.images,
            modal: ModalState::default(),
            scroll: PageScroll::default(),
        }
    }

    /// Uses `scroll` as the page's current scroll settings.
    pub fn with_page_scroll(mut self, scroll: PageScroll) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn page_scroll(&self) -> &PageScroll {
        &self.scroll
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll.is_locked()
    }

    /// Image shown in the viewer, if it is open.
    pub fn current_image(&self) -> Option<&GalleryImage> {
        if !self.modal.is_open {
            return None;
        }
        self.images.get(self.modal.current_index)
    }

    /// Opens the viewer on `index` (wrapped into range). Every open names
    /// its index; nothing is resumed from an earlier session.
    pub fn open(&mut self, index: usize) {
        if self.images.is_empty() {
            tracing::warn!(index, "ignoring open on an empty gallery");
            return;
        }
        self.modal = ModalState {
            is_open: true,
            current_index: index % self.images.len(),
        };
        self.scroll.lock();
        tracing::debug!(index = self.modal.current_index, "gallery opened");
    }

    pub fn close(&mut self) {
        if !self.modal.is_open {
            return;
        }
        self.modal.is_open = false;
        self.scroll.release();
        tracing::debug!("gallery closed");
    }

    pub fn show_next(&mut self) {
        if self.modal.is_open {
            self.modal.current_index = (self.modal.current_index + 1) % self.images.len();
        }
    }

    pub fn show_previous(&mut self) {
        if self.modal.is_open {
            let count = self.images.len();
            self.modal.current_index = (self.modal.current_index + count - 1) % count;
        }
    }

    /// Keyboard shortcuts apply only while the viewer is open. Returns
    /// whether the key was handled.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.modal.is_open {
            return false;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.show_previous(),
            Key::ArrowRight => self.show_next(),
            Key::Other => return false,
        }
        true
    }

    pub fn handle_click(&mut self, click: Click) {
        match click {
            Click::Item(index) if index < self.images.len() => self.open(index),
            Click::Item(index) => tracing::warn!(index, "click on unknown gallery item"),
            Click::CloseButton | Click::Backdrop => self.close(),
            Click::PreviousButton => self.show_previous(),
            Click::NextButton => self.show_next(),
            Click::Image => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(count: usize) -> Gallery {
        let images = (0..count)
            .map(|i| GalleryImage::new(format!("images/{i}.png"), format!("image {i}")))
            .collect();
        Gallery::from_manifest(GalleryManifest { images })
    }

    #[test]
    fn default_manifest_preserves_site_order() {
        let manifest = GalleryManifest::default();
        assert_eq!(manifest.images.len(), 22);
        assert_eq!(manifest.images[0].src, "images/img0.jpg");
        assert_eq!(manifest.images[17].src, "images/img17.png");
        assert_eq!(manifest.images[21].alt, "Gourmet cupcakes");
    }

    #[test]
    fn open_next_close() {
        let mut gallery = gallery(6);
        gallery.open(3);
        assert_eq!(
            gallery.modal(),
            ModalState {
                is_open: true,
                current_index: 3
            }
        );
        assert!(gallery.is_scroll_locked());

        gallery.show_next();
        assert_eq!(gallery.modal().current_index, 4);
        assert_eq!(gallery.current_image().unwrap().src, "images/4.png");

        gallery.close();
        assert!(!gallery.modal().is_open);
        assert!(!gallery.is_scroll_locked());
        assert_eq!(gallery.current_image(), None);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut gallery = gallery(3);
        gallery.open(2);
        gallery.show_next();
        assert_eq!(gallery.modal().current_index, 0);
        gallery.show_previous();
        gallery.show_previous();
        assert_eq!(gallery.modal().current_index, 1);
    }

    #[test]
    fn navigation_ignored_while_closed() {
        let mut gallery = gallery(3);
        gallery.show_next();
        assert_eq!(gallery.modal().current_index, 0);
        assert!(!gallery.handle_key(Key::ArrowRight));
        assert!(!gallery.handle_key(Key::Escape));
        assert_eq!(gallery.modal(), ModalState::default());
    }

    #[test]
    fn keyboard_drives_open_modal() {
        let mut gallery = gallery(5);
        gallery.open(0);
        assert!(gallery.handle_key("ArrowLeft".parse().unwrap()));
        assert_eq!(gallery.modal().current_index, 4);
        assert!(gallery.handle_key("ArrowRight".parse().unwrap()));
        assert_eq!(gallery.modal().current_index, 0);
        assert!(!gallery.handle_key("Enter".parse().unwrap()));
        assert!(gallery.handle_key("Escape".parse().unwrap()));
        assert!(!gallery.modal().is_open);
    }

    #[test]
    fn clicks_dismiss_only_from_backdrop_or_close() {
        let mut gallery = gallery(4);
        gallery.handle_click(Click::Item(2));
        gallery.handle_click(Click::Image);
        assert!(gallery.modal().is_open);

        gallery.handle_click(Click::NextButton);
        assert_eq!(gallery.modal().current_index, 3);

        gallery.handle_click(Click::Backdrop);
        assert!(!gallery.modal().is_open);

        gallery.handle_click(Click::Item(1));
        gallery.handle_click(Click::CloseButton);
        assert!(!gallery.modal().is_open);

        gallery.handle_click(Click::Item(9));
        assert!(!gallery.modal().is_open);
    }

    #[test]
    fn reopening_uses_the_given_index() {
        let mut gallery = gallery(5);
        gallery.open(3);
        gallery.close();
        gallery.open(1);
        assert_eq!(gallery.modal().current_index, 1);
    }

    #[test]
    fn scroll_setting_is_restored_exactly() {
        let mut gallery = gallery(2).with_page_scroll(PageScroll::new("scroll"));
        gallery.open(0);
        assert_eq!(gallery.page_scroll().overflow, "hidden");
        gallery.open(1);
        gallery.close();
        assert_eq!(gallery.page_scroll().overflow, "scroll");
    }

    #[test]
    fn empty_gallery_never_opens() {
        let mut gallery = gallery(0);
        gallery.open(0);
        assert!(!gallery.modal().is_open);
        assert!(!gallery.is_scroll_locked());
    }

    #[test]
    fn manifest_accepts_both_json_shapes() {
        let wrapped = GalleryManifest::from_json_str(
            r#"{ "images": [ { "src": "a.png", "alt": "A" } ] }"#,
        )
        .unwrap();
        let bare = GalleryManifest::from_json_str(r#"[ { "src": "a.png", "alt": "A" } ]"#).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(bare.images[0], GalleryImage::new("a.png", "A"));
    }
}
