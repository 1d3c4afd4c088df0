//! Core library for the storefront site.
//!
//! The crate holds the presentation logic of the site independent of any UI
//! toolkit: an auto-advancing carousel, a gallery with a full-screen viewer,
//! navigation and scroll-reveal bookkeeping, and the layered aurora
//! background renderer. Hosts provide a drawing surface, input events, frame
//! pacing and the current time; everything else lives here.

pub mod aurora;
pub mod carousel;
pub mod config;
pub mod error;
pub mod gallery;
pub mod nav;
pub mod render;
pub mod reveal;
pub mod timeline;

pub use aurora::{AuroraRenderer, ParamSource, Particle, PointerState, SequenceSource, WaveLayer};
pub use carousel::{Carousel, CarouselView, Slide, SwipeDirection};
pub use config::{AppConfig, AuroraConfig, CarouselConfig, NavigationConfig, RevealConfig};
pub use error::{Result, StorefrontError};
pub use gallery::{Click, Gallery, GalleryImage, GalleryManifest, Key, ModalState, PageScroll};
pub use nav::{Navigation, Section};
pub use render::{Canvas, Color, DrawCommand, Hsl, Paint, Point, RecordingCanvas};
pub use reveal::{RevealId, RevealTracker};
pub use timeline::{
    AnimationClock, AnimationLoop, FixedRateScheduler, FrameScheduler, HostEvent, IntervalTimer,
    LoopHandle,
};
