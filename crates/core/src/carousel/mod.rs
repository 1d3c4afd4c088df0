//! Auto-advancing image carousel.
//!
//! Time is supplied by the host as a monotonic `Duration` since page load.
//! The carousel owns exactly one [`IntervalTimer`]; every manual interaction
//! re-arms it so the cadence restarts from the last user action.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{timeline::IntervalTimer, CarouselConfig, Result, StorefrontError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub index: usize,
    /// Reference to whatever the slide shows, e.g. an image path.
    pub content: String,
}

/// What the host should display after a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselView {
    /// Horizontal translation of the slide track in percent.
    pub track_offset_percent: f64,
    pub active_index: usize,
    pub slides: Vec<bool>,
    pub indicators: Vec<bool>,
}

impl CarouselView {
    fn for_index(active_index: usize, count: usize) -> Self {
        let flags: Vec<bool> = (0..count).map(|i| i == active_index).collect();
        Self {
            track_offset_percent: -(active_index as f64 * 100.0),
            active_index,
            slides: flags.clone(),
            indicators: flags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Finger moved left; shows the next slide.
    Forward,
    /// Finger moved right; shows the previous slide.
    Backward,
}

/// Classifies a completed touch by its horizontal travel.
pub fn classify_swipe(start_x: f64, end_x: f64, threshold: f64) -> Option<SwipeDirection> {
    if end_x < start_x - threshold {
        Some(SwipeDirection::Forward)
    } else if end_x > start_x + threshold {
        Some(SwipeDirection::Backward)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Carousel {
    slides: Vec<Slide>,
    index: usize,
    timer: IntervalTimer,
    swipe_threshold: f64,
    touch_start: Option<f64>,
    view: CarouselView,
}

impl Carousel {
    /// Builds a carousel over `contents` in order and starts auto-advance at
    /// `now`.
    pub fn new<I, S>(contents: I, config: &CarouselConfig, now: Duration) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slides: Vec<Slide> = contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Slide {
                index,
                content: content.into(),
            })
            .collect();

        if slides.is_empty() {
            return Err(StorefrontError::EmptyCarousel);
        }

        let mut timer = IntervalTimer::new(config.interval());
        timer.start(now);
        let view = CarouselView::for_index(0, slides.len());
        tracing::debug!(slides = slides.len(), interval = ?timer.period(), "carousel initialised");

        Ok(Self {
            slides,
            index: 0,
            timer,
            swipe_threshold: config.swipe_threshold,
            touch_start: None,
            view,
        })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always `false`; construction rejects empty slide lists.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn active_slide(&self) -> &Slide {
        &self.slides[self.index]
    }

    pub fn view(&self) -> &CarouselView {
        &self.view
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.timer.is_running()
    }

    fn show(&mut self, index: usize) {
        self.index = index;
        self.view = CarouselView::for_index(index, self.slides.len());
        tracing::debug!(index, "carousel moved");
    }

    /// Moves to `index` normalised into range and re-arms auto-advance.
    pub fn go_to(&mut self, index: i64, now: Duration) {
        let normalised = index.rem_euclid(self.slides.len() as i64) as usize;
        self.show(normalised);
        self.timer.restart(now);
    }

    /// Advances one slide with wraparound. Leaves the timer alone.
    pub fn next(&mut self) {
        self.show((self.index + 1) % self.slides.len());
    }

    /// Steps back one slide with wraparound. Leaves the timer alone.
    pub fn previous(&mut self) {
        let count = self.slides.len();
        self.show((self.index + count - 1) % count);
    }

    pub fn next_button(&mut self, now: Duration) {
        self.next();
        self.timer.restart(now);
    }

    pub fn previous_button(&mut self, now: Duration) {
        self.previous();
        self.timer.restart(now);
    }

    /// Indicator clicks jump straight to their slide.
    pub fn indicator(&mut self, indicator: usize, now: Duration) {
        self.go_to(indicator as i64, now);
    }

    /// Hovering the carousel pauses auto-advance.
    pub fn pointer_enter(&mut self) {
        self.timer.stop();
        tracing::debug!("carousel paused");
    }

    /// Leaving resumes auto-advance from `now` without moving.
    pub fn pointer_leave(&mut self, now: Duration) {
        self.timer.restart(now);
        tracing::debug!("carousel resumed");
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start = Some(x);
        self.timer.stop();
    }

    /// Completes a touch gesture, navigating if it travelled far enough, and
    /// resumes auto-advance.
    pub fn touch_end(&mut self, x: f64, now: Duration) -> Option<SwipeDirection> {
        let swipe = self
            .touch_start
            .take()
            .and_then(|start| classify_swipe(start, x, self.swipe_threshold));

        match swipe {
            Some(SwipeDirection::Forward) => self.next(),
            Some(SwipeDirection::Backward) => self.previous(),
            None => tracing::debug!(x, "touch ended below swipe threshold"),
        }

        self.timer.restart(now);
        swipe
    }

    /// Applies auto-advance ticks that elapsed up to `now`. Returns how many
    /// slides were advanced.
    pub fn tick(&mut self, now: Duration) -> u32 {
        let fired = self.timer.poll(now);
        if fired > 0 {
            let count = self.slides.len();
            self.show((self.index + fired as usize % count) % count);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn carousel(count: usize) -> Carousel {
        let contents = (0..count).map(|i| format!("images/slide{i}.jpg"));
        Carousel::new(contents, &CarouselConfig::default(), ms(0)).unwrap()
    }

    #[test]
    fn starts_on_first_slide_with_timer_running() {
        let carousel = carousel(4);
        assert_eq!(carousel.index(), 0);
        assert!(carousel.is_auto_advancing());
        assert_eq!(carousel.view().slides, vec![true, false, false, false]);
        assert_eq!(carousel.view().indicators.len(), 4);
        assert_eq!(carousel.active_slide().content, "images/slide0.jpg");
    }

    #[test]
    fn rejects_empty_slide_list() {
        let err = Carousel::new(Vec::<String>::new(), &CarouselConfig::default(), ms(0)).unwrap_err();
        assert!(matches!(err, StorefrontError::EmptyCarousel));
    }

    #[test]
    fn navigation_stays_in_range() {
        for count in 1..6 {
            let mut carousel = carousel(count);
            for step in 0..50 {
                if step % 3 == 0 {
                    carousel.previous();
                } else {
                    carousel.next();
                }
                assert!(carousel.index() < count);
                assert_eq!(carousel.view().slides.iter().filter(|a| **a).count(), 1);
            }
        }
    }

    #[test]
    fn go_to_normalises_any_index() {
        let mut carousel = carousel(5);
        for k in [-11_i64, -5, -1, 0, 3, 5, 7, 104] {
            carousel.go_to(k, ms(0));
            assert_eq!(carousel.index() as i64, ((k % 5) + 5) % 5);
        }
    }

    #[test]
    fn view_tracks_active_slide() {
        let mut carousel = carousel(3);
        carousel.go_to(2, ms(0));
        let view = carousel.view();
        assert_eq!(view.track_offset_percent, -200.0);
        assert_eq!(view.indicators, vec![false, false, true]);
        assert_eq!(view.active_index, 2);
    }

    #[test]
    fn auto_advance_wraps_around() {
        let mut carousel = carousel(3);
        assert_eq!(carousel.tick(ms(999)), 0);
        assert_eq!(carousel.tick(ms(1000)), 1);
        assert_eq!(carousel.tick(ms(3000)), 2);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn long_idle_gap_lands_on_the_right_slide() {
        let mut carousel = carousel(7);
        assert_eq!(carousel.tick(ms(10_000)), 10);
        assert_eq!(carousel.index(), 3);
    }

    #[test]
    fn consecutive_resets_leave_one_timer() {
        let mut carousel = carousel(5);
        carousel.go_to(0, ms(500));
        carousel.go_to(0, ms(500));

        assert_eq!(carousel.tick(ms(1499)), 0);
        assert_eq!(carousel.tick(ms(1500)), 1);
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.tick(ms(2499)), 0);
    }

    #[test]
    fn buttons_move_and_rearm_timer() {
        let mut carousel = carousel(4);
        carousel.next_button(ms(900));
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.tick(ms(1000)), 0);
        assert_eq!(carousel.tick(ms(1900)), 1);

        carousel.previous_button(ms(2000));
        carousel.previous_button(ms(2000));
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.tick(ms(2999)), 0);
    }

    #[test]
    fn plain_next_does_not_rearm_timer() {
        let mut carousel = carousel(4);
        carousel.next();
        assert_eq!(carousel.tick(ms(1000)), 1);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn indicator_jumps_to_slide() {
        let mut carousel = carousel(6);
        carousel.indicator(4, ms(10));
        assert_eq!(carousel.index(), 4);
        assert_eq!(carousel.tick(ms(1009)), 0);
    }

    #[test]
    fn hover_pauses_and_leave_resumes_without_moving() {
        let mut carousel = carousel(4);
        carousel.tick(ms(1000));
        carousel.pointer_enter();
        assert!(!carousel.is_auto_advancing());
        assert_eq!(carousel.tick(ms(10_000)), 0);

        carousel.pointer_leave(ms(10_000));
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.tick(ms(11_000)), 1);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn swipe_left_goes_forward() {
        let mut carousel = carousel(4);
        carousel.touch_start(200.0);
        assert!(!carousel.is_auto_advancing());
        assert_eq!(carousel.touch_end(140.0, ms(0)), Some(SwipeDirection::Forward));
        assert_eq!(carousel.index(), 1);
        assert!(carousel.is_auto_advancing());
    }

    #[test]
    fn swipe_right_goes_back() {
        let mut carousel = carousel(4);
        carousel.touch_start(100.0);
        assert_eq!(carousel.touch_end(160.0, ms(0)), Some(SwipeDirection::Backward));
        assert_eq!(carousel.index(), 3);
    }

    #[test]
    fn short_swipe_is_ignored() {
        let mut carousel = carousel(4);
        carousel.touch_start(100.0);
        assert_eq!(carousel.touch_end(90.0, ms(0)), None);
        assert_eq!(carousel.index(), 0);
        assert!(carousel.is_auto_advancing());
    }

    #[test]
    fn touch_end_without_start_does_not_navigate() {
        let mut carousel = carousel(4);
        assert_eq!(carousel.touch_end(0.0, ms(0)), None);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn swipe_classification_uses_strict_threshold() {
        assert_eq!(classify_swipe(0.0, -50.0, 50.0), None);
        assert_eq!(classify_swipe(0.0, -50.5, 50.0), Some(SwipeDirection::Forward));
        assert_eq!(classify_swipe(0.0, 50.0, 50.0), None);
        assert_eq!(classify_swipe(0.0, 60.0, 50.0), Some(SwipeDirection::Backward));
    }
}
