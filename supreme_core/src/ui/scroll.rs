// Scroll-driven page effects

use crate::settings::Settings;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    /// Width of the reading-progress bar, 0..=100
    pub progress_percent: f64,
    pub show_back_to_top: bool,
}

pub struct ScrollEffects {
    back_to_top_threshold: f64,
}

impl ScrollEffects {
    pub fn new(settings: &Settings) -> Self {
        Self {
            back_to_top_threshold: settings.back_to_top_threshold_px,
        }
    }

    pub fn on_scroll(&self, scroll_top: f64, scroll_height: f64, viewport_height: f64) -> ScrollState {
        ScrollState {
            progress_percent: progress_percent(scroll_top, scroll_height, viewport_height),
            show_back_to_top: scroll_top > self.back_to_top_threshold,
        }
    }
}

/// Share of the scrollable distance already covered. Documents that fit in
/// the viewport report 0.
pub fn progress_percent(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}
