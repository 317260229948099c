//! Timeline entries and per-type pacing

use crate::lesson::ast::Element;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Display duration and the gap carried into the following entry, in ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    pub duration: u64,
    pub gap: u64,
}

impl Pacing {
    pub const fn new(duration: u64, gap: u64) -> Self {
        Self { duration, gap }
    }
}

/// Text elements are shown for `chars * per_char`, clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPacing {
    pub per_char: u64,
    pub min: u64,
    pub max: u64,
    pub gap: u64,
}

/// Pacing for every element kind that can appear on a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub title: Pacing,
    pub quote: Pacing,
    pub practice: Pacing,
    pub word: Pacing,
    pub closing: Pacing,
    pub text: TextPacing,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            title: Pacing::new(1500, 1500),
            quote: Pacing::new(1200, 800),
            practice: Pacing::new(1000, 500),
            word: Pacing::new(1500, 500),
            closing: Pacing::new(1000, 500),
            text: TextPacing {
                per_char: 50,
                min: 800,
                max: 2000,
                gap: 500,
            },
        }
    }
}

impl TimingConfig {
    /// How long `element` stays on screen. Pauses have no duration.
    pub fn duration_for(&self, element: &Element) -> u64 {
        match element {
            Element::Title { .. } => self.title.duration,
            Element::Quote { .. } => self.quote.duration,
            Element::Practice { .. } => self.practice.duration,
            Element::Word { .. } => self.word.duration,
            Element::Closing { .. } => self.closing.duration,
            Element::Text { .. } => {
                let chars = element.text_len().unwrap_or(0) as u64;
                chars
                    .saturating_mul(self.text.per_char)
                    .min(self.text.max)
                    .max(self.text.min)
            }
            Element::Pause { .. } => 0,
        }
    }

    /// Delay the entry after `element` starts from when no pause intervenes.
    pub fn gap_after(&self, element: &Element) -> u64 {
        match element {
            Element::Title { .. } => self.title.gap,
            Element::Quote { .. } => self.quote.gap,
            Element::Practice { .. } => self.practice.gap,
            Element::Word { .. } => self.word.gap,
            Element::Closing { .. } => self.closing.gap,
            Element::Text { .. } => self.text.gap,
            Element::Pause { .. } => 0,
        }
    }

    /// Scale every duration and gap; `2.0` plays twice as fast.
    pub fn with_speed(&self, speed: f64) -> Self {
        let factor = if speed.is_finite() && speed > 0.0 {
            1.0 / speed
        } else {
            1.0
        };
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        let pacing = |p: Pacing| Pacing::new(scale(p.duration), scale(p.gap));
        Self {
            title: pacing(self.title),
            quote: pacing(self.quote),
            practice: pacing(self.practice),
            word: pacing(self.word),
            closing: pacing(self.closing),
            text: TextPacing {
                per_char: scale(self.text.per_char),
                min: scale(self.text.min),
                max: scale(self.text.max),
                gap: scale(self.text.gap),
            },
        }
    }
}

/// One scheduled reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Position of the element in the scene's element list.
    pub element_index: usize,
    pub element: Element,
    /// Wait between the previous reveal and this one, in ms.
    pub wait: u64,
    /// Offset from playback start, in ms: the running sum of waits.
    pub scheduled_at: u64,
    /// Display duration, in ms.
    pub duration: u64,
}

impl TimelineEntry {
    pub fn wait_duration(&self) -> Duration {
        Duration::from_millis(self.wait)
    }
}

/// Build the entries for a scene.
///
/// Pause elements produce no entry; their durations add up into the wait of
/// the next element. After each entry the accumulated wait restarts from that
/// element's gap rather than from zero. A text line opening with an inline
/// pause is held back by that pause on top of its wait.
pub fn build_timeline(elements: &[Element], timing: &TimingConfig) -> Vec<TimelineEntry> {
    let mut entries = Vec::new();
    let mut accumulated = 0u64;
    let mut offset = 0u64;

    for (index, element) in elements.iter().enumerate() {
        if let Element::Pause { duration } = element {
            accumulated = accumulated.saturating_add(*duration);
            continue;
        }

        let wait = accumulated.saturating_add(element.leading_pause());
        offset = offset.saturating_add(wait);
        entries.push(TimelineEntry {
            element_index: index,
            element: element.clone(),
            wait,
            scheduled_at: offset,
            duration: timing.duration_for(element),
        });
        accumulated = timing.gap_after(element);
    }

    entries
}
