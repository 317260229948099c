//! `[pause]`, `[pause:short]`, `[pause:long]`, `[pause:<ms>]`

use crate::lesson::ast::Segment;
use crate::lesson::commands::{InlineCommand, TimingHint};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const DEFAULT_PAUSE_MS: u64 = 1500;
pub const SHORT_PAUSE_MS: u64 = 800;
pub const LONG_PAUSE_MS: u64 = 3000;

static PAUSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[pause(?::([A-Za-z0-9_]+))?\]").unwrap());

/// Resolve a pause modifier to milliseconds. Unknown words fall back to the default.
pub fn pause_duration(modifier: Option<&str>) -> u64 {
    match modifier {
        Some("short") => SHORT_PAUSE_MS,
        Some("long") => LONG_PAUSE_MS,
        Some(m) if !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()) => {
            m.parse().unwrap_or(DEFAULT_PAUSE_MS)
        }
        _ => DEFAULT_PAUSE_MS,
    }
}

pub struct PauseCommand;

impl InlineCommand for PauseCommand {
    fn name(&self) -> &str {
        "pause"
    }

    fn pattern(&self) -> &Regex {
        &PAUSE_PATTERN
    }

    fn parse(&self, captures: &Captures<'_>) -> Segment {
        Segment::Pause {
            duration: pause_duration(captures.get(1).map(|m| m.as_str())),
        }
    }

    // No render hint: a pause only affects timing.

    fn default_timing(&self) -> TimingHint {
        TimingHint {
            delay: Some(DEFAULT_PAUSE_MS),
            ..TimingHint::default()
        }
    }

    fn timing_hint(&self, segment: &Segment) -> TimingHint {
        match segment {
            Segment::Pause { duration } => TimingHint {
                delay: Some(*duration),
                ..TimingHint::default()
            },
            _ => self.default_timing(),
        }
    }
}
