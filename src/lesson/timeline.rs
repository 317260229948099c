//! Timed playback of a scene
//!
//! [`entry`] turns a scene's elements into timeline entries: each non-pause
//! element gets the wait that precedes it and a display duration, and pause
//! elements fold into the wait of the element after them.
//! [`sequencer::Sequencer`] replays the entries to a delivery callback with
//! pause, resume, stop and skip-to-end controls.

pub mod entry;
pub mod sequencer;

pub use entry::{build_timeline, Pacing, TextPacing, TimelineEntry, TimingConfig};
pub use sequencer::{PlayOutcome, PlaybackState, Sequencer};
