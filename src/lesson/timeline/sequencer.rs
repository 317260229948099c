//! Cancellable playback of a timeline
//!
//! The sequencer is shared by reference between the task running
//! [`Sequencer::play`] and whoever drives the controls. All control state
//! lives in one `watch` channel holding the playback state and a generation
//! number:
//!
//! - every `play()` bumps the generation and remembers its own; a loop whose
//!   generation is no longer current has been superseded and exits quietly,
//!   so an old loop can never act on a newer one's behalf;
//! - the wait before each entry races a timer against control changes, so a
//!   stop ends the wait at once;
//! - while paused, the loop parks on the channel until resumed or stopped.
//!   Pausing does not interrupt a wait already in progress; it takes effect
//!   before the next entry.
//!
//! Delivery order is always timeline order. The callback runs on the playing
//! task and must not panic.

use super::entry::{build_timeline, TimelineEntry, TimingConfig};
use crate::lesson::ast::Element;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Completed,
    Stopped,
}

/// How a call to [`Sequencer::play`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Every remaining entry was delivered.
    Completed,
    /// [`Sequencer::stop`] was called.
    Stopped,
    /// A newer `play`, a scene load, a reset or a skip took over.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Control {
    generation: u64,
    state: PlaybackState,
}

pub struct Sequencer {
    timing: TimingConfig,
    timeline: RwLock<Arc<[TimelineEntry]>>,
    cursor: AtomicUsize,
    control: watch::Sender<Control>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::with_timing(TimingConfig::default())
    }

    pub fn with_timing(timing: TimingConfig) -> Self {
        let (control, _) = watch::channel(Control {
            generation: 0,
            state: PlaybackState::Idle,
        });
        Self {
            timing,
            timeline: RwLock::new(Arc::from(Vec::new())),
            cursor: AtomicUsize::new(0),
            control,
        }
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Rebuild the timeline from a scene's elements and rewind to `Idle`.
    ///
    /// Any playback still running for the previous scene is superseded.
    pub fn load_scene(&self, elements: &[Element]) {
        let entries: Arc<[TimelineEntry]> = build_timeline(elements, &self.timing).into();
        tracing::debug!(entries = entries.len(), "scene loaded");
        *self
            .timeline
            .write()
            .unwrap_or_else(PoisonError::into_inner) = entries;
        self.supersede(PlaybackState::Idle, 0);
    }

    /// The current timeline.
    pub fn timeline(&self) -> Arc<[TimelineEntry]> {
        Arc::clone(&self.timeline.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn state(&self) -> PlaybackState {
        self.control.borrow().state
    }

    /// Number of entries delivered so far.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Deliver the remaining entries, waiting out each entry's delay first.
    ///
    /// Starts from the current cursor, so a stopped playback can be picked up
    /// again by calling `play` once more.
    pub async fn play<F>(&self, mut on_element_show: F) -> PlayOutcome
    where
        F: FnMut(usize, &Element),
    {
        let mut changes = self.control.subscribe();
        let generation = self.begin();
        let timeline = self.timeline();
        tracing::debug!(generation, from = self.cursor(), "playback started");

        loop {
            let index = self.cursor();
            let Some(entry) = timeline.get(index) else {
                break;
            };

            if let Err(outcome) = Self::hold_while_paused(&mut changes, generation).await {
                return self.finish(outcome);
            }

            if entry.wait > 0 {
                tokio::select! {
                    _ = tokio::time::sleep(entry.wait_duration()) => {}
                    outcome = Self::cancelled(&mut changes, generation) => {
                        return self.finish(outcome);
                    }
                }
            }

            // A stop can land in the same tick the timer fired.
            if let Some(outcome) = self.interrupted(generation) {
                return self.finish(outcome);
            }

            on_element_show(entry.element_index, &entry.element);
            // The callback may itself reset, skip or load a scene.
            if !self.advance(generation, index + 1) {
                return self.finish(PlayOutcome::Superseded);
            }
        }

        let completed = self.control.send_if_modified(|control| {
            if control.generation == generation && control.state != PlaybackState::Stopped {
                control.state = PlaybackState::Completed;
                true
            } else {
                false
            }
        });
        if completed {
            tracing::debug!(generation, "playback completed");
            PlayOutcome::Completed
        } else {
            self.finish(self.interrupted(generation).unwrap_or(PlayOutcome::Superseded))
        }
    }

    /// Hold delivery before the next entry.
    pub fn pause(&self) {
        self.control.send_if_modified(|control| {
            if control.state == PlaybackState::Playing {
                control.state = PlaybackState::Paused;
                true
            } else {
                false
            }
        });
    }

    pub fn resume(&self) {
        self.control.send_if_modified(|control| {
            if control.state == PlaybackState::Paused {
                control.state = PlaybackState::Playing;
                true
            } else {
                false
            }
        });
    }

    /// Cancel the in-flight wait, if any, and enter `Stopped`. Safe in any state.
    pub fn stop(&self) {
        self.control.send_modify(|control| control.state = PlaybackState::Stopped);
    }

    /// Stop playback, then deliver every entry in order.
    ///
    /// Entries delivered before the skip are delivered again; consumers must
    /// treat delivery as idempotent, for example by collecting visible indices
    /// into a set.
    pub fn skip_to_end<F>(&self, mut on_element_show: F)
    where
        F: FnMut(usize, &Element),
    {
        let timeline = self.timeline();
        self.supersede(PlaybackState::Stopped, timeline.len());
        for entry in timeline.iter() {
            on_element_show(entry.element_index, &entry.element);
        }
        self.control
            .send_modify(|control| control.state = PlaybackState::Completed);
    }

    /// Fraction of entries delivered, in `[0, 1]`. An empty timeline counts as done.
    pub fn progress(&self) -> f64 {
        let total = self.timeline().len();
        if total == 0 {
            return 1.0;
        }
        self.cursor().min(total) as f64 / total as f64
    }

    /// Stop playback and rewind to the first entry.
    pub fn reset(&self) {
        self.supersede(PlaybackState::Idle, 0);
    }

    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.control.send_modify(|control| {
            control.generation += 1;
            control.state = PlaybackState::Playing;
            generation = control.generation;
        });
        generation
    }

    /// End every running generation and move the cursor in the same step.
    ///
    /// The cursor is only written while the control channel is locked, so a
    /// loop finishing a delivery cannot overwrite it after it was superseded.
    fn supersede(&self, state: PlaybackState, cursor: usize) {
        self.control.send_modify(|control| {
            control.generation += 1;
            control.state = state;
            self.cursor.store(cursor, Ordering::SeqCst);
        });
    }

    /// Move the cursor past a delivered entry, unless `generation` lost control.
    fn advance(&self, generation: u64, cursor: usize) -> bool {
        let mut current = false;
        self.control.send_if_modified(|control| {
            current = control.generation == generation;
            if current {
                self.cursor.store(cursor, Ordering::SeqCst);
            }
            false
        });
        current
    }

    fn interrupted(&self, generation: u64) -> Option<PlayOutcome> {
        check(*self.control.borrow(), generation)
    }

    fn finish(&self, outcome: PlayOutcome) -> PlayOutcome {
        tracing::debug!(?outcome, at = self.cursor(), "playback ended");
        outcome
    }

    /// Resolves once this generation is stopped or superseded.
    async fn cancelled(changes: &mut watch::Receiver<Control>, generation: u64) -> PlayOutcome {
        loop {
            let control = *changes.borrow_and_update();
            if let Some(outcome) = check(control, generation) {
                return outcome;
            }
            if changes.changed().await.is_err() {
                return PlayOutcome::Stopped;
            }
        }
    }

    async fn hold_while_paused(
        changes: &mut watch::Receiver<Control>,
        generation: u64,
    ) -> Result<(), PlayOutcome> {
        loop {
            let control = *changes.borrow_and_update();
            if let Some(outcome) = check(control, generation) {
                return Err(outcome);
            }
            if control.state != PlaybackState::Paused {
                return Ok(());
            }
            tracing::trace!(generation, "paused");
            if changes.changed().await.is_err() {
                return Err(PlayOutcome::Stopped);
            }
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

fn check(control: Control, generation: u64) -> Option<PlayOutcome> {
    if control.generation != generation {
        Some(PlayOutcome::Superseded)
    } else if control.state == PlaybackState::Stopped {
        Some(PlayOutcome::Stopped)
    } else {
        None
    }
}
