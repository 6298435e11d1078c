//! Frame-driven playback of a compiled choreography
//!
//! [`Choreography`] owns the nodes and the [`Schedule`] and is driven from the
//! outside, once per frame, with [`tick`](Choreography::tick) or
//! [`frame`](Choreography::frame). Each frame walks the schedule in declaration
//! order, writes the values of every active entry, commits each touched node
//! once and then runs step callbacks.
//!
//! ```text
//!              play()              elapsed >= total
//! Compiled ───────────► Playing ─────────────────► Completed
//!                        │  ▲                          │
//!               pause()  │  │ resume() / play()        │ play()
//!                        ▼  │                          ▼
//!                       Paused                   (restart at 0)
//!
//! cancel() from Playing or Paused ─► Cancelled (last values stay)
//! ```

use crate::compile::{Schedule, ScheduleEntry};
use crate::error::PlaybackError;
use crate::node::{Morphable, NodeId, NodeRegistry};
use crate::step::{Action, StepHooks};
use indexmap::IndexSet;

/// Playback lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Built, nothing written yet
    Compiled,
    Playing,
    Paused,
    /// Every entry reached its end
    Completed,
    /// Stopped by [`Choreography::cancel`] or a failed commit
    Cancelled,
}

/// Position of a frame on the timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameTick {
    /// Fraction of the total duration, clamped to `[0, 1]`
    Fraction(f32),
    /// Absolute elapsed time in milliseconds
    ElapsedMs(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryState {
    Pending,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, Default)]
struct StepProgress {
    started: bool,
    done: bool,
}

/// A compiled, playable choreography
pub struct Choreography {
    registry: NodeRegistry,
    schedule: Schedule,
    hooks: Vec<StepHooks>,
    progress: Vec<StepProgress>,
    entry_states: Vec<EntryState>,
    dirty: IndexSet<NodeId>,
    state: PlaybackState,
    elapsed_ms: f32,
    on_complete: Option<Action>,
    completion_fired: bool,
}

impl Choreography {
    pub(crate) fn new(registry: NodeRegistry, schedule: Schedule, hooks: Vec<StepHooks>) -> Self {
        let entry_states = vec![EntryState::Pending; schedule.entries().len()];
        let progress = vec![StepProgress::default(); hooks.len()];
        Self {
            registry,
            schedule,
            hooks,
            progress,
            entry_states,
            dirty: IndexSet::new(),
            state: PlaybackState::Compiled,
            elapsed_ms: 0.0,
            on_complete: None,
            completion_fired: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn total_duration_ms(&self) -> f32 {
        self.schedule.total_duration_ms()
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> f32 {
        (self.total_duration_ms() - self.elapsed_ms).max(0.0)
    }

    /// Elapsed fraction of the total duration
    pub fn progress(&self) -> f32 {
        let total = self.total_duration_ms();
        if total <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / total).min(1.0)
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn Morphable> {
        self.registry.get(id)
    }

    /// Mutable access to a node, e.g. to relayout it between runs
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut (dyn Morphable + 'static)> {
        self.registry.get_mut(id)
    }

    /// Hand the nodes back
    pub fn into_registry(self) -> NodeRegistry {
        self.registry
    }

    /// Called once when playback completes
    pub fn on_complete<F: FnMut() + 'static>(&mut self, action: F) {
        self.on_complete = Some(Box::new(action));
    }

    // ========================================================================
    // Control
    // ========================================================================

    /// Start, resume, or restart from the beginning once finished
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                Ok(())
            }
            PlaybackState::Compiled => {
                tracing::debug!(
                    total_duration_ms = self.total_duration_ms(),
                    "choreography started"
                );
                self.state = PlaybackState::Playing;
                self.render()
            }
            PlaybackState::Completed | PlaybackState::Cancelled => {
                self.reset()?;
                tracing::debug!("choreography restarted");
                self.state = PlaybackState::Playing;
                self.render()
            }
        }
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        self.require(PlaybackState::Playing)?;
        self.state = PlaybackState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        self.require(PlaybackState::Paused)?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Stop where it is. Returns false if the choreography was not running.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                tracing::debug!(elapsed_ms = self.elapsed_ms, "choreography cancelled");
                self.state = PlaybackState::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Restore the starting values of every entry that has run and return to
    /// [`PlaybackState::Compiled`]
    pub fn reset(&mut self) -> Result<(), PlaybackError> {
        self.restore_after(-1.0);
        self.elapsed_ms = 0.0;
        self.progress.iter_mut().for_each(|p| *p = StepProgress::default());
        self.hooks.iter_mut().for_each(StepHooks::rearm);
        self.completion_fired = false;
        self.state = PlaybackState::Compiled;
        self.commit()
    }

    /// Advance by `delta_ms` and render
    pub fn tick(&mut self, delta_ms: f32) -> Result<PlaybackState, PlaybackError> {
        self.require(PlaybackState::Playing)?;
        self.elapsed_ms += delta_ms.max(0.0);
        self.render()?;
        Ok(self.state)
    }

    /// Render the frame at `tick`
    pub fn frame(&mut self, tick: FrameTick) -> Result<PlaybackState, PlaybackError> {
        self.require(PlaybackState::Playing)?;
        let target = match tick {
            FrameTick::Fraction(fraction) => fraction.clamp(0.0, 1.0) * self.total_duration_ms(),
            FrameTick::ElapsedMs(ms) => ms.max(0.0),
        };
        self.move_to(target)?;
        Ok(self.state)
    }

    /// Jump to `fraction` of the total duration while playing or paused
    pub fn seek(&mut self, fraction: f32) -> Result<(), PlaybackError> {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return Err(PlaybackError::NotPlaying { state: self.state });
        }
        let target = fraction.clamp(0.0, 1.0) * self.total_duration_ms();
        self.move_to(target)
    }

    fn require(&self, state: PlaybackState) -> Result<(), PlaybackError> {
        if self.state == state {
            Ok(())
        } else {
            Err(PlaybackError::NotPlaying { state: self.state })
        }
    }

    fn move_to(&mut self, target_ms: f32) -> Result<(), PlaybackError> {
        if target_ms < self.elapsed_ms {
            self.restore_after(target_ms);
            self.rewind_hooks(target_ms);
        }
        self.elapsed_ms = target_ms;
        self.render()
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Write starting values back, last entry first, for entries that start
    /// after `time_ms` and have already run
    fn restore_after(&mut self, time_ms: f32) {
        let entries = self.schedule.entries();
        for (index, entry) in entries.iter().enumerate().rev() {
            let state = &mut self.entry_states[index];
            if *state == EntryState::Pending {
                continue;
            }
            if entry.start_ms > time_ms {
                if let Some(node) = self.registry.get_mut(entry.node) {
                    entry.values.apply(node, 0.0);
                }
                self.dirty.insert(entry.node);
                *state = EntryState::Pending;
            } else if entry.end_ms > time_ms {
                *state = EntryState::Running;
            }
        }
    }

    fn rewind_hooks(&mut self, time_ms: f32) {
        for (window, (hooks, progress)) in self
            .schedule
            .steps()
            .iter()
            .zip(self.hooks.iter_mut().zip(self.progress.iter_mut()))
        {
            if window.start_ms > time_ms {
                *progress = StepProgress::default();
            } else if window.end_ms() > time_ms {
                progress.done = false;
            }
            let fraction = step_fraction(time_ms, window.start_ms, window.duration_ms);
            for trigger in &mut hooks.triggers {
                if trigger.fraction > fraction {
                    trigger.fired = false;
                }
            }
        }
        if time_ms < self.total_duration_ms() {
            self.completion_fired = false;
        }
    }

    fn render(&mut self) -> Result<(), PlaybackError> {
        let elapsed = self.elapsed_ms;

        for (index, entry) in self.schedule.entries().iter().enumerate() {
            let state = &mut self.entry_states[index];
            if *state == EntryState::Finished || elapsed < entry.start_ms {
                continue;
            }
            let Some(node) = self.registry.get_mut(entry.node) else {
                continue;
            };
            render_entry(entry, state, node, elapsed);
            self.dirty.insert(entry.node);
        }

        self.commit()?;
        self.run_hooks(elapsed);

        if self.state == PlaybackState::Playing && elapsed >= self.total_duration_ms() {
            self.state = PlaybackState::Completed;
            tracing::debug!(elapsed_ms = elapsed, "choreography completed");
            if !self.completion_fired {
                self.completion_fired = true;
                if let Some(action) = self.on_complete.as_mut() {
                    action();
                }
            }
        }
        Ok(())
    }

    /// Commit every touched node once. A failure cancels playback.
    fn commit(&mut self) -> Result<(), PlaybackError> {
        for id in self.dirty.drain(..) {
            let Some(node) = self.registry.get_mut(id) else {
                continue;
            };
            if let Err(err) = node.commit_frame() {
                tracing::warn!(node = ?id, %err, "frame commit failed, cancelling");
                self.state = PlaybackState::Cancelled;
                return Err(PlaybackError::Node {
                    node: id,
                    message: err.message,
                });
            }
        }
        Ok(())
    }

    fn run_hooks(&mut self, elapsed: f32) {
        for (window, (hooks, progress)) in self
            .schedule
            .steps()
            .iter()
            .zip(self.hooks.iter_mut().zip(self.progress.iter_mut()))
        {
            if elapsed < window.start_ms || progress.done {
                continue;
            }
            let fraction = step_fraction(elapsed, window.start_ms, window.duration_ms);

            if !progress.started {
                progress.started = true;
                if let Some(action) = hooks.on_start.as_mut() {
                    action();
                }
            }
            if let Some(action) = hooks.on_progress.as_mut() {
                action(fraction);
            }
            for trigger in &mut hooks.triggers {
                if !trigger.fired && fraction >= trigger.fraction {
                    trigger.fired = true;
                    (trigger.action)();
                }
            }
            if elapsed >= window.end_ms() {
                progress.done = true;
                if let Some(action) = hooks.when_done.as_mut() {
                    action();
                }
            }
        }
    }
}

impl std::fmt::Debug for Choreography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Choreography")
            .field("state", &self.state)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("total_duration_ms", &self.total_duration_ms())
            .field("entries", &self.schedule.entries().len())
            .finish()
    }
}

fn step_fraction(elapsed: f32, start_ms: f32, duration_ms: f32) -> f32 {
    if duration_ms <= 0.0 {
        1.0
    } else {
        ((elapsed - start_ms) / duration_ms).clamp(0.0, 1.0)
    }
}

fn render_entry(
    entry: &ScheduleEntry,
    state: &mut EntryState,
    node: &mut dyn Morphable,
    elapsed: f32,
) {
    if *state == EntryState::Pending {
        if let Some(visible) = entry.visible_on_start {
            node.set_visible(visible);
        }
        *state = EntryState::Running;
    }

    let fraction = step_fraction(elapsed, entry.start_ms, entry.duration_ms());
    if let Some(pivot) = entry.pivot {
        node.set_pivot_x(pivot.x);
        node.set_pivot_y(pivot.y);
    }
    entry.values.apply(node, fraction);

    if elapsed >= entry.end_ms {
        *state = EntryState::Finished;
        if let Some(visible) = entry.visible_on_end {
            node.set_visible(visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Choreographer;
    use crate::node::NodeState;
    use morph_core::Bounds;
    use std::cell::Cell;
    use std::rc::Rc;

    fn single(duration: u32) -> (Choreography, NodeId) {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let choreography = choreographer
            .animate(&[node])
            .alpha_to(0.0)
            .with_curve(morph_animation::Curve::Linear)
            .with_duration(duration)
            .build()
            .unwrap();
        (choreography, node)
    }

    #[test]
    fn test_tick_requires_playing() {
        let (mut choreography, _) = single(100);
        assert_eq!(
            choreography.tick(16.0),
            Err(PlaybackError::NotPlaying {
                state: PlaybackState::Compiled
            })
        );
    }

    #[test]
    fn test_linear_progress() {
        let (mut choreography, node) = single(100);
        choreography.play().unwrap();
        choreography.tick(25.0).unwrap();

        assert_eq!(choreography.node(node).unwrap().alpha(), 0.75);
        assert_eq!(choreography.remaining_ms(), 75.0);

        assert_eq!(choreography.tick(100.0), Ok(PlaybackState::Completed));
        assert_eq!(choreography.node(node).unwrap().alpha(), 0.0);
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut choreography, _) = single(100);
        choreography.play().unwrap();
        choreography.pause().unwrap();
        assert!(choreography.tick(10.0).is_err());
        assert!(choreography.pause().is_err());

        choreography.resume().unwrap();
        assert_eq!(choreography.tick(10.0), Ok(PlaybackState::Playing));
    }

    #[test]
    fn test_seek_backwards_restores() {
        let (mut choreography, node) = single(100);
        choreography.play().unwrap();
        choreography.tick(80.0).unwrap();
        choreography.seek(0.5).unwrap();

        assert_eq!(choreography.node(node).unwrap().alpha(), 0.5);
        assert_eq!(choreography.elapsed_ms(), 50.0);
    }

    #[test]
    fn test_frame_by_fraction() {
        let (mut choreography, node) = single(200);
        choreography.play().unwrap();
        choreography.frame(FrameTick::Fraction(0.25)).unwrap();
        assert_eq!(choreography.node(node).unwrap().alpha(), 0.75);

        choreography.frame(FrameTick::ElapsedMs(150.0)).unwrap();
        assert_eq!(choreography.node(node).unwrap().alpha(), 0.25);
    }

    #[test]
    fn test_reset_restores_start() {
        let (mut choreography, node) = single(100);
        choreography.play().unwrap();
        choreography.tick(100.0).unwrap();
        assert_eq!(choreography.state(), PlaybackState::Completed);

        choreography.reset().unwrap();
        assert_eq!(choreography.state(), PlaybackState::Compiled);
        assert_eq!(choreography.node(node).unwrap().alpha(), 1.0);
    }

    #[test]
    fn test_replay_fires_completion_again() {
        let (mut choreography, _) = single(50);
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        choreography.on_complete(move || counter.set(counter.get() + 1));

        choreography.play().unwrap();
        choreography.tick(60.0).unwrap();
        choreography.tick(10.0).unwrap_err();
        assert_eq!(count.get(), 1);

        choreography.play().unwrap();
        choreography.tick(60.0).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_zero_length_completes_on_play() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut choreography = choreographer
            .animate(&[node])
            .alpha_to(0.0)
            .with_duration(0)
            .build()
            .unwrap();

        choreography.play().unwrap();
        assert_eq!(choreography.state(), PlaybackState::Completed);
        assert_eq!(choreography.node(node).unwrap().alpha(), 0.0);
    }
}
