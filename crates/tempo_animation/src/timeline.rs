//! Timeline orchestration
//!
//! A [`Timeline`] composes multiple animation units (transitions or nested
//! timelines) and runs them in [`Sequential`] or [`Parallel`] mode with an
//! optional stagger offset between child starts.
//!
//! Stagger semantics:
//! - **Parallel**: child *i* begins once `stagger * i` of timeline time has
//!   elapsed, so children cascade while overlapping.
//! - **Sequential**: the stagger is a gap inserted after a child reaches a
//!   terminal state and before the next child starts. If a child is cancelled
//!   early the next child still starts `stagger` after the cancellation. The
//!   gap is anchored at the tick that observes the predecessor finishing, so
//!   with sparse ticks the realized total can run up to one tick long per
//!   child boundary.
//!
//! Total duration is `max(child) + stagger * (n - 1)` for parallel timelines
//! and `sum(children) + stagger * (n - 1)` for sequential ones.
//!
//! [`Sequential`]: TimelineMode::Sequential
//! [`Parallel`]: TimelineMode::Parallel

use std::time::{Duration, Instant};

use crate::transition::{Animate, PlayState};

/// Timing mode for a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineMode {
    /// Each child starts after the previous one reaches a terminal state
    Sequential,
    /// All children run simultaneously, offset by the stagger
    Parallel,
}

struct TimelineChild {
    unit: Box<dyn Animate>,
    /// Nominal duration used for total-duration accounting
    duration: Duration,
    started: bool,
}

impl TimelineChild {
    /// Started and no longer advancing: terminal, or a unit that refused to
    /// start (an empty nested timeline stays Idle)
    fn is_done(&self) -> bool {
        self.started && !self.unit.state().is_active()
    }
}

/// An ordered composition of animation units
///
/// ```
/// use std::time::Duration;
/// use tempo_animation::{Timeline, Transition};
///
/// let intro = Timeline::parallel()
///     .add(
///         Transition::new(0.0_f32, 1.0, Duration::from_millis(300)).unwrap(),
///         Duration::ZERO,
///     )
///     .add(
///         Transition::new(0.8_f32, 1.0, Duration::from_millis(200)).unwrap(),
///         Duration::ZERO,
///     )
///     .with_stagger(Duration::from_millis(50));
/// ```
pub struct Timeline {
    mode: TimelineMode,
    children: Vec<TimelineChild>,
    stagger: Duration,

    state: PlayState,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
    /// Index of the child currently running (sequential mode)
    current: usize,
    /// Deadline before the next sequential child may start
    gap_until: Option<Instant>,
    cancelled_progress: f32,

    progress_callback: Option<Box<dyn FnMut(f32)>>,
    completion_callback: Option<Box<dyn FnMut()>>,
    cancellation_callback: Option<Box<dyn FnMut()>>,
}

impl Timeline {
    fn new(mode: TimelineMode) -> Self {
        Self {
            mode,
            children: Vec::new(),
            stagger: Duration::ZERO,
            state: PlayState::Idle,
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
            current: 0,
            gap_until: None,
            cancelled_progress: 0.0,
            progress_callback: None,
            completion_callback: None,
            cancellation_callback: None,
        }
    }

    /// Create a timeline whose children play one after another
    pub fn sequential() -> Self {
        Self::new(TimelineMode::Sequential)
    }

    /// Create a timeline whose children play simultaneously
    pub fn parallel() -> Self {
        Self::new(TimelineMode::Parallel)
    }

    // ========== Configuration (builder style) ==========

    /// Add a child unit with a nominal duration
    ///
    /// Passing `Duration::ZERO` uses the unit's own reported duration, which
    /// is almost always what you want; the explicit form exists for units
    /// whose nominal length differs from their playback length.
    pub fn add(mut self, unit: impl Animate + 'static, duration: Duration) -> Self {
        let duration = if duration.is_zero() {
            unit.duration()
        } else {
            duration
        };
        self.children.push(TimelineChild {
            unit: Box::new(unit),
            duration,
            started: false,
        });
        self
    }

    /// Set the stagger offset between successive child starts
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Register a callback invoked with aggregate progress on every tick
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32) + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Register a callback invoked once when every child has terminated
    pub fn on_completion<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.completion_callback = Some(Box::new(callback));
        self
    }

    /// Register a callback invoked once if the timeline is cancelled
    pub fn on_cancellation<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.cancellation_callback = Some(Box::new(callback));
        self
    }

    // ========== Control (wall-clock convenience wrappers) ==========

    /// Start now; see [`Animate::start_at`]
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Pause now; see [`Animate::pause_at`]
    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    /// Resume now; see [`Animate::resume_at`]
    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    /// Cancel now; see [`Animate::cancel_at`]
    pub fn cancel(&mut self) {
        self.cancel_at(Instant::now());
    }

    // ========== State queries ==========

    /// Nominal duration covering all children and stagger gaps
    pub fn total_duration(&self) -> Duration {
        let n = self.children.len();
        if n == 0 {
            return Duration::ZERO;
        }
        let gaps = self.stagger * (n as u32 - 1);
        match self.mode {
            TimelineMode::Parallel => {
                let longest = self
                    .children
                    .iter()
                    .map(|c| c.duration)
                    .max()
                    .unwrap_or(Duration::ZERO);
                longest + gaps
            }
            TimelineMode::Sequential => {
                self.children.iter().map(|c| c.duration).sum::<Duration>() + gaps
            }
        }
    }

    /// Whether every child has reached a terminal state
    pub fn is_complete(&self) -> bool {
        self.state == PlayState::Completed
    }

    /// Aggregate progress at the current wall-clock instant
    pub fn progress(&self) -> f32 {
        self.progress_at(Instant::now())
    }

    pub fn mode(&self) -> TimelineMode {
        self.mode
    }

    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn effective_elapsed(&self, now: Instant) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let reference = match (self.state, self.paused_at) {
            (PlayState::Paused, Some(paused_at)) => paused_at,
            _ => now,
        };
        reference
            .saturating_duration_since(started_at)
            .saturating_sub(self.paused_total)
    }

    /// Start any children whose scheduled start has been reached
    fn advance_starts(&mut self, now: Instant) {
        match self.mode {
            TimelineMode::Parallel => {
                let eff = self.effective_elapsed(now);
                let stagger = self.stagger;
                for (i, child) in self.children.iter_mut().enumerate() {
                    if child.started {
                        continue;
                    }
                    let offset = stagger * i as u32;
                    if eff >= offset {
                        // Anchor the child at its exact scheduled instant so
                        // its own clock is not skewed by tick granularity.
                        child.unit.start_at(now - (eff - offset));
                        child.started = true;
                    }
                }
            }
            TimelineMode::Sequential => {
                if self.current >= self.children.len() || self.children[self.current].started {
                    return;
                }
                match self.gap_until {
                    None => {
                        // First child starts at the timeline's own start.
                        if self.current == 0 {
                            if let Some(started_at) = self.started_at {
                                self.children[0].unit.start_at(started_at);
                                self.children[0].started = true;
                            }
                        }
                    }
                    Some(deadline) if now >= deadline => {
                        self.children[self.current].unit.start_at(deadline);
                        self.children[self.current].started = true;
                        self.gap_until = None;
                    }
                    Some(_) => {}
                }
            }
        }
    }

    /// Skip past finished children and start the next once its gap elapses
    ///
    /// Loops so that a chain of children that finish (or refuse to start)
    /// immediately is crossed within a single call.
    fn advance_sequence(&mut self, now: Instant) {
        loop {
            while self.current < self.children.len() && self.children[self.current].is_done() {
                self.current += 1;
                if self.current < self.children.len() {
                    // Anchored at the tick that observed the previous child
                    // finishing; sparse ticks stretch the realized total by
                    // up to one tick per boundary.
                    self.gap_until = Some(now + self.stagger);
                }
            }
            let next = self.current;
            self.advance_starts(now);
            if next >= self.children.len() || !self.children[next].is_done() {
                break;
            }
        }
    }
}

impl Animate for Timeline {
    fn start_at(&mut self, now: Instant) {
        // An empty timeline has nothing to complete; starting it is a no-op
        // by design so that completion can never fire.
        if self.state != PlayState::Idle || self.children.is_empty() {
            return;
        }
        self.state = PlayState::Running;
        self.started_at = Some(now);
        self.current = 0;
        self.gap_until = None;
        self.advance_starts(now);
        if self.mode == TimelineMode::Sequential {
            self.advance_sequence(now);
        }
    }

    fn pause_at(&mut self, now: Instant) {
        if self.state != PlayState::Running {
            return;
        }
        self.state = PlayState::Paused;
        self.paused_at = Some(now);
        for child in &mut self.children {
            if child.started {
                child.unit.pause_at(now);
            }
        }
    }

    fn resume_at(&mut self, now: Instant) {
        if self.state != PlayState::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            let span = now.saturating_duration_since(paused_at);
            self.paused_total += span;
            // A pending inter-child gap shifts with the pause.
            if let Some(deadline) = self.gap_until {
                self.gap_until = Some(deadline + span);
            }
        }
        self.state = PlayState::Running;
        for child in &mut self.children {
            if child.started {
                child.unit.resume_at(now);
            }
        }
    }

    fn cancel_at(&mut self, now: Instant) {
        if self.state.is_terminal() {
            return;
        }
        self.cancelled_progress = self.progress_at(now);
        self.state = PlayState::Cancelled;
        for child in &mut self.children {
            if !child.unit.state().is_terminal() {
                child.unit.cancel_at(now);
            }
        }
        if let Some(callback) = &mut self.cancellation_callback {
            callback();
        }
    }

    fn tick_at(&mut self, now: Instant) {
        if self.state != PlayState::Running {
            return;
        }

        self.advance_starts(now);

        for child in &mut self.children {
            if child.started && !child.unit.state().is_terminal() {
                child.unit.tick_at(now);
            }
        }

        if self.mode == TimelineMode::Sequential {
            // A zero stagger lets the next child begin on the same tick.
            self.advance_sequence(now);
        }

        let all_done = self.children.iter().all(|c| c.is_done());

        if all_done {
            self.state = PlayState::Completed;
            if let Some(callback) = &mut self.progress_callback {
                callback(1.0);
            }
            if let Some(callback) = &mut self.completion_callback {
                callback();
            }
        } else {
            let progress = self.progress_at(now);
            if let Some(callback) = &mut self.progress_callback {
                callback(progress);
            }
        }
    }

    fn progress_at(&self, now: Instant) -> f32 {
        match self.state {
            PlayState::Idle => 0.0,
            PlayState::Completed => 1.0,
            PlayState::Cancelled => self.cancelled_progress,
            PlayState::Running | PlayState::Paused => {
                let total = self.total_duration();
                if total.is_zero() {
                    return 0.0;
                }
                (self.effective_elapsed(now).as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    fn state(&self) -> PlayState {
        self.state
    }

    fn duration(&self) -> Duration {
        self.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Transition;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn transition(duration_ms: u64) -> Transition<f32> {
        Transition::new(0.0, 1.0, ms(duration_ms)).unwrap()
    }

    #[test]
    fn parallel_total_duration() {
        let timeline = Timeline::parallel()
            .add(transition(100), Duration::ZERO)
            .add(transition(200), Duration::ZERO)
            .add(transition(300), Duration::ZERO);
        assert_eq!(timeline.total_duration(), ms(300));

        let staggered = Timeline::parallel()
            .add(transition(100), Duration::ZERO)
            .add(transition(200), Duration::ZERO)
            .add(transition(300), Duration::ZERO)
            .with_stagger(ms(50));
        assert_eq!(staggered.total_duration(), ms(400));
    }

    #[test]
    fn sequential_total_duration() {
        let timeline = Timeline::sequential()
            .add(transition(100), Duration::ZERO)
            .add(transition(200), Duration::ZERO)
            .add(transition(300), Duration::ZERO)
            .with_stagger(ms(50));
        assert_eq!(timeline.total_duration(), ms(700));
    }

    #[test]
    fn parallel_completes_at_longest_child() {
        let t0 = Instant::now();
        let completions = Rc::new(Cell::new(0));
        let done = Rc::clone(&completions);

        let mut timeline = Timeline::parallel()
            .add(transition(100), Duration::ZERO)
            .add(transition(200), Duration::ZERO)
            .add(transition(300), Duration::ZERO)
            .on_completion(move || done.set(done.get() + 1));
        timeline.start_at(t0);

        timeline.tick_at(t0 + ms(100));
        timeline.tick_at(t0 + ms(200));
        timeline.tick_at(t0 + ms(299));
        assert!(!timeline.is_complete());
        assert_eq!(completions.get(), 0);

        timeline.tick_at(t0 + ms(300));
        assert!(timeline.is_complete());
        assert_eq!(completions.get(), 1);

        // Further ticks never re-fire completion.
        timeline.tick_at(t0 + ms(400));
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn sequential_completes_at_sum_of_children() {
        let t0 = Instant::now();
        let completions = Rc::new(Cell::new(0));
        let done = Rc::clone(&completions);

        let mut timeline = Timeline::sequential()
            .add(transition(100), Duration::ZERO)
            .add(transition(200), Duration::ZERO)
            .add(transition(300), Duration::ZERO)
            .on_completion(move || done.set(done.get() + 1));
        timeline.start_at(t0);

        timeline.tick_at(t0 + ms(100));
        timeline.tick_at(t0 + ms(300));
        timeline.tick_at(t0 + ms(599));
        assert!(!timeline.is_complete());

        timeline.tick_at(t0 + ms(600));
        assert!(timeline.is_complete());
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn parallel_stagger_offsets_child_starts() {
        let t0 = Instant::now();
        let second_values = Rc::new(Cell::new(0.0_f32));
        let sink = Rc::clone(&second_values);

        let mut timeline = Timeline::parallel()
            .add(transition(100), Duration::ZERO)
            .add(
                Transition::new(0.0_f32, 1.0, ms(100))
                    .unwrap()
                    .on_progress(move |v| sink.set(*v)),
                Duration::ZERO,
            )
            .with_stagger(ms(50));
        timeline.start_at(t0);

        // Before the second child's offset it has produced no value.
        timeline.tick_at(t0 + ms(40));
        assert_eq!(second_values.get(), 0.0);

        // At 100ms the second child has run 50ms of its 100ms span.
        timeline.tick_at(t0 + ms(100));
        assert!((second_values.get() - 0.5).abs() < 1e-3);

        timeline.tick_at(t0 + ms(150));
        assert!(timeline.is_complete());
    }

    #[test]
    fn sequential_stagger_delays_next_start() {
        let t0 = Instant::now();
        let second_values = Rc::new(Cell::new(-1.0_f32));
        let sink = Rc::clone(&second_values);

        let mut timeline = Timeline::sequential()
            .add(transition(100), Duration::ZERO)
            .add(
                Transition::new(0.0_f32, 1.0, ms(100))
                    .unwrap()
                    .on_progress(move |v| sink.set(*v)),
                Duration::ZERO,
            )
            .with_stagger(ms(50));
        timeline.start_at(t0);

        // First child finishes at 100; the gap holds the second until 150.
        timeline.tick_at(t0 + ms(100));
        timeline.tick_at(t0 + ms(140));
        assert_eq!(second_values.get(), -1.0);

        // Second child anchored at 150, so at 200 it is halfway.
        timeline.tick_at(t0 + ms(200));
        assert!((second_values.get() - 0.5).abs() < 1e-3);

        timeline.tick_at(t0 + ms(250));
        assert!(timeline.is_complete());
    }

    #[test]
    fn empty_timeline_start_is_a_noop() {
        let t0 = Instant::now();
        let completions = Rc::new(Cell::new(0));
        let done = Rc::clone(&completions);

        let mut timeline = Timeline::sequential().on_completion(move || done.set(done.get() + 1));
        timeline.start_at(t0);
        assert_eq!(timeline.state(), PlayState::Idle);

        timeline.tick_at(t0 + ms(1000));
        assert_eq!(completions.get(), 0);
        assert!(!timeline.is_complete());
    }

    #[test]
    fn empty_nested_timeline_does_not_block_completion() {
        let t0 = Instant::now();
        let completions = Rc::new(Cell::new(0));
        let done = Rc::clone(&completions);

        let mut outer = Timeline::sequential()
            .add(Timeline::parallel(), Duration::ZERO)
            .add(transition(100), Duration::ZERO)
            .on_completion(move || done.set(done.get() + 1));
        outer.start_at(t0);

        // The empty child refuses to start and is skipped at start, so the
        // transition runs from t0 and the sequence still completes.
        outer.tick_at(t0 + ms(100));
        assert!(outer.is_complete());
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn cancel_cancels_children_and_fires_once() {
        let t0 = Instant::now();
        let child_cancels = Rc::new(Cell::new(0));
        let own_cancels = Rc::new(Cell::new(0));
        let completions = Rc::new(Cell::new(0));

        let c1 = Rc::clone(&child_cancels);
        let c2 = Rc::clone(&child_cancels);
        let own = Rc::clone(&own_cancels);
        let done = Rc::clone(&completions);

        let mut timeline = Timeline::parallel()
            .add(
                Transition::new(0.0_f32, 1.0, ms(200))
                    .unwrap()
                    .on_cancellation(move || c1.set(c1.get() + 1)),
                Duration::ZERO,
            )
            .add(
                Transition::new(0.0_f32, 1.0, ms(200))
                    .unwrap()
                    .on_cancellation(move || c2.set(c2.get() + 1)),
                Duration::ZERO,
            )
            .on_cancellation(move || own.set(own.get() + 1))
            .on_completion(move || done.set(done.get() + 1));
        timeline.start_at(t0);
        timeline.tick_at(t0 + ms(50));

        timeline.cancel_at(t0 + ms(100));
        timeline.cancel_at(t0 + ms(150));

        assert_eq!(timeline.state(), PlayState::Cancelled);
        assert_eq!(child_cancels.get(), 2);
        assert_eq!(own_cancels.get(), 1);
        assert_eq!(completions.get(), 0);
    }

    #[test]
    fn pause_freezes_aggregate_progress() {
        let t0 = Instant::now();
        let mut timeline = Timeline::parallel()
            .add(transition(200), Duration::ZERO)
            .add(transition(400), Duration::ZERO);
        timeline.start_at(t0);

        timeline.pause_at(t0 + ms(100));
        let frozen = timeline.progress_at(t0 + ms(2000));
        assert!((frozen - 0.25).abs() < 1e-3);

        timeline.resume_at(t0 + ms(500));
        // 100ms after resume: 200ms effective out of 400ms total.
        let p = timeline.progress_at(t0 + ms(600));
        assert!((p - 0.5).abs() < 1e-3);

        timeline.tick_at(t0 + ms(800));
        assert!(timeline.is_complete());
    }

    #[test]
    fn nested_timelines_compose() {
        let t0 = Instant::now();
        let completions = Rc::new(Cell::new(0));
        let done = Rc::clone(&completions);

        let inner = Timeline::parallel()
            .add(transition(100), Duration::ZERO)
            .add(transition(150), Duration::ZERO);
        assert_eq!(inner.total_duration(), ms(150));

        let mut outer = Timeline::sequential()
            .add(inner, Duration::ZERO)
            .add(transition(100), Duration::ZERO)
            .on_completion(move || done.set(done.get() + 1));
        assert_eq!(outer.total_duration(), ms(250));

        outer.start_at(t0);
        outer.tick_at(t0 + ms(150));
        assert!(!outer.is_complete());
        outer.tick_at(t0 + ms(250));
        assert!(outer.is_complete());
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn progress_reaches_one_exactly_on_completion() {
        let t0 = Instant::now();
        let last_progress = Rc::new(Cell::new(0.0_f32));
        let sink = Rc::clone(&last_progress);

        let mut timeline = Timeline::parallel()
            .add(transition(100), Duration::ZERO)
            .on_progress(move |p| sink.set(p));
        timeline.start_at(t0);

        timeline.tick_at(t0 + ms(60));
        assert!((last_progress.get() - 0.6).abs() < 1e-3);

        timeline.tick_at(t0 + ms(100));
        assert_eq!(last_progress.get(), 1.0);
    }
}
