//! Value transitions
//!
//! A [`Transition`] animates a single value from a start to an end over a
//! fixed duration, shaped by an easing curve and reported to caller-supplied
//! progress callbacks. Transitions never own a timer; they are driven by the
//! [`Scheduler`] (or an enclosing [`Timeline`]) calling [`Animate::tick_at`].
//!
//! Every time-sensitive operation has an `*_at(now: Instant)` form taking an
//! explicit timestamp. The scheduler reads the clock once per tick and passes
//! the same instant to every unit; tests use synthetic instants to drive
//! animations deterministically.
//!
//! [`Scheduler`]: crate::scheduler::Scheduler
//! [`Timeline`]: crate::timeline::Timeline

use std::time::{Duration, Instant};

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::values::Interpolate;

/// Lifecycle state of a transition or timeline
///
/// `Completed` and `Cancelled` are terminal: no operation reactivates a unit
/// once it reaches either.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    /// Created but not started
    #[default]
    Idle,
    /// Actively advancing
    Running,
    /// Frozen mid-flight; elapsed time excludes the paused span
    Paused,
    /// Ran to the end of its duration
    Completed,
    /// Explicitly cancelled before completing
    Cancelled,
}

impl PlayState {
    /// Whether this is a final state
    pub fn is_terminal(self) -> bool {
        matches!(self, PlayState::Completed | PlayState::Cancelled)
    }

    /// Whether the unit has started and not yet reached a terminal state
    pub fn is_active(self) -> bool {
        matches!(self, PlayState::Running | PlayState::Paused)
    }
}

/// Object-safe seam between the scheduler and the units it drives
///
/// Implemented by [`Transition`] (for any `Interpolate` value type) and by
/// [`Timeline`], which lets timelines nest freely.
///
/// [`Timeline`]: crate::timeline::Timeline
pub trait Animate {
    /// Begin running. No-op unless currently [`PlayState::Idle`].
    fn start_at(&mut self, now: Instant);

    /// Freeze progress. No-op unless currently [`PlayState::Running`].
    fn pause_at(&mut self, now: Instant);

    /// Continue from a pause. No-op unless currently [`PlayState::Paused`].
    fn resume_at(&mut self, now: Instant);

    /// Move to [`PlayState::Cancelled`] from any non-terminal state.
    /// Idempotent; the cancellation callback fires on the call that actually
    /// cancels.
    fn cancel_at(&mut self, now: Instant);

    /// Advance one frame: report progress and detect completion.
    fn tick_at(&mut self, now: Instant);

    /// Normalized progress in `[0, 1]` at the given instant
    fn progress_at(&self, now: Instant) -> f32;

    /// Current lifecycle state
    fn state(&self) -> PlayState;

    /// Nominal duration of this unit
    fn duration(&self) -> Duration;
}

/// Interpolation function: `(start, end, eased progress) -> value`
pub type Interpolator<T> = Box<dyn Fn(&T, &T, f32) -> T>;

/// A single eased value transition
///
/// ```
/// use std::time::Duration;
/// use tempo_animation::{Easing, Transition};
///
/// let fade = Transition::new(0.0_f32, 1.0, Duration::from_millis(300))
///     .unwrap()
///     .with_easing(Easing::CubicOut)
///     .on_progress(|alpha| {
///         // push *alpha to caller-owned state
///         let _ = alpha;
///     });
/// ```
pub struct Transition<T: Interpolate> {
    start_value: T,
    end_value: T,
    duration: Duration,
    easing: Easing,
    interpolator: Interpolator<T>,
    progress_callbacks: Vec<Box<dyn FnMut(&T)>>,
    completion_callback: Option<Box<dyn FnMut()>>,
    cancellation_callback: Option<Box<dyn FnMut()>>,

    state: PlayState,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
    /// Progress frozen at the instant of cancellation
    cancelled_progress: f32,
}

impl<T: Interpolate> Transition<T> {
    /// Create a transition from `start_value` to `end_value` over `duration`
    ///
    /// A zero duration is a caller programming error and is rejected here
    /// rather than producing degenerate progress arithmetic later.
    pub fn new(start_value: T, end_value: T, duration: Duration) -> Result<Self> {
        if duration.is_zero() {
            return Err(AnimationError::InvalidDuration(duration));
        }
        Ok(Self {
            start_value,
            end_value,
            duration,
            easing: Easing::Linear,
            interpolator: Box::new(|a: &T, b: &T, t: f32| a.lerp(b, t)),
            progress_callbacks: Vec::new(),
            completion_callback: None,
            cancellation_callback: None,
            state: PlayState::Idle,
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
            cancelled_progress: 0.0,
        })
    }

    // ========== Configuration (builder style) ==========

    /// Set the easing curve (default: linear)
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Substitute a custom interpolation function
    ///
    /// Called with `(start, end, eased_progress)` to compute the current
    /// value. The default is the type's [`Interpolate::lerp`].
    pub fn with_interpolator<F>(mut self, interpolator: F) -> Self
    where
        F: Fn(&T, &T, f32) -> T + 'static,
    {
        self.interpolator = Box::new(interpolator);
        self
    }

    /// Register a callback invoked with the current value on every tick
    ///
    /// Multiple progress callbacks may be registered; they fire in
    /// registration order.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        self.progress_callbacks.push(Box::new(callback));
        self
    }

    /// Register a callback invoked exactly once when the transition completes
    pub fn on_completion<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.completion_callback = Some(Box::new(callback));
        self
    }

    /// Register a callback invoked exactly once if the transition is cancelled
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

    /// Normalized progress at the current wall-clock instant
    pub fn progress(&self) -> f32 {
        self.progress_at(Instant::now())
    }

    /// Interpolated value at the given instant
    pub fn current_value_at(&self, now: Instant) -> T {
        let eased = self.easing.apply(self.progress_at(now));
        (self.interpolator)(&self.start_value, &self.end_value, eased)
    }

    /// Interpolated value at the current wall-clock instant
    pub fn current_value(&self) -> T {
        self.current_value_at(Instant::now())
    }

    /// Effective elapsed time (excludes paused spans), clamped to `[0, duration]`
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.state {
            PlayState::Idle => Duration::ZERO,
            PlayState::Completed => self.duration,
            PlayState::Cancelled => self.duration.mul_f32(self.cancelled_progress),
            PlayState::Running | PlayState::Paused => {
                let reference = match (self.state, self.paused_at) {
                    (PlayState::Paused, Some(paused_at)) => paused_at,
                    _ => now,
                };
                let started_at = match self.started_at {
                    Some(t) => t,
                    None => return Duration::ZERO,
                };
                reference
                    .saturating_duration_since(started_at)
                    .saturating_sub(self.paused_total)
                    .min(self.duration)
            }
        }
    }

    /// Time remaining until completion at the given instant
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed_at(now))
    }

    /// Whether the transition is running (not paused, not terminal)
    pub fn is_running(&self) -> bool {
        self.state == PlayState::Running
    }

    pub fn start_value(&self) -> &T {
        &self.start_value
    }

    pub fn end_value(&self) -> &T {
        &self.end_value
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    fn fire_progress(&mut self, value: &T) {
        for callback in &mut self.progress_callbacks {
            callback(value);
        }
    }
}

impl<T: Interpolate> Animate for Transition<T> {
    fn start_at(&mut self, now: Instant) {
        if self.state != PlayState::Idle {
            return;
        }
        self.state = PlayState::Running;
        self.started_at = Some(now);
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
    }

    fn pause_at(&mut self, now: Instant) {
        if self.state != PlayState::Running {
            return;
        }
        self.state = PlayState::Paused;
        self.paused_at = Some(now);
    }

    fn resume_at(&mut self, now: Instant) {
        if self.state != PlayState::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
        self.state = PlayState::Running;
    }

    fn cancel_at(&mut self, now: Instant) {
        if self.state.is_terminal() {
            return;
        }
        self.cancelled_progress = self.progress_at(now);
        self.state = PlayState::Cancelled;
        if let Some(callback) = &mut self.cancellation_callback {
            callback();
        }
    }

    fn tick_at(&mut self, now: Instant) {
        if self.state != PlayState::Running {
            return;
        }

        if self.progress_at(now) >= 1.0 {
            // Terminal frame: progress callbacks observe the exact end value
            // before completion fires.
            self.state = PlayState::Completed;
            let end = self.end_value.clone();
            self.fire_progress(&end);
            if let Some(callback) = &mut self.completion_callback {
                callback();
            }
        } else {
            let value = self.current_value_at(now);
            self.fire_progress(&value);
        }
    }

    fn progress_at(&self, now: Instant) -> f32 {
        match self.state {
            PlayState::Idle => 0.0,
            PlayState::Completed => 1.0,
            PlayState::Cancelled => self.cancelled_progress,
            PlayState::Running | PlayState::Paused => {
                let elapsed = self.elapsed_at(now);
                (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    fn state(&self) -> PlayState {
        self.state
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}
