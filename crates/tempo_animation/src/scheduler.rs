//! Animation scheduler
//!
//! The [`Scheduler`] owns every scheduled animation unit and drives them from
//! a single host-provided tick. It hands out generational [`Handle`]s, so a
//! handle held after its entry is gone is simply stale: every operation on a
//! stale handle is a defined no-op, never a panic and never a hit on a
//! recycled slot.
//!
//! The scheduler never owns a timer or a thread. The host calls [`tick`] once
//! per frame; the return value says whether any entries remain, so the host
//! can stop its timer when the registry drains and restart it on the next
//! [`schedule`].
//!
//! [`tick`]: Scheduler::tick
//! [`schedule`]: Scheduler::schedule

use std::time::Instant;

use slotmap::{new_key_type, Key, SlotMap};

use crate::transition::{Animate, PlayState};

new_key_type! {
    /// Generational handle to a scheduled animation entry
    pub struct Handle;
}

impl Handle {
    /// The invalid handle; returned by [`Scheduler::schedule`] when the
    /// scheduler is disabled. Operations on it are no-ops.
    pub fn invalid() -> Self {
        Handle::null()
    }

    /// Whether this handle could refer to an entry
    ///
    /// A valid handle may still be stale; this only rules out
    /// [`Handle::invalid`].
    pub fn is_valid(self) -> bool {
        !self.is_null()
    }

    /// Convert to a raw u64 for storage outside the crate
    ///
    /// Use with [`Handle::from_raw`] for passing handles through host
    /// boundaries that only carry integers.
    pub fn to_raw(self) -> u64 {
        self.0.as_ffi()
    }

    /// Reconstruct from a raw u64 produced by [`Handle::to_raw`]
    pub fn from_raw(raw: u64) -> Self {
        Handle::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Opaque identifier grouping entries by their owner
///
/// Hosts tag entries with the id of the thing being animated (a view, a
/// widget, a document node) so every animation for that owner can be
/// cancelled in one call when the owner goes away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

impl TargetId {
    pub const fn new(raw: u64) -> Self {
        TargetId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

struct ScheduleEntry {
    unit: Box<dyn Animate>,
    target: Option<TargetId>,
    progress_callback: Option<Box<dyn FnMut(f32)>>,
    completion_callback: Option<Box<dyn FnMut()>>,
    cancellation_callback: Option<Box<dyn FnMut()>>,
}

/// Registry and driver for all scheduled animations
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tempo_animation::{Scheduler, Transition};
///
/// let mut scheduler = Scheduler::new();
/// let fade = Transition::new(0.0_f32, 1.0, Duration::from_millis(200)).unwrap();
/// let handle = scheduler.schedule(fade);
///
/// // Host frame loop: keep ticking while anything is active.
/// while scheduler.tick() {
///     # break;
/// }
/// # let _ = handle;
/// ```
pub struct Scheduler {
    entries: SlotMap<Handle, ScheduleEntry>,
    /// Handles in schedule order; callbacks fire in this order each tick
    order: Vec<Handle>,
    enabled: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            enabled: true,
        }
    }

    /// Enable or disable scheduling of new animations
    ///
    /// While disabled, [`schedule`] returns [`Handle::invalid`] and the unit
    /// is dropped. Entries already scheduled keep running; use
    /// [`cancel_all`] to also clear those.
    ///
    /// [`schedule`]: Scheduler::schedule
    /// [`cancel_all`]: Scheduler::cancel_all
    pub fn set_enabled(&mut self, enabled: bool) {
        tracing::debug!("Scheduler: set_enabled({})", enabled);
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cancel everything and drop all entries
    pub fn shutdown(&mut self) {
        self.shutdown_at(Instant::now());
    }

    /// [`shutdown`](Scheduler::shutdown) with an explicit timestamp
    pub fn shutdown_at(&mut self, now: Instant) {
        tracing::debug!("Scheduler: shutting down with {} entries", self.entries.len());
        self.cancel_all_at(now);
        self.entries.clear();
        self.order.clear();
    }

    // ========== Scheduling ==========

    /// Schedule a unit and start it immediately
    ///
    /// Returns [`Handle::invalid`] if the scheduler is disabled.
    pub fn schedule(&mut self, unit: impl Animate + 'static) -> Handle {
        self.schedule_at(unit, Instant::now())
    }

    /// [`schedule`](Scheduler::schedule) with an explicit timestamp
    pub fn schedule_at(&mut self, unit: impl Animate + 'static, now: Instant) -> Handle {
        self.register_at(Box::new(unit), None, now)
    }

    /// Schedule a unit tagged with the target that owns it
    ///
    /// Tagged entries can be cancelled in bulk via
    /// [`cancel_all_for_target`](Scheduler::cancel_all_for_target).
    pub fn schedule_for_target(&mut self, unit: impl Animate + 'static, target: TargetId) -> Handle {
        self.schedule_for_target_at(unit, target, Instant::now())
    }

    /// [`schedule_for_target`](Scheduler::schedule_for_target) with an
    /// explicit timestamp
    pub fn schedule_for_target_at(
        &mut self,
        unit: impl Animate + 'static,
        target: TargetId,
        now: Instant,
    ) -> Handle {
        self.register_at(Box::new(unit), Some(target), now)
    }

    fn register_at(
        &mut self,
        mut unit: Box<dyn Animate>,
        target: Option<TargetId>,
        now: Instant,
    ) -> Handle {
        if !self.enabled {
            tracing::debug!("Scheduler: disabled, dropping scheduled unit");
            return Handle::invalid();
        }
        unit.start_at(now);
        if !unit.state().is_active() {
            // A unit that refuses to start (an empty timeline) would sit in
            // the registry forever and keep the host's timer alive.
            tracing::debug!("Scheduler: unit did not start, refusing schedule");
            return Handle::invalid();
        }
        let handle = self.entries.insert(ScheduleEntry {
            unit,
            target,
            progress_callback: None,
            completion_callback: None,
            cancellation_callback: None,
        });
        self.order.push(handle);
        tracing::debug!(
            "Scheduler: scheduled entry {:?} ({} active)",
            handle,
            self.entries.len()
        );
        handle
    }

    // ========== Per-entry callbacks ==========

    /// Attach a progress callback to an entry; fires each tick with the
    /// entry's normalized progress. No-op on a stale handle.
    pub fn on_progress<F>(&mut self, handle: Handle, callback: F)
    where
        F: FnMut(f32) + 'static,
    {
        if let Some(entry) = self.entries.get_mut(handle) {
            entry.progress_callback = Some(Box::new(callback));
        }
    }

    /// Attach a completion callback to an entry; fires exactly once, on the
    /// tick that observes the unit completing. No-op on a stale handle.
    pub fn on_completion<F>(&mut self, handle: Handle, callback: F)
    where
        F: FnMut() + 'static,
    {
        if let Some(entry) = self.entries.get_mut(handle) {
            entry.completion_callback = Some(Box::new(callback));
        }
    }

    /// Attach a cancellation callback to an entry; fires exactly once if the
    /// entry is cancelled. No-op on a stale handle.
    pub fn on_cancellation<F>(&mut self, handle: Handle, callback: F)
    where
        F: FnMut() + 'static,
    {
        if let Some(entry) = self.entries.get_mut(handle) {
            entry.cancellation_callback = Some(Box::new(callback));
        }
    }

    // ========== Entry control ==========

    /// Cancel a single entry, firing its cancellation callbacks and evicting
    /// it. No-op on a stale handle.
    pub fn cancel(&mut self, handle: Handle) {
        self.cancel_at(handle, Instant::now());
    }

    /// [`cancel`](Scheduler::cancel) with an explicit timestamp
    pub fn cancel_at(&mut self, handle: Handle, now: Instant) {
        let Some(mut entry) = self.entries.remove(handle) else {
            return;
        };
        self.order.retain(|h| *h != handle);
        entry.unit.cancel_at(now);
        if let Some(callback) = &mut entry.cancellation_callback {
            callback();
        }
        tracing::debug!(
            "Scheduler: cancelled entry {:?} ({} active)",
            handle,
            self.entries.len()
        );
    }

    /// Pause a single entry. No-op on a stale handle or a non-running entry.
    pub fn pause(&mut self, handle: Handle) {
        self.pause_at(handle, Instant::now());
    }

    /// [`pause`](Scheduler::pause) with an explicit timestamp
    pub fn pause_at(&mut self, handle: Handle, now: Instant) {
        if let Some(entry) = self.entries.get_mut(handle) {
            entry.unit.pause_at(now);
        }
    }

    /// Resume a single paused entry. No-op on a stale handle or a non-paused
    /// entry.
    pub fn resume(&mut self, handle: Handle) {
        self.resume_at(handle, Instant::now());
    }

    /// [`resume`](Scheduler::resume) with an explicit timestamp
    pub fn resume_at(&mut self, handle: Handle, now: Instant) {
        if let Some(entry) = self.entries.get_mut(handle) {
            entry.unit.resume_at(now);
        }
    }

    // ========== Bulk control ==========

    /// Cancel every entry tagged with the given target
    pub fn cancel_all_for_target(&mut self, target: TargetId) {
        self.cancel_all_for_target_at(target, Instant::now());
    }

    /// [`cancel_all_for_target`](Scheduler::cancel_all_for_target) with an
    /// explicit timestamp
    pub fn cancel_all_for_target_at(&mut self, target: TargetId, now: Instant) {
        let doomed: Vec<Handle> = self
            .entries
            .iter()
            .filter(|(_, e)| e.target == Some(target))
            .map(|(h, _)| h)
            .collect();
        for handle in doomed {
            self.cancel_at(handle, now);
        }
    }

    /// Cancel every entry
    pub fn cancel_all(&mut self) {
        self.cancel_all_at(Instant::now());
    }

    /// [`cancel_all`](Scheduler::cancel_all) with an explicit timestamp
    pub fn cancel_all_at(&mut self, now: Instant) {
        let doomed: Vec<Handle> = self.order.clone();
        for handle in doomed {
            self.cancel_at(handle, now);
        }
    }

    /// Pause every running entry
    pub fn pause_all(&mut self) {
        self.pause_all_at(Instant::now());
    }

    /// [`pause_all`](Scheduler::pause_all) with an explicit timestamp
    pub fn pause_all_at(&mut self, now: Instant) {
        for (_, entry) in self.entries.iter_mut() {
            entry.unit.pause_at(now);
        }
    }

    /// Resume every paused entry
    pub fn resume_all(&mut self) {
        self.resume_all_at(Instant::now());
    }

    /// [`resume_all`](Scheduler::resume_all) with an explicit timestamp
    pub fn resume_all_at(&mut self, now: Instant) {
        for (_, entry) in self.entries.iter_mut() {
            entry.unit.resume_at(now);
        }
    }

    // ========== Queries ==========

    /// Whether the entry exists and is running or paused
    pub fn is_active(&self, handle: Handle) -> bool {
        self.entries
            .get(handle)
            .map(|e| e.unit.state().is_active())
            .unwrap_or(false)
    }

    /// Whether the entry exists and is actively advancing (not paused)
    pub fn is_running(&self, handle: Handle) -> bool {
        self.entries
            .get(handle)
            .map(|e| e.unit.state() == PlayState::Running)
            .unwrap_or(false)
    }

    /// Normalized progress of an entry, or `None` for a stale handle
    pub fn progress(&self, handle: Handle) -> Option<f32> {
        self.progress_at(handle, Instant::now())
    }

    /// [`progress`](Scheduler::progress) with an explicit timestamp
    pub fn progress_at(&self, handle: Handle, now: Instant) -> Option<f32> {
        self.entries.get(handle).map(|e| e.unit.progress_at(now))
    }

    /// Number of live entries
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of live entries tagged with the given target
    pub fn count_for_target(&self, target: TargetId) -> usize {
        self.entries
            .iter()
            .filter(|(_, e)| e.target == Some(target))
            .count()
    }

    /// Whether any live entry is tagged with the given target
    pub fn has_for_target(&self, target: TargetId) -> bool {
        self.entries.iter().any(|(_, e)| e.target == Some(target))
    }

    // ========== Tick ==========

    /// Advance every entry one frame at the current wall-clock instant
    ///
    /// Returns `true` while entries remain; when it returns `false` the host
    /// may stop its frame timer until the next [`schedule`](Scheduler::schedule).
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Scheduler::tick) with an explicit timestamp
    ///
    /// Entries are visited in schedule order against a snapshot of the
    /// registry, so an entry completing mid-tick cannot skew the traversal.
    /// Entries that reach a terminal state are evicted after their final
    /// callbacks fire.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let snapshot: Vec<Handle> = self.order.clone();
        let mut finished: Vec<Handle> = Vec::new();

        for handle in snapshot {
            let Some(entry) = self.entries.get_mut(handle) else {
                continue;
            };
            entry.unit.tick_at(now);

            let progress = entry.unit.progress_at(now);
            if let Some(callback) = &mut entry.progress_callback {
                callback(progress);
            }

            // Terminals found here are newly terminal: cancellation through
            // the scheduler evicts immediately, so it never reaches this
            // point on a later tick.
            match entry.unit.state() {
                PlayState::Completed => {
                    if let Some(callback) = &mut entry.completion_callback {
                        callback();
                    }
                    finished.push(handle);
                }
                PlayState::Cancelled => {
                    if let Some(callback) = &mut entry.cancellation_callback {
                        callback();
                    }
                    finished.push(handle);
                }
                _ => {}
            }
        }

        for handle in finished {
            self.entries.remove(handle);
            self.order.retain(|h| *h != handle);
        }

        if self.entries.is_empty() {
            tracing::debug!("Scheduler: registry empty, going idle");
            false
        } else {
            true
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
