//! Tempo Animation Engine
//!
//! Eased value transitions, timeline orchestration, and a handle-based
//! scheduler driven by a host-owned frame tick.
//!
//! # Features
//!
//! - **Easing**: The standard Penner curve family, resolvable by name
//! - **Transitions**: Typed start-to-end animations over any [`Interpolate`] value
//! - **Timelines**: Sequential or parallel composition with stagger, nestable
//! - **Scheduler**: Generational handles, per-target bulk cancellation,
//!   lazy idle signaling so the host can stop its timer
//! - **Deterministic**: Every time-sensitive operation has an explicit
//!   `*_at(Instant)` form
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tempo_animation::{Easing, Scheduler, Transition};
//!
//! let mut scheduler = Scheduler::new();
//! let fade = Transition::new(0.0_f32, 1.0, Duration::from_millis(300))
//!     .unwrap()
//!     .with_easing(Easing::CubicOut)
//!     .on_progress(|alpha| {
//!         let _ = alpha; // push to caller-owned state
//!     });
//! let handle = scheduler.schedule(fade);
//!
//! // Host frame loop: tick until the scheduler reports idle.
//! while scheduler.tick() {
//!     # break;
//! }
//! # let _ = handle;
//! ```

pub mod easing;
pub mod error;
pub mod scheduler;
pub mod timeline;
pub mod transition;
pub mod values;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use scheduler::{Handle, Scheduler, TargetId};
pub use timeline::{Timeline, TimelineMode};
pub use transition::{Animate, Interpolator, PlayState, Transition};
pub use values::Interpolate;

// Re-export the value types transitions commonly animate.
pub use tempo_core::{Color, Point, Rect, Size};
