//! Tempo core value types
//!
//! Plain-data geometry and color primitives shared by the animation engine
//! and its hosts. These types carry no behavior beyond construction and a few
//! convenience accessors; all animation semantics live in `tempo_animation`.

pub mod color;
pub mod geometry;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
