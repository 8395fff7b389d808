//! Animatable value types
//!
//! The [`Interpolate`] trait is the contract between a [`Transition`] and the
//! values it animates: anything that can be linearly blended can be animated.
//! Type-specific blending (color channels, rect components) lives here;
//! callers can substitute an arbitrary interpolator per transition via
//! [`Transition::with_interpolator`].
//!
//! [`Transition`]: crate::transition::Transition
//! [`Transition::with_interpolator`]: crate::transition::Transition::with_interpolator

use tempo_core::{Color, Point, Rect, Size};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * f64::from(t)
    }
}

impl Interpolate for i32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let blended = *self as f32 + (*other - *self) as f32 * t;
        blended.round() as i32
    }
}

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Interpolate for Size {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Size::new(
            self.width + (other.width - self.width) * t,
            self.height + (other.height - self.height) * t,
        )
    }
}

impl Interpolate for Rect {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rect::from_origin_size(
            self.origin.lerp(&other.origin, t),
            self.size.lerp(&other.size, t),
        )
    }
}

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn int_interpolation_rounds() {
        assert_eq!(0_i32.lerp(&10, 0.55), 6);
        assert_eq!(0_i32.lerp(&100, 1.0), 100);
    }

    #[test]
    fn point_interpolation() {
        let mid = Point::new(0.0, 0.0).lerp(&Point::new(10.0, 20.0), 0.5);
        assert!((mid.x - 5.0).abs() < 1e-6);
        assert!((mid.y - 10.0).abs() < 1e-6);
    }

    #[test]
    fn rect_interpolation_is_componentwise() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 200.0, 0.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, Rect::new(25.0, 25.0, 150.0, 50.0));
    }

    #[test]
    fn color_interpolation() {
        let mid = Color::BLACK.lerp(&Color::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
    }
}
