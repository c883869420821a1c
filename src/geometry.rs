//! Shared geometric primitives: the normalized [0,1]×[0,1] space overlay
//! elements are stored in, and its conversions to viewport pixel space.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Absolute bounding box of an element within the viewport, as reported by a
/// pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    pub const fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }
}

/// Top-left anchor of an element as fractions of the viewport dimensions.
/// Not clamped to [0,1]; elements may sit partially off-screen, but the
/// coordinates must stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Element extents as fractions of the viewport dimensions. Both components
/// must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormSize {
    pub w: f64,
    pub h: f64,
}

impl NormSize {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Current pixel dimensions of the viewport the overlay renders over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A viewport that has not been laid out yet reports zero extents.
    /// Conversions through an empty viewport would divide by zero, so callers
    /// translating gestures check this first and no-op.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0) || !(self.height > 0.0)
    }

    pub fn to_normalized(&self, point: PixelPoint) -> NormPoint {
        NormPoint::new(point.x / self.width, point.y / self.height)
    }

    pub fn to_pixels(&self, point: NormPoint) -> PixelPoint {
        PixelPoint::new(point.x * self.width, point.y * self.height)
    }

    pub fn size_to_normalized(&self, size: PixelSize) -> NormSize {
        NormSize::new(size.width / self.width, size.height / self.height)
    }

    pub fn size_to_pixels(&self, size: NormSize) -> PixelSize {
        PixelSize::new(size.w * self.width, size.h * self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1.0e-9;

    #[test]
    fn point_round_trip_is_exact_within_tolerance() {
        let viewport = ViewportSize::new(1920.0, 1080.0);
        for point in [
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(1919.0, 1079.0),
            PixelPoint::new(960.5, 540.25),
            PixelPoint::new(-42.0, 13.37),
            PixelPoint::new(2500.0, -90.0),
        ] {
            let back = viewport.to_pixels(viewport.to_normalized(point));
            assert!((back.x - point.x).abs() < TOLERANCE, "{point:?} x drifted");
            assert!((back.y - point.y).abs() < TOLERANCE, "{point:?} y drifted");
        }
    }

    #[test]
    fn size_round_trip_is_exact_within_tolerance() {
        let viewport = ViewportSize::new(1280.0, 720.0);
        for size in [
            PixelSize::new(1.0, 1.0),
            PixelSize::new(640.0, 360.0),
            PixelSize::new(1280.0, 720.0),
            PixelSize::new(0.5, 1333.7),
        ] {
            let back = viewport.size_to_pixels(viewport.size_to_normalized(size));
            assert!((back.width - size.width).abs() < TOLERANCE);
            assert!((back.height - size.height).abs() < TOLERANCE);
        }
    }

    #[test]
    fn normalization_is_independent_of_viewport_scale() {
        let small = ViewportSize::new(640.0, 360.0);
        let large = ViewportSize::new(2560.0, 1440.0);
        let norm = small.to_normalized(PixelPoint::new(64.0, 180.0));
        let scaled = large.to_pixels(norm);
        assert!((scaled.x - 256.0).abs() < TOLERANCE);
        assert!((scaled.y - 720.0).abs() < TOLERANCE);
    }

    #[test]
    fn unlaid_out_viewport_is_empty() {
        assert!(ViewportSize::new(0.0, 0.0).is_empty());
        assert!(ViewportSize::new(0.0, 480.0).is_empty());
        assert!(ViewportSize::new(640.0, 0.0).is_empty());
        assert!(ViewportSize::new(-1.0, 480.0).is_empty());
        assert!(ViewportSize::new(f64::NAN, 480.0).is_empty());
        assert!(!ViewportSize::new(640.0, 480.0).is_empty());
    }

    #[test]
    fn norm_point_finiteness_tracks_components() {
        assert!(NormPoint::new(0.25, 0.75).is_finite());
        assert!(!NormPoint::new(f64::NAN, 0.5).is_finite());
        assert!(!NormPoint::new(0.5, f64::INFINITY).is_finite());
    }
}
