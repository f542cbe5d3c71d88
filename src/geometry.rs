// Coordinate spaces and the stroke bounding box.
// Pointer events arrive in window (display) pixels; everything the editor tracks
// lives in source-image pixels. The conversion is recomputed for every event.

/// A point in either space; which one is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen size of the drawing surface, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One pointer sample: where it is on screen and how big the screen surface is *right now*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub display: DisplaySize,
}

impl PointerEvent {
    pub const fn new(position: Point, display: DisplaySize) -> Self {
        Self { position, display }
    }
}

/// Image pixels per display pixel on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageScale {
    pub x: f64,
    pub y: f64,
}

/// `internal / displayed` per axis. `None` while the surface has no on-screen area
/// (minimized window), since no sensible mapping exists then.
pub fn scale_factors(display: DisplaySize, internal: (u32, u32)) -> Option<ImageScale> {
    if !(display.width > 0.0 && display.height > 0.0) {
        return None;
    }
    Some(ImageScale {
        x: f64::from(internal.0) / display.width,
        y: f64::from(internal.1) / display.height,
    })
}

/// Map a display-space pointer position into source-image pixels.
/// Results outside `[0,W]×[0,H]` are returned as-is; callers clamp when they need to.
pub fn to_image_space(pointer: Point, display: DisplaySize, internal: (u32, u32)) -> Option<Point> {
    let scale = scale_factors(display, internal)?;
    Some(Point::new(pointer.x * scale.x, pointer.y * scale.y))
}

/// Axis-aligned box around everything painted since the last reset, in image pixels.
/// Invariant: `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl StrokeBounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    /// Box of a circular dab: `center ± radius` on both axes.
    pub fn from_circle(center: Point, radius: f64) -> Self {
        let r = radius.abs();
        Self {
            min_x: center.x - r,
            min_y: center.y - r,
            max_x: center.x + r,
            max_y: center.y + r,
        }
    }

    pub fn union(self, other: StrokeBounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow to cover `other` (never shrinks).
    pub fn include(&mut self, other: StrokeBounds) {
        *self = self.union(other);
    }

    /// Restrict to `[0,W]×[0,H]`. A box lying wholly outside collapses onto the nearest edge.
    pub fn clamped(self, width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        Self {
            min_x: self.min_x.clamp(0.0, w),
            min_y: self.min_y.clamp(0.0, h),
            max_x: self.max_x.clamp(0.0, w),
            max_y: self.max_y.clamp(0.0, h),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_space_uses_internal_over_display_ratio() {
        let p = to_image_space(Point::new(50.0, 25.0), DisplaySize::new(500.0, 250.0), (1000, 500));
        assert_eq!(p, Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn image_space_allows_points_outside_the_surface() {
        let p = to_image_space(Point::new(-10.0, 600.0), DisplaySize::new(500.0, 500.0), (1000, 1000))
            .unwrap();
        assert_eq!(p, Point::new(-20.0, 1200.0));
    }

    #[test]
    fn zero_display_area_has_no_mapping() {
        assert!(to_image_space(Point::new(1.0, 1.0), DisplaySize::new(0.0, 300.0), (10, 10)).is_none());
        assert!(scale_factors(DisplaySize::new(300.0, 0.0), (10, 10)).is_none());
    }

    #[test]
    fn circle_bounds_are_center_plus_minus_radius() {
        let b = StrokeBounds::from_circle(Point::new(100.0, 100.0), 20.0);
        assert_eq!(b, StrokeBounds::new(80.0, 80.0, 120.0, 120.0));
        assert_eq!(b.area(), 1600.0);
        assert_eq!(b.center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn union_never_shrinks() {
        let mut b = StrokeBounds::from_circle(Point::new(50.0, 50.0), 10.0);
        b.include(StrokeBounds::from_circle(Point::new(750.0, 750.0), 10.0));
        assert_eq!(b, StrokeBounds::new(40.0, 40.0, 760.0, 760.0));
        b.include(StrokeBounds::from_circle(Point::new(400.0, 400.0), 1.0));
        assert_eq!(b, StrokeBounds::new(40.0, 40.0, 760.0, 760.0));
    }

    #[test]
    fn clamp_keeps_min_le_max() {
        let b = StrokeBounds::new(-30.0, -5.0, 40.0, 1200.0).clamped(100, 1000);
        assert_eq!(b, StrokeBounds::new(0.0, 0.0, 40.0, 1000.0));

        let outside = StrokeBounds::new(-50.0, -50.0, -10.0, -20.0).clamped(100, 100);
        assert_eq!(outside.area(), 0.0);
        assert!(outside.min_x <= outside.max_x && outside.min_y <= outside.max_y);
    }
}
