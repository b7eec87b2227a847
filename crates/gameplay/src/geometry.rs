//! 2D geometry in field coordinates (meters).
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Point (or vector) in the field plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn mag(self) -> f32 {
        self.magsq().sqrt()
    }

    pub fn magsq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn dist_to(self, other: Point) -> f32 {
        (self - other).mag()
    }

    /// Same direction scaled to `magnitude`; the zero vector stays zero.
    pub fn normalized(self, magnitude: f32) -> Self {
        let m = self.mag();
        if m == 0.0 {
            return Self::ORIGIN;
        }
        self * (magnitude / m)
    }

    /// Same direction with the magnitude capped at `max`.
    pub fn clamped(self, max: f32) -> Self {
        if self.magsq() > max * max {
            self.normalized(max)
        } else {
            self
        }
    }

    /// `true` if `other` lies within `threshold` of this point.
    pub fn near_point(self, other: Point, threshold: f32) -> bool {
        (self - other).magsq() <= threshold * threshold
    }

    /// Angle from the +x axis, in radians.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn rotated(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.y * cos + self.x * sin)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, s: f32) -> Point {
        Point::new(self.x * s, self.y * s)
    }
}

impl Mul<Point> for f32 {
    type Output = Point;
    fn mul(self, pt: Point) -> Point {
        pt * self
    }
}

impl Div<f32> for Point {
    type Output = Point;
    fn div(self, s: f32) -> Point {
        Point::new(self.x / s, self.y / s)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_nearness() {
        let a = Point::new(0.0, 1.5);
        let b = Point::new(2.0, 1.5);
        assert_eq!(a.dist_to(b), 2.0);
        assert!(a.near_point(b, 2.0));
        assert!(!a.near_point(b, 1.99));
    }

    #[test]
    fn normalized_and_clamped() {
        let v = Point::new(3.0, 4.0);
        assert!(v.normalized(1.0).near_point(Point::new(0.6, 0.8), 1e-6));
        assert_eq!(v.clamped(10.0), v);
        assert_eq!(v.clamped(2.5), Point::new(1.5, 2.0));
        assert_eq!(Point::ORIGIN.normalized(1.0), Point::ORIGIN);
    }

    #[test]
    fn rotation_quarter_turn() {
        let r = Point::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(r.near_point(Point::new(0.0, 1.0), 1e-6));
        assert!((Point::new(0.0, 3.0).angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn displays_as_pair() {
        assert_eq!(Point::new(-3.0, 0.0).to_string(), "(-3, 0)");
    }
}
