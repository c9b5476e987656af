/// Homogeneous 3D points carrying an RGB color
use std::hash::{Hash, Hasher};

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::{MorphError, Result};
use crate::transform::Transform;

/// An RGB color.
///
/// Channels built through [`Rgb::new`] are clamped into `0..=255`. Blending
/// and shading may produce channels below zero (see [`Rgb::from_raw`]); they
/// only get saturated into bytes when presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const GRAY: Rgb = Rgb { r: 128, g: 128, b: 128 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    /// Create a color, clamping every channel into the byte range.
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Create a color without clamping.
    pub fn from_raw(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [i32; 3] {
        [self.r, self.g, self.b]
    }

    /// Saturate into displayable bytes.
    pub fn to_bytes(self) -> [u8; 3] {
        [
            clamp_channel(self.r) as u8,
            clamp_channel(self.g) as u8,
            clamp_channel(self.b) as u8,
        ]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::from_raw(c[0] as i32, c[1] as i32, c[2] as i32)
    }
}

fn clamp_channel(value: i32) -> i32 {
    value.clamp(0, 255)
}

/// A point `(x, y, z, w)` in homogeneous coordinates with a color.
///
/// The cartesian accessors divide by `w`. Every constructor and transform
/// keeps `w != 0`, so the accessors never divide by zero.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    coords: Vector4<f64>,
    color: Rgb,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64, color: Rgb) -> Self {
        Self {
            coords: Vector4::new(x, y, z, 1.0),
            color,
        }
    }

    /// A gray point, for positions and directions where color is irrelevant.
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, Rgb::GRAY)
    }

    /// Wrap a raw homogeneous vector. Rejects `w == 0`.
    pub fn from_homogeneous(coords: Vector4<f64>, color: Rgb) -> Result<Self> {
        if coords.w == 0.0 || !coords.w.is_finite() {
            return Err(MorphError::DegenerateVector("homogeneous w must be non-zero"));
        }
        Ok(Self { coords, color })
    }

    pub fn x(&self) -> f64 {
        self.coords.x / self.coords.w
    }

    pub fn y(&self) -> f64 {
        self.coords.y / self.coords.w
    }

    pub fn z(&self) -> f64 {
        self.coords.z / self.coords.w
    }

    pub fn w(&self) -> f64 {
        self.coords.w
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x(), self.y(), self.z())
    }

    pub fn homogeneous(&self) -> &Vector4<f64> {
        &self.coords
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Coordinate difference `a - b`. The color difference is clamped at both ends.
    pub fn subtract(a: &Point, b: &Point) -> Point {
        let color = Rgb::new(
            a.color.r.saturating_sub(b.color.r),
            a.color.g.saturating_sub(b.color.g),
            a.color.b.saturating_sub(b.color.b),
        );
        Point::new(a.x() - b.x(), a.y() - b.y(), a.z() - b.z(), color)
    }

    /// Cross product `a × b`, keeping `a`'s color.
    pub fn cross(a: &Point, b: &Point) -> Point {
        let n = a.position().cross(&b.position());
        Point::new(n.x, n.y, n.z, a.color)
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn negate(&self) -> Point {
        Point::new(-self.x(), -self.y(), -self.z(), self.color)
    }

    /// Scale the coordinates about the origin.
    pub fn scale(&mut self, scalar: f64) {
        self.coords = Transform::scale_matrix(scalar) * self.coords;
    }

    /// Move by `delta`'s cartesian coordinates.
    pub fn translate(&mut self, delta: &Point) {
        let m = Transform::translation_matrix(delta.x(), delta.y(), delta.z());
        self.coords = m * self.coords;
    }

    /// Apply an arbitrary homogeneous transform. The point is left untouched
    /// if the result would have `w == 0`.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) -> Result<()> {
        let coords = matrix * self.coords;
        if coords.w == 0.0 {
            return Err(MorphError::DegenerateVector("transform produced w == 0"));
        }
        self.coords = coords;
        Ok(())
    }

    /// Turn this point into a unit direction by folding its length into `w`.
    ///
    /// Only meaningful for directions: the stored vector keeps its `x, y, z`
    /// and the accessors report the normalized values.
    pub fn normalize(&mut self) -> Result<()> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(MorphError::DegenerateVector("cannot normalize a zero-length vector"));
        }
        self.coords.w *= length;
        Ok(())
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
            && self
                .coords
                .iter()
                .zip(other.coords.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.coords.iter() {
            c.to_bits().hash(state);
        }
        self.color.hash(state);
    }
}
