/// Triangles over a face's point storage
use std::cmp::Ordering;

use crate::point::{Point, Rgb};

/// A triangle stored as three indices into its face's points.
///
/// Holding indices instead of copies means every transform applied to the
/// face is seen by its polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Polygon {
    indices: [usize; 3],
}

impl Polygon {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> [usize; 3] {
        self.indices
    }

    /// Resolve the vertices. Panics if an index is outside `points`, which
    /// the mesh rules out for polygons built by a face.
    pub fn vertices<'a>(&self, points: &'a [Point]) -> [&'a Point; 3] {
        self.indices.map(|i| &points[i])
    }

    pub fn triangle<'a>(&self, points: &'a [Point]) -> Triangle<'a> {
        Triangle::new(self.vertices(points))
    }
}

/// A borrowed view of three vertices.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    vertices: [&'a Point; 3],
}

impl<'a> Triangle<'a> {
    pub fn new(vertices: [&'a Point; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertex(&self, index: usize) -> &'a Point {
        self.vertices[index]
    }

    pub fn vertices(&self) -> [&'a Point; 3] {
        self.vertices
    }

    /// Average location and color. Color channels are averaged with integer
    /// division, summed wide so unclamped synthesis colors cannot overflow.
    pub fn mean(&self) -> Point {
        let n = self.vertices.len();
        let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
        let (mut r, mut g, mut b) = (0i64, 0i64, 0i64);
        for v in self.vertices {
            x += v.x();
            y += v.y();
            z += v.z();
            let c = v.color();
            r += i64::from(c.r);
            g += i64::from(c.g);
            b += i64::from(c.b);
        }
        let n_f = n as f64;
        let n_i = n as i64;
        // the mean of i32 values is itself within i32
        Point::new(
            x / n_f,
            y / n_f,
            z / n_f,
            Rgb::from_raw((r / n_i) as i32, (g / n_i) as i32, (b / n_i) as i32),
        )
    }

    /// Painter's order: the triangle whose mean lies farther along +z comes first.
    pub fn depth_cmp(&self, other: &Triangle) -> Ordering {
        other.mean().z().total_cmp(&self.mean().z())
    }
}
