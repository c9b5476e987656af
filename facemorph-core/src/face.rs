/// The face model: points, derived polygons, rigid transforms and synthesis
use std::sync::Arc;

use nalgebra::Matrix4;

use crate::error::{MorphError, Result};
use crate::mesh::Mesh;
use crate::point::{Point, Rgb};
use crate::polygon::{Polygon, Triangle};
use crate::transform::Transform;

/// A face in three dimensional space.
///
/// The polygons are derived once from the shared [`Mesh`] and index into
/// `points`, so they follow every transform applied to the face.
#[derive(Debug, Clone)]
pub struct Face {
    points: Vec<Point>,
    polygons: Vec<Polygon>,
    center: Point,
    mesh: Arc<Mesh>,
}

impl Face {
    /// Build a face over `points`. Fails if the mesh references a vertex
    /// that `points` does not have.
    pub fn new(points: Vec<Point>, mesh: Arc<Mesh>) -> Result<Self> {
        let polygons = mesh.create_triangles(&points)?;
        Ok(Self {
            points,
            polygons,
            center: Point::at(0.0, 0.0, 0.0),
            mesh,
        })
    }

    /// Blend `faces` vertex by vertex: every coordinate and color channel is
    /// the weighted sum of the corresponding ones.
    ///
    /// Weights are used as given; callers normally make them sum to one.
    /// Color channels are capped at 255 but have no lower bound, so negative
    /// weights can push them below zero.
    pub fn synthesise(faces: &[&Face], weights: &[f64]) -> Result<Face> {
        let first = faces.first().ok_or(MorphError::EmptySynthesis)?;
        if faces.len() != weights.len() {
            return Err(MorphError::WeightCountMismatch {
                faces: faces.len(),
                weights: weights.len(),
            });
        }
        let n = first.points.len();
        for (j, face) in faces.iter().enumerate() {
            if face.points.len() != n {
                return Err(MorphError::VertexCountMismatch {
                    face: j,
                    expected: n,
                    found: face.points.len(),
                });
            }
        }

        let mut synthesised = Vec::with_capacity(n);
        for i in 0..n {
            let mut sum = [0.0f64; 6];
            for (face, &w) in faces.iter().zip(weights) {
                let p = &face.points[i];
                let c = p.color();
                let fields = [
                    p.x(),
                    p.y(),
                    p.z(),
                    c.r as f64,
                    c.g as f64,
                    c.b as f64,
                ];
                for (s, f) in sum.iter_mut().zip(fields) {
                    *s += f * w;
                }
            }
            let [x, y, z, r, g, b] = sum;
            let color = Rgb::from_raw(
                r.min(255.0) as i32,
                g.min(255.0) as i32,
                b.min(255.0) as i32,
            );
            synthesised.push(Point::new(x, y, z, color));
        }
        Face::new(synthesised, Arc::clone(&first.mesh))
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Polygons in mesh order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn triangle(&self, polygon: &Polygon) -> Triangle<'_> {
        polygon.triangle(&self.points)
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    /// Scale every point about the origin (not about the center).
    pub fn scale(&mut self, scalar: f64) {
        self.points.iter_mut().for_each(|p| p.scale(scalar));
    }

    /// Translate the face so that its center ends up at `center`.
    pub fn set_center(&mut self, center: Point) {
        let delta = Point::subtract(&center, &self.center);
        self.points.iter_mut().for_each(|p| p.translate(&delta));
        self.center = center;
    }

    /// Apply `transformation` relative to the current center.
    ///
    /// All points are transformed or none are.
    pub fn transform_about_center(&mut self, transformation: &Matrix4<f64>) -> Result<()> {
        let m = Transform::about(&self.center, transformation);
        let mut moved = self.points.clone();
        for p in &mut moved {
            p.transform(&m)?;
        }
        self.points = moved;
        Ok(())
    }

    /// Polygons sorted back to front (farthest mean z first). The face's own
    /// polygon order is left as it is.
    pub fn depth_order(&self) -> Vec<Polygon> {
        let mut order = self.polygons.clone();
        order.sort_by(|a, b| self.triangle(a).depth_cmp(&self.triangle(b)));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mesh() -> Arc<Mesh> {
        Arc::new(Mesh::parse("1,2,3\n1,3,4\n").unwrap())
    }

    fn square(z: [f64; 4], color: Rgb) -> Face {
        let points = vec![
            Point::new(0.0, 0.0, z[0], color),
            Point::new(1.0, 0.0, z[1], color),
            Point::new(1.0, 1.0, z[2], color),
            Point::new(0.0, 1.0, z[3], color),
        ];
        Face::new(points, square_mesh()).unwrap()
    }

    #[test]
    fn test_polygons_follow_mesh() {
        let face = square([0.0; 4], Rgb::GRAY);
        assert_eq!(face.polygons().len(), 2);
        assert_eq!(face.polygons()[1].indices(), [0, 2, 3]);
    }

    #[test]
    fn test_too_few_points_is_an_error() {
        let points = vec![Point::at(0.0, 0.0, 0.0); 3];
        assert!(Face::new(points, square_mesh()).is_err());
    }

    #[test]
    fn test_polygons_see_transforms() {
        let mut face = square([0.0; 4], Rgb::GRAY);
        face.scale(2.0);
        let t = face.triangle(&face.polygons()[0]);
        assert!((t.vertex(2).x() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_set_center_accumulates() {
        let mut face = square([0.0; 4], Rgb::GRAY);
        face.set_center(Point::at(10.0, 5.0, 0.0));
        face.set_center(Point::at(12.0, 5.0, 1.0));
        assert!((face.points()[1].x() - 13.0).abs() < 1e-12);
        assert!((face.points()[1].z() - 1.0).abs() < 1e-12);
        assert_eq!(face.center().x(), 12.0);
        face.set_center(Point::at(0.0, 0.0, 0.0));
        assert!((face.points()[2].y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_is_about_origin() {
        let mut face = square([0.0; 4], Rgb::GRAY);
        face.set_center(Point::at(10.0, 0.0, 0.0));
        face.scale(2.0);
        assert!((face.points()[0].x() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_about_center() {
        let mut face = square([0.0; 4], Rgb::GRAY);
        face.set_center(Point::at(5.0, 5.0, 0.0));
        let half_turn = Transform::rotation_z(std::f64::consts::PI);
        face.transform_about_center(&half_turn).unwrap();
        // (6, 5) mirrors to (4, 5) around the center
        assert!((face.points()[1].x() - 4.0).abs() < 1e-9);
        assert!((face.points()[1].y() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_depth_order_is_a_fresh_view() {
        let face = square([0.0, 0.0, 9.0, 9.0], Rgb::GRAY);
        let order = face.depth_order();
        // second triangle (0, 2, 3) has the larger mean z
        assert_eq!(order[0].indices(), [0, 2, 3]);
        assert_eq!(face.polygons()[0].indices(), [0, 1, 2]);
    }

    #[test]
    fn test_identity_synthesis() {
        let face = square([1.0, 2.0, 3.0, 4.0], Rgb::new(12, 34, 56));
        let same = Face::synthesise(&[&face], &[1.0]).unwrap();
        for (a, b) in face.points().iter().zip(same.points()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.color(), b.color());
        }
    }

    #[test]
    fn test_synthesis_caps_color_at_255() {
        let a = square([0.0; 4], Rgb::new(200, 200, 200));
        let b = square([0.0; 4], Rgb::new(200, 10, 0));
        let s = Face::synthesise(&[&a, &b], &[1.0, 1.0]).unwrap();
        assert_eq!(s.points()[0].color(), Rgb::from_raw(255, 210, 200));
    }

    #[test]
    fn test_synthesis_blends_geometry() {
        let a = square([0.0; 4], Rgb::new(100, 0, 0));
        let b = square([10.0; 4], Rgb::new(0, 100, 0));
        let s = Face::synthesise(&[&a, &b], &[0.25, 0.75]).unwrap();
        assert!((s.points()[3].z() - 7.5).abs() < 1e-12);
        assert_eq!(s.points()[3].color(), Rgb::from_raw(25, 75, 0));
    }

    #[test]
    fn test_negative_weights_allow_low_colors() {
        let a = square([0.0; 4], Rgb::new(10, 10, 10));
        let b = square([0.0; 4], Rgb::new(100, 0, 0));
        let s = Face::synthesise(&[&a, &b], &[1.0, -1.0]).unwrap();
        assert_eq!(s.points()[0].color().r, -90);
    }

    #[test]
    fn test_synthesis_rejects_mismatches() {
        let a = square([0.0; 4], Rgb::GRAY);
        assert!(matches!(
            Face::synthesise(&[], &[]),
            Err(MorphError::EmptySynthesis)
        ));
        assert!(matches!(
            Face::synthesise(&[&a, &a], &[1.0]),
            Err(MorphError::WeightCountMismatch { .. })
        ));

        let mesh = Arc::new(Mesh::parse("1,2,3\n").unwrap());
        let small = Face::new(vec![Point::at(0.0, 0.0, 0.0); 3], mesh).unwrap();
        assert!(matches!(
            Face::synthesise(&[&a, &small], &[0.5, 0.5]),
            Err(MorphError::VertexCountMismatch { face: 1, .. })
        ));
    }
}
