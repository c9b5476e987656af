/// Light sources and flat Lambertian shading
use std::collections::HashSet;
use std::fmt::Debug;

use crate::point::{Point, Rgb};
use crate::polygon::Triangle;

/// Where light comes from and what color it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightSource {
    /// Light arriving along a fixed direction, wherever the lit point is.
    Directional { direction: Point },
    /// Light emitted from a position in space.
    Point { position: Point },
}

impl LightSource {
    pub fn directional(x: f64, y: f64, z: f64, color: Rgb) -> Self {
        LightSource::Directional {
            direction: Point::new(x, y, z, color),
        }
    }

    pub fn point(x: f64, y: f64, z: f64, color: Rgb) -> Self {
        LightSource::Point {
            position: Point::new(x, y, z, color),
        }
    }

    /// Direction from `at` towards the light, not normalized.
    pub fn incoming_direction(&self, at: &Point) -> Point {
        match self {
            LightSource::Directional { direction } => *direction,
            LightSource::Point { position } => Point::subtract(position, at),
        }
    }

    /// Per-channel intensity in `0.0..=1.0`.
    pub fn intensity(&self) -> [f64; 3] {
        let color = match self {
            LightSource::Directional { direction } => direction.color(),
            LightSource::Point { position } => position.color(),
        };
        color.channels().map(|c| c as f64 / 255.0)
    }
}

/// Decides the flat color of a triangle from the lights shining on it.
pub trait IlluminationModel: Debug {
    /// Adding a source that is already present has no effect.
    fn add_source(&mut self, source: LightSource);

    fn remove_source(&mut self, source: &LightSource);

    fn shade(&self, triangle: &Triangle) -> Rgb;
}

/// Diffuse reflection: brightness follows the cosine between the surface
/// normal and the incoming light.
#[derive(Debug, Clone)]
pub struct LambertianModel {
    sources: HashSet<LightSource>,
    diffuse: f64,
    view: Point,
}

impl LambertianModel {
    /// `view` picks which of the two plane normals counts as the front.
    pub fn new(diffuse: f64, view: Point) -> Self {
        Self {
            sources: HashSet::new(),
            diffuse,
            view,
        }
    }

    pub fn sources(&self) -> impl Iterator<Item = &LightSource> {
        self.sources.iter()
    }

    /// The unit normal facing the viewer, or `None` for a degenerate triangle.
    fn normal(&self, triangle: &Triangle, mean: &Point) -> Option<Point> {
        let a = Point::subtract(triangle.vertex(0), mean);
        let b = Point::subtract(triangle.vertex(1), mean);
        let mut n_ab = Point::cross(&a, &b);
        n_ab.normalize().ok()?;
        if n_ab.dot(&self.view) > 0.0 {
            return Some(n_ab);
        }
        let mut n_ba = Point::cross(&b, &a);
        n_ba.normalize().ok()?;
        Some(n_ba)
    }
}

impl IlluminationModel for LambertianModel {
    fn add_source(&mut self, source: LightSource) {
        self.sources.insert(source);
    }

    fn remove_source(&mut self, source: &LightSource) {
        self.sources.remove(source);
    }

    fn shade(&self, triangle: &Triangle) -> Rgb {
        let mean = triangle.mean();
        let Some(normal) = self.normal(triangle, &mean) else {
            return Rgb::BLACK;
        };

        let mut total = [0.0f64; 3];
        for source in &self.sources {
            let mut incoming = source.incoming_direction(&mean);
            if incoming.normalize().is_err() {
                continue;
            }
            let cos = normal.dot(&incoming);
            if cos <= 0.0 {
                // facing away from this source
                continue;
            }
            for (t, i) in total.iter_mut().zip(source.intensity()) {
                *t += cos * i * self.diffuse;
            }
        }

        let [r, g, b] = mean.color().channels();
        let lit = |channel: i32, intensity: f64| ((channel as f64 * intensity) as i32).min(255);
        Rgb::from_raw(lit(r, total[0]), lit(g, total[1]), lit(b, total[2]))
    }
}
