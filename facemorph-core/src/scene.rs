/// One painter's-algorithm pass over a face
use log::trace;

use crate::face::Face;
use crate::illumination::IlluminationModel;
use crate::point::Rgb;
use crate::polygon::Triangle;
use crate::projection::{Outline, Projector};

/// How polygon colors are resolved.
#[derive(Debug, Clone, Copy)]
pub enum Shading<'a> {
    /// Each polygon takes its mean vertex color, no lighting.
    Preview,
    Lit(&'a dyn IlluminationModel),
}

impl Shading<'_> {
    pub fn color(&self, triangle: &Triangle) -> Rgb {
        match self {
            Shading::Preview => triangle.mean().color(),
            Shading::Lit(model) => model.shade(triangle),
        }
    }
}

/// A projected polygon and the color to fill it with.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub outline: Outline,
    pub color: Rgb,
}

/// Project and color every polygon of `face`, farthest first. Filling the
/// commands in order paints nearer polygons over farther ones.
pub fn render_pass(face: &Face, projector: &dyn Projector, shading: Shading) -> Vec<DrawCommand> {
    let order = face.depth_order();
    trace!(
        "render pass: {} polygons, {:?} projection",
        order.len(),
        projector.mode()
    );
    order
        .iter()
        .map(|polygon| {
            let triangle = face.triangle(polygon);
            DrawCommand {
                color: shading.color(&triangle),
                outline: projector.project(&triangle),
            }
        })
        .collect()
}
