/// facemorph core library - statistical face model and flat-shaded renderer
///
/// Homogeneous point algebra, the shared triangle mesh, faces parsed from
/// per-identity deltas or synthesised from other faces, and a painter's
/// algorithm render pass with interchangeable projection and lighting.

pub mod config;
pub mod error;
pub mod face;
pub mod illumination;
pub mod mesh;
pub mod model;
pub mod point;
pub mod polygon;
pub mod projection;
pub mod scene;
pub mod source;
pub mod transform;

// Re-export commonly used types
pub use config::Settings;
pub use error::{MorphError, Result};
pub use face::Face;
pub use illumination::{IlluminationModel, LambertianModel, LightSource};
pub use mesh::Mesh;
pub use model::ModelAssets;
pub use point::{Point, Rgb};
pub use polygon::{Polygon, Triangle};
pub use projection::{
    OrthographicProjector, Outline, PerspectiveProjector, ProjectionMode, Projector,
};
pub use scene::{render_pass, DrawCommand, Shading};
pub use transform::{Rotation, Transform};
