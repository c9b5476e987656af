/// The statistical face model: average face, weight tables and face parsing
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::config::Settings;
use crate::error::{MorphError, Result};
use crate::face::Face;
use crate::mesh::Mesh;
use crate::point::{Point, Rgb};
use crate::source::{load_weights, parse_triple, read_lenient};

/// Per-identity scaling of the raw shape and color deltas.
#[derive(Debug, Clone, Copy)]
struct Blend<'a> {
    average: &'a Face,
    shape_weight: f64,
    color_weight: f64,
}

/// Everything needed to turn per-identity delta files into faces.
///
/// Built once at startup and shared read-only by every parse.
#[derive(Debug, Clone)]
pub struct ModelAssets {
    mesh: Arc<Mesh>,
    average: Face,
    shape_weights: Vec<f64>,
    color_weights: Vec<f64>,
}

impl ModelAssets {
    pub fn new(average: Face, shape_weights: Vec<f64>, color_weights: Vec<f64>) -> Self {
        Self {
            mesh: Arc::clone(average.mesh()),
            average,
            shape_weights,
            color_weights,
        }
    }

    /// Load the mesh, the average face and both weight tables named by `settings`.
    pub fn load(settings: &Settings) -> Result<Self> {
        let mesh = Arc::new(Mesh::load(&settings.mesh_file)?);
        let average = parse_average(
            &read_lenient(&settings.average_shape),
            &read_lenient(&settings.average_color),
            mesh,
        )?;
        let shape_weights = load_weights(&settings.shape_weights)?;
        let color_weights = load_weights(&settings.color_weights)?;
        info!(
            "model loaded: {} vertices, {} triangles, {} identities",
            average.vertex_count(),
            average.polygons().len(),
            shape_weights.len().min(color_weights.len())
        );
        Ok(Self::new(average, shape_weights, color_weights))
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn average(&self) -> &Face {
        &self.average
    }

    pub fn shape_weights(&self) -> &[f64] {
        &self.shape_weights
    }

    pub fn color_weights(&self) -> &[f64] {
        &self.color_weights
    }

    /// Parse one identity: every point is the average point plus the raw
    /// delta scaled by the identity's shape (resp. color) weight.
    pub fn parse_face(&self, shape: &str, color: &str, weight_index: usize) -> Result<Face> {
        let weight = |table: &[f64], what| {
            table
                .get(weight_index)
                .copied()
                .ok_or(MorphError::IndexOutOfRange {
                    what,
                    index: weight_index,
                    len: table.len(),
                })
        };
        let blend = Blend {
            average: &self.average,
            shape_weight: weight(&self.shape_weights, "shape weight")?,
            color_weight: weight(&self.color_weights, "color weight")?,
        };
        let points = parse_points(shape, color, Some(blend))?;
        Face::new(points, Arc::clone(&self.mesh))
    }

    /// Load the identity files `settings` derives from `identity` (e.g. `"001"`).
    pub fn load_identity(&self, settings: &Settings, identity: &str) -> Result<Face> {
        let (shape_path, color_path) = settings.identity_files(identity);
        let weight_index = Settings::weight_index(identity)?;
        debug!(
            "loading identity {} from {} and {}",
            identity,
            shape_path.display(),
            color_path.display()
        );
        self.load_face(&shape_path, &color_path, weight_index)
    }

    pub fn load_face(&self, shape: &Path, color: &Path, weight_index: usize) -> Result<Face> {
        self.parse_face(&read_lenient(shape), &read_lenient(color), weight_index)
    }
}

/// Parse the average face itself: raw records are used verbatim.
pub fn parse_average(shape: &str, color: &str, mesh: Arc<Mesh>) -> Result<Face> {
    let points = parse_points(shape, color, None)?;
    Face::new(points, mesh)
}

/// Pair shape line `i` with color line `i`, stopping at the end of the
/// shorter text.
fn parse_points(shape: &str, color: &str, blend: Option<Blend>) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (i, (location, rgb)) in shape.lines().zip(color.lines()).enumerate() {
        let [mut x, mut y, mut z] = parse_triple(location, i + 1)?;
        let [mut r, mut g, mut b] = parse_triple(rgb, i + 1)?;

        if let Some(blend) = blend {
            let base = blend.average.points().get(i).ok_or(MorphError::IndexOutOfRange {
                what: "average point",
                index: i,
                len: blend.average.vertex_count(),
            })?;
            let w = blend.shape_weight;
            x = base.x() + x * w;
            y = base.y() + y * w;
            z = base.z() + z * w;

            let w = blend.color_weight;
            let c = base.color();
            r = c.r as f64 + r * w;
            g = c.g as f64 + g * w;
            b = c.b as f64 + b * w;
        }

        let color = Rgb::new(r as i32, g as i32, b as i32);
        points.push(Point::new(x, y, z, color));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: &str = "0,0,0\n1, 0, 0\n0,1,0\n";
    const COLOR: &str = "100,100,100\n200,50,0\n10,20,30\n";

    fn assets() -> ModelAssets {
        let mesh = Arc::new(Mesh::parse("1,2,3\n").unwrap());
        let average = parse_average(SHAPE, COLOR, mesh).unwrap();
        ModelAssets::new(average, vec![2.0, -1.0], vec![0.5, 10.0])
    }

    #[test]
    fn test_average_uses_raw_values() {
        let mesh = Arc::new(Mesh::parse("1,2,3\n").unwrap());
        let face = parse_average("1.5,-2,3\n4,5,6\n7,8,9\n", COLOR, mesh).unwrap();
        let p = &face.points()[0];
        assert_eq!((p.x(), p.y(), p.z()), (1.5, -2.0, 3.0));
        assert_eq!(p.color(), Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_parse_adds_weighted_delta() {
        let assets = assets();
        let face = assets
            .parse_face("1,1,1\n1,1,1\n1,1,1\n", "10,10,10\n10,10,10\n-4,0,4\n", 0)
            .unwrap();
        let p = &face.points()[1];
        assert!((p.x() - 3.0).abs() < 1e-12);
        assert!((p.y() - 2.0).abs() < 1e-12);
        assert_eq!(p.color(), Rgb::new(205, 55, 5));
        assert_eq!(face.points()[2].color(), Rgb::new(8, 20, 32));
    }

    #[test]
    fn test_parse_clamps_colors() {
        let assets = assets();
        let face = assets
            .parse_face(SHAPE, "100,0,-100\n0,0,0\n0,0,0\n", 1)
            .unwrap();
        assert_eq!(face.points()[0].color(), Rgb::new(255, 100, 0));
    }

    #[test]
    fn test_shorter_file_truncates() {
        let mesh = Arc::new(Mesh::parse("1,2,3\n").unwrap());
        let face = parse_average(
            "0,0,0\n1,0,0\n0,1,0\n5,5,5\n",
            "1,1,1\n2,2,2\n3,3,3\n",
            mesh,
        )
        .unwrap();
        assert_eq!(face.vertex_count(), 3);
    }

    #[test]
    fn test_unknown_weight_index() {
        let err = assets().parse_face(SHAPE, COLOR, 2).unwrap_err();
        assert!(matches!(err, MorphError::IndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn test_more_points_than_average() {
        let err = assets()
            .parse_face("0,0,0\n0,0,0\n0,0,0\n0,0,0\n", "0,0,0\n0,0,0\n0,0,0\n0,0,0\n", 0)
            .unwrap_err();
        assert!(matches!(err, MorphError::IndexOutOfRange { index: 3, .. }));
    }

    #[test]
    fn test_malformed_record() {
        let err = assets()
            .parse_face("0,0,0\n0,x,0\n0,0,0\n", COLOR, 0)
            .unwrap_err();
        assert!(matches!(err, MorphError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_load_from_files() {
        use std::fs;

        let dir = std::env::temp_dir().join(format!("facemorph-model-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let write = |name: &str, text: &str| {
            let path = dir.join(name);
            fs::write(&path, text).unwrap();
            path
        };
        let settings = Settings {
            mesh_file: write("mesh.csv", "1,2,3\n"),
            average_shape: write("avg_sh.csv", SHAPE),
            average_color: write("avg_tx.csv", COLOR),
            shape_weights: write("sh_ev.csv", "1.0\n3.0\n"),
            color_weights: write("tx_ev.csv", "0.0\n1.0\n"),
            shape_prefix: format!("{}/sh_", dir.display()),
            color_prefix: format!("{}/tx_", dir.display()),
            ..Settings::default()
        };
        write("sh_002.csv", "1,0,0\n0,0,0\n0,0,0\n");
        write("tx_002.csv", "5,5,5\n0,0,0\n0,0,0\n");

        let assets = ModelAssets::load(&settings).unwrap();
        assert_eq!(assets.shape_weights(), &[1.0, 3.0]);
        assert_eq!(assets.color_weights(), &[0.0, 1.0]);
        assert_eq!(assets.average().vertex_count(), 3);
        assert_eq!(assets.mesh().len(), 1);

        let face = assets.load_identity(&settings, "002").unwrap();
        assert!((face.points()[0].x() - 3.0).abs() < 1e-12);
        assert_eq!(face.points()[0].color(), Rgb::new(105, 105, 105));

        // a missing identity degrades to empty input and fails on the mesh
        assert!(assets.load_identity(&settings, "001").is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_input_fails_on_mesh() {
        let mesh = Arc::new(Mesh::parse("1,2,3\n").unwrap());
        assert!(matches!(
            parse_average("", "", mesh),
            Err(MorphError::IndexOutOfRange { .. })
        ));
    }
}
