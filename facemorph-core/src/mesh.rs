/// Triangle connectivity shared by every face of the model
use std::path::Path;

use log::debug;

use crate::error::{MorphError, Result};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::source::{parse_index_triple, read_lenient};

/// The ordered list of triangles of the face model, as 0-based index
/// triples into a face's points. Loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mesh {
    definitions: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(definitions: Vec<[usize; 3]>) -> Self {
        Self { definitions }
    }

    /// Parse `i1,i2,i3` lines of 1-based vertex indices. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let definitions = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| parse_index_triple(line, i + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(definitions))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mesh = Self::parse(&read_lenient(path))?;
        debug!("loaded {} triangles from {}", mesh.len(), path.display());
        Ok(mesh)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> &[[usize; 3]] {
        &self.definitions
    }

    /// Largest vertex index referenced, if any triangle exists.
    pub fn max_index(&self) -> Option<usize> {
        self.definitions.iter().flatten().copied().max()
    }

    /// Build one polygon per definition over `points`.
    ///
    /// Every referenced index must exist in `points`.
    pub fn create_triangles(&self, points: &[Point]) -> Result<Vec<Polygon>> {
        if let Some(max) = self.max_index() {
            if max >= points.len() {
                return Err(MorphError::IndexOutOfRange {
                    what: "mesh vertex",
                    index: max,
                    len: points.len(),
                });
            }
        }
        Ok(self.definitions.iter().map(|&d| Polygon::new(d)).collect())
    }
}
