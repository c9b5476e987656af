/// Error types shared by the face model and the renderer
use thiserror::Error;

/// Everything that can go wrong while loading, building or shading a face.
#[derive(Debug, Error)]
pub enum MorphError {
    /// Reading a file that has no lenient fallback (settings) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record line could not be read as numbers.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An index (mesh vertex, weight table entry, average point) does not exist.
    #[error("{what} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Faces handed to synthesis do not share a vertex count.
    #[error("face {face} has {found} vertices, expected {expected}")]
    VertexCountMismatch {
        face: usize,
        expected: usize,
        found: usize,
    },

    #[error("{faces} faces but {weights} weights")]
    WeightCountMismatch { faces: usize, weights: usize },

    #[error("cannot synthesise from an empty set of faces")]
    EmptySynthesis,

    /// A direction of zero length, or a homogeneous vector with w == 0.
    #[error("degenerate vector: {0}")]
    DegenerateVector(&'static str),

    /// A perspective projector needs a finite, non-zero focal distance.
    #[error("invalid focal distance {0}")]
    InvalidFocal(f64),

    #[error("invalid settings: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MorphError>;
