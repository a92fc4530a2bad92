//! Export and inspection errors.

use thiserror::Error;

/// Errors returned by the exporters. No bytes are produced on error.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A region outline is an open polyline.
    #[error("{path}: outline is not closed")]
    NotClosed {
        /// Model path of the shape.
        path: String,
    },

    /// A region outline has too few vertices to enclose anything.
    #[error("{path}: polyline needs at least 2 vertices, has {count}")]
    TooFewVertices {
        /// Model path of the shape.
        path: String,
        /// Vertex count found.
        count: usize,
    },

    /// NaN or infinite coordinate.
    #[error("{path}: non-finite coordinate")]
    NonFinite {
        /// Model path of the shape.
        path: String,
    },

    /// A rib or backplane outline crosses itself.
    #[error("{path}: outline intersects itself")]
    SelfIntersecting {
        /// Model path of the shape.
        path: String,
    },

    /// Circle or arc with a radius that is not positive.
    #[error("{path}: radius {radius} is not positive")]
    BadRadius {
        /// Model path of the shape.
        path: String,
        /// Offending radius.
        radius: f64,
    },

    /// The geometry is empty (no vertices or triangles).
    #[error("Empty geometry")]
    EmptyGeometry,
}

/// Errors raised while reading a DXF file for inspection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InspectError {
    /// A group code line is not an integer.
    #[error("line {line}: expected a group code, found {value:?}")]
    GroupCode {
        /// 1-based line number.
        line: usize,
        /// Text found.
        value: String,
    },

    /// A group code is not followed by a value line.
    #[error("line {line}: group code {code} has no value")]
    MissingValue {
        /// 1-based line number of the code.
        line: usize,
        /// The group code.
        code: i32,
    },

    /// A coordinate or size value is not a number.
    #[error("line {line}: group {code} expects a number, found {value:?}")]
    Number {
        /// 1-based line number of the value.
        line: usize,
        /// The group code.
        code: i32,
        /// Text found.
        value: String,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
