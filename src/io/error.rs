//! Error types for synthesis and its I/O surfaces

use crate::spatial::Coordinate;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all synthesis operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Sample or prefill data cannot be used for synthesis
    InvalidSourceData {
        /// Description of what's wrong with the data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Rotation angle outside the shape's superimposed rotation set
    UnsupportedRotation {
        /// Requested angle, reduced modulo 360
        degrees: u32,
        /// Shape that rejected the angle
        shape: &'static str,
    },

    /// Pattern key set does not match the shape's footprint
    ShapeMismatch {
        /// Cells in the footprint
        expected: usize,
        /// Cells in the supplied pattern
        actual: usize,
    },

    /// Shape constructed with a size it cannot support
    UnsupportedShapeSize {
        /// Shape kind
        shape: &'static str,
        /// Requested size
        size: usize,
    },

    /// Function argument violated its contract
    InvalidArgument {
        /// Description of the violation
        reason: String,
    },

    /// Backtracking needed to undo a step but only the base frame was left
    BacktrackUnderflow {
        /// Cell that had no legal placement
        candidate: Coordinate,
        /// Iteration at which the underflow happened
        iteration: usize,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::UnsupportedRotation { degrees, shape } => {
                write!(f, "Rotation of {degrees} degrees is not supported by the {shape} shape")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "Pattern does not match the shape footprint \
                     ({actual} cells, expected {expected})"
                )
            }
            Self::UnsupportedShapeSize { shape, size } => {
                write!(f, "Unsupported {shape} size: {size}")
            }
            Self::InvalidArgument { reason } => {
                write!(f, "Invalid argument: {reason}")
            }
            Self::BacktrackUnderflow {
                candidate,
                iteration,
            } => {
                write!(
                    f,
                    "No step left to undo for cell ({}, {}) at iteration {iteration}",
                    candidate[0], candidate[1]
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a path-related parameter error
pub fn io_error(msg: &str) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
