//! Error types for pigment_core.

use crate::rates::EventType;
use thiserror::Error;

/// Invalid rate constants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    /// A single rate is below zero.
    #[error("rate for {event} is negative ({value})")]
    Negative {
        /// Event the rate belongs to.
        event: EventType,
        /// Offending value.
        value: f64,
    },

    /// A single rate is NaN or infinite.
    #[error("rate for {event} is not finite ({value})")]
    NonFinite {
        /// Event the rate belongs to.
        event: EventType,
        /// Offending value.
        value: f64,
    },

    /// The rates sum to zero, so no distribution exists.
    #[error("rates must sum to a positive value, got {0}")]
    NonPositiveSum(f64),
}

/// Invalid simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Rows or columns is zero.
    #[error("lattice dimensions must be positive, got {rows}x{cols}")]
    EmptyLattice {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// Characteristic distance is zero, negative or not finite.
    #[error("characteristic distance h must be positive and finite, got {0}")]
    InvalidDistance(f64),

    /// Zero iterations requested.
    #[error("iteration count must be positive")]
    ZeroIterations,

    /// Zero events per batch requested.
    #[error("batch size must be positive")]
    ZeroBatchSize,

    /// Iridophore ratio outside [0, 1].
    #[error("iridophore ratio must lie in [0, 1], got {0}")]
    InvalidIridophoreRatio(f64),

    /// Lattice and iridophore mask disagree on dimensions.
    #[error("iridophore mask is {mask_rows}x{mask_cols} but lattice is {rows}x{cols}")]
    DimensionMismatch {
        /// Lattice rows.
        rows: usize,
        /// Lattice columns.
        cols: usize,
        /// Mask rows.
        mask_rows: usize,
        /// Mask columns.
        mask_cols: usize,
    },

    /// Lattice dimensions differ from the configured ones.
    #[error("lattice is {rows}x{cols} but config expects {expected_rows}x{expected_cols}")]
    LatticeSizeMismatch {
        /// Configured rows.
        expected_rows: usize,
        /// Configured columns.
        expected_cols: usize,
        /// Lattice rows.
        rows: usize,
        /// Lattice columns.
        cols: usize,
    },

    /// The starting lattice holds a melanophore on an iridophore site.
    #[error("melanophore on iridophore site at ({row}, {col})")]
    MelanophoreOnIridophore {
        /// Site row.
        row: usize,
        /// Site column.
        col: usize,
    },

    /// Rate constants are invalid.
    #[error(transparent)]
    Rates(#[from] RateError),

    /// Reading or writing the config file failed.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema.
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure writing a rendered lattice.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Pixel size of zero.
    #[error("pixel size must be positive")]
    ZeroPixelSize,

    /// Creating the output directory failed.
    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the PNG failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
