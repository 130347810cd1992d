//! Error handling for PlayKit
//!
//! Provides error types for every layer of the designer:
//! - Designer errors (diagram model and session operations)
//! - Persistence errors (draft storage, save-play hand-off)
//! - Export errors (JSON, SVG and PNG artifacts)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Designer error type
///
/// Represents errors raised by the diagram model, the formation library and
/// the designer session. Transient interaction states (drawing without a
/// selection, a one-point path) are not errors and never produce one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    /// Formation id not present in the catalog
    #[error("Unknown formation '{formation_id}' for {side}")]
    UnknownFormation {
        /// The requested formation id.
        formation_id: String,
        /// The side the formation was requested for.
        side: String,
    },

    /// Player id not present on the given side
    #[error("Unknown player '{player_id}' on {side}")]
    UnknownPlayer {
        /// The requested player id.
        player_id: String,
        /// The side that was searched.
        side: String,
    },

    /// Diagram failed validation
    #[error("Invalid diagram: {reason}")]
    InvalidDiagram {
        /// The first violation found.
        reason: String,
    },

    /// Timing step number outside 1..=N
    #[error("Timing step {step} out of range (1..={total})")]
    InvalidTimingStep {
        /// The requested step number.
        step: usize,
        /// The number of steps in the timeline.
        total: usize,
    },
}

/// Persistence error type
///
/// Represents failures of the local draft store or the external save-play
/// boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Underlying storage I/O failed
    #[error("Storage I/O error: {reason}")]
    Io {
        /// The reason for the I/O failure.
        reason: String,
    },

    /// Payload could not be encoded or decoded
    #[error("Draft JSON error: {reason}")]
    Json {
        /// The reason for the JSON failure.
        reason: String,
    },

    /// Storage refused the write because it is full
    #[error("Storage quota exceeded writing '{key}'")]
    QuotaExceeded {
        /// The key being written.
        key: String,
    },

    /// Storage backend is not available
    #[error("Storage unavailable: {reason}")]
    Unavailable {
        /// The reason the store is unavailable.
        reason: String,
    },
}

/// Export error type
///
/// Represents failures while producing a JSON, SVG or PNG artifact.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Diagram could not be serialized
    #[error("Failed to serialize diagram: {reason}")]
    Serialize {
        /// The reason for the failure.
        reason: String,
    },

    /// Rendered markup could not be parsed for rasterization
    #[error("Failed to parse SVG: {reason}")]
    SvgParse {
        /// The reason for the failure.
        reason: String,
    },

    /// Offscreen surface could not be created or drawn
    #[error("Raster surface unavailable ({width}x{height})")]
    Raster {
        /// Requested surface width.
        width: u32,
        /// Requested surface height.
        height: u32,
    },

    /// Raster image could not be encoded
    #[error("Failed to encode image: {reason}")]
    Encode {
        /// The reason for the failure.
        reason: String,
    },

    /// Artifact could not be delivered
    #[error("Failed to deliver artifact '{file_name}': {reason}")]
    Delivery {
        /// The artifact file name.
        file_name: String,
        /// The reason for the failure.
        reason: String,
    },
}

/// Main error type for PlayKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Designer error
    #[error(transparent)]
    Designer(#[from] DesignerError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a designer error
    pub fn is_designer_error(&self) -> bool {
        matches!(self, Error::Designer(_))
    }

    /// Check if this is a persistence error
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
