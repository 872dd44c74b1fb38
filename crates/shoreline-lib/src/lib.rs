//! Shoreline Library - Segment extraction from transect intersect tables
//!
//! This library turns a time series of shoreline/transect intersection distances into
//! line geometries: one or more shoreline segments per observation date, each built by
//! projecting the distances back onto their transects and joining consecutive hits.
//!
//! # Architecture
//!
//! - **[`TransectStore`]**: Immutable, name-indexed reference lines loaded from GeoJSON
//! - **[`ObservationTable`]**: Per-date distance matrix with explicit missing values
//! - **[`SegmentExtractor`]**: Row-wise interpolation, grouping, splitting and filtering
//! - **[`ResultWriter`]**: Serializes a [`ResultCollection`] as a GeoJSON feature collection
//! - **[`Converter`]**: High-level pipeline tying the above together
//!
//! # Usage Example
//!
//! ```no_run
//! use shoreline_lib::{Config, Converter};
//!
//! # fn main() -> shoreline_lib::Result<()> {
//! let converter = Converter::new(Config::default());
//! converter.run("transects.geojson", "intersects.csv", "shorelines.geojson")?;
//! # Ok(())
//! # }
//! ```

mod converter;
mod extractor;
pub mod geojson;
mod observation;
mod transect;
mod writer;

// Public API exports
pub use converter::{Config, Converter};
pub use extractor::{Segment, SegmentExtractor, TerminalColumnPolicy};
pub use observation::{HeaderConvention, ObservationRow, ObservationTable};
pub use transect::{Transect, TransectStore};
pub use writer::{ResultCollection, ResultWriter, RunSummary};

use std::path::PathBuf;

/// Error types for the shoreline library
#[derive(Debug, thiserror::Error)]
pub enum ShorelineError {
    #[error("Malformed input in {source_name}: {reason}")]
    MalformedInput { source_name: String, reason: String },

    #[error("Unknown transect '{name}' referenced by column '{column}'")]
    UnknownTransect { name: String, column: String },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShorelineError {
    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShorelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that the pipeline entry points are accessible
        let _: fn(Config) -> Converter = Converter::new;
        let _: fn() -> Config = Config::default;
    }

    #[test]
    fn test_error_messages_name_the_culprit() {
        let err = ShorelineError::UnknownTransect {
            name: "T9".to_string(),
            column: "intersect T9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown transect 'T9' referenced by column 'intersect T9'"
        );

        let err = ShorelineError::malformed("transects.geojson", "feature 3 has no name");
        assert!(err.to_string().contains("transects.geojson"));
        assert!(err.to_string().contains("feature 3"));
    }
}
