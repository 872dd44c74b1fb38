//! Result collection and GeoJSON output

use crate::geojson::{Feature, FeatureCollection, Geometry};
use crate::{Result, Segment, ShorelineError};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// All segments of a run, in emission order, plus the passthrough CRS
#[derive(Debug, Clone, Default)]
pub struct ResultCollection {
    segments: Vec<Segment>,
    crs: Option<Value>,
}

/// Counts describing a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct dates that produced at least one segment
    pub dates_with_segments: usize,
    pub segment_count: usize,
    pub point_count: usize,
}

impl ResultCollection {
    pub fn new(segments: Vec<Segment>, crs: Option<Value>) -> Self {
        Self { segments, crs }
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn crs(&self) -> Option<&Value> {
        self.crs.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut previous_date: Option<&str> = None;
        for segment in &self.segments {
            // Segments of one date are contiguous
            if previous_date != Some(segment.date()) {
                summary.dates_with_segments += 1;
                previous_date = Some(segment.date());
            }
            summary.segment_count += 1;
            summary.point_count += segment.point_count();
        }
        summary
    }

    /// GeoJSON view: one LineString feature per segment, id = date
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .segments
            .iter()
            .map(|segment| Feature::new(segment.date(), Geometry::line_string(segment.line())))
            .collect();
        FeatureCollection::new(features, self.crs.clone())
    }
}

/// Writes a [`ResultCollection`] as a pretty-printed GeoJSON feature collection
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultWriter;

impl ResultWriter {
    /// Serialize to an in-memory JSON document
    pub fn to_json(collection: &ResultCollection) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&collection.to_feature_collection())
            .map_err(|e| ShorelineError::malformed("output collection", e.to_string()))
    }

    /// Serialize `collection` to `destination`.
    ///
    /// The document goes to a temporary file in the destination directory which is
    /// then renamed over `destination`. A failed run leaves any previous file untouched
    /// and never leaves a partial one.
    pub fn write(destination: impl AsRef<Path>, collection: &ResultCollection) -> Result<()> {
        #[cfg(feature = "profiling")]
        profiling::scope!("result_writer::write");

        let destination = destination.as_ref();
        let document = Self::to_json(collection)?;

        let directory = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_error = |e: std::io::Error| ShorelineError::io(destination, e);
        let mut staging = NamedTempFile::new_in(directory).map_err(io_error)?;
        staging.write_all(&document).map_err(io_error)?;
        staging.as_file().sync_all().map_err(io_error)?;
        staging
            .persist(destination)
            .map_err(|e| ShorelineError::io(destination, e.error))?;

        tracing::info!(
            "Wrote {} features to {}",
            collection.len(),
            destination.display()
        );
        Ok(())
    }
}
