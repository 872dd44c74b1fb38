//! Converter - Top-level pipeline from input files to the output collection
//!
//! Loads the transects and the intersect table once, extracts the segments of
//! every date and writes them out in a single step.

use crate::{
    HeaderConvention, ObservationTable, Result, ResultCollection, ResultWriter,
    SegmentExtractor, TerminalColumnPolicy, TransectStore,
};
use std::path::Path;

/// Configuration for a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the CSV column holding the date keys
    pub index_column: String,
    /// How value column headers map to transect names
    pub header: HeaderConvention,
    /// Feature property holding the transect name in the transect file
    pub name_property: String,
    /// Handling of the last column of each row
    pub terminal_column: TerminalColumnPolicy,
    /// Process rows in parallel (output order is unchanged)
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_column: "dates".to_string(),
            header: HeaderConvention::default(),
            name_property: "name".to_string(),
            terminal_column: TerminalColumnPolicy::Replicate,
            parallel: false,
        }
    }
}

/// Runs the whole conversion with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Converter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load both inputs
    pub fn load(
        &self,
        transects_path: impl AsRef<Path>,
        intersects_path: impl AsRef<Path>,
    ) -> Result<(TransectStore, ObservationTable)> {
        let store = TransectStore::load(transects_path, &self.config.name_property)?;
        let table = ObservationTable::load(
            intersects_path,
            &self.config.index_column,
            &self.config.header,
        )?;
        Ok((store, table))
    }

    /// Extract every segment of `table`, carrying the store's CRS through
    pub fn extract(
        &self,
        store: &TransectStore,
        table: &ObservationTable,
    ) -> Result<ResultCollection> {
        let extractor = SegmentExtractor::new(store, self.config.terminal_column);
        let segments = if self.config.parallel {
            extractor.extract_table_parallel(table)?
        } else {
            extractor.extract_table(table)?
        };
        Ok(ResultCollection::new(segments, store.crs().cloned()))
    }

    /// Load, extract and write. Nothing is written unless every step before it succeeded.
    pub fn run(
        &self,
        transects_path: impl AsRef<Path>,
        intersects_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<ResultCollection> {
        let (store, table) = self.load(transects_path, intersects_path)?;
        let collection = self.extract(&store, &table)?;
        ResultWriter::write(output_path, &collection)?;

        let summary = collection.summary();
        tracing::info!(
            "Done: {} segments ({} points) over {} of {} dates",
            summary.segment_count,
            summary.point_count,
            summary.dates_with_segments,
            table.row_count()
        );
        Ok(collection)
    }
}
