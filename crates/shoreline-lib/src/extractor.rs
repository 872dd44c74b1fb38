//! Segment extraction: the row-wise core of the pipeline
//!
//! Every row of the observation table is walked in column order. Each valid distance is
//! projected onto its transect, consecutive projections form a run, and a run is cut at a
//! missing value or at the end of the row. Runs with fewer than two points are dropped.

use crate::{ObservationRow, ObservationTable, Result, ShorelineError, TransectStore};
use geo::{Coord, LineString, Point};
use rayon::prelude::*;

/// What happens to the last column of a row
///
/// Reaching the last column always closes the current run. With
/// [`TerminalColumnPolicy::Replicate`] (the default) that column is never projected, even
/// when it holds a valid distance, matching the historical output of this tool.
/// [`TerminalColumnPolicy::Include`] projects a valid last column before closing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalColumnPolicy {
    #[default]
    Replicate,
    Include,
}

/// A shoreline polyline of at least two points observed on one date
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    date: String,
    line: LineString<f64>,
}

impl Segment {
    #[inline]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[inline]
    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Number of points in the polyline (always at least 2)
    #[inline]
    pub fn point_count(&self) -> usize {
        self.line.0.len()
    }

    pub fn points(&self) -> impl Iterator<Item = Point<f64>> + '_ {
        self.line.points()
    }
}

/// Turns observation rows into segments using a transect store
#[derive(Debug, Clone, Copy)]
pub struct SegmentExtractor<'s> {
    store: &'s TransectStore,
    policy: TerminalColumnPolicy,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'s> SegmentExtractor<'s> {
    pub fn new(store: &'s TransectStore, policy: TerminalColumnPolicy) -> Self {
        Self { store, policy }
    }

    #[inline]
    pub fn policy(&self) -> TerminalColumnPolicy {
        self.policy
    }

    /// Extract the segments of one row, left to right.
    ///
    /// Fails with [`ShorelineError::UnknownTransect`] if any column, including one holding
    /// a missing value, names a transect that is not in the store. Nothing from the row is
    /// returned in that case.
    pub fn extract_row(&self, row: &ObservationRow<'_>) -> Result<Vec<Segment>> {
        let last = row.len().saturating_sub(1);
        let mut segments = Vec::new();
        let mut run: Vec<Coord<f64>> = Vec::new();

        for (index, (name, distance)) in row.values().enumerate() {
            let transect =
                self.store
                    .get(name)
                    .map_err(|_| ShorelineError::UnknownTransect {
                        name: name.to_string(),
                        column: row.header(index).to_string(),
                    })?;
            let is_last = index == last;

            if let Some(distance) = distance {
                if !is_last || self.policy == TerminalColumnPolicy::Include {
                    run.push(self.store.interpolate(transect, distance).0);
                }
            }

            if distance.is_none() || is_last {
                if run.len() > 1 {
                    segments.push(Segment {
                        date: row.date().to_string(),
                        line: LineString::new(std::mem::take(&mut run)),
                    });
                } else {
                    run.clear();
                }
            }
        }

        tracing::debug!("{}: {} segments", row.date(), segments.len());
        Ok(segments)
    }

    /// Extract every row in order, concatenating the results
    pub fn extract_rows<'t>(
        &self,
        rows: impl IntoIterator<Item = ObservationRow<'t>>,
    ) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        for row in rows {
            segments.extend(self.extract_row(&row)?);
        }
        Ok(segments)
    }

    /// Extract the whole table sequentially
    pub fn extract_table(&self, table: &ObservationTable) -> Result<Vec<Segment>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("extractor::extract_table");

        let segments = self.extract_rows(table.rows())?;
        tracing::info!(
            "Extracted {} segments from {} dates",
            segments.len(),
            table.row_count()
        );
        Ok(segments)
    }

    /// Extract the whole table with rows processed in parallel.
    ///
    /// The output order is identical to [`Self::extract_table`].
    pub fn extract_table_parallel(&self, table: &ObservationTable) -> Result<Vec<Segment>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("extractor::extract_table_parallel");

        let rows: Vec<ObservationRow<'_>> = table.rows().collect();
        let per_row: Result<Vec<Vec<Segment>>> =
            rows.par_iter().map(|row| self.extract_row(row)).collect();

        let segments: Vec<Segment> = per_row?.into_iter().flatten().collect();
        tracing::info!(
            "Extracted {} segments from {} dates (parallel)",
            segments.len(),
            table.row_count()
        );
        Ok(segments)
    }
}
