//! Observation table module
//!
//! Holds the per-date, per-transect intersection distances read from CSV. Column
//! order is preserved exactly as in the source, and missing cells are `None`.

use crate::{Result, ShorelineError};
use std::io::Read;
use std::path::Path;

/// Headers starting with this prefix are index artifacts, not transect columns
const UNNAMED_PREFIX: &str = "Unnamed";

/// Cell contents read as a missing value, in addition to an empty cell.
/// Matches the default NA token set of common dataframe CSV readers.
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How a value column header maps to a transect name
///
/// The default takes the second space-separated token, so a header such as
/// `"intersect T12"` refers to transect `T12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConvention {
    /// Token separator; consecutive separators count as one
    pub delimiter: char,
    /// Zero-based token position holding the transect name
    pub token_index: usize,
}

impl Default for HeaderConvention {
    fn default() -> Self {
        Self {
            delimiter: ' ',
            token_index: 1,
        }
    }
}

impl HeaderConvention {
    /// Extract the transect name from a column header
    pub fn transect_name<'a>(&self, header: &'a str) -> Option<&'a str> {
        header
            .split(self.delimiter)
            .filter(|token| !token.is_empty())
            .nth(self.token_index)
    }
}

/// A value column: its raw header and the transect it resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValueColumn {
    pub(crate) header: String,
    pub(crate) transect: String,
}

#[derive(Debug, Clone)]
struct StoredRow {
    date: String,
    values: Vec<Option<f64>>,
}

/// Per-date distance matrix
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    columns: Vec<ValueColumn>,
    rows: Vec<StoredRow>,
}

/// One date of the table, borrowed from it
#[derive(Debug, Clone, Copy)]
pub struct ObservationRow<'a> {
    date: &'a str,
    columns: &'a [ValueColumn],
    values: &'a [Option<f64>],
}

impl ObservationTable {
    /// Load the table from a CSV file
    pub fn load(
        path: impl AsRef<Path>,
        index_column: &str,
        convention: &HeaderConvention,
    ) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("observation_table::load");

        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ShorelineError::io(path, e))?;
        Self::from_reader(
            std::io::BufReader::new(file),
            &path.display().to_string(),
            index_column,
            convention,
        )
    }

    /// Parse the table from any CSV reader; `source_name` is used in error messages
    pub fn from_reader<R: Read>(
        reader: R,
        source_name: &str,
        index_column: &str,
        convention: &HeaderConvention,
    ) -> Result<Self> {
        let malformed = |reason: String| ShorelineError::malformed(source_name, reason);

        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| malformed(format!("cannot read header row: {e}")))?
            .clone();

        let index_position = headers
            .iter()
            .position(|h| h.trim() == index_column)
            .ok_or_else(|| malformed(format!("missing index column '{index_column}'")))?;

        // (csv position, column) for every kept value column
        let mut value_positions = Vec::new();
        let mut columns = Vec::new();
        for (position, header) in headers.iter().enumerate() {
            if position == index_position {
                continue;
            }
            let header = header.trim();
            if header.is_empty() || header.starts_with(UNNAMED_PREFIX) {
                tracing::warn!("Skipping unnamed column {} in {}", position, source_name);
                continue;
            }
            let transect = convention.transect_name(header).ok_or_else(|| {
                malformed(format!(
                    "column {position} header '{header}' has no transect name at token {}",
                    convention.token_index
                ))
            })?;
            value_positions.push(position);
            columns.push(ValueColumn {
                header: header.to_string(),
                transect: transect.to_string(),
            });
        }

        let mut rows = Vec::new();
        for (row_no, record) in reader.records().enumerate() {
            let record = record.map_err(|e| malformed(format!("row {row_no}: {e}")))?;
            let date = record.get(index_position).unwrap_or_default().trim();

            let values = value_positions
                .iter()
                .zip(&columns)
                .map(|(&position, column)| {
                    let cell = record.get(position).unwrap_or_default();
                    parse_distance(cell).ok_or_else(|| {
                        malformed(format!(
                            "row {row_no} ({date}), column '{}': '{cell}' is not a number",
                            column.header
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            rows.push(StoredRow {
                date: date.to_string(),
                values,
            });
        }

        tracing::info!(
            "Loaded {} dates x {} transect columns from {}",
            rows.len(),
            columns.len(),
            source_name
        );
        Ok(Self { columns, rows })
    }

    /// Build a table in memory; each column header is the transect name itself
    pub fn from_rows(
        transect_names: impl IntoIterator<Item = impl Into<String>>,
        rows: impl IntoIterator<Item = (String, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        let columns: Vec<ValueColumn> = transect_names
            .into_iter()
            .map(|name| {
                let name = name.into();
                ValueColumn {
                    header: name.clone(),
                    transect: name,
                }
            })
            .collect();

        let rows = rows
            .into_iter()
            .map(|(date, values)| {
                if values.len() != columns.len() {
                    return Err(ShorelineError::malformed(
                        "in-memory table",
                        format!(
                            "row {date} has {} values for {} columns",
                            values.len(),
                            columns.len()
                        ),
                    ));
                }
                Ok(StoredRow { date, values })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns, rows })
    }

    /// Transect names of the value columns, in column order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.transect.as_str())
    }

    /// Rows in table order. Can be called any number of times.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = ObservationRow<'_>> {
        self.rows.iter().map(|row| ObservationRow {
            date: &row.date,
            columns: &self.columns,
            values: &row.values,
        })
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> ObservationRow<'a> {
    /// Date key of this row
    #[inline]
    pub fn date(&self) -> &'a str {
        self.date
    }

    /// `(transect name, distance)` pairs in column order
    pub fn values(&self) -> impl ExactSizeIterator<Item = (&'a str, Option<f64>)> + use<'a> {
        let columns = self.columns;
        self.values
            .iter()
            .zip(columns)
            .map(|(value, column)| (column.transect.as_str(), *value))
    }

    /// Raw header of the column at `index`
    pub(crate) fn header(&self, index: usize) -> &'a str {
        self.columns
            .get(index)
            .map(|c| c.header.as_str())
            .unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse one cell. Empty, NA-marker and NaN cells are missing (`Some(None)`); garbage is `None`.
fn parse_distance(cell: &str) -> Option<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || NA_MARKERS.contains(&cell) {
        return Some(None);
    }
    let value = cell.parse::<f64>().ok()?;
    Some((!value.is_nan()).then_some(value))
}
