//! Transect storage and interpolation module
//!
//! This module provides the [`Transect`] reference line and the name-indexed
//! [`TransectStore`] loaded from a GeoJSON feature collection.

use crate::geojson::FeatureCollection;
use crate::{Result, ShorelineError};
use geo::{Coord, Euclidean, Length, LineString, Point};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A named reference line with its precomputed arc length
#[derive(Clone, Debug)]
pub struct Transect {
    name: String,
    line: LineString<f64>,
    /// Cached total arc length (computed once during construction)
    cached_length: f64,
}

impl Transect {
    /// Create a transect from a polyline of at least two coordinates
    pub fn new(name: impl Into<String>, line: LineString<f64>) -> Result<Self> {
        let name = name.into();
        if line.0.len() < 2 {
            return Err(ShorelineError::malformed(
                format!("transect '{name}'"),
                format!("needs at least 2 coordinates, found {}", line.0.len()),
            ));
        }
        let cached_length = Euclidean.length(&line);
        Ok(Self {
            name,
            line,
            cached_length,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Total arc length of the polyline
    ///
    /// This is O(1) as the value is cached during construction.
    #[inline]
    pub fn length(&self) -> f64 {
        self.cached_length
    }

    /// Point reached after walking `distance` units of arc length from the first coordinate.
    ///
    /// Distances past the end clamp to the last coordinate. Negative distances are
    /// measured backwards from the end and clamp to the first coordinate.
    pub fn interpolate(&self, distance: f64) -> Point<f64> {
        let target = if distance < 0.0 {
            self.cached_length + distance
        } else {
            distance
        };
        let target = target.clamp(0.0, self.cached_length);

        let mut walked = 0.0;
        for segment in self.line.lines() {
            let segment_length = Euclidean.length(&segment);
            if walked + segment_length >= target {
                if segment_length == 0.0 {
                    return segment.start.into();
                }
                let t = (target - walked) / segment_length;
                return (segment.start + segment.delta() * t).into();
            }
            walked += segment_length;
        }

        // Floating point leftovers when target == length
        self.last_coord().into()
    }

    fn last_coord(&self) -> Coord<f64> {
        // Construction guarantees at least two coordinates
        self.line.0[self.line.0.len() - 1]
    }
}

/// Name-indexed, read-only collection of transects
#[derive(Clone, Debug, Default)]
pub struct TransectStore {
    /// Transects in source order
    transects: Vec<Transect>,
    /// Name to position in `transects`
    by_name: HashMap<String, usize>,
    /// Coordinate reference system member of the source, if any
    crs: Option<Value>,
}

impl TransectStore {
    /// Load transects from a GeoJSON file, naming each by its `name_property`
    pub fn load(path: impl AsRef<Path>, name_property: &str) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("transect_store::load");

        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ShorelineError::io(path, e))?;
        Self::from_geojson_str(&text, &path.display().to_string(), name_property)
    }

    /// Parse transects from GeoJSON text; `source_name` is used in error messages
    pub fn from_geojson_str(text: &str, source_name: &str, name_property: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(text)
            .map_err(|e| ShorelineError::malformed(source_name, e.to_string()))?;
        Self::from_feature_collection(collection, source_name, name_property)
    }

    /// Build the store from a parsed feature collection
    ///
    /// Each feature must carry a string `name_property` and a LineString geometry
    /// with at least two coordinates. Names must be unique.
    pub fn from_feature_collection(
        collection: FeatureCollection,
        source_name: &str,
        name_property: &str,
    ) -> Result<Self> {
        let mut store = Self {
            transects: Vec::with_capacity(collection.features.len()),
            by_name: HashMap::with_capacity(collection.features.len()),
            crs: collection.crs,
        };

        for (i, feature) in collection.features.iter().enumerate() {
            let name = feature.property_str(name_property).ok_or_else(|| {
                ShorelineError::malformed(
                    source_name,
                    format!("feature {i} has no string '{name_property}' property"),
                )
            })?;
            let geometry = feature.geometry.as_ref().ok_or_else(|| {
                ShorelineError::malformed(source_name, format!("transect '{name}' has no geometry"))
            })?;
            let line = geometry.to_line_string().map_err(|reason| {
                ShorelineError::malformed(source_name, format!("transect '{name}': {reason}"))
            })?;
            let transect = Transect::new(name, line).map_err(|e| match e {
                ShorelineError::MalformedInput { reason, .. } => ShorelineError::malformed(
                    source_name,
                    format!("transect '{name}' {reason}"),
                ),
                other => other,
            })?;
            store.insert(transect, source_name)?;
        }

        tracing::info!(
            "Loaded {} transects from {} (crs: {})",
            store.len(),
            source_name,
            if store.crs.is_some() { "present" } else { "none" }
        );
        Ok(store)
    }

    /// Add a transect, rejecting duplicate names
    fn insert(&mut self, transect: Transect, source_name: &str) -> Result<()> {
        if self.by_name.contains_key(transect.name()) {
            return Err(ShorelineError::malformed(
                source_name,
                format!("duplicate transect name '{}'", transect.name()),
            ));
        }
        self.by_name
            .insert(transect.name().to_string(), self.transects.len());
        self.transects.push(transect);
        Ok(())
    }

    /// Build a store directly from transects (no CRS)
    pub fn from_transects(transects: impl IntoIterator<Item = Transect>) -> Result<Self> {
        let mut store = Self::default();
        for transect in transects {
            store.insert(transect, "transect list")?;
        }
        Ok(store)
    }

    /// Look up a transect by name
    pub fn get(&self, name: &str) -> Result<&Transect> {
        self.by_name
            .get(name)
            .map(|&i| &self.transects[i])
            .ok_or_else(|| ShorelineError::UnknownTransect {
                name: name.to_string(),
                column: name.to_string(),
            })
    }

    /// Interpolate a point along `transect` at the given arc-length distance
    #[inline]
    pub fn interpolate(&self, transect: &Transect, distance: f64) -> Point<f64> {
        transect.interpolate(distance)
    }

    /// Coordinate reference system member copied from the source, if any
    #[inline]
    pub fn crs(&self) -> Option<&Value> {
        self.crs.as_ref()
    }

    /// Transect names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transects.iter().map(Transect::name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transects.is_empty()
    }
}
