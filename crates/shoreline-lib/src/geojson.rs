//! Minimal serde model of the GeoJSON subset read and written by this crate
//!
//! Only what the pipeline needs is modelled strictly (feature collections, features
//! with properties and a geometry, LineString coordinates). Everything else, such as
//! the legacy top-level `crs` member, is carried as raw JSON so it passes through
//! unchanged.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FEATURE_COLLECTION: &str = "FeatureCollection";
pub const FEATURE: &str = "Feature";
pub const LINE_STRING: &str = "LineString";

/// A GeoJSON `FeatureCollection`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
    /// Coordinate reference system member, copied verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
}

/// A GeoJSON `Feature`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// A GeoJSON geometry object, with coordinates left unparsed until the type is known
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>, crs: Option<Value>) -> Self {
        Self {
            kind: FEATURE_COLLECTION.to_string(),
            features,
            crs,
        }
    }
}

impl Feature {
    /// Build a feature with the given id, geometry and empty properties
    pub fn new(id: impl Into<Value>, geometry: Geometry) -> Self {
        Self {
            kind: FEATURE.to_string(),
            id: Some(id.into()),
            geometry: Some(geometry),
            properties: Some(Map::new()),
        }
    }

    /// Look up a string property by key
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.as_ref()?.get(key)?.as_str()
    }
}

impl Geometry {
    /// Build a LineString geometry from 2D coordinates
    pub fn line_string(line: &LineString<f64>) -> Self {
        let coordinates = line
            .coords()
            .map(|c| Value::from(vec![c.x, c.y]))
            .collect::<Vec<_>>();
        Self {
            kind: LINE_STRING.to_string(),
            coordinates: Value::Array(coordinates),
        }
    }

    /// Parse the coordinates of a LineString geometry.
    ///
    /// Positions with more than two ordinates keep only x and y.
    /// Returns a human-readable reason on failure.
    pub fn to_line_string(&self) -> std::result::Result<LineString<f64>, String> {
        if self.kind != LINE_STRING {
            return Err(format!("expected a {LINE_STRING} geometry, found {}", self.kind));
        }
        let positions = self
            .coordinates
            .as_array()
            .ok_or_else(|| "coordinates are not an array".to_string())?;

        positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let ordinates = position
                    .as_array()
                    .filter(|o| o.len() >= 2)
                    .ok_or_else(|| format!("position {i} is not an [x, y] pair"))?;
                match (ordinates[0].as_f64(), ordinates[1].as_f64()) {
                    (Some(x), Some(y)) => Ok(Coord { x, y }),
                    _ => Err(format!("position {i} has non-numeric ordinates")),
                }
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(LineString::new)
    }
}
