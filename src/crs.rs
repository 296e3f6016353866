//! Coordinate reference system checks.
//!
//! Coordinates are never reprojected. A non-WGS84 CRS produces a
//! [`CrsWarning`] that the caller either receives as an error
//! ([`WarningMode::Raise`]) or finds in the collected warnings
//! ([`WarningMode::Collect`]). Coordinates outside the WGS84 degree range
//! only produce an advisory [`CoordinateOutOfRange`], which never halts.
use serde::Deserialize;
use serde_json::Value;

use crate::geometry::AoiGeometry;

/// CRS names under which coordinates are already longitude/latitude WGS84.
pub const CANONICAL_CRS_NAMES: [&str; 4] = [
    "urn:ogc:def:crs:OGC:1.3:CRS84",
    "urn:ogc:def:crs:EPSG::4326",
    "EPSG:4326",
    "WGS 84",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CrsWarning {
    #[error(
        "Unsupported coordinate system `{0}`, coordinates are assumed to be WGS84 (EPSG:4326) \
         and were not transformed."
    )]
    UnsupportedCrs(String),
}

/// Advisory: a position that is not a plausible longitude/latitude pair.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("The coordinate ({x}, {y}) is outside the WGS84 degree range.")]
pub struct CoordinateOutOfRange {
    pub x: f64,
    pub y: f64,
}

/// How warnings are delivered to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningMode {
    /// The first warning aborts the parse as [`crate::Error::Crs`].
    #[default]
    Raise,
    /// Warnings are recorded and parsing continues.
    Collect,
}

/// The `crs` member of a GeoJSON root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrsSpec {
    pub name: Option<String>,
}

impl CrsSpec {
    /// Reads the legacy named CRS member, `{"type": "name", "properties": {"name": ...}}`.
    #[must_use]
    pub fn from_root(root: &Value) -> Option<Self> {
        match root.get("crs")? {
            Value::Null => None,
            crs => Some(CrsSpec {
                name: crs
                    .pointer("/properties/name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
        }
    }

    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| CANONICAL_CRS_NAMES.contains(&name))
    }
}

/// Warns when a CRS is declared that is not WGS84.
#[must_use]
pub fn check_crs(crs: Option<&CrsSpec>) -> Option<CrsWarning> {
    let crs = crs?;
    if crs.is_canonical() {
        return None;
    }
    let name = crs.name.clone().unwrap_or_else(|| "<unnamed>".to_string());
    log::warn!(
        "Unsupported coordinate system {name}, it is recommended to use WGS84 (EPSG:4326)"
    );
    Some(CrsWarning::UnsupportedCrs(name))
}

/// Flags the first geometry whose first position is not a plausible
/// longitude/latitude pair.
#[must_use]
pub fn check_coordinates<'a>(
    geometries: impl IntoIterator<Item = &'a AoiGeometry>,
) -> Option<CoordinateOutOfRange> {
    let in_range = |x: f64, y: f64| (-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y);
    let coord = geometries
        .into_iter()
        .filter_map(AoiGeometry::first_coord)
        .find(|coord| !in_range(coord.x, coord.y))?;
    log::warn!(
        "The coordinate ({}, {}) is not a valid WGS84 position",
        coord.x,
        coord.y
    );
    Some(CoordinateOutOfRange {
        x: coord.x,
        y: coord.y,
    })
}
