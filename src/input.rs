//! Turns raw AOI input into a JSON value tree and identifies its GeoJSON type.
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde_json::Value;

use crate::error::{Error, Result};

/// Geometry types that are valid GeoJSON but are never accepted as an AOI.
pub(crate) const NON_POLYGONAL_TYPES: [&str; 4] =
    ["Point", "LineString", "MultiPoint", "MultiLineString"];

/// The raw forms an AOI can be handed over in.
#[derive(Debug, Clone)]
pub enum AoiInput {
    Bytes(Vec<u8>),
    Text(String),
    Value(Value),
    /// Path to a GeoJSON file on disk.
    Path(PathBuf),
}

impl From<Vec<u8>> for AoiInput {
    fn from(bytes: Vec<u8>) -> Self {
        AoiInput::Bytes(bytes)
    }
}

impl From<&[u8]> for AoiInput {
    fn from(bytes: &[u8]) -> Self {
        AoiInput::Bytes(bytes.to_vec())
    }
}

impl From<String> for AoiInput {
    fn from(text: String) -> Self {
        AoiInput::Text(text)
    }
}

impl From<&str> for AoiInput {
    fn from(text: &str) -> Self {
        AoiInput::Text(text.to_string())
    }
}

impl From<Value> for AoiInput {
    fn from(value: Value) -> Self {
        AoiInput::Value(value)
    }
}

impl From<&Path> for AoiInput {
    fn from(path: &Path) -> Self {
        AoiInput::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for AoiInput {
    fn from(path: PathBuf) -> Self {
        AoiInput::Path(path)
    }
}

/// Top-level GeoJSON types accepted as an AOI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoJsonType {
    Polygon,
    MultiPolygon,
    GeometryCollection,
    Feature,
    FeatureCollection,
}

impl GeoJsonType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GeoJsonType::Polygon => "Polygon",
            GeoJsonType::MultiPolygon => "MultiPolygon",
            GeoJsonType::GeometryCollection => "GeometryCollection",
            GeoJsonType::Feature => "Feature",
            GeoJsonType::FeatureCollection => "FeatureCollection",
        }
    }
}

impl fmt::Display for GeoJsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoJsonType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Polygon" => Ok(GeoJsonType::Polygon),
            "MultiPolygon" => Ok(GeoJsonType::MultiPolygon),
            "GeometryCollection" => Ok(GeoJsonType::GeometryCollection),
            "Feature" => Ok(GeoJsonType::Feature),
            "FeatureCollection" => Ok(GeoJsonType::FeatureCollection),
            other if NON_POLYGONAL_TYPES.contains(&other) => {
                Err(Error::UnsupportedGeometry(other.to_string()))
            }
            other => Err(Error::malformed(format!(
                "the type `{other}` must be one of Polygon, MultiPolygon, \
                 GeometryCollection, Feature or FeatureCollection"
            ))),
        }
    }
}

/// A decoded JSON object together with its top-level GeoJSON type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonDocument {
    pub root: Value,
    pub kind: GeoJsonType,
}

/// Decodes `input` and identifies the GeoJSON type of its root object.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the input is not valid JSON, is not an
/// object, or lacks a recognizable `type` member. A non-polygonal geometry type
/// at the root yields [`Error::UnsupportedGeometry`]. Reading a
/// [`AoiInput::Path`] can fail with [`Error::Io`].
pub fn normalize_input(input: AoiInput) -> Result<GeoJsonDocument> {
    let root = match input {
        AoiInput::Value(value) => value,
        AoiInput::Text(text) => decode(text.as_bytes())?,
        AoiInput::Bytes(bytes) => decode(&bytes)?,
        AoiInput::Path(path) => {
            log::debug!("Parsing GeoJSON file: {}", path.display());
            decode(&std::fs::read(path)?)?
        }
    };

    let kind = match &root {
        Value::Object(map) => match map.get("type") {
            Some(Value::String(kind)) => kind.parse()?,
            Some(_) => return Err(Error::malformed("the `type` member is not a string")),
            None => return Err(Error::malformed("the GeoJSON has no `type` member")),
        },
        _ => return Err(Error::malformed("the GeoJSON root is not an object")),
    };

    Ok(GeoJsonDocument { root, kind })
}

fn decode(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|err| Error::malformed(format!("invalid JSON: {err}")))
}
