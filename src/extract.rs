//! Walks Feature, FeatureCollection and GeometryCollection wrappers down to
//! the Polygon and MultiPolygon geometries they carry.
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    input::{GeoJsonDocument, GeoJsonType},
    output::Properties,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
    Polygon,
    MultiPolygon,
}

impl PolygonKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PolygonKind::Polygon => "Polygon",
            PolygonKind::MultiPolygon => "MultiPolygon",
        }
    }
}

/// A polygonal geometry still in its JSON form, with the properties of the
/// Feature it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGeometry {
    pub kind: PolygonKind,
    pub coordinates: Value,
    pub properties: Properties,
}

/// Flattens `document` into its polygonal geometries, in input order.
///
/// # Errors
///
/// - [`Error::UnsupportedGeometry`] if any geometry in the tree is not a
///   Polygon, MultiPolygon or GeometryCollection.
/// - [`Error::NestingTooDeep`] if GeometryCollections nest deeper than `max_depth`.
/// - [`Error::MalformedInput`] if a wrapper is structurally broken or the
///   document holds no geometry at all.
pub fn extract_geometries(
    document: GeoJsonDocument,
    max_depth: usize,
) -> Result<Vec<RawGeometry>> {
    let mut geometries = Vec::new();
    let extractor = Extractor { max_depth };

    log::debug!("Extracting polygonal geometries from a {}", document.kind);
    match document.kind {
        GeoJsonType::FeatureCollection => {
            extractor.feature_collection(into_object(document.root)?, &mut geometries)?;
        }
        GeoJsonType::Feature => {
            extractor.feature(into_object(document.root)?, &mut geometries)?;
        }
        GeoJsonType::Polygon | GeoJsonType::MultiPolygon | GeoJsonType::GeometryCollection => {
            extractor.geometry(document.root, &Properties::new(), 0, &mut geometries)?;
        }
    }

    if geometries.is_empty() {
        return Err(Error::malformed("no Polygon or MultiPolygon geometry found"));
    }
    Ok(geometries)
}

struct Extractor {
    max_depth: usize,
}

impl Extractor {
    fn feature_collection(
        &self,
        mut collection: Map<String, Value>,
        out: &mut Vec<RawGeometry>,
    ) -> Result<()> {
        let features = match collection.remove("features") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(features)) => features,
            Some(_) => return Err(Error::malformed("`features` is not an array")),
        };

        for feature in features {
            let feature = into_object(feature)?;
            match feature.get("type").and_then(Value::as_str) {
                Some("Feature") => self.feature(feature, out)?,
                _ => {
                    return Err(Error::malformed(
                        "FeatureCollection members must be of type Feature",
                    ))
                }
            }
        }
        Ok(())
    }

    fn feature(&self, mut feature: Map<String, Value>, out: &mut Vec<RawGeometry>) -> Result<()> {
        let properties = match feature.remove("properties") {
            None | Some(Value::Null) => Properties::new(),
            Some(Value::Object(properties)) => properties,
            Some(_) => return Err(Error::malformed("Feature `properties` is not an object")),
        };

        match feature.remove("geometry") {
            None | Some(Value::Null) => {
                log::debug!("Skipping Feature without geometry");
                Ok(())
            }
            Some(geometry) => self.geometry(geometry, &properties, 0, out),
        }
    }

    fn geometry(
        &self,
        geometry: Value,
        properties: &Properties,
        depth: usize,
        out: &mut Vec<RawGeometry>,
    ) -> Result<()> {
        let mut geometry = into_object(geometry)?;
        let kind = match geometry.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            _ => return Err(Error::malformed("geometry has no string `type` member")),
        };

        let kind = match kind.as_str() {
            "Polygon" => PolygonKind::Polygon,
            "MultiPolygon" => PolygonKind::MultiPolygon,
            "GeometryCollection" => {
                if depth >= self.max_depth {
                    return Err(Error::NestingTooDeep(self.max_depth));
                }
                let Some(Value::Array(members)) = geometry.remove("geometries") else {
                    return Err(Error::malformed("GeometryCollection has no `geometries` array"));
                };
                log::debug!("Flattening GeometryCollection of {} members", members.len());
                for member in members {
                    self.geometry(member, properties, depth + 1, out)?;
                }
                return Ok(());
            }
            other => return Err(Error::UnsupportedGeometry(other.to_string())),
        };

        let coordinates = match geometry.remove("coordinates") {
            Some(coordinates @ Value::Array(_)) => coordinates,
            _ => {
                return Err(Error::malformed(format!(
                    "{} has no `coordinates` array",
                    kind.as_str()
                )))
            }
        };

        out.push(RawGeometry {
            kind,
            coordinates,
            properties: properties.clone(),
        });
        Ok(())
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::malformed("expected a JSON object")),
    }
}
