//! The canonical FeatureCollection and its GeoJSON serialization.
use geo::Geometry;
use geozero::ToJson;
use serde::ser::{self, SerializeMap};
use serde_json::{Map, Value};

use crate::{error::Result, geometry::AoiGeometry, geometry::AoiPart};

/// Feature properties, carried through unchanged.
pub type Properties = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: AoiGeometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// # Errors
    ///
    /// Fails if geozero cannot write one of the geometries.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// # Errors
    ///
    /// Fails if geozero cannot write one of the geometries.
    pub fn to_geojson(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Wraps each part as a Feature, in order.
#[must_use]
pub fn assemble(parts: Vec<AoiPart>) -> FeatureCollection {
    FeatureCollection {
        features: parts
            .into_iter()
            .map(|part| Feature {
                geometry: part.geometry,
                properties: part.properties,
            })
            .collect(),
    }
}

/// Writes an [`AoiGeometry`] as a GeoJSON geometry object through geozero.
pub struct GeometrySerializer<'a>(pub &'a AoiGeometry);

impl ser::Serialize for GeometrySerializer<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let geometry = Geometry::from(self.0.clone());
        let json = geometry.to_json().map_err(ser::Error::custom)?;
        let value: Value = serde_json::from_str(&json).map_err(ser::Error::custom)?;
        ser::Serialize::serialize(&value, serializer)
    }
}

impl ser::Serialize for Feature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "Feature")?;
        map.serialize_entry("geometry", &GeometrySerializer(&self.geometry))?;
        map.serialize_entry("properties", &self.properties)?;
        map.end()
    }
}

impl ser::Serialize for FeatureCollection {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "FeatureCollection")?;
        map.serialize_entry("features", &self.features)?;
        map.end()
    }
}
