//! Typed polygonal geometries, converted from their JSON form through geozero.
use geo::{Coord, Geometry, MultiPolygon, Polygon};
use geozero::{geojson::GeoJson, ToGeo};
use serde_json::json;

use crate::{
    error::{Error, Result},
    extract::RawGeometry,
    output::Properties,
};

/// Minimum number of positions in a closed ring.
pub const MIN_RING_LEN: usize = 4;

/// The only geometry shapes an AOI may take.
#[derive(Debug, Clone, PartialEq)]
pub enum AoiGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl AoiGeometry {
    /// The constituent polygons, one for a Polygon.
    #[must_use]
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match self {
            AoiGeometry::Polygon(polygon) => std::slice::from_ref(polygon),
            AoiGeometry::MultiPolygon(multi) => &multi.0,
        }
    }

    #[must_use]
    pub fn into_polygons(self) -> Vec<Polygon<f64>> {
        match self {
            AoiGeometry::Polygon(polygon) => vec![polygon],
            AoiGeometry::MultiPolygon(multi) => multi.0,
        }
    }

    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self, AoiGeometry::MultiPolygon(_))
    }

    /// First position of the first exterior ring.
    #[must_use]
    pub fn first_coord(&self) -> Option<Coord<f64>> {
        self.polygons()
            .first()
            .and_then(|polygon| polygon.exterior().0.first().copied())
    }
}

/// A union result collapses to a Polygon when it is contiguous.
impl From<MultiPolygon<f64>> for AoiGeometry {
    fn from(mut multi: MultiPolygon<f64>) -> Self {
        if multi.0.len() == 1 {
            if let Some(polygon) = multi.0.pop() {
                return AoiGeometry::Polygon(polygon);
            }
        }
        AoiGeometry::MultiPolygon(multi)
    }
}

impl From<Polygon<f64>> for AoiGeometry {
    fn from(polygon: Polygon<f64>) -> Self {
        AoiGeometry::Polygon(polygon)
    }
}

impl From<AoiGeometry> for Geometry<f64> {
    fn from(geometry: AoiGeometry) -> Self {
        match geometry {
            AoiGeometry::Polygon(polygon) => Geometry::Polygon(polygon),
            AoiGeometry::MultiPolygon(multi) => Geometry::MultiPolygon(multi),
        }
    }
}

/// A typed geometry paired with the properties of its source Feature.
#[derive(Debug, Clone, PartialEq)]
pub struct AoiPart {
    pub geometry: AoiGeometry,
    pub properties: Properties,
}

impl TryFrom<RawGeometry> for AoiPart {
    type Error = Error;

    fn try_from(raw: RawGeometry) -> Result<Self> {
        let text = json!({
            "type": raw.kind.as_str(),
            "coordinates": raw.coordinates,
        })
        .to_string();

        let geometry = GeoJson(&text)
            .to_geo()
            .map_err(|err| Error::malformed(format!("invalid coordinates: {err}")))?;
        let geometry = match geometry {
            Geometry::Polygon(polygon) => AoiGeometry::Polygon(polygon),
            Geometry::MultiPolygon(multi) => AoiGeometry::MultiPolygon(multi),
            _ => return Err(Error::UnsupportedGeometry(raw.kind.as_str().to_string())),
        };
        check_rings(&geometry)?;

        Ok(AoiPart {
            geometry,
            properties: raw.properties,
        })
    }
}

fn check_rings(geometry: &AoiGeometry) -> Result<()> {
    if geometry.polygons().is_empty() {
        return Err(Error::malformed("MultiPolygon has no polygons"));
    }
    for polygon in geometry.polygons() {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            if ring.0.len() < MIN_RING_LEN {
                return Err(Error::malformed(format!(
                    "a ring needs at least {MIN_RING_LEN} positions, found {}",
                    ring.0.len()
                )));
            }
        }
    }
    Ok(())
}
