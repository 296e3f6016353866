//! Merges or splits multi-part geometries into the final Polygon sequence.
use serde::Deserialize;

use crate::{
    error::Result,
    geometry::{AoiGeometry, AoiPart},
    kernel::GeometryKernel,
    output::Properties,
};

/// How polygons are combined when merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Exact geometric union.
    #[default]
    Union,
    /// Convex hull around every polygon.
    ConvexHull,
}

/// Reconciles the extracted parts into one geometry per output Feature.
///
/// A lone Polygon is passed through. With `merge` set, every polygon is
/// combined through `kernel` into a single geometry carrying empty
/// properties. Otherwise each MultiPolygon is split into its Polygons, each
/// keeping the properties of its source.
///
/// # Errors
///
/// Returns [`crate::Error::GeometryKernel`] if the kernel rejects the merge.
pub fn reconcile<K>(
    parts: Vec<AoiPart>,
    merge: bool,
    strategy: MergeStrategy,
    kernel: &K,
) -> Result<Vec<AoiPart>>
where
    K: GeometryKernel + ?Sized,
{
    let lone_polygon = matches!(
        parts.as_slice(),
        [AoiPart {
            geometry: AoiGeometry::Polygon(_),
            ..
        }]
    );
    if lone_polygon {
        return Ok(parts);
    }

    if merge {
        let polygons: Vec<_> = parts
            .into_iter()
            .flat_map(|part| part.geometry.into_polygons())
            .collect();
        log::debug!("Merging {} polygons with {strategy:?}", polygons.len());

        let geometry = match strategy {
            MergeStrategy::Union => kernel.union(polygons)?,
            MergeStrategy::ConvexHull => AoiGeometry::Polygon(kernel.convex_hull(polygons)?),
        };
        return Ok(vec![AoiPart {
            geometry,
            properties: Properties::new(),
        }]);
    }

    Ok(parts.into_iter().flat_map(split).collect())
}

fn split(part: AoiPart) -> Vec<AoiPart> {
    let AoiPart {
        geometry,
        properties,
    } = part;
    geometry
        .into_polygons()
        .into_iter()
        .map(|polygon| AoiPart {
            geometry: AoiGeometry::Polygon(polygon),
            properties: properties.clone(),
        })
        .collect()
}
