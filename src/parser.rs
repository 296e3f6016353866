use crate::{
    crs::{check_coordinates, check_crs, CoordinateOutOfRange, CrsSpec, CrsWarning, WarningMode},
    dimension::reduce_dimensions,
    error::{Error, Result},
    extract::extract_geometries,
    geometry::AoiPart,
    input::{normalize_input, AoiInput},
    kernel::{GeoKernel, GeometryKernel},
    options::ParseOptions,
    output::{assemble, FeatureCollection},
    reconcile::reconcile,
};

/// A normalized AOI together with the warnings recorded while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAoi {
    pub collection: FeatureCollection,
    /// Always empty under [`WarningMode::Raise`].
    pub warnings: Vec<CrsWarning>,
    /// Recorded in every warning mode, never raised.
    pub advisories: Vec<CoordinateOutOfRange>,
}

/// Parses an AOI into a FeatureCollection of Polygons.
///
/// MultiPolygons are split into one Feature per Polygon, unless `merge` is
/// set, in which case all polygons are unioned into a single Feature. A
/// non-WGS84 CRS aborts the parse as [`Error::Crs`].
///
/// # Examples
///
/// ```
/// use geojson_aoi::parse_aoi;
///
/// let geojson = r#"{
///     "type": "MultiPolygon",
///     "coordinates": [
///         [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]],
///         [[[2, 2], [3, 2], [3, 3], [2, 3], [2, 2]]]
///     ]
/// }"#;
///
/// assert_eq!(parse_aoi(geojson, false).unwrap().len(), 2);
/// assert_eq!(parse_aoi(geojson, true).unwrap().len(), 1);
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The input is not a JSON object with a recognized GeoJSON `type`
/// - Any geometry in the input is not polygonal
/// - The merge fails in the geometry kernel
/// - A CRS warning is raised
pub fn parse_aoi(input: impl Into<AoiInput>, merge: bool) -> Result<FeatureCollection> {
    parse_aoi_with(input, &ParseOptions::default().with_merge(merge))
        .map(|parsed| parsed.collection)
}

/// Parses an AOI with explicit options, merging through [`GeoKernel`].
///
/// # Errors
///
/// See [`parse_aoi`].
pub fn parse_aoi_with(input: impl Into<AoiInput>, options: &ParseOptions) -> Result<ParsedAoi> {
    parse_aoi_with_kernel(input, options, &GeoKernel)
}

/// Parses an AOI with explicit options and a caller-provided geometry kernel.
///
/// The kernel is called at most once.
///
/// # Errors
///
/// See [`parse_aoi`].
pub fn parse_aoi_with_kernel<K>(
    input: impl Into<AoiInput>,
    options: &ParseOptions,
    kernel: &K,
) -> Result<ParsedAoi>
where
    K: GeometryKernel + ?Sized,
{
    let document = normalize_input(input.into())?;
    let crs = CrsSpec::from_root(&document.root);

    let parts = extract_geometries(document, options.max_nesting_depth)?
        .into_iter()
        .map(|raw| AoiPart::try_from(reduce_dimensions(raw)))
        .collect::<Result<Vec<_>>>()?;

    let mut warnings = Vec::new();
    if let Some(warning) = check_crs(crs.as_ref()) {
        deliver(warning, options.warnings, &mut warnings)?;
    }
    let advisories: Vec<_> = check_coordinates(parts.iter().map(|part| &part.geometry))
        .into_iter()
        .collect();

    let parts = reconcile(parts, options.merge, options.strategy, kernel)?;

    Ok(ParsedAoi {
        collection: assemble(parts),
        warnings,
        advisories,
    })
}

fn deliver(
    warning: CrsWarning,
    mode: WarningMode,
    warnings: &mut Vec<CrsWarning>,
) -> Result<()> {
    match mode {
        WarningMode::Raise => Err(Error::Crs(warning)),
        WarningMode::Collect => {
            warnings.push(warning);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{geometry::AoiGeometry, kernel::KernelError, reconcile::MergeStrategy};
    use approx::assert_relative_eq;
    use geo::{Area, Polygon};
    use serde_json::{json, Value};
    use std::{cell::Cell, path::Path};

    fn square(min: i64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [min, min], [min + 1, min], [min + 1, min + 1], [min, min + 1], [min, min]
            ]]
        })
    }

    fn feature(geometry: Value) -> Value {
        json!({"type": "Feature", "geometry": geometry, "properties": {}})
    }

    fn collection(features: Vec<Value>) -> Value {
        json!({"type": "FeatureCollection", "features": features})
    }

    fn polygon(feature: &crate::Feature) -> &Polygon<f64> {
        match &feature.geometry {
            AoiGeometry::Polygon(polygon) => polygon,
            AoiGeometry::MultiPolygon(_) => panic!("Expected Polygon geometry"),
        }
    }

    #[test]
    fn test_polygon() -> anyhow::Result<()> {
        let result = parse_aoi(Path::new("test-data/polygon.geojson"), false)?;

        assert_eq!(result.len(), 1);
        assert_eq!(polygon(&result.features[0]).exterior().0.len(), 5);
        assert!(result.features[0].properties.is_empty());
        Ok(())
    }

    #[test]
    fn test_polygon_with_holes_is_unchanged() -> anyhow::Result<()> {
        for merge in [false, true] {
            let result = parse_aoi(Path::new("test-data/polygon_holes.geojson"), merge)?;

            assert_eq!(result.len(), 1);
            assert_eq!(polygon(&result.features[0]).interiors().len(), 2);
        }
        Ok(())
    }

    #[test]
    fn test_z_dimension_is_stripped() -> anyhow::Result<()> {
        let with_z = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0], [0, 0, 0]]]
        });

        let result = parse_aoi(with_z, false)?;
        assert_eq!(result, parse_aoi(square(0), false)?);

        let value = result.to_value()?;
        for position in value["features"][0]["geometry"]["coordinates"][0]
            .as_array()
            .unwrap()
        {
            assert_eq!(position.as_array().unwrap().len(), 2);
        }
        Ok(())
    }

    #[test]
    fn test_feature_and_collection() -> anyhow::Result<()> {
        assert_eq!(parse_aoi(feature(square(0)), false)?.len(), 1);

        let result = parse_aoi(
            collection(vec![feature(square(0)), feature(square(0)), feature(square(0))]),
            false,
        )?;
        assert_eq!(result.len(), 3);
        Ok(())
    }

    #[test]
    fn test_properties_are_carried_through() -> anyhow::Result<()> {
        let result = parse_aoi(Path::new("test-data/feature_collection.geojson"), false)?;

        let properties = &result.features[0].properties;
        assert_eq!(properties["name"], "unit square");
        assert_eq!(properties["priority"], 1);
        Ok(())
    }

    #[test]
    fn test_geometry_collections_in_features() -> anyhow::Result<()> {
        let geometry_collection = json!({"type": "GeometryCollection", "geometries": [square(0)]});

        let result = parse_aoi(collection(vec![feature(geometry_collection.clone())]), false)?;
        assert_eq!(result.len(), 1);

        let result = parse_aoi(
            collection(vec![
                feature(geometry_collection.clone()),
                feature(geometry_collection),
            ]),
            false,
        )?;
        assert_eq!(result.len(), 2);
        Ok(())
    }

    #[test]
    fn test_nested_geometry_collection_is_flattened() -> anyhow::Result<()> {
        let result = parse_aoi(Path::new("test-data/nested_geometrycollection.geojson"), false)?;

        assert_eq!(result.len(), 2);
        assert_relative_eq!(polygon(&result.features[1]).exterior().0[0].x, 2.0);
        Ok(())
    }

    #[test]
    fn test_merge_disjoint_polygons() -> anyhow::Result<()> {
        let result = parse_aoi(collection(vec![feature(square(0)), feature(square(2))]), true)?;

        assert_eq!(result.len(), 1);
        match &result.features[0].geometry {
            AoiGeometry::MultiPolygon(multi) => {
                assert_eq!(multi.0.len(), 2);
                assert_relative_eq!(multi.unsigned_area(), 2.0);
            }
            AoiGeometry::Polygon(_) => panic!("Expected MultiPolygon geometry"),
        }
        Ok(())
    }

    #[test]
    fn test_merge_overlapping_polygons() -> anyhow::Result<()> {
        let large = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]
        });
        let result = parse_aoi(collection(vec![feature(large), feature(square(1))]), true)?;

        assert_eq!(result.len(), 1);
        assert_relative_eq!(polygon(&result.features[0]).unsigned_area(), 4.0);
        Ok(())
    }

    #[test]
    fn test_no_merge_keeps_polygons_apart() -> anyhow::Result<()> {
        let result = parse_aoi(collection(vec![feature(square(0)), feature(square(2))]), false)?;
        assert_eq!(result.len(), 2);
        Ok(())
    }

    #[test]
    fn test_multipolygon_split() -> anyhow::Result<()> {
        let result = parse_aoi(Path::new("test-data/multipolygon.geojson"), false)?;

        assert_eq!(result.len(), 3);
        for (feature, min) in result.features.iter().zip([0.0, 2.0, 4.0]) {
            let first = polygon(feature).exterior().0[0];
            assert_relative_eq!(first.x, min);
            assert_relative_eq!(first.y, min);
        }
        Ok(())
    }

    #[test]
    fn test_multipolygon_merge() -> anyhow::Result<()> {
        let result = parse_aoi(Path::new("test-data/multipolygon.geojson"), true)?;

        assert_eq!(result.len(), 1);
        assert_relative_eq!(
            result.features[0]
                .geometry
                .polygons()
                .iter()
                .map(|polygon| polygon.unsigned_area())
                .sum::<f64>(),
            3.0
        );
        Ok(())
    }

    #[test]
    fn test_convex_hull_merge() -> anyhow::Result<()> {
        let options = ParseOptions::default()
            .with_merge(true)
            .with_strategy(MergeStrategy::ConvexHull);
        let geojson = collection(vec![feature(square(0)), feature(square(2))]);
        let parsed = parse_aoi_with(geojson, &options)?;

        assert_eq!(parsed.collection.len(), 1);
        assert_relative_eq!(polygon(&parsed.collection.features[0]).unsigned_area(), 5.0);
        Ok(())
    }

    #[test]
    fn test_idempotence() -> anyhow::Result<()> {
        let first = parse_aoi(Path::new("test-data/multipolygon.geojson"), false)?;
        let second = parse_aoi(first.to_geojson()?, false)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(parse_aoi("{}", false), Err(Error::MalformedInput(_))));
        assert!(matches!(
            parse_aoi(b"\x00not json".to_vec(), false),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            parse_aoi(json!({"type": "Point", "coordinates": [0, 0]}), false),
            Err(Error::UnsupportedGeometry(_))
        ));
        assert!(matches!(
            parse_aoi(
                collection(vec![
                    feature(square(0)),
                    feature(json!({"type": "Point", "coordinates": [0, 0]}))
                ]),
                false
            ),
            Err(Error::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_broken_positions_are_malformed() {
        let short = json!({"type": "Polygon", "coordinates": [[[0], [1], [2], [0]]]});
        assert!(matches!(parse_aoi(short, false), Err(Error::MalformedInput(_))));

        let text = json!({
            "type": "Polygon",
            "coordinates": [[["a", 0], [1, 0], [1, 1], ["a", 0]]]
        });
        assert!(matches!(parse_aoi(text, false), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_no_warnings_valid_crs() -> anyhow::Result<()> {
        let mut geojson = collection(vec![feature(square(0))]);
        geojson["crs"] = json!({
            "type": "name",
            "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}
        });

        let options = ParseOptions::default().with_warnings(WarningMode::Collect);
        let parsed = parse_aoi_with(geojson.clone(), &options)?;
        assert!(parsed.warnings.is_empty());

        assert_eq!(parse_aoi(geojson, false)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_crs_is_raised() {
        let mut geojson = collection(vec![feature(square(0))]);
        geojson["crs"] = json!({"type": "name", "properties": {"name": "EPSG:3857"}});

        assert!(matches!(
            parse_aoi(geojson, false),
            Err(Error::Crs(CrsWarning::UnsupportedCrs(name))) if name == "EPSG:3857"
        ));
    }

    #[test]
    fn test_invalid_crs_is_collected() -> anyhow::Result<()> {
        let mut geojson = collection(vec![feature(square(0))]);
        geojson["crs"] = json!({"type": "name", "properties": {"name": "EPSG:3857"}});

        let options = ParseOptions::default().with_warnings(WarningMode::Collect);
        let parsed = parse_aoi_with(geojson, &options)?;

        assert_eq!(
            parsed.warnings,
            vec![CrsWarning::UnsupportedCrs("EPSG:3857".to_string())]
        );
        assert_eq!(parsed.collection.len(), 1);
        Ok(())
    }

    #[test]
    fn test_projected_coordinates_are_advisory() -> anyhow::Result<()> {
        let geojson = collection(vec![feature(json!({
            "type": "Polygon",
            "coordinates": [[
                [500_000, 4_000_000], [500_100, 4_000_000], [500_100, 4_000_100],
                [500_000, 4_000_000]
            ]]
        }))]);

        let first = parse_aoi(geojson.clone(), false)?;
        assert_eq!(first.len(), 1);
        assert_eq!(parse_aoi(first.to_geojson()?, false)?, first);

        let parsed = parse_aoi_with(geojson, &ParseOptions::default())?;
        assert!(parsed.warnings.is_empty());
        assert_eq!(
            parsed.advisories,
            vec![CoordinateOutOfRange {
                x: 500_000.0,
                y: 4_000_000.0
            }]
        );
        Ok(())
    }

    struct CountingKernel {
        calls: Cell<usize>,
    }

    impl GeometryKernel for CountingKernel {
        fn union(
            &self,
            polygons: Vec<Polygon<f64>>,
        ) -> std::result::Result<AoiGeometry, KernelError> {
            self.calls.set(self.calls.get() + 1);
            GeoKernel.union(polygons)
        }

        fn convex_hull(
            &self,
            polygons: Vec<Polygon<f64>>,
        ) -> std::result::Result<Polygon<f64>, KernelError> {
            self.calls.set(self.calls.get() + 1);
            GeoKernel.convex_hull(polygons)
        }
    }

    #[test]
    fn test_kernel_is_called_once() -> anyhow::Result<()> {
        let kernel = CountingKernel { calls: Cell::new(0) };
        let options = ParseOptions::default().with_merge(true);

        parse_aoi_with_kernel(Path::new("test-data/multipolygon.geojson"), &options, &kernel)?;
        assert_eq!(kernel.calls.get(), 1);

        parse_aoi_with_kernel(Path::new("test-data/polygon.geojson"), &options, &kernel)?;
        assert_eq!(kernel.calls.get(), 1);
        Ok(())
    }

    #[test]
    fn test_concurrent_calls() {
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|min| scope.spawn(move || parse_aoi(square(min * 2), false)))
                .collect();

            for (handle, min) in handles.into_iter().zip([0.0, 2.0, 4.0, 6.0]) {
                let result = handle.join().unwrap().unwrap();
                assert_relative_eq!(polygon(&result.features[0]).exterior().0[0].x, min);
            }
        });
    }
}
