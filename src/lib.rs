//! # geojson-aoi
//!
//! Normalizes an Area of Interest given as GeoJSON into a canonical
//! `FeatureCollection` of Polygons.
//!
//! The input may be raw bytes, a JSON string, an already parsed
//! [`serde_json::Value`] or a path to a file, and may hold a bare Polygon or
//! MultiPolygon, a Feature, a FeatureCollection or (nested)
//! GeometryCollections. Any other geometry type is rejected.
//!
//! ## Pipeline
//!
//! 1. [`input`] decodes the input and identifies its GeoJSON type
//! 2. [`extract`] flattens the wrappers into polygonal geometries
//! 3. [`dimension`] drops Z coordinates
//! 4. [`crs`] warns about non-WGS84 coordinate systems, without reprojecting
//! 5. [`reconcile`] splits MultiPolygons or merges everything through a [`GeometryKernel`]
//! 6. [`output`] assembles the [`FeatureCollection`]
//!
//! ## Example
//!
//! ```rust
//! use geojson_aoi::{parse_aoi, parse_aoi_with, Error, ParseOptions, WarningMode};
//!
//! let geojson = r#"{
//!     "type": "Feature",
//!     "geometry": {
//!         "type": "Polygon",
//!         "coordinates": [[[0, 0, 10], [1, 0, 10], [1, 1, 10], [0, 1, 10], [0, 0, 10]]]
//!     },
//!     "properties": {"name": "field"},
//!     "crs": {"type": "name", "properties": {"name": "EPSG:3857"}}
//! }"#;
//!
//! // Unknown coordinate systems are raised by default.
//! assert!(matches!(parse_aoi(geojson, false), Err(Error::Crs(_))));
//!
//! // Or recorded, when asked to.
//! let options = ParseOptions::default().with_warnings(WarningMode::Collect);
//! let parsed = parse_aoi_with(geojson, &options).unwrap();
//!
//! assert_eq!(parsed.warnings.len(), 1);
//! assert_eq!(parsed.collection.features[0].properties["name"], "field");
//!
//! let value = parsed.collection.to_value().unwrap();
//! assert_eq!(value["features"][0]["geometry"]["coordinates"][0][0].as_array().unwrap().len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`crs`] - CRS and coordinate range warnings
//! - [`dimension`] - Z coordinate removal
//! - [`error`] - Error types and handling
//! - [`extract`] - Geometry extraction from GeoJSON wrappers
//! - [`geometry`] - Typed Polygon/MultiPolygon geometries
//! - [`input`] - Input decoding
//! - [`kernel`] - Union and convex hull
//! - [`output`] - The canonical FeatureCollection
//! - [`reconcile`] - Merging and splitting of multi-part geometries

pub mod crs;
pub mod dimension;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod input;
pub mod kernel;
mod options;
pub mod output;
mod parser;
pub mod reconcile;

pub use crs::{CoordinateOutOfRange, CrsWarning, WarningMode};
pub use error::{Error, Result};
pub use geometry::AoiGeometry;
pub use input::{AoiInput, GeoJsonType};
pub use kernel::{GeoKernel, GeometryKernel, KernelError};
pub use options::{ParseOptions, DEFAULT_MAX_NESTING_DEPTH};
pub use output::{Feature, FeatureCollection, Properties};
pub use parser::{parse_aoi, parse_aoi_with, parse_aoi_with_kernel, ParsedAoi};
pub use reconcile::MergeStrategy;
