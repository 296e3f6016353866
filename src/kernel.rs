//! The computational geometry behind merging: union and convex hull.
//!
//! [`GeometryKernel`] is the seam the reconciler calls through; [`GeoKernel`]
//! implements it natively with the `geo` crate.
use std::collections::VecDeque;

use geo::{Area, BooleanOps, ConvexHull, MultiPolygon, Polygon};

use crate::geometry::{AoiGeometry, MIN_RING_LEN};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("No polygons were given to the geometry kernel.")]
    EmptyInput,

    #[error("Polygon {index} is degenerate: {reason}")]
    DegenerateInput { index: usize, reason: String },

    #[error("The geometry kernel returned an empty result.")]
    EmptyResult,
}

/// Union and convex hull over a set of polygons.
///
/// Implementations are called once per merge and must not retry.
pub trait GeometryKernel {
    /// The geometric union of `polygons`, a Polygon when contiguous.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] for empty or degenerate input, or an empty union.
    fn union(&self, polygons: Vec<Polygon<f64>>) -> Result<AoiGeometry, KernelError>;

    /// The smallest convex polygon enclosing `polygons`.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] for empty or degenerate input, or a hull
    /// without area.
    fn convex_hull(&self, polygons: Vec<Polygon<f64>>) -> Result<Polygon<f64>, KernelError>;
}

/// Native kernel backed by `geo`'s boolean operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoKernel;

impl GeometryKernel for GeoKernel {
    fn union(&self, polygons: Vec<Polygon<f64>>) -> Result<AoiGeometry, KernelError> {
        validate(&polygons)?;

        let mut queue: VecDeque<MultiPolygon<f64>> = polygons
            .into_iter()
            .map(|polygon| MultiPolygon::new(vec![polygon]))
            .collect();

        // Pairwise reduction keeps intermediate results small.
        while queue.len() > 1 {
            let mut next_queue = VecDeque::with_capacity(queue.len().div_ceil(2));
            while let Some(a) = queue.pop_front() {
                if let Some(b) = queue.pop_front() {
                    next_queue.push_back(a.union(&b));
                } else {
                    next_queue.push_back(a);
                }
            }
            queue = next_queue;
        }

        let merged = queue.pop_front().ok_or(KernelError::EmptyResult)?;
        if merged.0.is_empty() || merged.unsigned_area() <= 0.0 {
            return Err(KernelError::EmptyResult);
        }
        Ok(AoiGeometry::from(merged))
    }

    fn convex_hull(&self, polygons: Vec<Polygon<f64>>) -> Result<Polygon<f64>, KernelError> {
        validate(&polygons)?;

        let hull = MultiPolygon::new(polygons).convex_hull();
        if hull.unsigned_area() <= 0.0 {
            return Err(KernelError::EmptyResult);
        }
        Ok(hull)
    }
}

fn validate(polygons: &[Polygon<f64>]) -> Result<(), KernelError> {
    if polygons.is_empty() {
        return Err(KernelError::EmptyInput);
    }
    for (index, polygon) in polygons.iter().enumerate() {
        let degenerate = |reason: &str| KernelError::DegenerateInput {
            index,
            reason: reason.to_string(),
        };
        if polygon.exterior().0.len() < MIN_RING_LEN {
            return Err(degenerate("exterior ring has too few positions"));
        }
        let finite = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.0.iter())
            .all(|coord| coord.x.is_finite() && coord.y.is_finite());
        if !finite {
            return Err(degenerate("non-finite coordinate"));
        }
        if polygon.unsigned_area() <= 0.0 {
            return Err(degenerate("zero area"));
        }
    }
    Ok(())
}
