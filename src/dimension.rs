//! Drops the Z (and any further) ordinate from GeoJSON positions.
use serde_json::Value;

use crate::extract::RawGeometry;

/// Returns `geometry` with every position truncated to `[x, y]`.
#[must_use]
pub fn reduce_dimensions(geometry: RawGeometry) -> RawGeometry {
    RawGeometry {
        coordinates: strip_z(geometry.coordinates),
        ..geometry
    }
}

/// Recursively truncates positions in a GeoJSON coordinate tree.
///
/// An array whose first element is a number is a position; anything else is
/// walked into. Non-array values are returned untouched.
#[must_use]
pub fn strip_z(coordinates: Value) -> Value {
    match coordinates {
        Value::Array(mut position) if position.first().is_some_and(Value::is_number) => {
            position.truncate(2);
            Value::Array(position)
        }
        Value::Array(nested) => Value::Array(nested.into_iter().map(strip_z).collect()),
        other => other,
    }
}
