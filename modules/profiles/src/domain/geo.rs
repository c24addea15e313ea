//! Coordinate parsing and validation.
//!
//! Callers send raw pairs as `[latitude, longitude]`; stored points are
//! `[longitude, latitude]`. Inversion happens exactly once, in [`resolve_location`].
use serde_json::Value;

use crate::contract::model::{GeoPoint, LocationInput};
use crate::domain::error::DomainError;

/// Turn an untyped JSON location into a [`LocationInput`].
///
/// Accepts a numeric array (raw `[lat, lng]`) or a GeoJSON `Point` object.
pub fn parse_location_value(value: &Value) -> Result<LocationInput, DomainError> {
    match value {
        Value::Array(items) => numbers(items).map(LocationInput::LatLng),
        Value::Object(obj) => {
            match obj.get("type").and_then(Value::as_str) {
                Some("Point") => {}
                _ => {
                    return Err(DomainError::invalid_coordinates(
                        "GeoJSON location must have type \"Point\"",
                    ))
                }
            }
            let coords = match obj.get("coordinates") {
                Some(Value::Array(items)) => numbers(items)?,
                _ => {
                    return Err(DomainError::invalid_coordinates(
                        "GeoJSON location requires a coordinates array",
                    ))
                }
            };
            match coords.as_slice() {
                [lng, lat] => Ok(LocationInput::Point(GeoPoint::new(*lng, *lat))),
                _ => Err(DomainError::invalid_coordinates(format!(
                    "expected 2 coordinates [longitude, latitude], got {}",
                    coords.len()
                ))),
            }
        }
        _ => Err(DomainError::invalid_coordinates(
            "expected [latitude, longitude] or a GeoJSON Point",
        )),
    }
}

fn numbers(items: &[Value]) -> Result<Vec<f64>, DomainError> {
    items
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| DomainError::invalid_coordinates("coordinates must be numeric"))
        })
        .collect()
}

/// Validate an input and produce the point to store.
pub fn resolve_location(input: LocationInput) -> Result<GeoPoint, DomainError> {
    let point = match input {
        LocationInput::LatLng(pair) => match pair.as_slice() {
            [lat, lng] => GeoPoint::from_lat_lng(*lat, *lng),
            _ => {
                return Err(DomainError::invalid_coordinates(format!(
                    "expected 2 values [latitude, longitude], got {}",
                    pair.len()
                )))
            }
        },
        LocationInput::Point(p) => p,
    };
    check_bounds(&point)?;
    Ok(point)
}

fn check_bounds(p: &GeoPoint) -> Result<(), DomainError> {
    if !p.latitude.is_finite() || !p.longitude.is_finite() {
        return Err(DomainError::invalid_coordinates("coordinates must be finite"));
    }
    if !(-90.0..=90.0).contains(&p.latitude) {
        return Err(DomainError::invalid_coordinates(format!(
            "latitude {} out of range [-90, 90]",
            p.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&p.longitude) {
        return Err(DomainError::invalid_coordinates(format!(
            "longitude {} out of range [-180, 180]",
            p.longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_pair_is_inverted() {
        let input = parse_location_value(&json!([12.9, 77.6])).unwrap();
        let p = resolve_location(input).unwrap();
        assert_eq!(p.coordinates(), [77.6, 12.9]);
    }

    #[test]
    fn geojson_point_is_kept_as_is() {
        let input =
            parse_location_value(&json!({ "type": "Point", "coordinates": [77.6, 12.9] })).unwrap();
        let p = resolve_location(input).unwrap();
        assert_eq!(p.coordinates(), [77.6, 12.9]);
    }

    #[test]
    fn integer_coordinates_are_accepted() {
        let p = resolve_location(parse_location_value(&json!([10, 20])).unwrap()).unwrap();
        assert_eq!(p.coordinates(), [20.0, 10.0]);
    }

    #[test]
    fn non_numeric_pair_is_rejected() {
        let err = parse_location_value(&json!(["12.9", 77.6])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn wrong_arity_is_rejected() {
        for raw in [json!([]), json!([1.0]), json!([1.0, 2.0, 3.0])] {
            let input = parse_location_value(&raw).unwrap();
            assert!(resolve_location(input).is_err(), "{raw} should fail");
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        // latitude 95 is impossible
        assert!(resolve_location(LocationInput::LatLng(vec![95.0, 10.0])).is_err());
        // longitude 200 is impossible
        assert!(resolve_location(LocationInput::LatLng(vec![10.0, 200.0])).is_err());
        assert!(resolve_location(LocationInput::Point(GeoPoint::new(f64::NAN, 1.0))).is_err());
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert!(parse_location_value(&json!("12.9,77.6")).is_err());
        assert!(parse_location_value(&json!({ "type": "Polygon", "coordinates": [] })).is_err());
        assert!(parse_location_value(&json!({ "type": "Point" })).is_err());
        assert!(parse_location_value(&json!({ "type": "Point", "coordinates": [1.0] })).is_err());
    }
}
