//! GeoJSON clean-up for state maps.
//!
//! Backends name the state property differently and some ship `[lat, lon]`
//! positions instead of GeoJSON's `[lon, lat]`.

use serde_json::{Map, Value};

use crate::fields::{FieldPath, first_string, key};

const STATE_NAME_FIELDS: [FieldPath; 7] = [
    key("name"),
    key("STATE_NAME"),
    key("STE_NAME16"),
    key("ste_name"),
    key("State"),
    key("state_name"),
    key("state"),
];

/// Sets `properties.name` (and `properties.state` when missing) on every feature and
/// swaps the axes of any geometry whose first position has a latitude out of range.
pub fn normalize_feature_collection(mut geo: Value) -> Value {
    let Some(features) = geo.get_mut("features").and_then(Value::as_array_mut) else {
        return geo;
    };
    for feature in features.iter_mut() {
        normalize_feature(feature);
    }
    geo
}

fn normalize_feature(feature: &mut Value) {
    let Some(feature) = feature.as_object_mut() else {
        return;
    };

    let properties = feature
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if !properties.is_object() {
        *properties = Value::Object(Map::new());
    }
    let name = first_string(properties, &STATE_NAME_FIELDS).unwrap_or_default();
    if let Some(props) = properties.as_object_mut() {
        if props.get("state").is_none_or(Value::is_null) {
            props.insert("state".into(), Value::String(name.clone()));
        }
        props.insert("name".into(), Value::String(name));
    }

    if let Some(coordinates) = feature
        .get_mut("geometry")
        .and_then(|geometry| geometry.get_mut("coordinates"))
    {
        if needs_swap(coordinates) {
            swap_positions(coordinates);
        }
    }
}

fn is_position(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.len() >= 2 && items.iter().all(Value::is_number))
}

/// First position reached by always descending into the first element.
fn first_position(coordinates: &Value) -> Option<&Vec<Value>> {
    if is_position(coordinates) {
        return coordinates.as_array();
    }
    first_position(coordinates.as_array()?.first()?)
}

fn needs_swap(coordinates: &Value) -> bool {
    first_position(coordinates)
        .and_then(|position| position[1].as_f64())
        .is_some_and(|second| second.abs() > 90.0)
}

fn swap_positions(coordinates: &mut Value) {
    if is_position(coordinates) {
        if let Some(position) = coordinates.as_array_mut() {
            position.swap(0, 1);
        }
        return;
    }
    if let Some(children) = coordinates.as_array_mut() {
        children.iter_mut().for_each(swap_positions);
    }
}
