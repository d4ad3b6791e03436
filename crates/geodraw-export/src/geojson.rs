use anyhow::{Context, Result};
use geodraw_core::{Geometry, Shape};
use geodraw_geometry::LatLng;
use serde_json::{json, Map, Value};

/// Export shapes as a GeoJSON `FeatureCollection`.
///
/// Polygons become explicitly closed `Polygon` rings; circles become a
/// `Point` at the center with the radius kept in `properties.radius`.
pub fn export_geojson(shapes: &[Shape]) -> Result<String> {
    let features: Vec<Value> = shapes.iter().map(feature).collect();
    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    serde_json::to_string_pretty(&collection).context("Failed to serialize GeoJSON")
}

/// `[lng, lat]` position
fn position(p: &LatLng) -> Value {
    json!([p.lng, p.lat])
}

fn feature(shape: &Shape) -> Value {
    let geometry = match shape.geometry() {
        Geometry::Polygon { coordinates } => {
            let ring: Vec<Value> = coordinates
                .iter()
                .chain(coordinates.first())
                .map(position)
                .collect();
            json!({ "type": "Polygon", "coordinates": [ring] })
        }
        Geometry::Circle { center, .. } => {
            json!({ "type": "Point", "coordinates": position(center) })
        }
    };

    // Free-form attributes first so the fixed keys always win
    let mut properties: Map<String, Value> = shape
        .properties
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    properties.insert("id".into(), json!(shape.id().as_str()));
    properties.insert("name".into(), json!(shape.name));
    properties.insert("description".into(), json!(shape.kind().as_str()));
    properties.insert("area".into(), json!(shape.area()));
    properties.insert("radius".into(), json!(shape.radius()));

    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Vec<LatLng> {
        vec![
            LatLng::new(33.6844, 73.0479),
            LatLng::new(33.6851, 73.0502),
            LatLng::new(33.6832, 73.0511),
            LatLng::new(33.6825, 73.0488),
        ]
    }

    fn parse(shapes: &[Shape]) -> Value {
        serde_json::from_str(&export_geojson(shapes).unwrap()).unwrap()
    }

    #[test]
    fn empty_collection() {
        let json = parse(&[]);
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"], json!([]));
    }

    #[test]
    fn polygon_ring_is_closed_and_round_trips() {
        let shape = Shape::polygon("Plot", ring());
        let json = parse(std::slice::from_ref(&shape));
        let feature = &json["features"][0];

        assert_eq!(feature["geometry"]["type"], "Polygon");
        let outer = feature["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(outer.len(), 5);
        assert_eq!(outer.first(), outer.last());

        let mut points: Vec<LatLng> = outer
            .iter()
            .map(|p| LatLng::new(p[1].as_f64().unwrap(), p[0].as_f64().unwrap()))
            .collect();
        points.pop();
        assert_eq!(points, ring());
    }

    #[test]
    fn circle_is_a_point_with_radius_property() {
        let shape = Shape::circle("Well", LatLng::new(10.5, 20.25), 150.0);
        let json = parse(&[shape]);
        let feature = &json["features"][0];

        assert_eq!(feature["geometry"], json!({ "type": "Point", "coordinates": [20.25, 10.5] }));
        assert_eq!(feature["properties"]["radius"], 150.0);
        assert_eq!(feature["properties"]["description"], "circle");
    }

    #[test]
    fn properties_carry_fixed_keys() {
        let shape = Shape::polygon("Plot", ring())
            .with_property("zone", "G-6")
            .with_property("name", "shadowed");
        let json = parse(std::slice::from_ref(&shape));
        let props = &json["features"][0]["properties"];

        assert_eq!(props["id"], shape.id().as_str());
        assert_eq!(props["name"], "Plot");
        assert_eq!(props["description"], "polygon");
        assert_eq!(props["radius"], Value::Null);
        assert_eq!(props["zone"], "G-6");
        assert!(props["area"].as_f64().unwrap() > 0.0);
    }
}
