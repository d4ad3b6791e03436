//! Shape types.
//!
//! `Geometry` is a closed tagged union; every geometry change goes through
//! `Shape::set_geometry` so the cached stats never go stale.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use geodraw_geometry::{centroid, circle_bounds, Bounds, LatLng, RingStats};
use serde::{Deserialize, Serialize};

use crate::id::ShapeId;

/// Free-form attributes (name, category, zone, notes, ...)
pub type Properties = BTreeMap<String, serde_json::Value>;

/// Kind tag of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Circle,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Circle => "circle",
        }
    }

    /// Display name used for auto-naming ("Polygon 3")
    pub fn title(self) -> &'static str {
        match self {
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Circle => "Circle",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polygon" => Ok(ShapeKind::Polygon),
            "circle" => Ok(ShapeKind::Circle),
            other => Err(format!("unknown shape kind {other:?}")),
        }
    }
}

/// Structural geometry of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Vertex ring, first point not repeated
    Polygon { coordinates: Vec<LatLng> },
    /// Center point and radius in meters
    Circle { center: LatLng, radius: f64 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Polygon { .. } => ShapeKind::Polygon,
            Geometry::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Ordered coordinates: the ring for a polygon, `[center]` for a circle
    pub fn coordinates(&self) -> &[LatLng] {
        match self {
            Geometry::Polygon { coordinates } => coordinates,
            Geometry::Circle { center, .. } => std::slice::from_ref(center),
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Geometry::Polygon { .. } => None,
            Geometry::Circle { radius, .. } => Some(*radius),
        }
    }

    /// Area, perimeter and vertex count.
    ///
    /// Circles use the exact planar formulas and report no vertices.
    pub fn stats(&self) -> RingStats {
        match self {
            Geometry::Polygon { coordinates } => RingStats::of(coordinates),
            Geometry::Circle { radius, .. } => RingStats {
                area: PI * radius * radius,
                perimeter: 2.0 * PI * radius,
                vertices: 0,
            },
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Polygon { coordinates } => Bounds::of(coordinates),
            Geometry::Circle { center, radius } => Some(circle_bounds(*center, *radius)),
        }
    }

    pub fn centroid(&self) -> Option<LatLng> {
        match self {
            Geometry::Polygon { coordinates } => centroid(coordinates),
            Geometry::Circle { center, .. } => Some(*center),
        }
    }

    /// Whether this geometry may be committed.
    ///
    /// Every number must be finite, including the derived stats, since JSON
    /// has no encoding for NaN or infinity.
    pub fn is_committable(&self) -> bool {
        let shape_ok = match self {
            Geometry::Polygon { coordinates } => {
                coordinates.len() >= 3 && coordinates.iter().all(LatLng::is_finite)
            }
            Geometry::Circle { center, radius } => {
                center.is_finite() && radius.is_finite() && *radius >= 0.0
            }
        };
        if !shape_ok {
            return false;
        }
        let stats = self.stats();
        stats.area.is_finite() && stats.perimeter.is_finite()
    }
}

/// Presentation style; not geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    pub fill_color: String,
    pub weight: f64,
    pub fill_opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl ShapeStyle {
    pub fn solid(color: &str) -> Self {
        Self {
            color: color.to_string(),
            fill_color: color.to_string(),
            weight: 3.0,
            fill_opacity: 0.2,
            opacity: None,
            dash_array: None,
        }
    }

    /// Default style for newly drawn shapes of a kind
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Polygon => Self::solid("#3B82F6"),
            ShapeKind::Circle => Self::solid("#10B981"),
        }
    }

    /// Faded, dashed variant shown while a shape's vertices are being edited
    pub fn dimmed(&self) -> Self {
        Self {
            opacity: Some(0.5),
            dash_array: Some("5, 5".to_string()),
            ..self.clone()
        }
    }

    /// Same style with stroke and fill set to `color`
    pub fn with_color(&self, color: &str) -> Self {
        Self {
            color: color.to_string(),
            fill_color: color.to_string(),
            ..self.clone()
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::for_kind(ShapeKind::Polygon)
    }
}

/// A committed shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    id: ShapeId,
    pub name: String,
    #[serde(flatten)]
    geometry: Geometry,
    pub style: ShapeStyle,
    area: f64,
    perimeter: f64,
    vertices: usize,
    #[serde(default)]
    pub properties: Properties,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Shape {
    /// Build a shape with a fresh id, default style and computed stats
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        let kind = geometry.kind();
        Self::with_id(ShapeId::generate(kind), name, geometry)
    }

    pub fn with_id(id: ShapeId, name: impl Into<String>, geometry: Geometry) -> Self {
        let stats = geometry.stats();
        Self {
            id,
            name: name.into(),
            style: ShapeStyle::for_kind(geometry.kind()),
            geometry,
            area: stats.area,
            perimeter: stats.perimeter,
            vertices: stats.vertices,
            properties: Properties::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn polygon(name: impl Into<String>, coordinates: Vec<LatLng>) -> Self {
        Self::new(name, Geometry::Polygon { coordinates })
    }

    pub fn circle(name: impl Into<String>, center: LatLng, radius: f64) -> Self {
        Self::new(name, Geometry::Circle { center, radius })
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn coordinates(&self) -> &[LatLng] {
        self.geometry.coordinates()
    }

    pub fn radius(&self) -> Option<f64> {
        self.geometry.radius()
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn centroid(&self) -> Option<LatLng> {
        self.geometry.centroid()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.geometry.bounds()
    }

    /// Replace the geometry and recompute the cached stats
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.refresh_stats();
    }

    pub fn refresh_stats(&mut self) {
        let stats = self.geometry.stats();
        self.area = stats.area;
        self.perimeter = stats.perimeter;
        self.vertices = stats.vertices;
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// String property lookup
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

/// Partial update merged into an existing shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeUpdate {
    pub name: Option<String>,
    pub style: Option<ShapeStyle>,
    pub geometry: Option<Geometry>,
    /// Merged key by key; a `null` value removes the key
    pub properties: Option<Properties>,
}

impl ShapeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn style(mut self, style: ShapeStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn coordinates(self, coordinates: Vec<LatLng>) -> Self {
        self.geometry(Geometry::Polygon { coordinates })
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
        ]
    }

    #[test]
    fn polygon_stats_are_computed_on_construction() {
        let shape = Shape::polygon("Polygon 1", ring());
        assert_eq!(shape.kind(), ShapeKind::Polygon);
        assert_eq!(shape.vertices(), 3);
        assert!(shape.area() > 0.0);
        assert!(shape.perimeter() > 0.0);
        assert_eq!(shape.style, ShapeStyle::for_kind(ShapeKind::Polygon));
        assert!(shape.updated_at().is_none());
    }

    #[test]
    fn circle_exposes_center_as_single_coordinate() {
        let center = LatLng::new(10.0, 10.0);
        let shape = Shape::circle("Circle 1", center, 1000.0);
        assert_eq!(shape.coordinates(), &[center]);
        assert_eq!(shape.radius(), Some(1000.0));
        assert!((shape.area() - PI * 1.0e6).abs() < 1e-6);
        assert_eq!(shape.centroid(), Some(center));
    }

    #[test]
    fn set_geometry_refreshes_stats() {
        let mut shape = Shape::polygon("p", ring());
        let before = shape.area();
        let mut bigger = ring();
        bigger.push(LatLng::new(1.0, 0.0));
        shape.set_geometry(Geometry::Polygon { coordinates: bigger });
        assert_eq!(shape.vertices(), 4);
        assert!(shape.area() > before);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Circle".parse::<ShapeKind>(), Ok(ShapeKind::Circle));
        assert_eq!("polygon".parse::<ShapeKind>(), Ok(ShapeKind::Polygon));
        assert!("hexagon".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn committable_geometry() {
        assert!(Geometry::Polygon { coordinates: ring() }.is_committable());
        assert!(!Geometry::Polygon { coordinates: ring()[..2].to_vec() }.is_committable());
        assert!(!Geometry::Circle { center: LatLng::new(0.0, 0.0), radius: f64::NAN }.is_committable());
        assert!(!Geometry::Circle { center: LatLng::new(f64::NAN, 0.0), radius: 10.0 }.is_committable());
        assert!(!Geometry::Circle { center: LatLng::new(0.0, 0.0), radius: f64::INFINITY }.is_committable());

        let mut with_nan = ring();
        with_nan[0] = LatLng::new(f64::NAN, 0.0);
        assert!(!Geometry::Polygon { coordinates: with_nan }.is_committable());

        // Finite vertices whose area overflows
        let huge = vec![
            LatLng::new(0.0, -1e308),
            LatLng::new(0.0, 1e308),
            LatLng::new(1.0, 1.0),
        ];
        assert!(!Geometry::Polygon { coordinates: huge }.is_committable());
    }

    #[test]
    fn serialized_shape_is_tagged_by_type() {
        let shape = Shape::polygon("p", ring()).with_property("zone", "G-6");
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "polygon");
        assert_eq!(json["coordinates"][1]["lng"], 1.0);
        assert_eq!(json["properties"]["zone"], "G-6");
        assert!(json.get("createdAt").is_some());

        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), shape.id());
        assert_eq!(back.geometry(), shape.geometry());
        assert_eq!(back.created_at(), shape.created_at());
        assert_eq!(back.property("zone"), Some("G-6"));
    }

    #[test]
    fn dimmed_style_keeps_colors() {
        let style = ShapeStyle::for_kind(ShapeKind::Circle);
        let dimmed = style.dimmed();
        assert_eq!(dimmed.color, style.color);
        assert_eq!(dimmed.opacity, Some(0.5));
        assert_eq!(dimmed.dash_array.as_deref(), Some("5, 5"));
    }
}
