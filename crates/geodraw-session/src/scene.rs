//! In-memory map that records what is drawn on it.
//!
//! Used headless (the CLI) and to observe controller side effects in tests.

use std::collections::BTreeMap;

use geodraw_core::{Geometry, Shape, ShapeId, ShapeStyle};
use geodraw_geometry::{Bounds, LatLng};

use crate::map::{MapAdapter, MarkerId, OverlayId, RingData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Polygon,
    Polyline,
    Circle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneOverlay {
    pub kind: OverlayKind,
    pub points: Vec<LatLng>,
    pub radius: f64,
    pub style: ShapeStyle,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMarker {
    pub position: LatLng,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedShape {
    pub geometry: Geometry,
    pub style: ShapeStyle,
}

#[derive(Debug, Default)]
pub struct SceneMap {
    next_id: u64,
    overlays: BTreeMap<OverlayId, SceneOverlay>,
    markers: BTreeMap<MarkerId, SceneMarker>,
    shapes: BTreeMap<ShapeId, RenderedShape>,
    fitted: Option<Bounds>,
    nested_rings: bool,
}

impl SceneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report polygon vertices as `[[ring]]`, like renderers that model holes
    pub fn with_nested_rings(mut self) -> Self {
        self.nested_rings = true;
        self
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_overlay(&mut self, overlay: SceneOverlay) -> OverlayId {
        let id = OverlayId(self.next());
        self.overlays.insert(id, overlay);
        id
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&SceneOverlay> {
        self.overlays.get(&id)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (&OverlayId, &SceneOverlay)> {
        self.overlays.iter()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&SceneMarker> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Nothing temporary left on the map
    pub fn is_clean(&self) -> bool {
        self.overlays.is_empty() && self.markers.is_empty()
    }

    pub fn rendered(&self, id: &ShapeId) -> Option<&RenderedShape> {
        self.shapes.get(id)
    }

    pub fn rendered_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn fitted_bounds(&self) -> Option<Bounds> {
        self.fitted
    }

    /// First overlay carrying a label, if any
    pub fn label(&self) -> Option<&str> {
        self.overlays.values().find_map(|o| o.label.as_deref())
    }
}

impl MapAdapter for SceneMap {
    fn add_polygon(&mut self, points: &[LatLng], style: &ShapeStyle) -> OverlayId {
        self.insert_overlay(SceneOverlay {
            kind: OverlayKind::Polygon,
            points: points.to_vec(),
            radius: 0.0,
            style: style.clone(),
            label: None,
        })
    }

    fn add_polyline(&mut self, points: &[LatLng], style: &ShapeStyle) -> OverlayId {
        self.insert_overlay(SceneOverlay {
            kind: OverlayKind::Polyline,
            points: points.to_vec(),
            radius: 0.0,
            style: style.clone(),
            label: None,
        })
    }

    fn add_circle(&mut self, center: LatLng, radius: f64, style: &ShapeStyle) -> OverlayId {
        self.insert_overlay(SceneOverlay {
            kind: OverlayKind::Circle,
            points: vec![center],
            radius,
            style: style.clone(),
            label: None,
        })
    }

    fn set_points(&mut self, overlay: OverlayId, points: &[LatLng]) {
        if let Some(o) = self.overlays.get_mut(&overlay) {
            o.points = points.to_vec();
        }
    }

    fn set_radius(&mut self, overlay: OverlayId, radius: f64) {
        if let Some(o) = self.overlays.get_mut(&overlay) {
            o.radius = radius;
        }
    }

    fn set_label(&mut self, overlay: OverlayId, text: &str) {
        if let Some(o) = self.overlays.get_mut(&overlay) {
            o.label = Some(text.to_string());
        }
    }

    fn overlay_points(&self, overlay: OverlayId) -> Option<RingData> {
        let o = self.overlays.get(&overlay)?;
        if self.nested_rings && o.kind == OverlayKind::Polygon {
            Some(RingData::Nested(vec![o.points.clone()]))
        } else {
            Some(RingData::Flat(o.points.clone()))
        }
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        self.overlays.remove(&overlay);
    }

    fn add_marker(&mut self, at: LatLng, draggable: bool) -> MarkerId {
        let id = MarkerId(self.next());
        self.markers.insert(
            id,
            SceneMarker {
                position: at,
                draggable,
            },
        );
        id
    }

    fn move_marker(&mut self, marker: MarkerId, to: LatLng) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.position = to;
        }
    }

    fn marker_position(&self, marker: MarkerId) -> Option<LatLng> {
        self.markers.get(&marker).map(|m| m.position)
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn show_shape(&mut self, shape: &Shape) {
        self.shapes.insert(
            shape.id().clone(),
            RenderedShape {
                geometry: shape.geometry().clone(),
                style: shape.style.clone(),
            },
        );
    }

    fn hide_shape(&mut self, id: &ShapeId) {
        self.shapes.remove(id);
    }

    fn restyle_shape(&mut self, id: &ShapeId, style: &ShapeStyle) {
        if let Some(s) = self.shapes.get_mut(id) {
            s.style = style.clone();
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.fitted = Some(bounds);
    }
}
