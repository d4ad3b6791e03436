//! The map the controllers draw on.
//!
//! Controllers never own rendering state; they create overlays and markers
//! through this port and hold the returned handles.

use geodraw_core::{Shape, ShapeId, ShapeStyle};
use geodraw_geometry::{Bounds, LatLng};

/// Handle of a temporary overlay (preview polygon, guide line, preview circle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// Handle of a point marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Vertices read back from an overlay.
///
/// Some renderers report polygon vertices as a list of rings (outer ring
/// first) rather than a flat list.
#[derive(Debug, Clone, PartialEq)]
pub enum RingData {
    Flat(Vec<LatLng>),
    Nested(Vec<Vec<LatLng>>),
}

impl RingData {
    /// The outer ring
    pub fn outer_ring(self) -> Option<Vec<LatLng>> {
        match self {
            RingData::Flat(points) => Some(points),
            RingData::Nested(rings) => rings.into_iter().next(),
        }
    }
}

/// Rendering surface used by the drawing and editing controllers
pub trait MapAdapter {
    // --- Temporary overlays ---

    fn add_polygon(&mut self, points: &[LatLng], style: &ShapeStyle) -> OverlayId;
    fn add_polyline(&mut self, points: &[LatLng], style: &ShapeStyle) -> OverlayId;
    fn add_circle(&mut self, center: LatLng, radius: f64, style: &ShapeStyle) -> OverlayId;
    fn set_points(&mut self, overlay: OverlayId, points: &[LatLng]);
    fn set_radius(&mut self, overlay: OverlayId, radius: f64);
    /// Attach or replace the text label anchored to an overlay
    fn set_label(&mut self, overlay: OverlayId, text: &str);
    fn overlay_points(&self, overlay: OverlayId) -> Option<RingData>;
    fn remove_overlay(&mut self, overlay: OverlayId);

    // --- Markers ---

    fn add_marker(&mut self, at: LatLng, draggable: bool) -> MarkerId;
    fn move_marker(&mut self, marker: MarkerId, to: LatLng);
    fn marker_position(&self, marker: MarkerId) -> Option<LatLng>;
    fn remove_marker(&mut self, marker: MarkerId);

    // --- Committed shapes ---

    /// Render a committed shape, replacing any previous rendering of it
    fn show_shape(&mut self, shape: &Shape);
    fn hide_shape(&mut self, id: &ShapeId);
    fn restyle_shape(&mut self, id: &ShapeId, style: &ShapeStyle);

    fn fit_bounds(&mut self, bounds: Bounds);
}

/// Style of the guide line between the last vertex and the pointer
pub(crate) fn guide_style(base: &ShapeStyle) -> ShapeStyle {
    ShapeStyle {
        weight: 2.0,
        opacity: Some(0.7),
        dash_array: Some("5, 5".to_string()),
        ..base.clone()
    }
}
