//! Dragging the vertices of a committed polygon.
//!
//! The committed rendering is dimmed while a separate preview polygon follows
//! the draggable markers. Nothing reaches the repository until the caller
//! commits the ring returned by [`VertexEditSession::read_ring`].

use geodraw_core::{Shape, ShapeId, ShapeStyle};
use geodraw_geometry::LatLng;

use crate::map::{MapAdapter, MarkerId, OverlayId};
use crate::outcome::SessionError;

#[derive(Debug)]
pub struct VertexEditSession {
    shape_id: ShapeId,
    original_style: ShapeStyle,
    markers: Vec<MarkerId>,
    preview: OverlayId,
}

impl VertexEditSession {
    /// Open `shape` for editing. The caller guarantees it is a polygon.
    pub fn begin(map: &mut dyn MapAdapter, shape: &Shape) -> Self {
        map.restyle_shape(shape.id(), &shape.style.dimmed());

        let coordinates = shape.coordinates();
        let preview = map.add_polygon(coordinates, &shape.style);
        let markers = coordinates
            .iter()
            .map(|&p| map.add_marker(p, true))
            .collect();

        Self {
            shape_id: shape.id().clone(),
            original_style: shape.style.clone(),
            markers,
            preview,
        }
    }

    pub fn shape_id(&self) -> &ShapeId {
        &self.shape_id
    }

    pub fn markers(&self) -> &[MarkerId] {
        &self.markers
    }

    /// Follow a marker drag; `false` if the marker is not ours
    pub fn drag(&mut self, map: &mut dyn MapAdapter, marker: MarkerId, to: LatLng) -> bool {
        if !self.markers.contains(&marker) {
            return false;
        }
        map.move_marker(marker, to);
        self.redraw_preview(map);
        true
    }

    /// Drag the marker of vertex `index`
    pub fn drag_vertex(&mut self, map: &mut dyn MapAdapter, index: usize, to: LatLng) -> bool {
        match self.markers.get(index).copied() {
            Some(marker) => self.drag(map, marker, to),
            None => false,
        }
    }

    /// Current marker positions; `None` if the map lost any of them
    fn marker_ring(&self, map: &dyn MapAdapter) -> Option<Vec<LatLng>> {
        self.markers
            .iter()
            .map(|&m| map.marker_position(m))
            .collect()
    }

    fn redraw_preview(&self, map: &mut dyn MapAdapter) {
        if let Some(ring) = self.marker_ring(map) {
            map.set_points(self.preview, &ring);
        }
    }

    /// The edited ring as currently drawn.
    ///
    /// Fails if the preview is gone, has fewer than three points, or no longer
    /// matches one vertex per marker.
    pub fn read_ring(&self, map: &dyn MapAdapter) -> Result<Vec<LatLng>, SessionError> {
        let ring = map
            .overlay_points(self.preview)
            .and_then(|data| data.outer_ring())
            .ok_or(SessionError::CoordinatesUnavailable)?;
        if ring.len() < 3 {
            return Err(SessionError::CoordinatesUnavailable);
        }
        match self.marker_ring(map) {
            Some(markers) if markers.len() == ring.len() => Ok(ring),
            _ => Err(SessionError::CoordinatesUnavailable),
        }
    }

    /// Remove markers and preview and restore the shape's style
    pub fn cleanup(self, map: &mut dyn MapAdapter) {
        for marker in self.markers {
            map.remove_marker(marker);
        }
        map.remove_overlay(self.preview);
        map.restyle_shape(&self.shape_id, &self.original_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneMap;

    fn square() -> Shape {
        Shape::polygon(
            "square",
            vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 1.0),
                LatLng::new(1.0, 1.0),
                LatLng::new(1.0, 0.0),
            ],
        )
    }

    #[test]
    fn begin_dims_and_spawns_markers() {
        let mut map = SceneMap::new();
        let shape = square();
        map.show_shape(&shape);

        let session = VertexEditSession::begin(&mut map, &shape);
        assert_eq!(map.marker_count(), 4);
        assert_eq!(map.overlay_count(), 1);
        assert_eq!(map.rendered(shape.id()).unwrap().style.opacity, Some(0.5));
        assert!(session.markers().iter().all(|&m| map.marker(m).unwrap().draggable));

        session.cleanup(&mut map);
        assert!(map.is_clean());
        assert_eq!(map.rendered(shape.id()).unwrap().style, shape.style);
    }

    #[test]
    fn drag_redraws_preview() {
        let mut map = SceneMap::new();
        let shape = square();
        let mut session = VertexEditSession::begin(&mut map, &shape);

        assert!(session.drag_vertex(&mut map, 2, LatLng::new(2.0, 2.0)));
        assert!(!session.drag_vertex(&mut map, 7, LatLng::new(2.0, 2.0)));
        assert!(!session.drag(&mut map, MarkerId(9999), LatLng::new(2.0, 2.0)));

        let ring = session.read_ring(&map).unwrap();
        assert_eq!(ring[2], LatLng::new(2.0, 2.0));
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn nested_rings_use_outer_ring() {
        let mut map = SceneMap::new().with_nested_rings();
        let shape = square();
        let session = VertexEditSession::begin(&mut map, &shape);
        assert_eq!(session.read_ring(&map).unwrap(), shape.coordinates());
    }

    #[test]
    fn missing_preview_is_an_error() {
        let mut map = SceneMap::new();
        let shape = square();
        let session = VertexEditSession::begin(&mut map, &shape);
        map.remove_overlay(session.preview);
        assert_eq!(
            session.read_ring(&map),
            Err(SessionError::CoordinatesUnavailable)
        );
    }

    #[test]
    fn lost_marker_is_an_error_not_a_shorter_ring() {
        let mut map = SceneMap::new();
        let shape = square();
        let mut session = VertexEditSession::begin(&mut map, &shape);
        let lost = session.markers()[1];
        map.remove_marker(lost);

        // Dragging another vertex leaves the preview untouched
        assert!(session.drag_vertex(&mut map, 2, LatLng::new(2.0, 2.0)));
        assert_eq!(
            map.overlay(session.preview).unwrap().points,
            shape.coordinates()
        );
        assert_eq!(
            session.read_ring(&map),
            Err(SessionError::CoordinatesUnavailable)
        );
    }
}
