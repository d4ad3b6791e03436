//! Click-by-click polygon drawing.

use geodraw_core::{ShapeKind, ShapeStyle};
use geodraw_geometry::{format_distance, LatLng};

use crate::history::PointHistory;
use crate::map::{guide_style, MapAdapter, MarkerId, OverlayId};
use crate::outcome::Rejection;

/// In-progress polygon: placed points, their history, and the preview
/// artifacts on the map
#[derive(Debug)]
pub struct PolygonSession {
    points: Vec<LatLng>,
    started: bool,
    history: PointHistory,
    style: ShapeStyle,
    preview: Option<OverlayId>,
    guide: Option<OverlayId>,
    /// One marker per vertex after the first
    vertex_markers: Vec<MarkerId>,
}

impl PolygonSession {
    pub fn new(max_history: usize) -> Self {
        Self {
            points: Vec::new(),
            started: false,
            history: PointHistory::new(max_history),
            style: ShapeStyle::for_kind(ShapeKind::Polygon),
            preview: None,
            guide: None,
            vertex_markers: Vec::new(),
        }
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Place a vertex
    pub fn click(&mut self, map: &mut dyn MapAdapter, at: LatLng) {
        self.history.save_state(&self.points);

        if !self.started {
            self.started = true;
            self.points = vec![at];
            self.preview = Some(map.add_polygon(&self.points, &self.style));
            self.guide = Some(map.add_polyline(&[], &guide_style(&self.style)));
        } else {
            self.points.push(at);
            self.redraw_preview(map);
            self.vertex_markers.push(map.add_marker(at, false));
        }
    }

    /// Stretch the guide line from the last vertex to the pointer
    pub fn pointer_move(&mut self, map: &mut dyn MapAdapter, at: LatLng) -> bool {
        let (Some(guide), Some(last)) = (self.guide, self.points.last().copied()) else {
            return false;
        };
        map.set_points(guide, &[last, at]);
        map.set_label(guide, &format_distance(last.distance_to(at)));
        true
    }

    /// Take the finished ring. Fewer than three points is refused and the
    /// session continues.
    pub fn finish(&mut self) -> Result<Vec<LatLng>, Rejection> {
        if !self.started || self.points.len() < 3 {
            return Err(Rejection::TooFewPoints {
                have: self.points.len(),
            });
        }
        Ok(self.points.clone())
    }

    pub fn undo(&mut self, map: &mut dyn MapAdapter) -> Result<(), Rejection> {
        let previous = self
            .history
            .undo(&self.points)
            .ok_or(Rejection::NothingToUndo)?;
        self.restore(map, previous);
        Ok(())
    }

    pub fn redo(&mut self, map: &mut dyn MapAdapter) -> Result<(), Rejection> {
        let next = self
            .history
            .redo(&self.points)
            .ok_or(Rejection::NothingToRedo)?;
        self.restore(map, next);
        Ok(())
    }

    fn restore(&mut self, map: &mut dyn MapAdapter, points: Vec<LatLng>) {
        self.points = points;
        self.redraw_preview(map);

        for marker in self.vertex_markers.drain(..) {
            map.remove_marker(marker);
        }
        for &p in self.points.iter().skip(1) {
            self.vertex_markers.push(map.add_marker(p, false));
        }
    }

    fn redraw_preview(&mut self, map: &mut dyn MapAdapter) {
        if let Some(preview) = self.preview {
            map.set_points(preview, &self.points);
        }
    }

    /// Remove every preview artifact and forget the points. Safe to call
    /// more than once.
    pub fn cleanup(&mut self, map: &mut dyn MapAdapter) {
        if let Some(preview) = self.preview.take() {
            map.remove_overlay(preview);
        }
        if let Some(guide) = self.guide.take() {
            map.remove_overlay(guide);
        }
        for marker in self.vertex_markers.drain(..) {
            map.remove_marker(marker);
        }
        self.points.clear();
        self.started = false;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{OverlayKind, SceneMap};

    fn p(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng)
    }

    #[test]
    fn first_click_creates_preview_and_guide() {
        let mut map = SceneMap::new();
        let mut session = PolygonSession::new(100);
        assert!(!session.pointer_move(&mut map, p(1.0, 1.0)));

        session.click(&mut map, p(0.0, 0.0));
        assert!(session.is_started());
        assert_eq!(map.overlay_count(), 2);
        assert_eq!(map.marker_count(), 0);
        assert!(session.can_undo());

        session.click(&mut map, p(0.0, 1.0));
        assert_eq!(map.marker_count(), 1);
        let preview = map
            .overlays()
            .find(|(_, o)| o.kind == OverlayKind::Polygon)
            .map(|(_, o)| o.points.clone())
            .unwrap();
        assert_eq!(preview, vec![p(0.0, 0.0), p(0.0, 1.0)]);
    }

    #[test]
    fn pointer_move_updates_distance_label() {
        let mut map = SceneMap::new();
        let mut session = PolygonSession::new(100);
        session.click(&mut map, p(0.0, 0.0));

        assert!(session.pointer_move(&mut map, p(0.0, 0.001)));
        assert_eq!(map.label(), Some("111 m"));
        assert!(session.pointer_move(&mut map, p(0.0, 0.1)));
        assert_eq!(map.label(), Some("11.12 km"));
    }

    #[test]
    fn finish_needs_three_points() {
        let mut map = SceneMap::new();
        let mut session = PolygonSession::new(100);
        assert_eq!(session.finish(), Err(Rejection::TooFewPoints { have: 0 }));

        session.click(&mut map, p(0.0, 0.0));
        session.click(&mut map, p(0.0, 1.0));
        assert_eq!(session.finish(), Err(Rejection::TooFewPoints { have: 2 }));
        assert!(session.is_started());

        session.click(&mut map, p(1.0, 1.0));
        assert_eq!(session.finish().unwrap().len(), 3);
    }

    #[test]
    fn undo_redo_keep_markers_in_step() {
        let mut map = SceneMap::new();
        let mut session = PolygonSession::new(100);
        for i in 0..4 {
            session.click(&mut map, p(i as f64, 0.0));
        }
        assert_eq!(map.marker_count(), 3);

        session.undo(&mut map).unwrap();
        session.undo(&mut map).unwrap();
        assert_eq!(session.points().len(), 2);
        assert_eq!(map.marker_count(), 1);

        session.redo(&mut map).unwrap();
        assert_eq!(session.points().len(), 3);
        assert_eq!(map.marker_count(), 2);

        session.click(&mut map, p(9.0, 9.0));
        assert_eq!(session.redo(&mut map), Err(Rejection::NothingToRedo));
    }

    #[test]
    fn cleanup_is_idempotent() {
        let mut map = SceneMap::new();
        let mut session = PolygonSession::new(100);
        for i in 0..3 {
            session.click(&mut map, p(i as f64, 1.0));
        }
        session.cleanup(&mut map);
        assert!(map.is_clean());
        assert!(session.points().is_empty());
        assert!(!session.can_undo());
        session.cleanup(&mut map);
        assert!(map.is_clean());
    }
}
