//! Two-click circle drawing: center, then edge.

use geodraw_core::{ShapeKind, ShapeStyle};
use geodraw_geometry::{format_radius, LatLng};

use crate::map::{MapAdapter, OverlayId};

/// What a click did to the circle session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleStep {
    Centered,
    Complete { center: LatLng, radius: f64 },
}

#[derive(Debug)]
pub struct CircleSession {
    center: Option<LatLng>,
    radius: f64,
    style: ShapeStyle,
    preview: Option<OverlayId>,
}

impl Default for CircleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CircleSession {
    pub fn new() -> Self {
        Self {
            center: None,
            radius: 0.0,
            style: ShapeStyle::for_kind(ShapeKind::Circle),
            preview: None,
        }
    }

    pub fn center(&self) -> Option<LatLng> {
        self.center
    }

    /// Radius currently previewed
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn click(&mut self, map: &mut dyn MapAdapter, at: LatLng) -> CircleStep {
        match self.center {
            None => {
                self.center = Some(at);
                self.radius = 0.0;
                self.preview = Some(map.add_circle(at, 0.0, &self.style));
                CircleStep::Centered
            }
            Some(center) => CircleStep::Complete {
                center,
                radius: center.distance_to(at),
            },
        }
    }

    pub fn pointer_move(&mut self, map: &mut dyn MapAdapter, at: LatLng) -> bool {
        let (Some(center), Some(preview)) = (self.center, self.preview) else {
            return false;
        };
        self.radius = center.distance_to(at);
        map.set_radius(preview, self.radius);
        map.set_label(preview, &format_radius(self.radius));
        true
    }

    pub fn cleanup(&mut self, map: &mut dyn MapAdapter) {
        if let Some(preview) = self.preview.take() {
            map.remove_overlay(preview);
        }
        self.center = None;
        self.radius = 0.0;
    }
}
