//! The edit-tools controller.
//!
//! Owns the shape repository, the map, and at most one active session
//! (polygon drawing, circle drawing or vertex editing). Activating anything
//! first cleans up whatever was active before.

use geodraw_core::{
    Geometry, Shape, ShapeId, ShapeKind, ShapeRepository, ShapeUpdate, Visibility,
};
use geodraw_geometry::LatLng;
use tracing::{debug, error, info};

use crate::circle::{CircleSession, CircleStep};
use crate::map::{MapAdapter, MarkerId};
use crate::outcome::{Notice, NoticeLevel, Outcome, Rejection, SessionError};
use crate::polygon::PolygonSession;
use crate::vertex_edit::VertexEditSession;

/// Drawing tools a user can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Polygon,
    Circle,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Polygon => "Polygon",
            Tool::Circle => "Circle",
        }
    }
}

/// What is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTool {
    Draw(Tool),
    EditVertices,
}

/// Keyboard input relevant to the controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Input delivered by the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click(LatLng),
    Move(LatLng),
    DoubleClick(LatLng),
    Key(Key),
    MarkerDrag { marker: MarkerId, to: LatLng },
}

#[derive(Debug, Default)]
enum Session {
    #[default]
    Idle,
    Polygon(PolygonSession),
    Circle(CircleSession),
    VertexEdit(VertexEditSession),
}

/// Edit-tools state: repository, map and the single active session
pub struct EditTools<M: MapAdapter> {
    repo: ShapeRepository,
    map: M,
    session: Session,
    drawing_enabled: bool,
    max_history: usize,
    polygon_count: usize,
    circle_count: usize,
    notice: Option<Notice>,
}

impl<M: MapAdapter> EditTools<M> {
    /// Wrap a repository and render its visible shapes onto `map`
    pub fn new(repo: ShapeRepository, mut map: M) -> Self {
        for shape in repo.iter() {
            if repo.is_visible(shape.id()) {
                map.show_shape(shape);
            }
        }
        let polygon_count = repo.count_of(ShapeKind::Polygon);
        let circle_count = repo.count_of(ShapeKind::Circle);

        Self {
            repo,
            map,
            session: Session::Idle,
            drawing_enabled: true,
            max_history: 100,
            polygon_count,
            circle_count,
            notice: None,
        }
    }

    /// Bound on each undo/redo stack of future polygon sessions
    pub fn with_undo_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn repository(&self) -> &ShapeRepository {
        &self.repo
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn into_parts(mut self) -> (ShapeRepository, M) {
        self.cleanup();
        (self.repo, self.map)
    }

    // --- Notices ---

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Error => error!("{message}"),
            _ => info!("{message}"),
        }
        self.notice = Some(Notice { level, message });
    }

    /// Latest notice, if any
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // --- Tool selection ---

    pub fn active_tool(&self) -> Option<ActiveTool> {
        match self.session {
            Session::Idle => None,
            Session::Polygon(_) => Some(ActiveTool::Draw(Tool::Polygon)),
            Session::Circle(_) => Some(ActiveTool::Draw(Tool::Circle)),
            Session::VertexEdit(_) => Some(ActiveTool::EditVertices),
        }
    }

    pub fn is_drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.drawing_enabled = enabled;
    }

    /// Tear down the active session, whatever its state
    fn cleanup(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::Polygon(mut s) => s.cleanup(&mut self.map),
            Session::Circle(mut s) => s.cleanup(&mut self.map),
            Session::VertexEdit(s) => s.cleanup(&mut self.map),
        }
    }

    /// Switch to a drawing tool, or to none
    pub fn set_tool(&mut self, tool: Option<Tool>) -> Outcome {
        self.cleanup();

        let Some(tool) = tool else {
            return Outcome::Applied;
        };
        if !self.drawing_enabled {
            self.notify(
                NoticeLevel::Info,
                "Drawing is disabled. Enable drawing to start.",
            );
            return Outcome::Rejected(Rejection::DrawingDisabled);
        }

        debug!(tool = tool.name(), "tool selected");
        self.session = match tool {
            Tool::Polygon => Session::Polygon(PolygonSession::new(self.max_history)),
            Tool::Circle => Session::Circle(CircleSession::new()),
        };
        Outcome::Applied
    }

    // --- Events ---

    pub fn handle_event(&mut self, event: MapEvent) -> Outcome {
        match event {
            MapEvent::Click(at) => self.click(at),
            MapEvent::Move(at) => self.pointer_move(at),
            MapEvent::DoubleClick(_) => self.double_click(),
            MapEvent::Key(Key::Escape) => self.escape(),
            MapEvent::Key(Key::Other) => Outcome::Ignored,
            MapEvent::MarkerDrag { marker, to } => self.drag_marker(marker, to),
        }
    }

    pub fn click(&mut self, at: LatLng) -> Outcome {
        match &mut self.session {
            Session::Polygon(s) => {
                s.click(&mut self.map, at);
                Outcome::Applied
            }
            Session::Circle(s) => match s.click(&mut self.map, at) {
                CircleStep::Centered => Outcome::Applied,
                CircleStep::Complete { center, radius } => {
                    self.commit(Geometry::Circle { center, radius })
                }
            },
            Session::Idle | Session::VertexEdit(_) => Outcome::Ignored,
        }
    }

    pub fn pointer_move(&mut self, at: LatLng) -> Outcome {
        let moved = match &mut self.session {
            Session::Polygon(s) => s.pointer_move(&mut self.map, at),
            Session::Circle(s) => s.pointer_move(&mut self.map, at),
            Session::Idle | Session::VertexEdit(_) => false,
        };
        if moved {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    /// Finish the polygon being drawn
    pub fn double_click(&mut self) -> Outcome {
        let Session::Polygon(s) = &mut self.session else {
            return Outcome::Ignored;
        };
        match s.finish() {
            Ok(ring) => self.commit(Geometry::Polygon { coordinates: ring }),
            Err(rejection) => {
                debug!("{rejection}");
                Outcome::Rejected(rejection)
            }
        }
    }

    /// Cancel a drawing that has started
    pub fn escape(&mut self) -> Outcome {
        let kind = match &self.session {
            Session::Polygon(s) if s.is_started() => "Polygon",
            Session::Circle(s) if s.center().is_some() => "Circle",
            _ => return Outcome::Ignored,
        };
        self.cleanup();
        self.notify(NoticeLevel::Info, format!("{kind} drawing cancelled"));
        Outcome::Cancelled
    }

    fn counter(&mut self, kind: ShapeKind) -> &mut usize {
        match kind {
            ShapeKind::Polygon => &mut self.polygon_count,
            ShapeKind::Circle => &mut self.circle_count,
        }
    }

    fn commit(&mut self, geometry: Geometry) -> Outcome {
        let kind = geometry.kind();
        let name = format!("{} {}", kind.title(), *self.counter(kind) + 1);

        let shape = Shape::new(name, geometry);
        let message = match kind {
            ShapeKind::Polygon => format!("Polygon created with {} vertices", shape.vertices()),
            ShapeKind::Circle => format!(
                "Circle created with radius {:.2}m",
                shape.radius().unwrap_or_default()
            ),
        };

        self.cleanup();
        match self.repo.create(shape) {
            Ok(shape) => {
                let id = shape.id().clone();
                *self.counter(kind) += 1;
                self.rerender(&id);
                self.notify(NoticeLevel::Success, message);
                Outcome::Committed(id)
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not save shape: {e}"));
                Outcome::Failed(e.into())
            }
        }
    }

    // --- Undo / redo of the polygon being drawn ---

    pub fn can_undo(&self) -> bool {
        matches!(&self.session, Session::Polygon(s) if s.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        matches!(&self.session, Session::Polygon(s) if s.can_redo())
    }

    pub fn undo(&mut self) -> Outcome {
        let Session::Polygon(s) = &mut self.session else {
            return Outcome::Rejected(Rejection::NoActiveDrawing);
        };
        match s.undo(&mut self.map) {
            Ok(()) => Outcome::Applied,
            Err(r) => Outcome::Rejected(r),
        }
    }

    pub fn redo(&mut self) -> Outcome {
        let Session::Polygon(s) = &mut self.session else {
            return Outcome::Rejected(Rejection::NoActiveDrawing);
        };
        match s.redo(&mut self.map) {
            Ok(()) => Outcome::Applied,
            Err(r) => Outcome::Rejected(r),
        }
    }

    /// Points of the polygon being drawn
    pub fn draft_points(&self) -> &[LatLng] {
        match &self.session {
            Session::Polygon(s) => s.points(),
            _ => &[],
        }
    }

    // --- Vertex editing ---

    /// Open a committed polygon for vertex dragging
    pub fn begin_vertex_edit(&mut self, id: &ShapeId) -> Outcome {
        let Some(shape) = self.repo.get(id) else {
            self.notify(NoticeLevel::Info, "Shape not found");
            return Outcome::Rejected(Rejection::ShapeNotFound(id.clone()));
        };
        if shape.kind() != ShapeKind::Polygon {
            self.notify(
                NoticeLevel::Info,
                "Only polygons support vertex editing currently",
            );
            return Outcome::Rejected(Rejection::NotAPolygon(id.clone()));
        }
        let shape = shape.clone();

        self.cleanup();
        self.repo.select(Some(id.clone()));
        self.session = Session::VertexEdit(VertexEditSession::begin(&mut self.map, &shape));
        self.notify(NoticeLevel::Info, "Editing geometry");
        Outcome::Applied
    }

    pub fn editing_shape(&self) -> Option<&ShapeId> {
        match &self.session {
            Session::VertexEdit(s) => Some(s.shape_id()),
            _ => None,
        }
    }

    pub fn drag_marker(&mut self, marker: MarkerId, to: LatLng) -> Outcome {
        let Session::VertexEdit(s) = &mut self.session else {
            return Outcome::Ignored;
        };
        if s.drag(&mut self.map, marker, to) {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    pub fn drag_vertex(&mut self, index: usize, to: LatLng) -> Outcome {
        let Session::VertexEdit(s) = &mut self.session else {
            return Outcome::Ignored;
        };
        if s.drag_vertex(&mut self.map, index, to) {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    /// Commit the dragged vertices
    pub fn save_vertex_edit(&mut self) -> Outcome {
        let Session::VertexEdit(s) = &self.session else {
            return Outcome::Rejected(Rejection::NoActiveEdit);
        };
        let id = s.shape_id().clone();

        let ring = match s.read_ring(&self.map) {
            Ok(ring) => ring,
            Err(e) => {
                self.notify(NoticeLevel::Error, "Could not retrieve polygon coordinates");
                return Outcome::Failed(e);
            }
        };

        if let Err(e) = self.repo.update(&id, ShapeUpdate::new().coordinates(ring)) {
            self.notify(NoticeLevel::Error, format!("Could not save polygon: {e}"));
            return Outcome::Failed(SessionError::from(e));
        }

        self.cleanup();
        self.repo.select(None);
        if let Some(shape) = self.repo.get(&id) {
            if self.repo.is_visible(&id) {
                self.map.show_shape(shape);
            }
        }
        self.notify(NoticeLevel::Success, "Polygon saved successfully");
        Outcome::Committed(id)
    }

    /// Drop the dragged vertices and leave the shape as it was
    pub fn cancel_vertex_edit(&mut self) -> Outcome {
        if !matches!(self.session, Session::VertexEdit(_)) {
            return Outcome::Rejected(Rejection::NoActiveEdit);
        }
        self.cleanup();
        self.repo.select(None);
        Outcome::Cancelled
    }

    // --- Shape operations ---

    pub fn update_shape(&mut self, id: &ShapeId, update: ShapeUpdate) -> Outcome {
        match self.repo.update(id, update) {
            Ok(_) => {
                self.rerender(id);
                self.notify(NoticeLevel::Success, "Shape updated");
                Outcome::Committed(id.clone())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not update shape: {e}"));
                Outcome::Failed(e.into())
            }
        }
    }

    pub fn update_color(&mut self, id: &ShapeId, color: &str) -> Outcome {
        match self.repo.update_color(id, color) {
            Ok(_) => {
                self.rerender(id);
                self.notify(NoticeLevel::Success, "Color updated");
                Outcome::Committed(id.clone())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not update color: {e}"));
                Outcome::Failed(e.into())
            }
        }
    }

    fn rerender(&mut self, id: &ShapeId) {
        if !self.repo.is_visible(id) {
            return;
        }
        if let Some(shape) = self.repo.get(id) {
            self.map.show_shape(shape);
        }
    }

    pub fn delete_shape(&mut self, id: &ShapeId) -> Outcome {
        if self.editing_shape() == Some(id) {
            self.cleanup();
        }
        match self.repo.delete(id) {
            Some(_) => {
                self.map.hide_shape(id);
                self.notify(NoticeLevel::Success, "Shape deleted");
                Outcome::Applied
            }
            None => Outcome::Rejected(Rejection::ShapeNotFound(id.clone())),
        }
    }

    pub fn delete_all(&mut self) -> Outcome {
        if self.editing_shape().is_some() {
            self.cleanup();
        }
        for shape in self.repo.delete_all() {
            self.map.hide_shape(shape.id());
        }
        self.notify(NoticeLevel::Success, "All shapes deleted");
        Outcome::Applied
    }

    /// Hide or show a single shape, subject to the hide limit
    pub fn toggle_shape_visibility(&mut self, id: &ShapeId) -> Outcome {
        match self.repo.toggle_hidden(id) {
            Ok(Visibility::Hidden) => {
                self.map.hide_shape(id);
                Outcome::Applied
            }
            Ok(Visibility::Shown) => {
                self.rerender(id);
                Outcome::Applied
            }
            Ok(Visibility::LimitReached { limit }) => {
                Outcome::Rejected(Rejection::HideLimitReached { limit })
            }
            Err(_) => Outcome::Rejected(Rejection::ShapeNotFound(id.clone())),
        }
    }

    /// Hide or show every shape of a kind
    pub fn toggle_kind_visibility(&mut self, kind: ShapeKind) -> Outcome {
        self.repo.toggle_kind_visibility(kind);
        let ids: Vec<ShapeId> = self
            .repo
            .iter()
            .filter(|s| s.kind() == kind)
            .map(|s| s.id().clone())
            .collect();
        for id in ids {
            if self.repo.is_visible(&id) {
                self.rerender(&id);
            } else {
                self.map.hide_shape(&id);
            }
        }
        Outcome::Applied
    }

    /// Fit the map to a shape
    pub fn zoom_to_shape(&mut self, id: &ShapeId) -> Outcome {
        match self.repo.get(id).and_then(|s| s.bounds()) {
            Some(bounds) => {
                self.map.fit_bounds(bounds);
                Outcome::Applied
            }
            None => Outcome::Rejected(Rejection::ShapeNotFound(id.clone())),
        }
    }

    /// Persist the collection as it stands
    pub fn save_shapes(&mut self) {
        self.repo.save();
        self.notify(NoticeLevel::Success, "Shapes saved");
    }
}
