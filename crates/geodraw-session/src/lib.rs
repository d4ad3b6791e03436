//! Interactive editing for geodraw.
//!
//! [`EditTools`] drives polygon and circle drawing sessions and vertex
//! editing against a [`MapAdapter`], committing finished shapes to a
//! [`geodraw_core::ShapeRepository`]. [`SceneMap`] is a headless adapter
//! that records what would be drawn.

mod circle;
mod history;
mod map;
mod outcome;
mod polygon;
mod scene;
mod tools;
mod vertex_edit;

pub use circle::{CircleSession, CircleStep};
pub use history::PointHistory;
pub use map::{MapAdapter, MarkerId, OverlayId, RingData};
pub use outcome::{Notice, NoticeLevel, Outcome, Rejection, SessionError};
pub use polygon::PolygonSession;
pub use scene::{OverlayKind, RenderedShape, SceneMap, SceneMarker, SceneOverlay};
pub use tools::{ActiveTool, EditTools, Key, MapEvent, Tool};
pub use vertex_edit::VertexEditSession;
