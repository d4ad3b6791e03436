//! The committed shape collection.
//!
//! Every mutation writes the entire collection back through the
//! [`PersistencePort`] before returning.

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::id::ShapeId;
use crate::shape::{Shape, ShapeKind, ShapeUpdate};
use crate::storage::{HiddenState, PersistencePort};

/// Fraction of the collection that may be hidden at once
const HIDE_RATIO: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("shape {0} already exists")]
    DuplicateId(ShapeId),
    #[error("shape {0} not found")]
    NotFound(ShapeId),
    #[error("{kind} geometry cannot be committed")]
    InvalidGeometry { kind: ShapeKind },
    #[error("cannot turn a {from} into a {to}")]
    KindMismatch { from: ShapeKind, to: ShapeKind },
}

/// Result of a visibility toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
    /// Hide request refused; `limit` shapes are already hidden
    LimitReached { limit: usize },
}

/// Ordered shape collection with selection and visibility state
pub struct ShapeRepository {
    shapes: Vec<Shape>,
    store: Box<dyn PersistencePort>,
    hidden: HashSet<ShapeId>,
    hidden_kinds: HashSet<ShapeKind>,
    selected: Option<ShapeId>,
    clicked: Option<ShapeId>,
}

impl ShapeRepository {
    /// Empty repository writing to `store`
    pub fn new(store: Box<dyn PersistencePort>) -> Self {
        Self {
            shapes: Vec::new(),
            store,
            hidden: HashSet::new(),
            hidden_kinds: HashSet::new(),
            selected: None,
            clicked: None,
        }
    }

    /// Repository populated from whatever `store` holds
    pub fn load(store: Box<dyn PersistencePort>) -> Self {
        let mut shapes = store.load();
        let mut seen = HashSet::new();
        shapes.retain(|s| seen.insert(s.id().clone()));
        for shape in &mut shapes {
            shape.refresh_stats();
        }
        let stored = store.load_hidden();
        let mut repo = Self {
            shapes,
            ..Self::new(store)
        };

        // Ids of deleted shapes are dropped and the cap applies again
        let limit = repo.hide_limit();
        for id in stored.shapes {
            if repo.hidden.len() < limit && repo.contains(&id) {
                repo.hidden.insert(id);
            }
        }
        repo.hidden_kinds.extend(stored.kinds);

        info!(
            count = repo.shapes.len(),
            hidden = repo.hidden.len(),
            "loaded shape repository"
        );
        repo
    }

    fn persist(&mut self) {
        self.store.save(&self.shapes);
    }

    /// Write hidden shapes (in collection order) and hidden kinds
    fn persist_hidden(&mut self) {
        let shapes = self
            .shapes
            .iter()
            .map(Shape::id)
            .filter(|id| self.hidden.contains(*id))
            .cloned()
            .collect();
        let mut kinds: Vec<ShapeKind> = self.hidden_kinds.iter().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        self.store.save_hidden(&HiddenState { shapes, kinds });
    }

    /// Re-save the collection as is
    pub fn save(&mut self) {
        self.persist();
    }

    // --- Queries ---

    pub fn list(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of shapes of a kind
    pub fn count_of(&self, kind: ShapeKind) -> usize {
        self.shapes.iter().filter(|s| s.kind() == kind).count()
    }

    // --- Mutations ---

    /// Append a shape
    pub fn create(&mut self, shape: Shape) -> Result<&Shape, RepositoryError> {
        if self.contains(shape.id()) {
            return Err(RepositoryError::DuplicateId(shape.id().clone()));
        }
        if !shape.geometry().is_committable() {
            return Err(RepositoryError::InvalidGeometry { kind: shape.kind() });
        }

        debug!(id = %shape.id(), kind = %shape.kind(), "creating shape");
        self.shapes.push(shape);
        self.persist();

        let last = self.shapes.len() - 1;
        Ok(&self.shapes[last])
    }

    /// Merge `update` into the shape, stamping `updated_at`
    pub fn update(&mut self, id: &ShapeId, update: ShapeUpdate) -> Result<&Shape, RepositoryError> {
        let index = self.index_of(id)?;
        let shape = &mut self.shapes[index];

        if let Some(geometry) = &update.geometry {
            if geometry.kind() != shape.kind() {
                return Err(RepositoryError::KindMismatch {
                    from: shape.kind(),
                    to: geometry.kind(),
                });
            }
            if !geometry.is_committable() {
                return Err(RepositoryError::InvalidGeometry { kind: geometry.kind() });
            }
        }

        let ShapeUpdate {
            name,
            style,
            geometry,
            properties,
        } = update;

        if let Some(name) = name {
            shape.name = name;
        }
        if let Some(style) = style {
            shape.style = style;
        }
        if let Some(geometry) = geometry {
            shape.set_geometry(geometry);
        }
        for (key, value) in properties.into_iter().flatten() {
            if value.is_null() {
                shape.properties.remove(&key);
            } else {
                shape.properties.insert(key, value);
            }
        }
        shape.touch(Utc::now());

        debug!(id = %id, "updated shape");
        self.persist();
        Ok(&self.shapes[index])
    }

    /// Set stroke and fill colour
    pub fn update_color(&mut self, id: &ShapeId, color: &str) -> Result<&Shape, RepositoryError> {
        let style = self
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?
            .style
            .with_color(color);
        self.update(id, ShapeUpdate::new().style(style))
    }

    /// Remove a shape, returning it
    pub fn delete(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.index_of(id).ok()?;
        let shape = self.shapes.remove(index);

        if self.hidden.remove(id) {
            self.persist_hidden();
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.clicked.as_ref() == Some(id) {
            self.clicked = None;
        }

        debug!(id = %id, "deleted shape");
        self.persist();
        Some(shape)
    }

    /// Remove every shape and clear selections
    pub fn delete_all(&mut self) -> Vec<Shape> {
        let removed = std::mem::take(&mut self.shapes);
        let had_hidden = !self.hidden.is_empty();
        self.hidden.clear();
        self.selected = None;
        self.clicked = None;

        info!(count = removed.len(), "deleted all shapes");
        self.persist();
        if had_hidden {
            self.persist_hidden();
        }
        removed
    }

    fn index_of(&self, id: &ShapeId) -> Result<usize, RepositoryError> {
        self.shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    // --- Selection ---

    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected = id.filter(|id| self.contains(id));
    }

    pub fn selected(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn set_clicked(&mut self, id: Option<ShapeId>) {
        self.clicked = id.filter(|id| self.contains(id));
    }

    pub fn clicked(&self) -> Option<&Shape> {
        self.clicked.as_ref().and_then(|id| self.get(id))
    }

    // --- Visibility ---

    /// Maximum number of individually hidden shapes
    pub fn hide_limit(&self) -> usize {
        ((self.shapes.len() as f64 * HIDE_RATIO).floor() as usize).max(1)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_hidden(&self, id: &ShapeId) -> bool {
        self.hidden.contains(id)
    }

    /// Hide a visible shape or show a hidden one
    pub fn toggle_hidden(&mut self, id: &ShapeId) -> Result<Visibility, RepositoryError> {
        if !self.contains(id) {
            return Err(RepositoryError::NotFound(id.clone()));
        }
        if self.hidden.remove(id) {
            self.persist_hidden();
            return Ok(Visibility::Shown);
        }

        let limit = self.hide_limit();
        if self.hidden.len() >= limit {
            debug!(id = %id, limit, "hide limit reached");
            return Ok(Visibility::LimitReached { limit });
        }
        self.hidden.insert(id.clone());
        self.persist_hidden();
        Ok(Visibility::Hidden)
    }

    /// Show or hide every shape of a kind; returns whether the kind is now visible
    pub fn toggle_kind_visibility(&mut self, kind: ShapeKind) -> bool {
        let visible = if self.hidden_kinds.remove(&kind) {
            true
        } else {
            self.hidden_kinds.insert(kind);
            false
        };
        self.persist_hidden();
        visible
    }

    pub fn is_kind_visible(&self, kind: ShapeKind) -> bool {
        !self.hidden_kinds.contains(&kind)
    }

    /// Whether a shape should be drawn: its kind is visible and it is not hidden
    pub fn is_visible(&self, id: &ShapeId) -> bool {
        self.get(id)
            .is_some_and(|s| self.is_kind_visible(s.kind()) && !self.is_hidden(id))
    }
}
