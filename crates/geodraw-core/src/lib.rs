//! Core types for geodraw.
//!
//! - [`Shape`]: a committed polygon or circle with cached stats
//! - [`ShapeRepository`]: the ordered shape collection, persisted on every mutation
//! - [`PersistencePort`]: where the collection is written (`ShapeStore` over a key-value backend)

mod id;
mod repository;
mod shape;
mod storage;

pub use id::ShapeId;
pub use repository::{RepositoryError, ShapeRepository, Visibility};
pub use shape::{Geometry, Properties, Shape, ShapeKind, ShapeStyle, ShapeUpdate};
pub use storage::{
    default_storage_dir, FileStore, HiddenState, KeyValueStore, MemoryStore, PersistencePort,
    ShapeStore, HIDDEN_KEY, SHAPES_KEY,
};
