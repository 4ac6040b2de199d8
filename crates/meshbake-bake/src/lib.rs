//! Bakes a scene graph into flat, renderer ready mesh buffers.
//!
//! The walker visits the scene depth first and for every mesh node resolves its global
//! transform, deforms the control points by the node's skins, decides whether vertices can be
//! shared per control point and flattens the attributes into an [`OutputRecord`].

pub mod config;
pub mod error;
pub mod flatten;
pub mod mapping;
pub mod material;
pub mod record;
pub mod skinning;
pub mod walker;

pub use config::BakeConfig;
pub use error::BakeError;
pub use record::{MaterialRecord, OutputRecord};
pub use walker::{bake_mesh_node, bake_scene};

pub use meshbake_scene;
