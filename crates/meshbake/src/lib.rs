#![doc(html_no_source)]

mod meshbake;
pub use meshbake::MeshBake;

// Reexport all crates
pub use meshbake_bake;
pub use meshbake_document;
pub use meshbake_scene;
pub use meshbake_transform;
