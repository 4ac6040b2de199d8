use meshbake_scene::mesh::{Layer, MappingMode, Mesh};

/// Vertex layout a mesh is flattened into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexMapping {
    /// One vertex per control point, indices address control points.
    Shared,
    /// Three vertices per triangle, each corner is its own vertex.
    Expanded,
}

impl VertexMapping {
    pub fn resolve(mesh: &Mesh) -> Self {
        if can_share_by_control_point(mesh) {
            Self::Shared
        } else {
            Self::Expanded
        }
    }
}

/// Whether every attribute of `mesh` is stored per control point, so vertices can be shared
/// between the polygons touching them.
pub fn can_share_by_control_point(mesh: &Mesh) -> bool {
    !(is_per_corner(&mesh.normals) || is_per_corner(&mesh.uvs))
}

fn is_per_corner<T>(layer: &Option<Layer<T>>) -> bool {
    layer
        .as_ref()
        .is_some_and(|layer| layer.mapping_mode == MappingMode::ByPolygonVertex)
}
