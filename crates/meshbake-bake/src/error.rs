use meshbake_scene::{skin::SkinningType, NodeId, SceneError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BakeError {
    #[error("no mesh nodes found in the scene graph")]
    EmptyScene,

    #[error(
        "node '{name}' ({node}) uses {skinning_type} skinning, only linear and rigid skins can be baked"
    )]
    UnsupportedSkinningType {
        node: NodeId,
        name: String,
        skinning_type: SkinningType,
    },

    #[error(
        "polygon {polygon} of node '{name}' ({node}) has {corners} corners, the mesh must be triangulated before baking"
    )]
    NonTriangulatedPolygon {
        node: NodeId,
        name: String,
        polygon: usize,
        corners: usize,
    },

    #[error("polygon {polygon} of node '{name}' ({node}) references missing control point {control_point}")]
    PolygonIndexOutOfRange {
        node: NodeId,
        name: String,
        polygon: usize,
        control_point: u32,
    },

    #[error("{layer} layer of node '{name}' ({node}) has no value for element {element}")]
    MalformedLayer {
        node: NodeId,
        name: String,
        layer: &'static str,
        element: usize,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}
