#[derive(Debug, Clone, PartialEq)]
pub struct BakeConfig {
    /// Time sample, in seconds, at which the hierarchy is evaluated.
    pub time: f64,
    /// Index into `Scene::poses` of the pose used instead of live evaluation.
    pub pose_index: Option<usize>,
    /// Transform baked positions and normals into world space. When disabled, positions stay
    /// in the space of the skinned mesh node.
    pub bake_world_transform: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            time: 0.0,
            pose_index: None,
            bake_world_transform: true,
        }
    }
}
