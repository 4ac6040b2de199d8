use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub emissive: [f32; 4],
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub specular: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shininess: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reflection: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub texture: Option<String>,
}

/// Flat buffers of one baked mesh node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Name of the node the record was baked from.
    #[serde(skip)]
    pub name: String,

    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub material: Option<MaterialRecord>,
}

impl OutputRecord {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}
