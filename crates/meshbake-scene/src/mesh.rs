use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::skin::Skin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    #[default]
    ByControlPoint,
    ByPolygonVertex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    #[default]
    Direct,
    IndexToDirect,
}

/// Per-vertex attribute stored either once per control point or once per polygon corner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layer<T> {
    pub mapping_mode: MappingMode,
    pub reference_mode: ReferenceMode,
    pub direct: Vec<T>,
    pub indices: Vec<u32>,
}

impl<T: Copy> Layer<T> {
    pub fn new(mapping_mode: MappingMode, direct: Vec<T>) -> Self {
        Self {
            mapping_mode,
            reference_mode: ReferenceMode::Direct,
            direct,
            indices: vec![],
        }
    }

    pub fn indexed(mapping_mode: MappingMode, direct: Vec<T>, indices: Vec<u32>) -> Self {
        Self {
            mapping_mode,
            reference_mode: ReferenceMode::IndexToDirect,
            direct,
            indices,
        }
    }

    /// Element the layer is addressed by for a corner, before any index indirection.
    pub fn element(&self, control_point: u32, polygon_vertex: usize) -> usize {
        match self.mapping_mode {
            MappingMode::ByControlPoint => control_point as usize,
            MappingMode::ByPolygonVertex => polygon_vertex,
        }
    }

    /// Value for the corner `polygon_vertex` whose control point is `control_point`.
    ///
    /// Returns `None` when the index array or the direct array is too short.
    pub fn value(&self, control_point: u32, polygon_vertex: usize) -> Option<T> {
        let element = self.element(control_point, polygon_vertex);
        let direct_index = match self.reference_mode {
            ReferenceMode::Direct => element,
            ReferenceMode::IndexToDirect => *self.indices.get(element)? as usize,
        };

        self.direct.get(direct_index).copied()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    pub control_points: Vec<DVec3>,
    pub polygons: Vec<Vec<u32>>,

    pub normals: Option<Layer<DVec3>>,
    pub uvs: Option<Layer<DVec2>>,

    pub skins: Vec<Skin>,
}

impl Mesh {
    pub fn new(control_points: Vec<DVec3>, polygons: Vec<Vec<u32>>) -> Self {
        Self {
            control_points,
            polygons,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Layer<DVec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: Layer<DVec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skins.push(skin);
        self
    }

    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.skins.iter().map(|skin| skin.clusters.len()).sum()
    }
}
