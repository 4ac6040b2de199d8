use std::fmt;

use glam::DMat4;
use serde::{Deserialize, Serialize};

use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinningType {
    #[default]
    Linear,
    Rigid,
    DualQuaternion,
    Blend,
}

impl SkinningType {
    /// Linear and rigid skins share the blended matrix algorithm.
    pub fn is_linear(self) -> bool {
        matches!(self, Self::Linear | Self::Rigid)
    }
}

impl fmt::Display for SkinningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::Rigid => "rigid",
            Self::DualQuaternion => "dual quaternion",
            Self::Blend => "blend",
        };
        f.write_str(name)
    }
}

/// How the influences of several clusters on one control point are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    #[default]
    Normalize,
    Additive,
    TotalOne,
}

/// Binding of one link node to a weighted subset of control points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub link_mode: LinkMode,
    pub link: Option<NodeId>,
    pub associate_model: Option<NodeId>,

    /// Global matrix of the skinned mesh at bind time.
    pub transform: Option<DMat4>,
    /// Global matrix of the link at bind time.
    pub transform_link: DMat4,
    /// Global matrix of the associate model at bind time, additive mode only.
    pub transform_associate_model: DMat4,

    pub indices: Vec<u32>,
    pub weights: Vec<f64>,
}

impl Default for Cluster {
    fn default() -> Self {
        Self {
            link_mode: LinkMode::Normalize,
            link: None,
            associate_model: None,
            transform: None,
            transform_link: DMat4::IDENTITY,
            transform_associate_model: DMat4::IDENTITY,
            indices: vec![],
            weights: vec![],
        }
    }
}

impl Cluster {
    pub fn new(link: NodeId, link_mode: LinkMode) -> Self {
        Self {
            link_mode,
            link: Some(link),
            ..Default::default()
        }
    }

    pub fn with_bind_matrices(mut self, transform: DMat4, transform_link: DMat4) -> Self {
        self.transform = Some(transform);
        self.transform_link = transform_link;
        self
    }

    pub fn with_associate_model(mut self, associate_model: NodeId, transform: DMat4) -> Self {
        self.associate_model = Some(associate_model);
        self.transform_associate_model = transform;
        self
    }

    pub fn with_influence(mut self, index: u32, weight: f64) -> Self {
        self.indices.push(index);
        self.weights.push(weight);
        self
    }

    /// `(control point, weight)` pairs in storage order.
    pub fn influences(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skin {
    pub skinning_type: SkinningType,
    pub clusters: Vec<Cluster>,
}

impl Skin {
    pub fn new(skinning_type: SkinningType) -> Self {
        Self {
            skinning_type,
            clusters: vec![],
        }
    }

    pub fn with_cluster(mut self, cluster: Cluster) -> Self {
        self.clusters.push(cluster);
        self
    }
}
