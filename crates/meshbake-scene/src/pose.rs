use glam::DMat4;
use serde::{Deserialize, Serialize};

use crate::{NodeId, Scene, SceneContext};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEntry {
    pub node: NodeId,
    pub matrix: DMat4,
    #[serde(default)]
    pub is_local: bool,
}

/// Stored snapshot of node matrices, a bind pose or a rest pose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub name: String,
    pub is_bind_pose: bool,
    pub entries: Vec<PoseEntry>,
}

impl Pose {
    pub fn bind_pose(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            is_bind_pose: true,
            entries: vec![],
        }
    }

    pub fn rest_pose(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            is_bind_pose: false,
            entries: vec![],
        }
    }

    pub fn with_entry(mut self, node: NodeId, matrix: DMat4, is_local: bool) -> Self {
        self.entries.push(PoseEntry {
            node,
            matrix,
            is_local,
        });
        self
    }

    pub fn find(&self, node: NodeId) -> Option<&PoseEntry> {
        self.entries.iter().find(|entry| entry.node == node)
    }
}

/// Global matrix of `node`, read from the context pose when it has an entry for the node and
/// evaluated from the hierarchy otherwise.
pub fn resolve_global_transform(ctx: &SceneContext, node: NodeId) -> DMat4 {
    if let Some(pose) = ctx.pose {
        if let Some(entry) = pose.find(node) {
            // Bind poses are always global.
            if pose.is_bind_pose || !entry.is_local {
                return entry.matrix;
            }

            let parent_global = match ctx.scene.node(node).parent {
                Some(parent) => resolve_global_transform(ctx, parent),
                None => DMat4::IDENTITY,
            };
            return parent_global * entry.matrix;
        }
    }

    evaluate_global_transform(ctx.scene, node, ctx.time)
}

/// Composes local transforms at `time` from `node` up to the root.
pub fn evaluate_global_transform(scene: &Scene, node: NodeId, time: f64) -> DMat4 {
    let mut current = scene.node(node);
    let mut global = current.local_transform_at(time).get_matrix();

    while let Some(parent) = current.parent {
        current = scene.node(parent);
        global = current.local_transform_at(time).get_matrix() * global;
    }

    global
}

/// Geometric offset of `node`, applied to its geometry only and never inherited by children.
pub fn resolve_geometric_offset(scene: &Scene, node: NodeId) -> DMat4 {
    let geometric = &scene.node(node).geometric_transform;
    if geometric.is_identity() {
        DMat4::IDENTITY
    } else {
        geometric.get_matrix()
    }
}
