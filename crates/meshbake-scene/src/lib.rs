use std::fmt;

use meshbake_transform::Transform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod animation;
pub mod context;
pub mod material;
pub mod mesh;
pub mod pose;
pub mod skin;

use animation::AnimationTrack;
pub use context::SceneContext;
use material::Material;
use mesh::Mesh;
use pose::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherKind {
    Null,
    Marker,
    Skeleton,
    Camera,
    Light,
}

/// What a node carries. Only meshes carry a payload, every other kind is traversed through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    #[default]
    None,
    Mesh(Mesh),
    Other(OtherKind),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub name: String,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    pub transform: Transform,
    pub geometric_transform: Transform,
    pub animation: Option<AnimationTrack>,

    pub attribute: AttributeKind,
    pub materials: Vec<Material>,
}

impl Node {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_geometric_transform(mut self, geometric_transform: Transform) -> Self {
        self.geometric_transform = geometric_transform;
        self
    }

    pub fn with_animation(mut self, animation: AnimationTrack) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.attribute = AttributeKind::Mesh(mesh);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeKind) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.attribute {
            AttributeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Local transform sampled at `time`. Animated channels override the static values.
    pub fn local_transform_at(&self, time: f64) -> Transform {
        match &self.animation {
            Some(animation) => animation.apply(&self.transform, time),
            None => self.transform,
        }
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene has no nodes")]
    NoRoot,
    #[error("root node {0} must not have a parent")]
    RootHasParent(NodeId),
    #[error("node {node} references missing node {missing}")]
    DanglingNode { node: NodeId, missing: NodeId },
    #[error("node {child} is listed as a child of {parent} but its parent link disagrees")]
    ParentMismatch { parent: NodeId, child: NodeId },
    #[error("node {0} is reachable more than once from the root")]
    Cycle(NodeId),
    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),
    #[error("cluster {cluster} on node {node} has {indices} indices but {weights} weights")]
    ClusterWeights {
        node: NodeId,
        cluster: usize,
        indices: usize,
        weights: usize,
    },
    #[error("pose {pose} references missing node {node}")]
    PoseNode { pose: usize, node: NodeId },
    #[error("pose index {index} is out of range, scene has {count} poses")]
    PoseIndex { index: usize, count: usize },
    #[error("time sample {0} is not a finite number")]
    InvalidTime(f64),
    #[error("failed to parse scene: {0}")]
    Json(#[from] serde_json::Error),
}

/// Node arena. Nodes address each other by [`NodeId`], node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub poses: Vec<Pose>,
}

impl Scene {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("RootNode")],
            poses: vec![],
        }
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self, SceneError> {
        puffin::profile_function!();

        let scene: Scene = serde_json::from_slice(data)?;
        scene.validate()?;

        log::debug!(
            "Loaded scene with {} nodes and {} poses",
            scene.nodes.len(),
            scene.poses.len()
        );
        Ok(scene)
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `node` below `parent` and returns its id.
    pub fn add_node(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn add_pose(&mut self, pose: Pose) -> usize {
        self.poses.push(pose);
        self.poses.len() - 1
    }

    /// Checks that the arena forms a single tree rooted at node 0 and that every cross reference resolves.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.nodes.is_empty() {
            return Err(SceneError::NoRoot);
        }
        if self.nodes[0].parent.is_some() {
            return Err(SceneError::RootHasParent(Self::ROOT));
        }

        let check = |node: NodeId, id: NodeId| {
            if id.index() < self.nodes.len() {
                Ok(())
            } else {
                Err(SceneError::DanglingNode { node, missing: id })
            }
        };

        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index as u32);

            if let Some(parent) = node.parent {
                check(id, parent)?;
                if !self.node(parent).children.contains(&id) {
                    return Err(SceneError::ParentMismatch { parent, child: id });
                }
            }

            for &child in &node.children {
                check(id, child)?;
                if self.node(child).parent != Some(id) {
                    return Err(SceneError::ParentMismatch { parent: id, child });
                }
            }

            if let Some(mesh) = node.mesh() {
                for (cluster_index, cluster) in
                    mesh.skins.iter().flat_map(|skin| &skin.clusters).enumerate()
                {
                    if cluster.indices.len() != cluster.weights.len() {
                        return Err(SceneError::ClusterWeights {
                            node: id,
                            cluster: cluster_index,
                            indices: cluster.indices.len(),
                            weights: cluster.weights.len(),
                        });
                    }
                    if let Some(link) = cluster.link {
                        check(id, link)?;
                    }
                    if let Some(associate_model) = cluster.associate_model {
                        check(id, associate_model)?;
                    }
                }
            }
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.index()], true) {
                return Err(SceneError::Cycle(id));
            }
            stack.extend(self.node(id).children.iter().copied());
        }
        if let Some(index) = visited.iter().position(|&seen| !seen) {
            return Err(SceneError::Unreachable(NodeId(index as u32)));
        }

        for (pose_index, pose) in self.poses.iter().enumerate() {
            for entry in &pose.entries {
                if entry.node.index() >= self.nodes.len() {
                    return Err(SceneError::PoseNode {
                        pose: pose_index,
                        node: entry.node,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin::{Cluster, LinkMode, Skin, SkinningType};

    #[test]
    fn add_node_links_parent_and_child() {
        let mut scene = Scene::new();
        let child = scene.add_node(Scene::ROOT, Node::new("child"));
        let grandchild = scene.add_node(child, Node::new("grandchild"));

        assert_eq!(scene.node(child).parent, Some(Scene::ROOT));
        assert_eq!(scene.node(Scene::ROOT).children, vec![child]);
        assert_eq!(scene.node(child).children, vec![grandchild]);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn validate_rejects_parent_mismatch() {
        let mut scene = Scene::new();
        let a = scene.add_node(Scene::ROOT, Node::new("a"));
        let b = scene.add_node(Scene::ROOT, Node::new("b"));
        scene.nodes[a.index()].children.push(b);

        assert!(matches!(
            scene.validate(),
            Err(SceneError::ParentMismatch { parent, child }) if parent == a && child == b
        ));
    }

    #[test]
    fn validate_rejects_dangling_child() {
        let mut scene = Scene::new();
        scene.nodes[0].children.push(NodeId(7));

        assert!(matches!(
            scene.validate(),
            Err(SceneError::DanglingNode { missing, .. }) if missing == NodeId(7)
        ));
    }

    #[test]
    fn validate_rejects_cycles_through_root() {
        let mut scene = Scene::new();
        let a = scene.add_node(Scene::ROOT, Node::new("a"));
        scene.nodes[a.index()].children.push(Scene::ROOT);

        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_self_parented_node() {
        let mut scene = Scene::new();
        let mut orphan = Node::new("orphan");
        orphan.parent = Some(NodeId(1));
        scene.nodes.push(orphan);

        assert!(matches!(
            scene.validate(),
            Err(SceneError::ParentMismatch { parent, child }) if parent == NodeId(1) && child == NodeId(1)
        ));
    }

    #[test]
    fn validate_rejects_parent_loop_outside_tree() {
        let mut scene = Scene::new();
        let mut a = Node::new("a");
        a.parent = Some(NodeId(2));
        a.children.push(NodeId(2));
        let mut b = Node::new("b");
        b.parent = Some(NodeId(1));
        b.children.push(NodeId(1));
        scene.nodes.extend([a, b]);

        assert!(matches!(scene.validate(), Err(SceneError::Unreachable(_))));
    }

    #[test]
    fn validate_rejects_detached_node() {
        let mut scene = Scene::new();
        scene.add_node(Scene::ROOT, Node::new("a"));
        scene.nodes.push(Node::new("detached"));

        assert!(matches!(
            scene.validate(),
            Err(SceneError::Unreachable(id)) if id == NodeId(2)
        ));
    }

    #[test]
    fn self_parented_link_is_rejected_when_loading() {
        let json = br#"{
            "nodes": [
                { "name": "RootNode", "children": [2] },
                { "name": "bone", "parent": 1 },
                {
                    "name": "body",
                    "parent": 0,
                    "attribute": { "mesh": {
                        "control_points": [[0.0, 0.0, 0.0]],
                        "skins": [{ "clusters": [{ "link": 1, "indices": [0], "weights": [1.0] }] }]
                    } }
                }
            ]
        }"#;

        assert!(matches!(
            Scene::from_json_slice(json),
            Err(SceneError::ParentMismatch { .. })
        ));
    }

    #[test]
    fn validate_rejects_mismatched_cluster_weights() {
        let mut scene = Scene::new();
        let bone = scene.add_node(Scene::ROOT, Node::new("bone"));
        let mut cluster = Cluster::new(bone, LinkMode::Normalize).with_influence(0, 1.0);
        cluster.weights.push(0.5);
        let mesh = Mesh::new(vec![glam::DVec3::ZERO], vec![])
            .with_skin(Skin::new(SkinningType::Linear).with_cluster(cluster));
        let body = scene.add_node(Scene::ROOT, Node::new("body").with_mesh(mesh));

        assert!(matches!(
            scene.validate(),
            Err(SceneError::ClusterWeights { node, cluster: 0, indices: 1, weights: 2 }) if node == body
        ));
    }

    #[test]
    fn validate_rejects_pose_with_missing_node() {
        let mut scene = Scene::new();
        scene.add_node(Scene::ROOT, Node::new("a"));
        scene.add_pose(Pose::bind_pose("bind").with_entry(NodeId(9), glam::DMat4::IDENTITY, false));

        assert!(matches!(
            scene.validate(),
            Err(SceneError::PoseNode { pose: 0, node }) if node == NodeId(9)
        ));
    }

    #[test]
    fn scene_loads_from_json() {
        let json = br#"{
            "nodes": [
                { "name": "RootNode", "children": [1] },
                {
                    "name": "Cube",
                    "parent": 0,
                    "transform": { "translation": [1.0, 2.0, 3.0] },
                    "attribute": { "mesh": {
                        "control_points": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                        "polygons": [[0, 1, 2]]
                    } }
                }
            ]
        }"#;

        let scene = Scene::from_json_slice(json).unwrap();
        let cube = scene.node(NodeId(1));
        assert_eq!(cube.name, "Cube");
        assert_eq!(cube.mesh().unwrap().control_point_count(), 3);
        assert_eq!(cube.transform.get_scale(), glam::DVec3::ONE);
        assert!(scene.poses.is_empty());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            Scene::from_json_slice(b"{ \"nodes\": 3 }"),
            Err(SceneError::Json(_))
        ));
    }
}
