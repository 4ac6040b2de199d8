use glam::{DMat3, DMat4};
use meshbake_scene::{
    mesh::Mesh,
    pose::{resolve_geometric_offset, resolve_global_transform},
    NodeId, Scene, SceneContext,
};

use crate::{
    flatten::{flatten_mesh, FlattenSource},
    mapping::VertexMapping,
    material::extract_material,
    skinning::deform_control_points,
    BakeConfig, BakeError, OutputRecord,
};

/// Bakes every mesh node of `scene`, in depth first pre-order from the root.
pub fn bake_scene(scene: &Scene, config: &BakeConfig) -> Result<Vec<OutputRecord>, BakeError> {
    puffin::profile_function!();

    if scene.is_empty() {
        return Err(BakeError::EmptyScene);
    }
    scene.validate()?;

    let ctx = SceneContext::new(scene, config.time, config.pose_index)?;
    if let Some(pose) = ctx.pose {
        log::debug!("Resolving transforms through pose '{}'", pose.name);
    }

    let mut records = vec![];
    visit(&ctx, config, scene.root(), &mut records)?;

    if records.is_empty() {
        return Err(BakeError::EmptyScene);
    }

    log::info!(
        "Baked {} meshes from {} nodes at t={}",
        records.len(),
        scene.len(),
        config.time
    );
    Ok(records)
}

fn visit(
    ctx: &SceneContext,
    config: &BakeConfig,
    node_id: NodeId,
    records: &mut Vec<OutputRecord>,
) -> Result<(), BakeError> {
    let node = ctx.scene.node(node_id);

    match node.mesh() {
        Some(mesh) => records.push(bake_mesh_node(ctx, config, node_id, mesh)?),
        None => log::trace!("Traversing '{}' ({}), no mesh attribute", node.name, node_id),
    }

    for &child in &node.children {
        visit(ctx, config, child, records)?;
    }

    Ok(())
}

/// Bakes a single mesh node into an [`OutputRecord`].
pub fn bake_mesh_node(
    ctx: &SceneContext,
    config: &BakeConfig,
    node_id: NodeId,
    mesh: &Mesh,
) -> Result<OutputRecord, BakeError> {
    puffin::profile_function!();

    let node = ctx.scene.node(node_id);
    let global = resolve_global_transform(ctx, node_id);
    let global_offset = global * resolve_geometric_offset(ctx.scene, node_id);

    let mut points = deform_control_points(ctx, node_id, mesh, &global_offset)?;

    let normal_matrix = if config.bake_world_transform {
        for point in &mut points {
            *point = global_offset.transform_point3(*point);
        }
        normal_matrix(&global_offset).or_else(|| {
            log::warn!(
                "Global transform of '{}' is singular, normals are left in mesh space",
                node.name
            );
            None
        })
    } else {
        None
    };

    let mapping = VertexMapping::resolve(mesh);
    let source = FlattenSource {
        node: node_id,
        name: &node.name,
        mesh,
    };

    let mut record = flatten_mesh(source, &points, normal_matrix.as_ref(), mapping)?;
    record.material = extract_material(node);

    log::debug!(
        "Baked '{}' ({}): {} vertices, {:?} mapping, {} clusters",
        node.name,
        node_id,
        record.vertex_count(),
        mapping,
        mesh.cluster_count()
    );
    Ok(record)
}

/// Inverse transpose of the linear part of `matrix`, `None` when it cannot be inverted.
fn normal_matrix(matrix: &DMat4) -> Option<DMat3> {
    let linear = DMat3::from_mat4(*matrix);
    if linear.determinant() == 0.0 {
        return None;
    }

    let inverse_transpose = linear.inverse().transpose();
    inverse_transpose.is_finite().then_some(inverse_transpose)
}
