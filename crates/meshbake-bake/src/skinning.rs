//! Linear blend skinning of a mesh's control points.

use glam::{DMat4, DVec3};
use meshbake_scene::{
    mesh::Mesh,
    pose::{resolve_geometric_offset, resolve_global_transform},
    skin::{Cluster, LinkMode},
    NodeId, SceneContext,
};
use meshbake_transform::matrix;

use crate::BakeError;

/// Control points of `mesh` deformed by all of its skins.
///
/// `global_position` is the current global matrix of the mesh node including its geometric
/// offset. The returned points are still expressed in the space of the mesh node. Meshes
/// without clusters are returned unchanged.
pub fn deform_control_points(
    ctx: &SceneContext,
    node: NodeId,
    mesh: &Mesh,
    global_position: &DMat4,
) -> Result<Vec<DVec3>, BakeError> {
    puffin::profile_function!();

    let Some(first_cluster) = mesh.skins.iter().flat_map(|skin| &skin.clusters).next() else {
        return Ok(mesh.control_points.clone());
    };

    if let Some(skin) = mesh.skins.iter().find(|skin| !skin.skinning_type.is_linear()) {
        return Err(BakeError::UnsupportedSkinningType {
            node,
            name: ctx.scene.node(node).name.clone(),
            skinning_type: skin.skinning_type,
        });
    }

    // All clusters of a mesh are expected to share one link mode.
    let link_mode = first_cluster.link_mode;
    let control_point_count = mesh.control_point_count();

    let mut deformations = vec![
        match link_mode {
            LinkMode::Additive => DMat4::IDENTITY,
            _ => DMat4::ZERO,
        };
        control_point_count
    ];
    let mut weights = vec![0.0; control_point_count];

    for (cluster_index, cluster) in mesh.skins.iter().flat_map(|skin| &skin.clusters).enumerate() {
        let Some(link) = cluster.link else {
            continue;
        };

        if cluster.link_mode != link_mode {
            log::warn!(
                "Cluster {} of '{}' uses link mode {:?} but the mesh is skinned with {:?}",
                cluster_index,
                ctx.scene.node(node).name,
                cluster.link_mode,
                link_mode
            );
        }

        let vertex_transform = compute_cluster_transform(ctx, node, cluster, link, global_position);

        let mut malformed = 0;
        for (index, weight) in cluster.influences() {
            let index = index as usize;

            // The mesh can have fewer points than at bind time, e.g. when a smoothing
            // operator was active while skinning.
            if index >= control_point_count {
                malformed += 1;
                continue;
            }
            if weight == 0.0 {
                continue;
            }

            let influence = matrix::scale(&vertex_transform, weight);

            if link_mode == LinkMode::Additive {
                let influence = matrix::add_to_diagonal(&influence, 1.0 - weight);
                deformations[index] = matrix::compose(&influence, &deformations[index]);
                weights[index] = 1.0;
            } else {
                deformations[index] = matrix::add(&deformations[index], &influence);
                weights[index] += weight;
            }
        }

        if malformed > 0 {
            log::warn!(
                "Cluster {} of '{}' references {} control points past the mesh's {}, they were skipped",
                cluster_index,
                ctx.scene.node(node).name,
                malformed,
                control_point_count
            );
        }
    }

    Ok(mesh
        .control_points
        .iter()
        .zip(deformations.iter().zip(&weights))
        .map(|(point, (deformation, &weight))| {
            if weight == 0.0 {
                return *point;
            }

            let source = point.extend(1.0);
            let mut deformed = matrix::transform_point(deformation, source);

            match link_mode {
                LinkMode::Normalize => deformed /= weight,
                LinkMode::TotalOne => deformed += source * (1.0 - weight),
                LinkMode::Additive => {}
            }

            deformed.truncate()
        })
        .collect())
}

/// Matrix moving a control point from its bind position to its current position under `link`.
pub fn compute_cluster_transform(
    ctx: &SceneContext,
    node: NodeId,
    cluster: &Cluster,
    link: NodeId,
    global_position: &DMat4,
) -> DMat4 {
    let reference_global = cluster
        .transform
        .unwrap_or_else(|| resolve_global_transform(ctx, node));
    let reference_init = reference_global * resolve_geometric_offset(ctx.scene, node);
    let link_current = resolve_global_transform(ctx, link);

    match (cluster.link_mode, cluster.associate_model) {
        (LinkMode::Additive, Some(associate_model)) => {
            let associate_init = cluster.transform_associate_model
                * resolve_geometric_offset(ctx.scene, associate_model);
            let associate_current = resolve_global_transform(ctx, associate_model);
            let link_init = cluster.transform_link * resolve_geometric_offset(ctx.scene, link);

            matrix::invert(&reference_init)
                * associate_init
                * matrix::invert(&associate_current)
                * link_current
                * matrix::invert(&link_init)
                * reference_init
        }
        _ => {
            let relative_init = matrix::compose(&matrix::invert(&cluster.transform_link), &reference_init);
            let relative_current_inverse =
                matrix::compose(&matrix::invert(global_position), &link_current);

            matrix::compose(&relative_current_inverse, &relative_init)
        }
    }
}
