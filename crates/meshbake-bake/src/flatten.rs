//! Flattening of deformed control points and their layers into f32 buffers.

use glam::{DMat3, DVec2, DVec3};
use meshbake_scene::{
    mesh::{Layer, Mesh},
    NodeId,
};

use crate::{mapping::VertexMapping, BakeError, OutputRecord};

/// Mesh node being flattened, used to label errors.
#[derive(Debug, Clone, Copy)]
pub struct FlattenSource<'a> {
    pub node: NodeId,
    pub name: &'a str,
    pub mesh: &'a Mesh,
}

/// Builds the buffers of `source` from its deformed `points`.
///
/// `normal_matrix` is applied to every normal, which is then re-normalized. The returned record
/// carries no material.
pub fn flatten_mesh(
    source: FlattenSource,
    points: &[DVec3],
    normal_matrix: Option<&DMat3>,
    mapping: VertexMapping,
) -> Result<OutputRecord, BakeError> {
    puffin::profile_function!();

    let mut record = OutputRecord {
        name: source.name.to_owned(),
        ..Default::default()
    };

    match mapping {
        VertexMapping::Shared => flatten_shared(source, points, normal_matrix, &mut record)?,
        VertexMapping::Expanded => flatten_expanded(source, points, normal_matrix, &mut record)?,
    }

    Ok(record)
}

fn flatten_shared(
    source: FlattenSource,
    points: &[DVec3],
    normal_matrix: Option<&DMat3>,
    record: &mut OutputRecord,
) -> Result<(), BakeError> {
    let count = points.len();
    record.vertices.reserve(count * 3);

    for (control_point, point) in points.iter().enumerate() {
        push_vec3(&mut record.vertices, *point);
        push_attributes(source, control_point as u32, control_point, normal_matrix, record)?;
    }

    record.indices = (0..count as u32).collect();
    Ok(())
}

fn flatten_expanded(
    source: FlattenSource,
    points: &[DVec3],
    normal_matrix: Option<&DMat3>,
    record: &mut OutputRecord,
) -> Result<(), BakeError> {
    let corner_count = source.mesh.polygon_count() * 3;
    record.vertices.reserve(corner_count * 3);

    for (polygon_index, polygon) in source.mesh.polygons.iter().enumerate() {
        if polygon.len() != 3 {
            return Err(BakeError::NonTriangulatedPolygon {
                node: source.node,
                name: source.name.to_owned(),
                polygon: polygon_index,
                corners: polygon.len(),
            });
        }

        for (corner, &control_point) in polygon.iter().enumerate() {
            let point = points.get(control_point as usize).ok_or_else(|| {
                BakeError::PolygonIndexOutOfRange {
                    node: source.node,
                    name: source.name.to_owned(),
                    polygon: polygon_index,
                    control_point,
                }
            })?;

            push_vec3(&mut record.vertices, *point);
            push_attributes(source, control_point, polygon_index * 3 + corner, normal_matrix, record)?;
        }
    }

    record.indices = (0..corner_count as u32).collect();
    Ok(())
}

fn push_attributes(
    source: FlattenSource,
    control_point: u32,
    polygon_vertex: usize,
    normal_matrix: Option<&DMat3>,
    record: &mut OutputRecord,
) -> Result<(), BakeError> {
    if let Some(layer) = &source.mesh.normals {
        let normal = layer_value(source, layer, "normal", control_point, polygon_vertex)?;
        let normal = match normal_matrix {
            Some(matrix) => (*matrix * normal).normalize_or_zero(),
            None => normal,
        };
        push_vec3(&mut record.normals, normal);
    }

    if let Some(layer) = &source.mesh.uvs {
        let uv: DVec2 = layer_value(source, layer, "uv", control_point, polygon_vertex)?;
        record.uvs.extend([uv.x as f32, uv.y as f32]);
    }

    Ok(())
}

fn layer_value<T: Copy>(
    source: FlattenSource,
    layer: &Layer<T>,
    kind: &'static str,
    control_point: u32,
    polygon_vertex: usize,
) -> Result<T, BakeError> {
    layer
        .value(control_point, polygon_vertex)
        .ok_or_else(|| BakeError::MalformedLayer {
            node: source.node,
            name: source.name.to_owned(),
            layer: kind,
            element: layer.element(control_point, polygon_vertex),
        })
}

fn push_vec3(buffer: &mut Vec<f32>, v: DVec3) {
    buffer.extend([v.x as f32, v.y as f32, v.z as f32]);
}

#[cfg(test)]
mod tests {
    use meshbake_scene::mesh::MappingMode;

    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                DVec3::ZERO,
                DVec3::X,
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::Y,
            ],
            vec![vec![0, 1, 2], vec![0, 2, 3]],
        )
    }

    fn flatten(mesh: &Mesh, mapping: VertexMapping) -> Result<OutputRecord, BakeError> {
        let source = FlattenSource {
            node: NodeId(1),
            name: "quad",
            mesh,
        };
        flatten_mesh(source, &mesh.control_points, None, mapping)
    }

    #[test]
    fn shared_uses_identity_indices() {
        let mesh = quad()
            .with_normals(Layer::new(MappingMode::ByControlPoint, vec![DVec3::Z; 4]))
            .with_uvs(Layer::indexed(
                MappingMode::ByControlPoint,
                vec![DVec2::ZERO, DVec2::ONE],
                vec![0, 1, 1, 0],
            ));
        let record = flatten(&mesh, VertexMapping::Shared).unwrap();

        assert_eq!(record.name, "quad");
        assert_eq!(record.vertex_count(), 4);
        assert_eq!(record.indices, vec![0, 1, 2, 3]);
        assert_eq!(record.vertices[6..9], [1.0, 1.0, 0.0]);
        assert_eq!(record.normals.len(), 12);
        assert_eq!(record.uvs, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn expanded_emits_one_vertex_per_corner() {
        let normals = (0..6).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect();
        let mesh = quad().with_normals(Layer::new(MappingMode::ByPolygonVertex, normals));
        let record = flatten(&mesh, VertexMapping::Expanded).unwrap();

        assert_eq!(record.vertex_count(), 6);
        assert_eq!(record.indices, (0..6).collect::<Vec<u32>>());
        assert_eq!(record.vertices[9..12], [0.0, 0.0, 0.0]);
        assert_eq!(record.vertices[15..18], [0.0, 1.0, 0.0]);
        assert_eq!(record.normals[12..15], [4.0, 0.0, 0.0]);
        assert!(record.uvs.is_empty());
    }

    #[test]
    fn expanded_reads_control_point_layers_through_corner() {
        let uvs = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(0.0, 1.0)];
        let mesh = quad()
            .with_normals(Layer::new(MappingMode::ByPolygonVertex, vec![DVec3::Z; 6]))
            .with_uvs(Layer::new(MappingMode::ByControlPoint, uvs));
        let record = flatten(&mesh, VertexMapping::Expanded).unwrap();

        assert_eq!(record.uvs[6..12], [0.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn expanded_rejects_quads() {
        let mesh = Mesh::new(vec![DVec3::ZERO; 4], vec![vec![0, 1, 2, 3]]);
        assert!(matches!(
            flatten(&mesh, VertexMapping::Expanded),
            Err(BakeError::NonTriangulatedPolygon {
                polygon: 0,
                corners: 4,
                ..
            })
        ));
    }

    #[test]
    fn expanded_rejects_missing_control_point() {
        let mesh = Mesh::new(vec![DVec3::ZERO; 3], vec![vec![0, 1, 7]]);
        assert!(matches!(
            flatten(&mesh, VertexMapping::Expanded),
            Err(BakeError::PolygonIndexOutOfRange { control_point: 7, .. })
        ));
    }

    #[test]
    fn short_layer_is_reported() {
        let mesh = quad().with_normals(Layer::new(MappingMode::ByControlPoint, vec![DVec3::Z; 2]));
        assert!(matches!(
            flatten(&mesh, VertexMapping::Shared),
            Err(BakeError::MalformedLayer {
                layer: "normal",
                element: 2,
                ..
            })
        ));
    }

    #[test]
    fn normal_matrix_is_applied_and_normalized() {
        let mesh = Mesh::new(vec![DVec3::ZERO], vec![])
            .with_normals(Layer::new(MappingMode::ByControlPoint, vec![DVec3::X]));
        let source = FlattenSource {
            node: NodeId(1),
            name: "point",
            mesh: &mesh,
        };
        let matrix = DMat3::from_cols(DVec3::Y * 3.0, DVec3::Y, DVec3::Z);

        let record = flatten_mesh(source, &mesh.control_points, Some(&matrix), VertexMapping::Shared).unwrap();
        assert_eq!(record.normals, vec![0.0, 1.0, 0.0]);
    }
}
