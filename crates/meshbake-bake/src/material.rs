use glam::DVec3;
use meshbake_scene::{material::Material, Node};

use crate::MaterialRecord;

/// Material record of the first material slot of `node`, if it has any.
pub fn extract_material(node: &Node) -> Option<MaterialRecord> {
    let material = node.materials.first()?;
    if node.materials.len() > 1 {
        log::debug!(
            "Node '{}' has {} materials, only '{}' is baked",
            node.name,
            node.materials.len(),
            material.name
        );
    }

    Some(material_record(material))
}

fn material_record(material: &Material) -> MaterialRecord {
    let alpha = material.transparency_factor;
    let has_specular = material.shading_model.has_specular();

    MaterialRecord {
        ambient: with_alpha(material.ambient_color(), alpha),
        diffuse: with_alpha(material.diffuse_color(), alpha),
        emissive: with_alpha(material.emissive_color(), alpha),
        specular: has_specular.then(|| with_alpha(material.specular_color(), alpha)),
        shininess: has_specular.then_some(material.shininess as f32),
        reflection: has_specular.then(|| with_alpha(material.reflection_color(), alpha)),
        texture: material
            .diffuse_texture
            .as_deref()
            .map(|path| base_file_name(path).to_owned()),
    }
}

fn with_alpha(color: DVec3, alpha: f64) -> [f32; 4] {
    [color.x as f32, color.y as f32, color.z as f32, alpha as f32]
}

/// File name component of `path`, accepting both `/` and `\` separators.
pub fn base_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
