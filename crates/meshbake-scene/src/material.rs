use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingModel {
    #[default]
    Lambert,
    Phong,
}

impl ShadingModel {
    pub fn has_specular(self) -> bool {
        self == Self::Phong
    }
}

/// Surface material as stored on a node's material slot.
///
/// Colors are scaled by their factor when read, specular, shininess and reflection are
/// only meaningful for [`ShadingModel::Phong`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub name: String,
    pub shading_model: ShadingModel,

    pub ambient: DVec3,
    pub ambient_factor: f64,
    pub diffuse: DVec3,
    pub diffuse_factor: f64,
    pub emissive: DVec3,
    pub emissive_factor: f64,
    pub transparency_factor: f64,

    pub specular: DVec3,
    pub specular_factor: f64,
    pub shininess: f64,
    pub reflection: DVec3,
    pub reflection_factor: f64,

    pub diffuse_texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            name: String::new(),
            shading_model: ShadingModel::Lambert,

            ambient: DVec3::splat(0.2),
            ambient_factor: 1.0,
            diffuse: DVec3::splat(0.8),
            diffuse_factor: 1.0,
            emissive: DVec3::ZERO,
            emissive_factor: 1.0,
            transparency_factor: 0.0,

            specular: DVec3::splat(0.2),
            specular_factor: 1.0,
            shininess: 20.0,
            reflection: DVec3::ZERO,
            reflection_factor: 1.0,

            diffuse_texture: None,
        }
    }
}

impl Material {
    pub fn lambert(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    pub fn phong(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            shading_model: ShadingModel::Phong,
            ..Default::default()
        }
    }

    pub fn ambient_color(&self) -> DVec3 {
        self.ambient * self.ambient_factor
    }

    pub fn diffuse_color(&self) -> DVec3 {
        self.diffuse * self.diffuse_factor
    }

    pub fn emissive_color(&self) -> DVec3 {
        self.emissive * self.emissive_factor
    }

    pub fn specular_color(&self) -> DVec3 {
        self.specular * self.specular_factor
    }

    pub fn reflection_color(&self) -> DVec3 {
        self.reflection * self.reflection_factor
    }
}
