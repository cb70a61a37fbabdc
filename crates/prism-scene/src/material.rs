use prism_assets::{AssetHandle, TextureAsset};
use prism_core::Color;

/// Surface description consumed by an external renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: Color,
    pub base_color_texture: Option<AssetHandle<TextureAsset>>,
    pub normal_texture: Option<AssetHandle<TextureAsset>>,
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            base_color_texture: None,
            normal_texture: None,
            metallic: 0.0,
            roughness: 1.0,
            emissive: Color::BLACK,
        }
    }
}

impl Material {
    /// Untextured material of a single color
    pub fn from_color(color: Color) -> Self {
        Self {
            base_color: color,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: AssetHandle<TextureAsset>) -> Self {
        self.base_color_texture = Some(texture);
        self
    }

    pub fn is_textured(&self) -> bool {
        self.base_color_texture.is_some() || self.normal_texture.is_some()
    }
}
