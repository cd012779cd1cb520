use std::sync::Arc;

use glam::{Mat3, Vec2};

use crate::resources::{Texture, TextureTransform};

/// Rendering contract of a surface that repeats one texture across a rectangle.
///
/// The animated sprite only needs the texture slot and teardown; everything
/// else (size, tile offsets) is forwarded to the host unchanged.
pub trait TilingSurface: Send {
    /// Texture currently rendered by the surface.
    fn texture(&self) -> &Arc<Texture>;

    /// Replaces the rendered texture.
    fn set_texture(&mut self, texture: Arc<Texture>);

    /// Releases backing resources. Textures are not destroyed.
    fn destroy(&mut self);
}

/// A minimal tiling sprite: a texture repeated across `width` x `height`.
///
/// # Tiling
///
/// - `tile_position`: Offset of the tiling pattern, in surface pixels
/// - `tile_scale`: Scale applied to each texture repetition
/// - `tile_rotation`: Rotation of the pattern around the texture center
#[derive(Debug, Clone)]
pub struct TilingSprite {
    texture: Arc<Texture>,
    pub width: f32,
    pub height: f32,
    pub tile_position: Vec2,
    pub tile_scale: Vec2,
    pub tile_rotation: f32,
    destroyed: bool,
}

impl TilingSprite {
    #[must_use]
    pub fn new(texture: Arc<Texture>, width: f32, height: f32) -> Self {
        Self {
            texture,
            width,
            height,
            tile_position: Vec2::ZERO,
            tile_scale: Vec2::ONE,
            tile_rotation: 0.0,
            destroyed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// UV transform mapping the surface rectangle onto repeated texture space.
    ///
    /// A texture without known dimensions is stretched once across the
    /// surface until the host reports its size.
    #[must_use]
    pub fn uv_transform(&self) -> TextureTransform {
        let tile = if self.texture.is_loaded() {
            self.texture.size() * self.tile_scale
        } else {
            self.size()
        };
        if tile.cmpeq(Vec2::ZERO).any() {
            return TextureTransform::default();
        }

        TextureTransform {
            offset: -self.tile_position / tile,
            repeat: self.size() / tile,
            rotation: self.tile_rotation,
            ..TextureTransform::default()
        }
    }

    #[must_use]
    pub fn uv_matrix(&self) -> Mat3 {
        self.uv_transform().matrix()
    }
}

impl TilingSurface for TilingSprite {
    fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    fn set_texture(&mut self, texture: Arc<Texture>) {
        self.texture = texture;
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        log::debug!("TilingSprite destroyed ({}x{})", self.width, self.height);
    }
}
