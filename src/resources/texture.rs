use glam::{Mat3, Vec2};
use uuid::Uuid;

// ============================================================================
// 1. Texture Transform
// ============================================================================

/// UV transform applied when sampling a texture across a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTransform {
    pub offset: Vec2,
    pub repeat: Vec2,
    pub rotation: f32,
    pub center: Vec2,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            repeat: Vec2::ONE,
            rotation: 0.0,
            center: Vec2::new(0.5, 0.5),
        }
    }
}

impl TextureTransform {
    /// Returns the 3x3 UV transform matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat3 {
        let (s, c) = self.rotation.sin_cos();
        let Vec2 { x: rx, y: ry } = self.repeat;
        let Vec2 { x: cx, y: cy } = self.center;

        Mat3::from_cols_array(&[
            c * rx,
            s * rx,
            0.0,
            -s * ry,
            c * ry,
            0.0,
            (c * -cx + s * -cy + cx) * rx + self.offset.x,
            (-s * -cx + c * -cy + cy) * ry + self.offset.y,
            1.0,
        ])
    }
}

// ============================================================================
// 2. Texture Handle
// ============================================================================

/// Where the host engine obtained a texture from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureOrigin {
    /// A named frame of an already loaded atlas.
    Frame(String),
    /// A standalone image addressed by URL.
    Image(String),
    /// Created directly by the host.
    Raw,
}

/// Opaque texture handle owned by the host rendering engine.
///
/// Sprites only hold shared references (`Arc<Texture>`) and never destroy
/// textures themselves. A width or height of zero means the backing image has
/// not been decoded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub origin: TextureOrigin,
}

impl Texture {
    /// Creates a raw texture with a random identity.
    #[must_use]
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            origin: TextureOrigin::Raw,
        }
    }

    /// Creates a texture for a named atlas frame.
    #[must_use]
    pub fn from_frame(frame_id: &str, width: u32, height: u32) -> Self {
        Self {
            origin: TextureOrigin::Frame(frame_id.to_string()),
            ..Self::new(frame_id, width, height)
        }
    }

    /// Creates a texture for an image URL.
    ///
    /// The identity is derived from the URL, so the same URL always maps to
    /// the same UUID.
    #[must_use]
    pub fn from_image(url: &str, width: u32, height: u32) -> Self {
        Self {
            uuid: Self::image_uuid(url),
            name: url.to_string(),
            width,
            height,
            origin: TextureOrigin::Image(url.to_string()),
        }
    }

    /// Stable identity for an image URL.
    #[must_use]
    pub fn image_uuid(url: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes())
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether the backing image has known dimensions.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
