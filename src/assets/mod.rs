//! Asset Resolution
//!
//! The animated tiling sprite never loads textures itself. Its convenience
//! constructors resolve frame and image identifiers through a
//! [`TextureFactory`] supplied by the host. [`TextureStore`] is a ready-made,
//! thread-safe implementation backed by a slot map.

pub mod storage;

use std::sync::Arc;

use crate::errors::Result;
use crate::resources::Texture;

pub use storage::{TextureHandle, TextureStore};

/// Host-side texture lookup used by the convenience constructors.
pub trait TextureFactory {
    /// Resolves a named frame from an already loaded atlas.
    fn texture_from_frame(&self, frame_id: &str) -> Result<Arc<Texture>>;

    /// Resolves (or starts loading) an image by URL.
    fn texture_from_image(&self, url: &str) -> Result<Arc<Texture>>;
}
