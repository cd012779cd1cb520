//! Resource Definitions
//!
//! Host-side resource handles consumed by the animated tiling sprite.
//! Only the [`Texture`] handle and its UV [`TextureTransform`] live here;
//! decoding and GPU upload belong to the host engine.

pub mod texture;

pub use texture::{Texture, TextureOrigin, TextureTransform};
