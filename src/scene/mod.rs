//! Scene Primitives
//!
//! The tiling surface the animated sprite renders through.

pub mod tiling;

pub use tiling::{TilingSprite, TilingSurface};
