pub mod animated_tiling;
pub mod playback;

pub use animated_tiling::{AnimatedTilingSprite, SharedTilingSprite, TickEvents};
pub use playback::{Advance, Playback, PlaybackState, SpriteOptions, frame_index};
