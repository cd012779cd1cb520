#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Animated tiling sprites for the Myth engine.
//!
//! An [`AnimatedTilingSprite`] repeats a texture across a rectangle like a
//! plain [`TilingSprite`], and swaps that texture on every scheduler tick to
//! play a frame sequence.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use myth_tiling::{AnimatedTilingSprite, TextureStore, Ticker};
//!
//! let ticker = Arc::new(Ticker::default());
//! let store = TextureStore::new();
//! for name in ["water_0", "water_1", "water_2"] {
//!     store.add_frame(name, 64, 64);
//! }
//!
//! let sprite = AnimatedTilingSprite::from_frames(
//!     ["water_0", "water_1", "water_2"], &store, 800.0, 600.0, ticker.clone(),
//! )?;
//! sprite.lock().play();
//! ticker.update();
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod utils;

pub use animation::{
    AnimatedTilingSprite, PlaybackState, SharedTilingSprite, SpriteOptions, TickEvents,
};
pub use assets::{TextureFactory, TextureStore};
pub use errors::{Result, TilingError};
pub use resources::{Texture, TextureTransform};
pub use scene::{TilingSprite, TilingSurface};
pub use utils::{ListenerKey, Scheduler, TickListener, Ticker, TickerConfig};
