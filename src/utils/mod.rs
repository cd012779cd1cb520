//! Utility Module
//!
//! - [`Ticker`]: Shared frame tick dispatcher implementing [`Scheduler`]
//! - [`Timer`]: Wall-clock delta measurement
//!
//! # Driving a ticker
//!
//! ```rust,ignore
//! use myth_tiling::utils::Ticker;
//!
//! let ticker = Ticker::default();
//! loop {
//!     ticker.update(); // measures elapsed time and ticks every listener
//! }
//! ```

pub mod ticker;
pub mod time;

pub use ticker::{ListenerKey, Scheduler, TickListener, Ticker, TickerConfig};
pub use time::Timer;
