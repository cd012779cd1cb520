//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`TilingError`] covers the few failure modes of the
//! animated tiling sprite:
//! - Invalid construction or replacement arguments (empty frame sequences)
//! - Texture resolution failures in the texture factory
//! - Configuration parsing errors
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, TilingError>`.
//!
//! ```rust,ignore
//! use myth_tiling::errors::{TilingError, Result};
//!
//! fn build() -> Result<()> {
//!     Err(TilingError::InvalidArgument("empty frame sequence".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for the animated tiling sprite.
#[derive(Error, Debug)]
pub enum TilingError {
    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// A caller supplied an argument that would corrupt sprite state,
    /// such as an empty frame sequence.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ========================================================================
    // Texture Errors
    // ========================================================================
    /// No texture is registered under the requested frame identifier.
    #[error("Texture not found for frame: {0}")]
    TextureNotFound(String),

    /// The image identifier cannot be turned into a texture.
    #[error("Invalid image source: {0}")]
    InvalidImageSource(String),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, TilingError>`.
pub type Result<T> = std::result::Result<T, TilingError>;
