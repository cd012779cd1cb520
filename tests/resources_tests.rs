//! Resource & Surface Tests
//!
//! Tests for:
//! - Texture: constructors, origin, URL-derived identity
//! - TextureTransform: matrix for identity, repeat and offset
//! - TilingSprite: UV transform from tiling parameters, unloaded textures, destroy

use std::sync::Arc;

use glam::{Mat3, Vec2, Vec3};

use myth_tiling::resources::TextureOrigin;
use myth_tiling::{Texture, TextureTransform, TilingSprite, TilingSurface};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec2(a: Vec2, b: Vec2) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

// ============================================================================
// Texture
// ============================================================================

#[test]
fn texture_origins() {
    assert_eq!(Texture::new("raw", 1, 1).origin, TextureOrigin::Raw);
    assert_eq!(
        Texture::from_frame("walk_0", 16, 16).origin,
        TextureOrigin::Frame("walk_0".into())
    );
    assert_eq!(
        Texture::from_image("img/a.png", 0, 0).origin,
        TextureOrigin::Image("img/a.png".into())
    );
}

#[test]
fn image_identity_is_derived_from_url() {
    let a = Texture::from_image("img/a.png", 8, 8);
    let b = Texture::from_image("img/a.png", 16, 16);
    let c = Texture::from_image("img/c.png", 8, 8);

    assert_eq!(a.uuid, b.uuid);
    assert_ne!(a.uuid, c.uuid);
    assert_ne!(Texture::new("x", 1, 1).uuid, Texture::new("x", 1, 1).uuid);
}

#[test]
fn zero_sized_texture_is_not_loaded() {
    assert!(!Texture::from_image("img/pending.png", 0, 0).is_loaded());
    assert!(Texture::new("ready", 4, 2).is_loaded());
    assert_eq!(Texture::new("ready", 4, 2).size(), Vec2::new(4.0, 2.0));
}

// ============================================================================
// TextureTransform
// ============================================================================

#[test]
fn default_transform_is_identity() {
    let m = TextureTransform::default().matrix();
    assert!(m.abs_diff_eq(Mat3::IDENTITY, EPSILON));
}

#[test]
fn transform_repeat_and_offset() {
    let transform = TextureTransform {
        offset: Vec2::new(0.25, -0.5),
        repeat: Vec2::new(2.0, 3.0),
        ..TextureTransform::default()
    };
    let m = transform.matrix();

    // UV origin maps to the offset shifted by the repeat around the center.
    let origin = m * Vec3::new(0.0, 0.0, 1.0);
    assert!(approx(origin.x, (-0.5 + 0.5) * 2.0 + 0.25));
    assert!(approx(origin.y, (-0.5 + 0.5) * 3.0 - 0.5));

    let corner = m * Vec3::new(1.0, 1.0, 1.0);
    assert!(approx(corner.x, 2.25));
    assert!(approx(corner.y, 2.5));
}

// ============================================================================
// TilingSprite
// ============================================================================

#[test]
fn tiling_repeat_follows_surface_size() {
    let texture = Arc::new(Texture::new("brick", 32, 32));
    let sprite = TilingSprite::new(texture, 128.0, 64.0);

    let uv = sprite.uv_transform();
    assert!(approx_vec2(uv.repeat, Vec2::new(4.0, 2.0)));
    assert!(approx_vec2(uv.offset, Vec2::ZERO));
}

#[test]
fn tiling_position_and_scale() {
    let texture = Arc::new(Texture::new("brick", 32, 32));
    let mut sprite = TilingSprite::new(texture, 128.0, 64.0);
    sprite.tile_position = Vec2::new(16.0, 0.0);
    sprite.tile_scale = Vec2::splat(2.0);
    sprite.tile_rotation = 0.5;

    let uv = sprite.uv_transform();
    assert!(approx_vec2(uv.repeat, Vec2::new(2.0, 1.0)));
    assert!(approx_vec2(uv.offset, Vec2::new(-0.25, 0.0)));
    assert!(approx(uv.rotation, 0.5));
}

#[test]
fn matching_sizes_give_identity_matrix() {
    let texture = Arc::new(Texture::new("tile", 64, 64));
    let sprite = TilingSprite::new(texture, 64.0, 64.0);
    assert!(sprite.uv_matrix().abs_diff_eq(Mat3::IDENTITY, EPSILON));
}

#[test]
fn unloaded_texture_stretches_once() {
    let texture = Arc::new(Texture::from_image("img/pending.png", 0, 0));
    let sprite = TilingSprite::new(texture, 300.0, 200.0);
    assert!(approx_vec2(sprite.uv_transform().repeat, Vec2::ONE));
}

#[test]
fn empty_surface_falls_back_to_default_transform() {
    let texture = Arc::new(Texture::from_image("img/pending.png", 0, 0));
    let sprite = TilingSprite::new(texture, 0.0, 0.0);
    assert_eq!(sprite.uv_transform(), TextureTransform::default());
}

#[test]
fn set_texture_and_destroy() {
    let first = Arc::new(Texture::new("a", 8, 8));
    let second = Arc::new(Texture::new("b", 8, 8));
    let mut sprite = TilingSprite::new(first, 16.0, 16.0);

    sprite.set_texture(second.clone());
    assert!(Arc::ptr_eq(sprite.texture(), &second));

    sprite.destroy();
    sprite.destroy();
    assert!(sprite.is_destroyed());
}
