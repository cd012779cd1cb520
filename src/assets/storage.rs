use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::sync::Arc;
use uuid::Uuid;

use crate::assets::TextureFactory;
use crate::errors::{Result, TilingError};
use crate::resources::Texture;

new_key_type! {
    pub struct TextureHandle;
}

// Internal data structure, protected by a lock.
#[derive(Default)]
struct StoreInner {
    map: SlotMap<TextureHandle, Arc<Texture>>,
    frames: FxHashMap<String, TextureHandle>,
    lookup: FxHashMap<Uuid, TextureHandle>,
}

/// Thread-safe texture cache acting as the host's texture factory.
///
/// Frames must be registered up front (typically when an atlas is parsed).
/// Images are created on first request and deduplicated by URL.
#[derive(Default)]
pub struct TextureStore {
    inner: RwLock<StoreInner>,
}

impl TextureStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// [Write] Registers a named frame texture and returns its handle.
    /// Re-registering a name replaces the previous frame.
    pub fn add_frame(&self, frame_id: &str, width: u32, height: u32) -> TextureHandle {
        let mut guard = self.inner.write();
        let texture = Texture::from_frame(frame_id, width, height);
        let uuid = texture.uuid;
        let handle = guard.map.insert(Arc::new(texture));
        if let Some(old) = guard.frames.insert(frame_id.to_string(), handle) {
            if let Some(previous) = guard.map.remove(old) {
                guard.lookup.remove(&previous.uuid);
            }
            log::debug!("TextureStore: frame '{frame_id}' replaced");
        }
        guard.lookup.insert(uuid, handle);
        handle
    }

    /// [Write] Registers a decoded image, updating its size if the URL was
    /// already requested.
    pub fn add_image(&self, url: &str, width: u32, height: u32) -> Result<TextureHandle> {
        if url.trim().is_empty() {
            return Err(TilingError::InvalidImageSource(url.to_string()));
        }
        let uuid = Texture::image_uuid(url);
        let mut guard = self.inner.write();
        let texture = Arc::new(Texture::from_image(url, width, height));
        if let Some(&handle) = guard.lookup.get(&uuid) {
            guard.map[handle] = texture;
            return Ok(handle);
        }
        let handle = guard.map.insert(texture);
        guard.lookup.insert(uuid, handle);
        Ok(handle)
    }

    /// [Read] Gets a single texture.
    pub fn get(&self, handle: TextureHandle) -> Option<Arc<Texture>> {
        self.inner.read().map.get(handle).cloned()
    }

    pub fn get_by_uuid(&self, uuid: &Uuid) -> Option<Arc<Texture>> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(uuid)?;
        guard.map.get(*handle).cloned()
    }

    pub fn contains_frame(&self, frame_id: &str) -> bool {
        self.inner.read().frames.contains_key(frame_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().map.is_empty()
    }
}

impl TextureFactory for TextureStore {
    fn texture_from_frame(&self, frame_id: &str) -> Result<Arc<Texture>> {
        let guard = self.inner.read();
        guard
            .frames
            .get(frame_id)
            .and_then(|handle| guard.map.get(*handle))
            .cloned()
            .ok_or_else(|| TilingError::TextureNotFound(frame_id.to_string()))
    }

    fn texture_from_image(&self, url: &str) -> Result<Arc<Texture>> {
        if url.trim().is_empty() {
            return Err(TilingError::InvalidImageSource(url.to_string()));
        }
        let uuid = Texture::image_uuid(url);
        if let Some(texture) = self.get_by_uuid(&uuid) {
            return Ok(texture);
        }

        let mut guard = self.inner.write();
        if let Some(&handle) = guard.lookup.get(&uuid) {
            return Ok(Arc::clone(&guard.map[handle]));
        }
        // Not decoded yet: hand out a zero-sized placeholder the host fills in later.
        let texture = Arc::new(Texture::from_image(url, 0, 0));
        let handle = guard.map.insert(Arc::clone(&texture));
        guard.lookup.insert(uuid, handle);
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_lookup() {
        let store = TextureStore::new();
        store.add_frame("walk_0", 32, 32);

        let texture = store.texture_from_frame("walk_0").unwrap();
        assert_eq!(texture.name, "walk_0");
        assert!(matches!(
            store.texture_from_frame("walk_1"),
            Err(TilingError::TextureNotFound(id)) if id == "walk_1"
        ));
    }

    #[test]
    fn test_contains_frame() {
        let store = TextureStore::new();
        assert!(!store.contains_frame("run_0"));

        store.add_frame("run_0", 24, 24);
        assert!(store.contains_frame("run_0"));
        assert!(!store.contains_frame("run_1"));

        // Images are keyed by URL, not registered as frames.
        store.add_image("run_1", 24, 24).unwrap();
        assert!(!store.contains_frame("run_1"));
    }

    #[test]
    fn test_frame_replacement_drops_old_texture() {
        let store = TextureStore::new();
        let first = store.add_frame("idle", 16, 16);
        let second = store.add_frame("idle", 32, 32);

        assert!(store.get(first).is_none());
        assert_eq!(store.get(second).unwrap().width, 32);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_image_dedup_by_url() {
        let store = TextureStore::new();
        let a = store.texture_from_image("assets/water.png").unwrap();
        let b = store.texture_from_image("assets/water.png").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.is_loaded());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_image_size_update_keeps_handle() {
        let store = TextureStore::new();
        store.texture_from_image("assets/lava.png").unwrap();
        store.add_image("assets/lava.png", 64, 64).unwrap();

        let texture = store.texture_from_image("assets/lava.png").unwrap();
        assert!(texture.is_loaded());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_image_url_rejected() {
        let store = TextureStore::new();
        assert!(matches!(
            store.texture_from_image("  "),
            Err(TilingError::InvalidImageSource(_))
        ));
        assert!(store.is_empty());
    }
}
