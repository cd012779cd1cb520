use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::animation::playback::{Advance, Playback, PlaybackState, SpriteOptions};
use crate::assets::TextureFactory;
use crate::errors::{Result, TilingError};
use crate::resources::Texture;
use crate::scene::{TilingSprite, TilingSurface};
use crate::utils::ticker::{ListenerKey, Scheduler, TickListener};

/// A sprite shared between its owner and the scheduler it plays on.
pub type SharedTilingSprite<S = TilingSprite> = Arc<Mutex<AnimatedTilingSprite<S>>>;

type CompleteHandler = dyn FnMut() + Send;
type FrameChangeHandler = dyn FnMut(usize) + Send;
type LoopHandler = dyn FnMut() + Send;

/// What happened during one tick, in dispatch order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickEvents {
    pub looped: bool,
    pub frame_changed: Option<usize>,
    pub completed: bool,
}

impl TickEvents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.looped && self.frame_changed.is_none() && !self.completed
    }
}

// Single-slot callback holder. `replaced` marks slots written while their
// previous handler was out for dispatch.
struct Slot<F: ?Sized> {
    handler: Option<Box<F>>,
    replaced: bool,
}

impl<F: ?Sized> Default for Slot<F> {
    fn default() -> Self {
        Self {
            handler: None,
            replaced: false,
        }
    }
}

impl<F: ?Sized> Slot<F> {
    fn set(&mut self, handler: Option<Box<F>>) {
        self.handler = handler;
        self.replaced = true;
    }

    fn restore(&mut self, taken: Slot<F>) {
        if !self.replaced {
            self.handler = taken.handler;
        }
        self.replaced = false;
    }
}

#[derive(Default)]
struct PlaybackHandlers {
    on_complete: Slot<CompleteHandler>,
    on_frame_change: Slot<FrameChangeHandler>,
    on_loop: Slot<LoopHandler>,
}

impl PlaybackHandlers {
    fn dispatch(&mut self, events: TickEvents) {
        if events.looped {
            if let Some(handler) = self.on_loop.handler.as_mut() {
                handler();
            }
        }
        if let Some(frame) = events.frame_changed {
            if let Some(handler) = self.on_frame_change.handler.as_mut() {
                handler(frame);
            }
        }
        if events.completed {
            if let Some(handler) = self.on_complete.handler.as_mut() {
                handler();
            }
        }
    }

    fn restore(&mut self, taken: PlaybackHandlers) {
        self.on_complete.restore(taken.on_complete);
        self.on_frame_change.restore(taken.on_frame_change);
        self.on_loop.restore(taken.on_loop);
    }

    fn clear(&mut self) {
        self.on_complete.set(None);
        self.on_frame_change.set(None);
        self.on_loop.set(None);
    }
}

fn first_texture(textures: &[Arc<Texture>]) -> Result<Arc<Texture>> {
    textures.first().cloned().ok_or_else(|| {
        TilingError::InvalidArgument("frame sequence must contain at least one texture".into())
    })
}

/// A tiling surface that flips through a sequence of textures over time.
///
/// # State
///
/// The sprite is either `Stopped` or `Playing`. While playing it is
/// registered with its [`Scheduler`], which calls back once per tick; while
/// stopped it is not registered at all.
///
/// # Frames
///
/// The displayed frame is always `floor(current_time) mod total_frames`.
/// Seeking stores the time unwrapped, so `goto_and_stop(-1.0)` shows the last
/// frame while `current_time()` stays at `-1.0`.
///
/// # Locking
///
/// Sprites live behind a [`SharedTilingSprite`]. Handlers fired from a
/// scheduler tick run after the sprite lock is released and may lock the
/// sprite again. Handlers fired from a direct [`update`](Self::update) call
/// run under the caller's lock and must not.
///
/// While a tick is dispatching, events produced by other ticks or `update`
/// calls are queued and delivered by that dispatch, in order, before the
/// handlers are put back.
pub struct AnimatedTilingSprite<S: TilingSurface = TilingSprite> {
    surface: S,
    textures: Vec<Arc<Texture>>,
    playback: Playback,
    displayed: usize,
    handlers: PlaybackHandlers,
    dispatching: bool,
    pending: SmallVec<[TickEvents; 2]>,

    scheduler: Arc<dyn Scheduler>,
    registration: Option<ListenerKey>,
    this: Weak<Mutex<Self>>,

    destroyed: bool,
}

impl AnimatedTilingSprite<TilingSprite> {
    /// Creates a stopped sprite showing `textures[0]` across `width` x `height`.
    pub fn new(
        textures: Vec<Arc<Texture>>,
        width: f32,
        height: f32,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<SharedTilingSprite> {
        Self::with_options(textures, width, height, scheduler, &SpriteOptions::default())
    }

    pub fn with_options(
        textures: Vec<Arc<Texture>>,
        width: f32,
        height: f32,
        scheduler: Arc<dyn Scheduler>,
        options: &SpriteOptions,
    ) -> Result<SharedTilingSprite> {
        let surface = TilingSprite::new(first_texture(&textures)?, width, height);
        Self::with_surface(surface, textures, scheduler, options)
    }

    /// Builds a sprite from named atlas frames, in order.
    pub fn from_frames<I>(
        frame_ids: I,
        factory: &dyn TextureFactory,
        width: f32,
        height: f32,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<SharedTilingSprite>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let textures = frame_ids
            .into_iter()
            .map(|id| factory.texture_from_frame(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(textures, width, height, scheduler)
    }

    /// Builds a sprite from image URLs, in order.
    pub fn from_images<I>(
        image_urls: I,
        factory: &dyn TextureFactory,
        width: f32,
        height: f32,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<SharedTilingSprite>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let textures = image_urls
            .into_iter()
            .map(|url| factory.texture_from_image(url.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(textures, width, height, scheduler)
    }
}

impl<S: TilingSurface + 'static> AnimatedTilingSprite<S> {
    /// Wraps an existing surface. The surface is switched to `textures[0]`.
    pub fn with_surface(
        mut surface: S,
        textures: Vec<Arc<Texture>>,
        scheduler: Arc<dyn Scheduler>,
        options: &SpriteOptions,
    ) -> Result<SharedTilingSprite<S>> {
        surface.set_texture(first_texture(&textures)?);

        Ok(Arc::new_cyclic(|this| {
            Mutex::new(Self {
                surface,
                textures,
                playback: Playback::new(options),
                displayed: 0,
                handlers: PlaybackHandlers::default(),
                dispatching: false,
                pending: SmallVec::new(),
                scheduler,
                registration: None,
                this: this.clone(),
                destroyed: false,
            })
        }))
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// Starts playing and registers with the scheduler. No-op while playing.
    pub fn play(&mut self) {
        if self.destroyed {
            log::warn!("AnimatedTilingSprite: play() called after destroy, ignoring");
            return;
        }
        if self.playback.is_playing() {
            return;
        }
        let listener: Weak<dyn TickListener> = self.this.clone();
        self.registration = Some(self.scheduler.add(listener));
        self.playback.set_state(PlaybackState::Playing);
        log::debug!(
            "AnimatedTilingSprite: playing from t={} ({} frames)",
            self.playback.current_time(),
            self.textures.len()
        );
    }

    /// Stops playing and unregisters from the scheduler. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.playback.is_playing() {
            return;
        }
        self.playback.set_state(PlaybackState::Stopped);
        if let Some(key) = self.registration.take() {
            self.scheduler.remove(key);
        }
        log::debug!(
            "AnimatedTilingSprite: stopped at t={}",
            self.playback.current_time()
        );
    }

    /// Stops and jumps to `frame`.
    pub fn goto_and_stop(&mut self, frame: f32) {
        if self.destroyed {
            log::warn!("AnimatedTilingSprite: goto_and_stop() called after destroy, ignoring");
            return;
        }
        self.stop_at(frame);
    }

    /// Jumps to `frame` and starts playing.
    ///
    /// The surface switches to the new frame right away, without firing
    /// `on_frame_change`.
    pub fn goto_and_play(&mut self, frame: f32) {
        if self.destroyed {
            log::warn!("AnimatedTilingSprite: goto_and_play() called after destroy, ignoring");
            return;
        }
        self.playback.seek(frame);
        self.show(self.current_frame());
        self.play();
    }

    /// Advances playback by `delta` frames and fires handlers inline.
    ///
    /// Ignored while stopped. Returns what happened during the tick. Called
    /// while a scheduler tick is dispatching, the events are queued for that
    /// dispatch instead.
    pub fn update(&mut self, delta: f32) -> TickEvents {
        let events = self.advance(delta);
        if events.is_empty() {
            return events;
        }
        if self.dispatching {
            self.pending.push(events);
        } else {
            self.handlers.dispatch(events);
        }
        events
    }

    fn advance(&mut self, delta: f32) -> TickEvents {
        let mut events = TickEvents::default();
        if !self.playback.is_playing() {
            return events;
        }

        match self.playback.advance(delta, self.textures.len()) {
            Advance::Show { frame, wrapped } => {
                events.looped = wrapped;
                if self.show(frame) {
                    events.frame_changed = Some(frame);
                }
            }
            Advance::Finish { frame } => {
                if self.stop_at(frame as f32) {
                    events.frame_changed = Some(frame);
                }
                events.completed = true;
                log::debug!("AnimatedTilingSprite: completed on frame {frame}");
            }
        }

        log::trace!(
            "AnimatedTilingSprite: t={} frame={}",
            self.playback.current_time(),
            self.displayed
        );
        events
    }

    fn stop_at(&mut self, frame: f32) -> bool {
        self.stop();
        self.playback.seek(frame);
        self.show(self.current_frame())
    }

    /// Points the surface at `textures[frame]`; returns whether the index changed.
    fn show(&mut self, frame: usize) -> bool {
        self.surface.set_texture(Arc::clone(&self.textures[frame]));
        let changed = frame != self.displayed;
        self.displayed = frame;
        changed
    }

    // ========================================================================
    // Frame sequence
    // ========================================================================

    #[must_use]
    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }

    /// Replaces the frame sequence, keeping the clock and playback state.
    ///
    /// The displayed texture is recomputed immediately from the current time.
    pub fn set_textures(&mut self, textures: Vec<Arc<Texture>>) -> Result<()> {
        if textures.is_empty() {
            return Err(TilingError::InvalidArgument(
                "frame sequence must contain at least one texture".into(),
            ));
        }
        self.textures = textures;
        self.show(self.current_frame());
        log::debug!(
            "AnimatedTilingSprite: frame sequence replaced ({} frames, showing {})",
            self.textures.len(),
            self.displayed
        );
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.playback.current_frame(self.textures.len())
    }

    /// Texture currently shown by the surface.
    #[must_use]
    pub fn texture(&self) -> &Arc<Texture> {
        self.surface.texture()
    }

    // ========================================================================
    // Playback properties
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.playback.current_time()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.playback.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.playback.speed = speed;
    }

    #[inline]
    #[must_use]
    pub fn looping(&self) -> bool {
        self.playback.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.playback.looping = looping;
    }

    /// Scheduler registration held while playing.
    #[inline]
    #[must_use]
    pub fn registration(&self) -> Option<ListenerKey> {
        self.registration
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Fired once when a non-looping sprite runs past either end.
    pub fn on_complete(&mut self, handler: impl FnMut() + Send + 'static) {
        self.handlers.on_complete.set(Some(Box::new(handler)));
    }

    pub fn clear_on_complete(&mut self) {
        self.handlers.on_complete.set(None);
    }

    /// Fired with the new index when a tick changes the displayed frame.
    pub fn on_frame_change(&mut self, handler: impl FnMut(usize) + Send + 'static) {
        self.handlers.on_frame_change.set(Some(Box::new(handler)));
    }

    /// Fired when a looping sprite wraps around either end.
    pub fn on_loop(&mut self, handler: impl FnMut() + Send + 'static) {
        self.handlers.on_loop.set(Some(Box::new(handler)));
    }

    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    // ========================================================================
    // Surface & teardown
    // ========================================================================

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Stops playback and releases the surface. Textures are left untouched.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop();
        self.surface.destroy();
        self.handlers.clear();
        self.destroyed = true;
    }
}

impl<S: TilingSurface + 'static> TickListener for Mutex<AnimatedTilingSprite<S>> {
    fn tick(&self, delta: f32) {
        {
            let mut sprite = self.lock();
            let events = sprite.advance(delta);
            if events.is_empty() {
                return;
            }
            sprite.pending.push(events);
            // Another tick owns the handlers and drains the queue.
            if sprite.dispatching {
                return;
            }
            sprite.dispatching = true;
        }

        loop {
            let (batch, mut handlers) = {
                let mut sprite = self.lock();
                if sprite.pending.is_empty() {
                    sprite.dispatching = false;
                    return;
                }
                let batch = std::mem::take(&mut sprite.pending);
                (batch, std::mem::take(&mut sprite.handlers))
            };

            for events in batch {
                handlers.dispatch(events);
            }
            self.lock().handlers.restore(handlers);
        }
    }
}

impl<S: TilingSurface> Drop for AnimatedTilingSprite<S> {
    fn drop(&mut self) {
        if let Some(key) = self.registration.take() {
            self.scheduler.remove(key);
        }
    }
}

impl<S: TilingSurface> fmt::Debug for AnimatedTilingSprite<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedTilingSprite")
            .field("total_frames", &self.textures.len())
            .field("displayed", &self.displayed)
            .field("playback", &self.playback)
            .field("registration", &self.registration)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
