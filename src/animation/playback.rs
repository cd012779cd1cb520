use serde::{Deserialize, Serialize};

/// Maps a playback time onto a frame of a sequence of `total_frames`.
///
/// Uses floor-mod, so the result is always in `[0, total_frames)`, also for
/// negative times: `-1.0` maps to the last frame.
#[inline]
#[must_use]
pub fn frame_index(time: f32, total_frames: usize) -> usize {
    debug_assert!(total_frames > 0, "frame sequence must not be empty");
    (time.floor() as i64).rem_euclid(total_frames as i64) as usize
}

/// Number of whole passes over the sequence `time` lies in (negative before 0).
#[inline]
fn cycle(time: f32, total_frames: usize) -> i64 {
    (time.floor() as i64).div_euclid(total_frames as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Outcome of advancing the clock by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Keep playing and display `frame`. `wrapped` is set when a looping
    /// sequence crossed either end.
    Show { frame: usize, wrapped: bool },
    /// A non-looping sequence ran past an end; stop on `frame`.
    Finish { frame: usize },
}

/// Initial playback settings of a sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    /// Frames advanced per tick delta. Negative values play backwards.
    pub speed: f32,
    pub looping: bool,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            looping: true,
        }
    }
}

/// Playback clock and state, independent of any textures or scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    current_time: f32,
    pub speed: f32,
    pub looping: bool,
    state: PlaybackState,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(&SpriteOptions::default())
    }
}

impl Playback {
    #[must_use]
    pub fn new(options: &SpriteOptions) -> Self {
        Self {
            current_time: 0.0,
            speed: options.speed,
            looping: options.looping,
            state: PlaybackState::Stopped,
        }
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Moves the clock without wrapping.
    #[inline]
    pub fn seek(&mut self, time: f32) {
        self.current_time = time;
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    pub(crate) fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
    }

    #[inline]
    #[must_use]
    pub fn current_frame(&self, total_frames: usize) -> usize {
        frame_index(self.current_time, total_frames)
    }

    /// Advances the clock by `speed * delta` and decides what to display.
    ///
    /// Does not change the playback state; on [`Advance::Finish`] the caller
    /// is expected to stop and seek to the returned frame.
    pub fn advance(&mut self, delta: f32, total_frames: usize) -> Advance {
        let previous_cycle = cycle(self.current_time, total_frames);
        self.current_time += self.speed * delta;
        let floor = self.current_time.floor();

        if floor < 0.0 && !self.looping {
            Advance::Finish { frame: 0 }
        } else if floor < 0.0 || self.looping || floor < total_frames as f32 {
            Advance::Show {
                frame: frame_index(self.current_time, total_frames),
                wrapped: self.looping && cycle(self.current_time, total_frames) != previous_cycle,
            }
        } else {
            Advance::Finish {
                frame: total_frames - 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn once() -> Playback {
        Playback::new(&SpriteOptions {
            speed: 1.0,
            looping: false,
        })
    }

    #[test]
    fn test_frame_index_floor_mod() {
        assert_eq!(frame_index(0.0, 3), 0);
        assert_eq!(frame_index(2.99, 3), 2);
        assert_eq!(frame_index(3.0, 3), 0);
        assert_eq!(frame_index(-0.5, 3), 2);
        assert_eq!(frame_index(-3.0, 3), 0);
        assert_eq!(frame_index(-4.0, 3), 2);
        assert_eq!(frame_index(1234.5, 1), 0);
    }

    #[test]
    fn test_frame_index_always_in_range() {
        for total in 1..=7 {
            let mut t = -50.0_f32;
            while t < 50.0 {
                assert!(frame_index(t, total) < total, "t={t} total={total}");
                t += 0.37;
            }
        }
    }

    #[test]
    fn test_advance_looping_wraps_forward() {
        let mut playback = Playback::default();
        let frames: Vec<_> = (0..7).map(|_| playback.advance(1.0, 3)).collect();

        assert_eq!(frames[0], Advance::Show { frame: 1, wrapped: false });
        assert_eq!(frames[1], Advance::Show { frame: 2, wrapped: false });
        assert_eq!(frames[2], Advance::Show { frame: 0, wrapped: true });
        assert_eq!(frames[5], Advance::Show { frame: 0, wrapped: true });
    }

    #[test]
    fn test_advance_looping_wraps_backward() {
        let mut playback = Playback::default();
        playback.speed = -1.0;

        assert_eq!(playback.advance(0.5, 3), Advance::Show { frame: 2, wrapped: true });
        assert_eq!(playback.advance(1.0, 3), Advance::Show { frame: 1, wrapped: false });
        assert!(playback.current_time() < 0.0);
    }

    #[test]
    fn test_advance_once_finishes_at_end() {
        let mut playback = once();
        assert_eq!(playback.advance(2.5, 3), Advance::Show { frame: 2, wrapped: false });
        assert_eq!(playback.advance(1.0, 3), Advance::Finish { frame: 2 });
    }

    #[test]
    fn test_advance_once_finishes_at_start() {
        let mut playback = once();
        assert_eq!(playback.advance(-0.5, 3), Advance::Finish { frame: 0 });
    }

    #[test]
    fn test_advance_respects_speed() {
        let mut playback = once();
        playback.speed = 0.25;
        assert_eq!(playback.advance(2.0, 3), Advance::Show { frame: 0, wrapped: false });
        assert!((playback.current_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_advance_does_not_touch_state() {
        let mut playback = once();
        playback.advance(10.0, 3);
        assert_eq!(playback.state(), PlaybackState::Stopped);
    }
}
