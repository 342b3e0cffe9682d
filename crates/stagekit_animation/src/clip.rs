//! Frame-based animation clips driven by game ticks

use crate::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Direction in which a clip sweeps through its frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimationDirection {
    #[default]
    Forward,
    Backward,
}

impl AnimationDirection {
    /// Get the opposite direction
    pub fn reversed(self) -> Self {
        match self {
            AnimationDirection::Forward => AnimationDirection::Backward,
            AnimationDirection::Backward => AnimationDirection::Forward,
        }
    }

    fn step(self) -> isize {
        match self {
            AnimationDirection::Forward => 1,
            AnimationDirection::Backward => -1,
        }
    }
}

/// What happens when playback runs off either end of the frame list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimationStyle {
    /// Play to the end once, then stop and rewind
    PlayOnce,
    /// Wrap around to the opposite end indefinitely
    #[default]
    Repeat,
    /// Sweep forward and backward indefinitely
    Bounce,
}

impl AnimationStyle {
    /// Get the display name for this style
    pub fn display_name(&self) -> &'static str {
        match self {
            AnimationStyle::PlayOnce => "Play Once",
            AnimationStyle::Repeat => "Repeat",
            AnimationStyle::Bounce => "Bounce",
        }
    }

    /// Get all available styles
    pub fn all() -> &'static [AnimationStyle] {
        &[
            AnimationStyle::PlayOnce,
            AnimationStyle::Repeat,
            AnimationStyle::Bounce,
        ]
    }
}

/// A single frame: where to read it on the sheet and how long to show it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Frame {
    pub source: Rect,
    /// Display time in game ticks. Zero-duration frames are never shown.
    pub duration: u32,
}

impl Frame {
    pub fn new(source: Rect, duration: u32) -> Self {
        Self { source, duration }
    }
}

/// Notifications queued by a clip, drained by whoever owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEvent {
    /// Playback stopped, either explicitly or because a PlayOnce clip ran out
    Stopped,
}

/// Everything a renderer needs to draw the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePresentation {
    /// Region of the sheet to copy
    pub source: Rect,
    /// Destination top-left after hotspot and flip adjustment
    pub x: i32,
    pub y: i32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub layer: i32,
}

/// A timed sequence of sprite frames with a looping policy
///
/// Clips are advanced in whole game ticks. A clip with one frame or with
/// only zero-duration frames never consumes ticks, whether or not it is
/// playing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Drawing offset subtracted from the draw position
    pub hotspot: Point,
    pub layer: i32,
    pub horizontal_flip: bool,
    pub vertical_flip: bool,
    pub visible: bool,
    frames: Vec<Frame>,
    direction: AnimationDirection,
    style: AnimationStyle,
    current_frame: usize,
    elapsed: u32,
    playing: bool,
    advancing: bool,
    events: Vec<ClipEvent>,
}

impl Default for AnimationClip {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl AnimationClip {
    /// Create an empty clip with the given frame size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            name: String::new(),
            width,
            height,
            hotspot: Point::ZERO,
            layer: 0,
            horizontal_flip: false,
            vertical_flip: false,
            visible: true,
            frames: Vec::new(),
            direction: AnimationDirection::Forward,
            style: AnimationStyle::Repeat,
            current_frame: 0,
            elapsed: 0,
            playing: false,
            advancing: false,
            events: Vec::new(),
        }
    }

    /// Create a clip from a list of frames
    pub fn with_frames(width: u32, height: u32, frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut clip = Self::new(width, height);
        clip.frames.extend(frames);
        clip.refresh_advancing();
        clip
    }

    pub fn with_style(mut self, style: AnimationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_hotspot(mut self, hotspot: Point) -> Self {
        self.hotspot = hotspot;
        self
    }

    /// Append a frame at edit time
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.refresh_advancing();
    }

    /// Remove every frame and rewind
    pub fn clear_frames(&mut self) {
        self.frames.clear();
        self.current_frame = 0;
        self.elapsed = 0;
        self.advancing = false;
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_frame_index(&self) -> usize {
        self.current_frame
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.current_frame)
    }

    /// Ticks spent so far on the current frame
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether this clip can ever move off its current frame
    pub fn is_advancing(&self) -> bool {
        self.advancing
    }

    pub fn direction(&self) -> AnimationDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: AnimationDirection) {
        self.direction = direction;
    }

    pub fn style(&self) -> AnimationStyle {
        self.style
    }

    pub fn set_style(&mut self, style: AnimationStyle) {
        self.style = style;
    }

    /// Sum of all frame durations in ticks
    pub fn total_duration(&self) -> u32 {
        self.frames.iter().map(|f| f.duration).sum()
    }

    /// Jump to a frame without changing the playing state.
    /// Returns false if the index is out of range.
    pub fn set_frame(&mut self, index: usize) -> bool {
        if index >= self.frames.len() {
            return false;
        }
        self.current_frame = index;
        self.elapsed = 0;
        true
    }

    /// Start playback from the first frame (or the last, when playing backward)
    pub fn play(&mut self) {
        self.playing = true;
        self.reset();
    }

    /// Stop playback, rewind, and queue a [`ClipEvent::Stopped`]
    pub fn stop(&mut self) {
        self.playing = false;
        self.reset();
        self.events.push(ClipEvent::Stopped);
    }

    /// Pause at the current frame
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Continue from the current frame
    pub fn resume(&mut self) {
        self.playing = true;
    }

    /// Rewind to the first frame, or the last when playing backward
    pub fn reset(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.current_frame = match self.direction {
            AnimationDirection::Forward => 0,
            AnimationDirection::Backward => self.frames.len() - 1,
        };
        self.elapsed = 0;
    }

    /// Advance playback by a number of game ticks
    pub fn advance(&mut self, ticks: u32) {
        if !self.playing || !self.advancing {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(ticks);

        while self.playing {
            let needed = self.frames[self.current_frame].duration;
            if self.elapsed < needed {
                break;
            }
            self.elapsed -= needed;
            self.step_frame();

            // Zero-duration frames are passed over in the same tick
            while self.playing && self.frames[self.current_frame].duration == 0 {
                self.step_frame();
            }
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<ClipEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where and what to draw for a clip anchored at `(x, y)`
    pub fn presentation(&self, x: i32, y: i32) -> Option<FramePresentation> {
        if !self.visible {
            return None;
        }
        let frame = self.current_frame()?;

        let draw_x = if self.horizontal_flip {
            x - self.width as i32 + self.hotspot.x
        } else {
            x - self.hotspot.x
        };
        let draw_y = if self.vertical_flip {
            y - self.height as i32 + self.hotspot.y
        } else {
            y - self.hotspot.y
        };

        Some(FramePresentation {
            source: frame.source,
            x: draw_x,
            y: draw_y,
            flip_x: self.horizontal_flip,
            flip_y: self.vertical_flip,
            layer: self.layer,
        })
    }

    fn refresh_advancing(&mut self) {
        self.advancing = self.frames.len() > 1 && self.frames.iter().any(|f| f.duration > 0);
    }

    fn step_frame(&mut self) {
        let count = self.frames.len() as isize;
        let mut next = self.current_frame as isize + self.direction.step();

        if next >= count || next < 0 {
            match self.style {
                AnimationStyle::PlayOnce => {
                    self.stop();
                    return;
                }
                AnimationStyle::Repeat => {
                    next = if next >= count { 0 } else { count - 1 };
                }
                AnimationStyle::Bounce => {
                    next -= 2 * self.direction.step();
                    self.direction = self.direction.reversed();
                }
            }
        }

        self.current_frame = next.clamp(0, count - 1) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(durations: &[u32], style: AnimationStyle) -> AnimationClip {
        let frames = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Frame::new(Rect::new(i as i32 * 16, 0, 16, 16), d));
        AnimationClip::with_frames(16, 16, frames).with_style(style)
    }

    fn visited(clip: &mut AnimationClip, ticks: u32) -> Vec<usize> {
        let mut frames = vec![clip.current_frame_index()];
        for _ in 0..ticks {
            clip.advance(1);
            frames.push(clip.current_frame_index());
        }
        frames
    }

    #[test]
    fn test_repeat_cycle_closes() {
        let mut clip = clip(&[3, 1, 4, 2], AnimationStyle::Repeat);
        clip.play();

        clip.advance(clip.total_duration());
        assert_eq!(clip.current_frame_index(), 0);
        assert_eq!(clip.elapsed(), 0);

        // Same result one tick at a time
        let total = clip.total_duration();
        let frames = visited(&mut clip, total);
        assert_eq!(frames.last(), Some(&0));
        assert!(clip.is_playing());
    }

    #[test]
    fn test_repeat_frame_timing() {
        let mut clip = clip(&[2, 1], AnimationStyle::Repeat);
        clip.play();
        assert_eq!(visited(&mut clip, 6), vec![0, 0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn test_play_once_stops_exactly_once() {
        let mut clip = clip(&[2, 2, 2], AnimationStyle::PlayOnce);
        clip.play();

        clip.advance(4);
        assert_eq!(clip.current_frame_index(), 2);
        assert!(clip.is_playing());
        assert!(clip.drain_events().is_empty());

        clip.advance(2);
        assert!(!clip.is_playing());
        assert_eq!(clip.current_frame_index(), 0);
        assert_eq!(clip.drain_events(), vec![ClipEvent::Stopped]);

        // Further ticks do nothing while stopped
        clip.advance(10);
        assert!(clip.drain_events().is_empty());
    }

    #[test]
    fn test_play_once_backward_rewinds_to_last() {
        let mut clip = clip(&[1, 1, 1], AnimationStyle::PlayOnce)
            .with_direction(AnimationDirection::Backward);
        clip.play();
        assert_eq!(clip.current_frame_index(), 2);

        clip.advance(3);
        assert!(!clip.is_playing());
        assert_eq!(clip.current_frame_index(), 2);
        assert_eq!(clip.drain_events().len(), 1);
    }

    #[test]
    fn test_bounce_is_palindrome() {
        let mut clip = clip(&[1, 1, 1, 1], AnimationStyle::Bounce);
        clip.play();

        // One full sweep out and back: 2 * (n - 1) steps
        let frames = visited(&mut clip, 6);
        assert_eq!(frames, vec![0, 1, 2, 3, 2, 1, 0]);

        let reversed: Vec<usize> = frames.iter().rev().copied().collect();
        assert_eq!(frames, reversed);
        assert!(frames.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(clip.direction(), AnimationDirection::Backward);

        clip.advance(1);
        assert_eq!(clip.current_frame_index(), 1);
        assert_eq!(clip.direction(), AnimationDirection::Forward);
    }

    #[test]
    fn test_bounce_two_frames() {
        let mut clip = clip(&[1, 1], AnimationStyle::Bounce);
        clip.play();
        assert_eq!(visited(&mut clip, 4), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_bounce_backward_turns_at_first_frame() {
        let mut clip = clip(&[1, 1, 1, 1], AnimationStyle::Bounce)
            .with_direction(AnimationDirection::Backward);
        clip.play();
        assert_eq!(clip.current_frame_index(), 3);

        let frames = visited(&mut clip, 6);
        assert_eq!(frames, vec![3, 2, 1, 0, 1, 2, 3]);
        assert!(frames.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(clip.direction(), AnimationDirection::Forward);

        clip.advance(1);
        assert_eq!(clip.current_frame_index(), 2);
        assert_eq!(clip.direction(), AnimationDirection::Backward);
    }

    #[test]
    fn test_bounce_with_mixed_durations() {
        let mut clip = clip(&[2, 0, 3, 1], AnimationStyle::Bounce);
        clip.play();

        let total = clip.total_duration();
        let frames = visited(&mut clip, 2 * total);
        assert_eq!(frames, vec![0, 0, 2, 2, 2, 3, 2, 2, 2, 0, 0, 2, 2]);
        assert!(!frames.contains(&1));

        // Out and back from the first frame reads the same both ways
        let sweep = &frames[..11];
        let reversed: Vec<usize> = sweep.iter().rev().copied().collect();
        assert_eq!(sweep, reversed.as_slice());

        // The turn-around frame is shown for its own duration only
        assert_eq!(frames.iter().filter(|&&f| f == 3).count(), 1);
    }

    #[test]
    fn test_zero_duration_frames_are_skipped() {
        let mut clip = clip(&[2, 0, 0, 3], AnimationStyle::Repeat);
        clip.play();

        let total = clip.total_duration();
        let frames = visited(&mut clip, total);
        assert!(!frames.contains(&1));
        assert!(!frames.contains(&2));
        assert_eq!(frames, vec![0, 0, 3, 3, 3, 0]);
    }

    #[test]
    fn test_non_advancing_clips() {
        let mut single = clip(&[5], AnimationStyle::Repeat);
        single.play();
        single.advance(100);
        assert!(!single.is_advancing());
        assert_eq!(single.current_frame_index(), 0);

        let mut zeros = clip(&[0, 0, 0], AnimationStyle::Repeat);
        zeros.play();
        zeros.advance(100);
        assert!(!zeros.is_advancing());
        assert_eq!(zeros.current_frame_index(), 0);
    }

    #[test]
    fn test_not_playing_does_not_advance() {
        let mut clip = clip(&[1, 1], AnimationStyle::Repeat);
        clip.advance(5);
        assert_eq!(clip.current_frame_index(), 0);
        assert_eq!(clip.elapsed(), 0);
    }

    #[test]
    fn test_pause_and_resume_keep_position() {
        let mut clip = clip(&[1, 1, 1], AnimationStyle::Repeat);
        clip.play();
        clip.advance(1);
        clip.pause();
        clip.advance(5);
        assert_eq!(clip.current_frame_index(), 1);

        clip.resume();
        clip.advance(1);
        assert_eq!(clip.current_frame_index(), 2);
        assert!(clip.drain_events().is_empty());
    }

    #[test]
    fn test_stop_fires_and_rewinds() {
        let mut clip = clip(&[1, 1, 1], AnimationStyle::Repeat);
        clip.play();
        clip.advance(2);
        clip.stop();

        assert!(!clip.is_playing());
        assert_eq!(clip.current_frame_index(), 0);
        assert_eq!(clip.drain_events(), vec![ClipEvent::Stopped]);
    }

    #[test]
    fn test_backward_repeat_wraps_to_end() {
        let mut clip =
            clip(&[1, 1, 1], AnimationStyle::Repeat).with_direction(AnimationDirection::Backward);
        clip.play();
        assert_eq!(visited(&mut clip, 3), vec![2, 1, 0, 2]);
    }

    #[test]
    fn test_empty_clip_is_noop() {
        let mut clip = AnimationClip::new(8, 8);
        clip.play();
        clip.advance(10);
        clip.reset();
        assert_eq!(clip.current_frame(), None);
        assert_eq!(clip.presentation(0, 0), None);
    }

    #[test]
    fn test_presentation_applies_hotspot_and_flip() {
        let mut clip = clip(&[1, 1], AnimationStyle::Repeat).with_hotspot(Point::new(4, 6));
        clip.layer = 2;

        let shown = clip.presentation(100, 50).unwrap();
        assert_eq!(shown.source, Rect::new(0, 0, 16, 16));
        assert_eq!((shown.x, shown.y), (96, 44));
        assert_eq!(shown.layer, 2);

        clip.horizontal_flip = true;
        let flipped = clip.presentation(100, 50).unwrap();
        assert_eq!((flipped.x, flipped.y), (88, 44));
        assert!(flipped.flip_x);

        clip.visible = false;
        assert_eq!(clip.presentation(100, 50), None);
    }

    #[test]
    fn test_push_frame_enables_advancing() {
        let mut clip = AnimationClip::new(16, 16);
        clip.push_frame(Frame::new(Rect::new(0, 0, 16, 16), 4));
        assert!(!clip.is_advancing());
        clip.push_frame(Frame::new(Rect::new(16, 0, 16, 16), 4));
        assert!(clip.is_advancing());
    }
}
