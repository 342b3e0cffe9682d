//! stagekit_animation - Tick-driven sprite animation for stagekit
//!
//! This crate provides the frame-based animation engine used by tiles,
//! entities and UI sequences. Clips are advanced in whole game ticks and
//! support three looping styles: play once, repeat, and bounce.
//!
//! # Usage
//!
//! ```rust
//! use stagekit_animation::{AnimationClip, AnimationStyle, Frame, Rect};
//!
//! let mut clip = AnimationClip::with_frames(
//!     16,
//!     16,
//!     [
//!         Frame::new(Rect::new(0, 0, 16, 16), 8),
//!         Frame::new(Rect::new(16, 0, 16, 16), 8),
//!     ],
//! )
//! .with_style(AnimationStyle::Bounce);
//!
//! clip.play();
//! clip.advance(8);
//! assert_eq!(clip.current_frame_index(), 1);
//! ```

mod clip;
mod geometry;
mod sprite_def;

#[cfg(feature = "bevy")]
mod plugin;

pub use clip::{
    AnimationClip, AnimationDirection, AnimationStyle, ClipEvent, Frame, FramePresentation,
};
pub use geometry::{Point, Rect};
pub use sprite_def::{FrameDef, SpriteDef};

#[cfg(feature = "bevy")]
pub use plugin::{ClipAnimationPlugin, ClipPlayer};
