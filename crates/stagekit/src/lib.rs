//! stagekit - Screen-based 2D levels for platformer games
//!
//! This crate bundles the stagekit crates behind one dependency:
//!
//! - [`level`] - Levels, screens, joins, tile catalogs and their file formats
//! - [`animation`] - Tick-driven sprite animation clips
//!
//! With the `bevy` feature, [`StagekitPlugin`] ticks the tile animations of
//! a [`prelude::LevelGraph`] resource and every [`prelude::ClipPlayer`] once
//! per fixed step.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stagekit::prelude::*;
//!
//! let mut level = LevelGraph::load("assets/stages/cutman")?;
//! if let Some(screen) = level.screen_mut("Intro") {
//!     screen.set_tile(4, 10, 1)?;
//! }
//! if level.is_dirty() {
//!     level.save_current()?;
//! }
//! # Ok::<(), LevelError>(())
//! ```

pub use stagekit_animation as animation;
pub use stagekit_core as level;

pub mod prelude;

#[cfg(feature = "bevy")]
mod plugin;

#[cfg(feature = "bevy")]
pub use plugin::StagekitPlugin;
