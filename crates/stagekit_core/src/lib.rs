//! Core level data for stagekit
//!
//! This crate provides the types for tile-based levels split into screens:
//! - `LevelGraph` - Screens, the joins between them, start and continue points
//! - `Screen` - A tile grid with entity spawns, teleports and block patterns
//! - `Join` - Directional, optionally boss-gated adjacency between two screens
//! - `TileCatalog` - Animated tiles and their named physical properties
//! - `AssetPath` - Paths kept relative to the file that references them
//!
//! A level lives in one directory: a `map.json` document, one `.scn` grid
//! per screen, and a tileset document referenced by relative path.

mod asset_path;
mod block_pattern;
mod config;
mod document;
mod error;
mod grid;
mod join;
mod level;
mod music;
mod screen;
mod tileset;
mod validate;

pub use asset_path::{normalize, AssetPath};
pub use block_pattern::{BlockPattern, BlockPlacement};
pub use config::LevelConfig;
pub use error::{ErrorKind, LevelError};
pub use grid::TileGrid;
pub use join::{Join, JoinDirection, JoinType};
pub use level::{ContinuePoint, LevelGraph, TilesetMut};
pub use music::Music;
pub use screen::{EntitySpawn, Screen, Teleport, DEFAULT_ENTITY_STATE};
pub use tileset::{CatalogEvent, Tile, TileCatalog, TileId, TileProperties, DEFAULT_PROPERTIES};
pub use validate::ValidationIssue;

pub use stagekit_animation;
