//! Screens: one tile grid of a level plus what is placed on it

use crate::block_pattern::BlockPattern;
use crate::error::{self, LevelError};
use crate::grid::TileGrid;
use crate::music::Music;
use crate::tileset::{Tile, TileCatalog, TileId};
use stagekit_animation::Point;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// State given to entities placed without an explicit one
pub const DEFAULT_ENTITY_STATE: &str = "Start";

/// Screen names become file names inside the level directory, so they may
/// not be empty, `.`/`..`, or contain a path separator
pub(crate) fn check_screen_name(name: &str) -> Result<(), LevelError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(LevelError::malformed(
            "screen name",
            format!("'{}' cannot be used as a screen file name", name),
        ));
    }
    Ok(())
}

/// An entity placed on a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpawn {
    pub name: String,
    pub state: String,
    pub position: Point,
    pub palette: Option<String>,
    pub is_boss: bool,
}

impl EntitySpawn {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            state: DEFAULT_ENTITY_STATE.to_string(),
            position,
            palette: None,
            is_boss: false,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    pub fn as_boss(mut self) -> Self {
        self.is_boss = true;
        self
    }
}

/// A point on a screen that moves the player to another screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teleport {
    pub from: Point,
    pub to: Point,
    pub target_screen: String,
}

impl Teleport {
    pub fn new(from: Point, target_screen: impl Into<String>, to: Point) -> Self {
        Self {
            from,
            to,
            target_screen: target_screen.into(),
        }
    }
}

/// A named tile grid resolved against a shared catalog
///
/// Every mutation marks the screen dirty. The owning level reports itself
/// dirty whenever any of its screens is.
#[derive(Debug, Clone)]
pub struct Screen {
    name: String,
    grid: TileGrid,
    tileset: Arc<TileCatalog>,
    entities: Vec<EntitySpawn>,
    teleports: Vec<Teleport>,
    block_patterns: Vec<BlockPattern>,
    music: Option<Music>,
    dirty: bool,
}

impl Screen {
    /// A blank screen; new screens start dirty since nothing is on disk yet
    pub fn new(name: impl Into<String>, width: u32, height: u32, tileset: Arc<TileCatalog>) -> Self {
        Self::from_grid(name, TileGrid::new(width, height), tileset)
    }

    pub fn from_grid(name: impl Into<String>, grid: TileGrid, tileset: Arc<TileCatalog>) -> Self {
        Self {
            name: name.into(),
            grid,
            tileset,
            entities: Vec::new(),
            teleports: Vec::new(),
            block_patterns: Vec::new(),
            music: None,
            dirty: true,
        }
    }

    /// Load a `.scn` grid file; the screen is named after the file stem
    pub fn load(path: impl AsRef<Path>, tileset: Arc<TileCatalog>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = error::read_to_string(path)?;
        let grid = TileGrid::parse(&text, &path.display().to_string())?;

        let unknown = grid
            .cells()
            .iter()
            .filter(|id| !tileset.contains(**id))
            .count();
        if unknown > 0 {
            warn!(
                "Screen '{}' references {} tile(s) outside the {}-tile catalog",
                name,
                unknown,
                tileset.len()
            );
        }

        let mut screen = Screen::from_grid(name, grid, tileset);
        screen.dirty = false;
        debug!(
            "Loaded screen '{}' ({}x{})",
            screen.name,
            screen.width(),
            screen.height()
        );
        Ok(screen)
    }

    /// Write the grid as a `.scn` file and clear the dirty flag
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        error::write_atomic(path, self.grid.to_text().as_bytes())?;
        self.dirty = false;
        debug!("Saved screen '{}' to {}", self.name, path.display());
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn pixel_width(&self) -> u32 {
        self.grid.width() * self.tileset.tile_size()
    }

    pub fn pixel_height(&self) -> u32 {
        self.grid.height() * self.tileset.tile_size()
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tileset(&self) -> &Arc<TileCatalog> {
        &self.tileset
    }

    /// Point this screen at another catalog; tile ids are kept as they are
    pub fn set_tileset(&mut self, tileset: Arc<TileCatalog>) {
        self.tileset = tileset;
    }

    pub fn tile_id_at(&self, x: i32, y: i32) -> Option<TileId> {
        self.grid.get(x, y)
    }

    /// The tile at a grid position; `None` outside the grid or for ids the
    /// catalog does not have
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.grid.get(x, y).and_then(|id| self.tileset.tile(id))
    }

    pub fn set_tile(&mut self, x: i32, y: i32, id: TileId) -> Result<(), LevelError> {
        if !self.grid.contains(x, y) {
            return Err(LevelError::OutOfRange {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width(),
                height: self.height(),
            });
        }
        if !self.tileset.contains(id) {
            return Err(LevelError::InvalidTileId {
                id,
                count: self.tileset.len(),
            });
        }
        self.grid.set(x, y, id);
        self.dirty = true;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.grid.resize(width, height);
        self.dirty = true;
    }

    pub fn entity_spawns(&self) -> &[EntitySpawn] {
        &self.entities
    }

    pub fn add_entity_spawn(&mut self, spawn: EntitySpawn) {
        self.entities.push(spawn);
        self.dirty = true;
    }

    /// A screen holding a boss spawn is a boss room
    pub fn is_boss_room(&self) -> bool {
        self.entities.iter().any(|e| e.is_boss)
    }

    pub fn teleports(&self) -> &[Teleport] {
        &self.teleports
    }

    pub fn add_teleport(&mut self, teleport: Teleport) {
        self.teleports.push(teleport);
        self.dirty = true;
    }

    /// Point teleports aimed at `old` to `new`
    pub(crate) fn retarget_teleports(&mut self, old: &str, new: &str) {
        for teleport in &mut self.teleports {
            if teleport.target_screen == old {
                teleport.target_screen = new.to_string();
                self.dirty = true;
            }
        }
    }

    pub fn block_patterns(&self) -> &[BlockPattern] {
        &self.block_patterns
    }

    pub fn add_block_pattern(&mut self, pattern: BlockPattern) {
        self.block_patterns.push(pattern);
        self.dirty = true;
    }

    /// Music override for this screen
    pub fn music(&self) -> Option<&Music> {
        self.music.as_ref()
    }

    pub fn set_music(&mut self, music: Option<Music>) {
        self.music = music;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
