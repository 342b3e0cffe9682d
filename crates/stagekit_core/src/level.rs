//! Levels: screens, the joins between them, and level-wide metadata

use crate::asset_path::{self, AssetPath};
use crate::config::LevelConfig;
use crate::document::{
    BlockPatternDocument, ContinueDocument, EntityDocument, MapDocument, ScreenDocument,
    StartDocument, TeleportDocument,
};
use crate::error::{self, LevelError};
use crate::join::Join;
use crate::music::{Music, MusicDocument};
use crate::screen::{check_screen_name, Screen};
use crate::tileset::{Tile, TileCatalog};
use stagekit_animation::Point;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Where the player respawns after dying past a checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuePoint {
    pub screen: String,
    pub position: Point,
}

/// A whole level: an ordered set of screens sharing one tile catalog, the
/// joins between them, and where the player starts
///
/// The level is dirty when its own flag is set or when any screen is dirty.
/// Screens do not know their level; the flags are folded on every read.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct LevelGraph {
    name: String,
    /// Level directory, relative to its parent
    stage_path: Option<AssetPath>,
    tileset: Arc<TileCatalog>,
    tileset_path: Option<AssetPath>,
    screens: Vec<Screen>,
    joins: Vec<Join>,
    continue_points: Vec<ContinuePoint>,
    start_screen: Option<String>,
    player_start: Point,
    music: Option<Music>,
    config: LevelConfig,
    loaded: bool,
    dirty: bool,
}

impl LevelGraph {
    /// An empty level using `tileset`
    pub fn new(name: impl Into<String>, tileset: Arc<TileCatalog>) -> Self {
        let config = LevelConfig::default();
        Self {
            name: name.into(),
            stage_path: None,
            tileset_path: tileset
                .file_path()
                .map(|file| AssetPath::from_absolute(file, file.parent().unwrap_or(file))),
            tileset,
            screens: Vec::new(),
            joins: Vec::new(),
            continue_points: Vec::new(),
            start_screen: None,
            player_start: config.player_start(),
            music: None,
            config,
            loaded: false,
            dirty: false,
        }
    }

    /// Load a level directory with the default layout
    pub fn load(directory: impl AsRef<Path>) -> Result<Self, LevelError> {
        Self::load_with(directory, &LevelConfig::default())
    }

    /// Load a level directory
    ///
    /// Reads the level document, the tileset it names, and one grid file per
    /// screen. The first error aborts the load. The result is clean.
    pub fn load_with(directory: impl AsRef<Path>, config: &LevelConfig) -> Result<Self, LevelError> {
        let directory = asset_path::make_absolute(directory.as_ref());
        let map_path = directory.join(&config.map_file);
        let context = map_path.display().to_string();

        let text = error::read_to_string(&map_path)?;
        let doc: MapDocument =
            serde_json::from_str(&text).map_err(|e| LevelError::malformed(&context, e))?;

        let tileset_path = AssetPath::from_relative(&doc.tiles, &directory);
        let tileset = Arc::new(TileCatalog::load(tileset_path.absolute())?);

        let name = if doc.name.is_empty() {
            directory
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            doc.name
        };

        let mut level = LevelGraph::new(name, tileset.clone());
        level.config = config.clone();
        level.player_start = config.player_start();
        level.tileset_path = Some(tileset_path);
        level.stage_path = Some(stage_path_of(&directory));
        level.music = match &doc.music {
            Some(music) => music.resolve(&directory, &context)?,
            None => None,
        };

        for screen_doc in doc.screens {
            check_screen_name(&screen_doc.id)?;
            let file = directory.join(config.screen_file_name(&screen_doc.id));
            let mut screen = Screen::load(&file, tileset.clone())?;
            if level.contains_screen(&screen_doc.id) {
                return Err(LevelError::DuplicateName(screen_doc.id));
            }
            screen.set_name(screen_doc.id);

            for entity in screen_doc.entities {
                screen.add_entity_spawn(entity.into_spawn(&config.default_entity_state));
            }
            for teleport in screen_doc.teleports {
                screen.add_teleport(teleport.into());
            }
            for blocks in screen_doc.blocks {
                screen.add_block_pattern(blocks.into());
            }
            if let Some(music) = &screen_doc.music {
                screen.set_music(music.resolve(&directory, &context)?);
            }

            screen.mark_clean();
            level.screens.push(screen);
        }

        if let Some(start) = doc.start {
            level.start_screen = Some(start.screen);
            level.player_start = Point::new(start.x, start.y);
        }

        level.continue_points = doc
            .continues
            .into_iter()
            .map(|c| ContinuePoint {
                screen: c.screen,
                position: Point::new(c.x, c.y),
            })
            .collect();

        for join in &doc.joins {
            if join.size == 0 {
                return Err(LevelError::malformed(
                    &context,
                    format!("join {} - {} has zero size", join.screen_a, join.screen_b),
                ));
            }
        }
        level.joins = doc.joins;

        if config.validate_on_load {
            if let Some(issue) = level.validate().into_iter().next() {
                return Err(issue.into_error());
            }
        }

        level.loaded = true;
        level.dirty = false;
        info!(
            "Loaded level '{}' from {} ({} screens, {} joins)",
            level.name,
            directory.display(),
            level.screens.len(),
            level.joins.len()
        );
        Ok(level)
    }

    /// Write the level document and every screen grid into `directory`
    ///
    /// Everything is serialized before the first write. Each file is replaced
    /// atomically. Dirty flags are cleared only once all files are written.
    pub fn save(&mut self, directory: impl AsRef<Path>) -> Result<(), LevelError> {
        let directory = asset_path::make_absolute(directory.as_ref());
        let map_path = directory.join(&self.config.map_file);
        let context = map_path.display().to_string();

        let tileset_path = match (&self.tileset_path, self.tileset.file_path()) {
            (Some(path), _) => path.rebased(&directory),
            (None, Some(file)) => AssetPath::from_absolute(file, &directory),
            (None, None) => {
                return Err(LevelError::InvalidReference(
                    "the level's tileset has never been saved to a file".to_string(),
                ))
            }
        };

        let doc = self.to_document(&directory, tileset_path.relative());
        let json =
            serde_json::to_string_pretty(&doc).map_err(|e| LevelError::malformed(&context, e))?;
        let grids: Vec<(PathBuf, String)> = self
            .screens
            .iter()
            .map(|screen| {
                (
                    directory.join(self.config.screen_file_name(screen.name())),
                    screen.grid().to_text(),
                )
            })
            .collect();

        std::fs::create_dir_all(&directory)?;
        error::write_atomic(&map_path, json.as_bytes())?;
        for (path, text) in &grids {
            error::write_atomic(path, text.as_bytes())?;
            debug!("Wrote screen grid {}", path.display());
        }

        for screen in &mut self.screens {
            screen.mark_clean();
        }
        self.dirty = false;
        self.loaded = true;
        self.tileset_path = Some(tileset_path);
        self.stage_path = Some(stage_path_of(&directory));
        info!(
            "Saved level '{}' to {} ({} screens)",
            self.name,
            directory.display(),
            self.screens.len()
        );
        Ok(())
    }

    /// Save back to the directory the level was loaded from or last saved to
    pub fn save_current(&mut self) -> Result<(), LevelError> {
        let directory = self
            .stage_path
            .as_ref()
            .map(|path| path.absolute().to_path_buf())
            .ok_or(LevelError::Unsupported(
                "saving a level that has no directory yet",
            ))?;
        self.save(directory)
    }

    fn to_document(&self, directory: &Path, tiles: &str) -> MapDocument {
        let default_state = self.config.default_entity_state.as_str();
        MapDocument {
            name: self.name.clone(),
            tiles: tiles.to_string(),
            music: self
                .music
                .as_ref()
                .and_then(|m| MusicDocument::from_music(m, directory)),
            start: self.start_screen().map(|screen| StartDocument {
                screen: screen.to_string(),
                x: self.player_start.x,
                y: self.player_start.y,
            }),
            continues: self
                .continue_points
                .iter()
                .map(|c| ContinueDocument {
                    screen: c.screen.clone(),
                    x: c.position.x,
                    y: c.position.y,
                })
                .collect(),
            screens: self
                .screens
                .iter()
                .map(|screen| ScreenDocument {
                    id: screen.name().to_string(),
                    entities: screen
                        .entity_spawns()
                        .iter()
                        .map(|e| EntityDocument::from_spawn(e, default_state))
                        .collect(),
                    teleports: screen.teleports().iter().map(TeleportDocument::from).collect(),
                    blocks: screen
                        .block_patterns()
                        .iter()
                        .map(BlockPatternDocument::from)
                        .collect(),
                    music: screen
                        .music()
                        .and_then(|m| MusicDocument::from_music(m, directory)),
                })
                .collect(),
            joins: self.joins.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    pub fn stage_path(&self) -> Option<&AssetPath> {
        self.stage_path.as_ref()
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True when the level or any of its screens has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.screens.iter().any(|s| s.is_dirty())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn tileset(&self) -> &Arc<TileCatalog> {
        &self.tileset
    }

    pub fn tileset_path(&self) -> Option<&AssetPath> {
        self.tileset_path.as_ref()
    }

    /// Swap the catalog every screen resolves against
    pub fn set_tileset(&mut self, tileset: Arc<TileCatalog>, path: Option<AssetPath>) {
        self.tileset = tileset;
        self.tileset_path = path;
        self.reinject_tileset();
        self.dirty = true;
    }

    /// Edit the shared catalog in place
    ///
    /// Screens see the edited catalog once the returned guard is dropped. The
    /// catalog is copied only if something outside this level holds it.
    pub fn tileset_mut(&mut self) -> TilesetMut<'_> {
        let detached = Arc::new(TileCatalog::detached());
        for screen in &mut self.screens {
            screen.set_tileset(detached.clone());
        }
        TilesetMut { level: self }
    }

    /// Advance every tile animation of the shared catalog
    pub fn advance_tiles(&mut self, ticks: u32) {
        self.tileset_mut().advance(ticks);
    }

    fn reinject_tileset(&mut self) {
        for screen in &mut self.screens {
            screen.set_tileset(self.tileset.clone());
        }
    }

    pub fn screens(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter()
    }

    pub fn screen_names(&self) -> impl Iterator<Item = &str> {
        self.screens.iter().map(|s| s.name())
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    pub fn contains_screen(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.name() == name)
    }

    pub fn screen_mut(&mut self, name: &str) -> Option<&mut Screen> {
        self.screens.iter_mut().find(|s| s.name() == name)
    }

    /// Add a screen under `name`, resolving it against this level's catalog
    pub fn add_screen(&mut self, name: impl Into<String>, mut screen: Screen) -> Result<(), LevelError> {
        let name = name.into();
        check_screen_name(&name)?;
        if self.contains_screen(&name) {
            return Err(LevelError::DuplicateName(name));
        }
        screen.set_name(name);
        screen.set_tileset(self.tileset.clone());
        self.screens.push(screen);
        self.dirty = true;
        Ok(())
    }

    /// Create and add a blank screen
    pub fn new_screen(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<&mut Screen, LevelError> {
        let name = name.into();
        let screen = Screen::new(name.clone(), width, height, self.tileset.clone());
        self.add_screen(name, screen)?;
        let index = self.screens.len() - 1;
        Ok(&mut self.screens[index])
    }

    /// Remove a screen along with the joins and continue points on it
    pub fn remove_screen(&mut self, name: &str) -> Result<Screen, LevelError> {
        let index = self
            .position_of(name)
            .ok_or_else(|| LevelError::ScreenNotFound(name.to_string()))?;
        let screen = self.screens.remove(index);
        self.joins.retain(|j| !j.involves(name));
        self.continue_points.retain(|c| c.screen != name);
        if self.start_screen.as_deref() == Some(name) {
            self.start_screen = None;
        }
        self.dirty = true;
        Ok(screen)
    }

    /// Rename a screen in place
    ///
    /// The screen keeps its contents and its position in the level. Joins,
    /// continue points, the start screen and teleports naming it follow.
    pub fn rename_screen(&mut self, old: &str, new: &str) -> Result<(), LevelError> {
        let index = self
            .position_of(old)
            .ok_or_else(|| LevelError::ScreenNotFound(old.to_string()))?;
        if old == new {
            return Ok(());
        }
        check_screen_name(new)?;
        if self.contains_screen(new) {
            return Err(LevelError::DuplicateName(new.to_string()));
        }

        self.screens[index].set_name(new);
        for join in &mut self.joins {
            join.rename_screen(old, new);
        }
        for point in &mut self.continue_points {
            if point.screen == old {
                point.screen = new.to_string();
            }
        }
        if self.start_screen.as_deref() == Some(old) {
            self.start_screen = Some(new.to_string());
        }
        for screen in &mut self.screens {
            screen.retarget_teleports(old, new);
        }
        self.dirty = true;
        Ok(())
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Joins touching screen `name`
    pub fn joins_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Join> + 'a {
        self.joins.iter().filter(move |j| j.involves(name))
    }

    /// Add a join as-is; see [`LevelGraph::validate`] for checking it later
    pub fn add_join(&mut self, join: Join) {
        self.joins.push(join);
        self.dirty = true;
    }

    /// Add a join after checking both screens exist and the span fits them
    pub fn add_join_checked(&mut self, join: Join) -> Result<(), LevelError> {
        let dims = |name: &str| {
            self.screen(name)
                .map(|s| (s.width(), s.height()))
                .ok_or_else(|| {
                    LevelError::InvalidReference(format!("join references unknown screen '{}'", name))
                })
        };
        let a = dims(join.screen_a.as_str())?;
        let b = dims(join.screen_b.as_str())?;
        join.check_span(a, b)?;
        self.add_join(join);
        Ok(())
    }

    pub fn remove_join(&mut self, index: usize) -> Option<Join> {
        if index >= self.joins.len() {
            return None;
        }
        self.dirty = true;
        Some(self.joins.remove(index))
    }

    pub fn continue_points(&self) -> &[ContinuePoint] {
        &self.continue_points
    }

    /// Set the continue point of a screen, replacing any previous one
    pub fn add_continue_point(&mut self, screen: impl Into<String>, position: Point) {
        let screen = screen.into();
        match self.continue_points.iter_mut().find(|c| c.screen == screen) {
            Some(existing) => existing.position = position,
            None => self.continue_points.push(ContinuePoint { screen, position }),
        }
        self.dirty = true;
    }

    pub fn continue_point(&self, screen: &str) -> Option<Point> {
        self.continue_points
            .iter()
            .find(|c| c.screen == screen)
            .map(|c| c.position)
    }

    pub fn remove_continue_point(&mut self, screen: &str) -> bool {
        let before = self.continue_points.len();
        self.continue_points.retain(|c| c.screen != screen);
        let removed = self.continue_points.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// The explicit start screen, or else the first screen added
    pub fn start_screen(&self) -> Option<&str> {
        self.start_screen
            .as_deref()
            .or_else(|| self.screens.first().map(|s| s.name()))
    }

    pub fn player_start(&self) -> Point {
        self.player_start
    }

    pub fn set_start(&mut self, screen: &str, position: Point) -> Result<(), LevelError> {
        if !self.contains_screen(screen) {
            return Err(LevelError::ScreenNotFound(screen.to_string()));
        }
        self.start_screen = Some(screen.to_string());
        self.player_start = position;
        self.dirty = true;
        Ok(())
    }

    pub fn music(&self) -> Option<&Music> {
        self.music.as_ref()
    }

    pub fn set_music(&mut self, music: Option<Music>) {
        self.music = music;
        self.dirty = true;
    }

    /// Tile at a position of a screen, resolved through the catalog
    pub fn tile_at(&self, screen: &str, x: i32, y: i32) -> Option<&Tile> {
        self.screen(screen).and_then(|s| s.tile_at(x, y))
    }

    /// Drop every screen, join and continue point
    pub fn clear(&mut self) {
        self.screens.clear();
        self.joins.clear();
        self.continue_points.clear();
        self.start_screen = None;
        self.player_start = self.config.player_start();
        self.music = None;
        self.loaded = false;
        self.dirty = true;
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.screens.iter().position(|s| s.name() == name)
    }
}

fn stage_path_of(directory: &Path) -> AssetPath {
    AssetPath::from_absolute(directory, directory.parent().unwrap_or(directory))
}

/// Mutable access to a level's catalog, from [`LevelGraph::tileset_mut`]
pub struct TilesetMut<'a> {
    level: &'a mut LevelGraph,
}

impl Deref for TilesetMut<'_> {
    type Target = TileCatalog;

    fn deref(&self) -> &TileCatalog {
        &self.level.tileset
    }
}

impl DerefMut for TilesetMut<'_> {
    fn deref_mut(&mut self) -> &mut TileCatalog {
        Arc::make_mut(&mut self.level.tileset)
    }
}

impl Drop for TilesetMut<'_> {
    fn drop(&mut self) {
        self.level.reinject_tileset();
    }
}
