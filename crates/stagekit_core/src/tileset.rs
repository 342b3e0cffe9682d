//! Tile catalogs: tiles, their animations, and named physical properties

use crate::asset_path::{self, AssetPath};
use crate::error::{self, LevelError};
use serde::{Deserialize, Serialize};
use stagekit_animation::{AnimationClip, Frame, Rect, SpriteDef};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Index of a tile within its catalog. Id `0` is conventionally the empty tile.
pub type TileId = u32;

/// Name of the neutral properties record present in every catalog
pub const DEFAULT_PROPERTIES: &str = "Default";

/// Named physical behavior shared by every tile that references it
///
/// Coefficients are metadata only; interpreting them is up to the physics
/// code of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileProperties {
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub blocking: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub climbable: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub lethal: bool,
    #[serde(skip_serializing_if = "is_one")]
    pub push_mult_x: f32,
    #[serde(skip_serializing_if = "is_one")]
    pub push_mult_y: f32,
    #[serde(skip_serializing_if = "is_zero")]
    pub push_const_x: f32,
    #[serde(skip_serializing_if = "is_zero")]
    pub push_const_y: f32,
    #[serde(skip_serializing_if = "is_one")]
    pub resist_mult_x: f32,
    #[serde(skip_serializing_if = "is_one")]
    pub resist_mult_y: f32,
    #[serde(skip_serializing_if = "is_zero")]
    pub resist_const_x: f32,
    #[serde(skip_serializing_if = "is_zero")]
    pub resist_const_y: f32,
    #[serde(skip_serializing_if = "is_one")]
    pub gravity_mult: f32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_one(value: &f32) -> bool {
    *value == 1.0
}

fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

impl Default for TileProperties {
    fn default() -> Self {
        Self::named(DEFAULT_PROPERTIES)
    }
}

impl TileProperties {
    /// A record with neutral coefficients and no flags set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocking: false,
            climbable: false,
            lethal: false,
            push_mult_x: 1.0,
            push_mult_y: 1.0,
            push_const_x: 0.0,
            push_const_y: 0.0,
            resist_mult_x: 1.0,
            resist_mult_y: 1.0,
            resist_const_x: 0.0,
            resist_const_y: 0.0,
            gravity_mult: 1.0,
        }
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_climbable(mut self, climbable: bool) -> Self {
        self.climbable = climbable;
        self
    }

    pub fn with_lethal(mut self, lethal: bool) -> Self {
        self.lethal = lethal;
        self
    }

    /// Set the gravity multiplier
    pub fn with_gravity(mut self, gravity_mult: f32) -> Self {
        self.gravity_mult = gravity_mult;
        self
    }

    /// True when this record behaves exactly like "Default"
    pub fn is_neutral(&self) -> bool {
        let neutral = TileProperties::named(self.name.clone());
        *self == neutral
    }
}

/// One entry of a [`TileCatalog`]
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    pub name: String,
    pub clip: AnimationClip,
    properties: Arc<TileProperties>,
}

impl Tile {
    /// Create a tile; a clip without frames gets one blank frame at the sheet
    /// origin so every tile has something to present
    pub fn new(
        id: TileId,
        name: impl Into<String>,
        mut clip: AnimationClip,
        properties: Arc<TileProperties>,
    ) -> Self {
        if clip.is_empty() {
            let (width, height) = (clip.width, clip.height);
            clip.push_frame(Frame::new(Rect::new(0, 0, width, height), 0));
        }
        Self {
            id,
            name: name.into(),
            clip,
            properties,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn properties(&self) -> &Arc<TileProperties> {
        &self.properties
    }

    pub fn is_blocking(&self) -> bool {
        self.properties.blocking
    }

    pub fn is_climbable(&self) -> bool {
        self.properties.climbable
    }

    pub fn is_lethal(&self) -> bool {
        self.properties.lethal
    }
}

/// Notifications queued by a catalog for its owner to drain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEvent {
    TileAdded(TileId),
}

/// The ordered set of tiles a level draws from, plus its properties table
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct TileCatalog {
    tile_size: u32,
    sheet: PathBuf,
    file: Option<PathBuf>,
    /// Always starts with the "Default" record
    properties: Vec<Arc<TileProperties>>,
    tiles: Vec<Tile>,
    events: Vec<CatalogEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TilesetDocument {
    tilesize: u32,
    tilesheet: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<TileProperties>,
    #[serde(default)]
    tiles: Vec<TileDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TileDocument {
    id: TileId,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sprite: Option<SpriteDef>,
}

impl TileCatalog {
    /// Create an empty catalog drawing from `sheet`
    pub fn new(sheet: impl AsRef<Path>, tile_size: u32) -> Self {
        Self {
            tile_size,
            sheet: asset_path::make_absolute(sheet.as_ref()),
            file: None,
            properties: vec![Arc::new(TileProperties::default())],
            tiles: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Stand-in held by screens while their level edits the real catalog
    pub(crate) fn detached() -> Self {
        Self {
            tile_size: 0,
            sheet: PathBuf::new(),
            file: None,
            properties: vec![Arc::new(TileProperties::default())],
            tiles: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Load a tileset document
    ///
    /// The sheet image must exist next to the path the document names. Tile
    /// ids must be sequential from zero. Tiles naming an unknown properties
    /// record fall back to "Default". Every tile animation starts playing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = asset_path::make_absolute(path.as_ref());
        let context = path.display().to_string();
        let text = error::read_to_string(&path)?;
        let doc: TilesetDocument =
            serde_json::from_str(&text).map_err(|e| LevelError::malformed(&context, e))?;

        if doc.tilesize == 0 {
            return Err(LevelError::malformed(&context, "tilesize must be positive"));
        }

        let directory = path.parent().unwrap_or(Path::new("/"));
        let sheet = AssetPath::from_relative(&doc.tilesheet, directory);
        if !sheet.absolute().is_file() {
            return Err(LevelError::NotFound(sheet.absolute().to_path_buf()));
        }

        let mut catalog = TileCatalog::new(sheet.absolute(), doc.tilesize);
        catalog.file = Some(path.clone());

        for record in doc.properties {
            let record = Arc::new(record);
            match catalog.position_of(&record.name) {
                Some(index) => catalog.properties[index] = record,
                None => catalog.properties.push(record),
            }
        }

        for (index, def) in doc.tiles.into_iter().enumerate() {
            if def.id as usize != index {
                return Err(LevelError::malformed(
                    &context,
                    format!("tile at position {} has id {}", index, def.id),
                ));
            }

            let properties = match def.properties.as_deref() {
                Some(name) => match catalog.position_of(name) {
                    Some(found) => catalog.properties[found].clone(),
                    None => {
                        warn!(
                            "Tile {} uses unknown properties '{}', falling back to Default",
                            def.id, name
                        );
                        catalog.default_properties().clone()
                    }
                },
                None => catalog.default_properties().clone(),
            };

            let clip = match def.sprite {
                Some(sprite) => sprite.to_clip(),
                None => AnimationClip::new(doc.tilesize, doc.tilesize),
            };
            let mut tile = Tile::new(def.id, def.name, clip, properties);
            tile.clip.play();
            catalog.tiles.push(tile);
        }

        info!(
            "Loaded tileset {} ({} tiles, {} properties)",
            path.display(),
            catalog.tiles.len(),
            catalog.properties.len()
        );
        Ok(catalog)
    }

    /// Write the catalog as a tileset document
    ///
    /// The sheet path is stored relative to the document's directory. A
    /// neutral "Default" record is not written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = asset_path::make_absolute(path.as_ref());
        let directory = path.parent().unwrap_or(Path::new("/"));
        let sheet = AssetPath::from_absolute(&self.sheet, directory);

        let doc = TilesetDocument {
            tilesize: self.tile_size,
            tilesheet: sheet.relative().to_string(),
            properties: self
                .properties
                .iter()
                .filter(|p| !(p.name == DEFAULT_PROPERTIES && p.is_neutral()))
                .map(|p| (**p).clone())
                .collect(),
            tiles: self
                .tiles
                .iter()
                .map(|tile| TileDocument {
                    id: tile.id,
                    name: tile.name.clone(),
                    properties: (tile.properties.name != DEFAULT_PROPERTIES)
                        .then(|| tile.properties.name.clone()),
                    sprite: Some(SpriteDef::from_clip(&tile.clip, None)),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| LevelError::malformed(path.display().to_string(), e))?;
        error::write_atomic(&path, json.as_bytes())?;
        info!("Saved tileset {}", path.display());
        Ok(())
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Absolute path of the sheet image
    pub fn sheet_path(&self) -> &Path {
        &self.sheet
    }

    /// The document this catalog was loaded from, if any
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, id: TileId) -> bool {
        (id as usize) < self.tiles.len()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Append a blank tile sized to the catalog and return its id
    pub fn add_tile(&mut self) -> TileId {
        let id = self.tiles.len() as TileId;
        let clip = AnimationClip::new(self.tile_size, self.tile_size);
        let properties = self.default_properties().clone();
        self.tiles.push(Tile::new(id, String::new(), clip, properties));
        self.events.push(CatalogEvent::TileAdded(id));
        id
    }

    /// Tiles cannot be removed: screens store ids positionally
    pub fn remove_tile(&mut self, _id: TileId) -> Result<(), LevelError> {
        Err(LevelError::Unsupported("removing a tile from a catalog"))
    }

    pub fn default_properties(&self) -> &Arc<TileProperties> {
        &self.properties[0]
    }

    /// Look up a properties record, falling back to "Default"
    pub fn properties(&self, name: &str) -> &Arc<TileProperties> {
        match self.position_of(name) {
            Some(index) => &self.properties[index],
            None => self.default_properties(),
        }
    }

    pub fn has_properties(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Register a new properties record
    pub fn add_properties(
        &mut self,
        record: TileProperties,
    ) -> Result<Arc<TileProperties>, LevelError> {
        if self.has_properties(&record.name) {
            return Err(LevelError::DuplicateName(record.name));
        }
        let record = Arc::new(record);
        self.properties.push(record.clone());
        Ok(record)
    }

    /// Point a tile at a registered properties record
    pub fn set_tile_properties(&mut self, id: TileId, name: &str) -> Result<(), LevelError> {
        let count = self.tiles.len();
        let record = match self.position_of(name) {
            Some(index) => self.properties[index].clone(),
            None => {
                return Err(LevelError::InvalidReference(format!(
                    "no tile properties named '{}'",
                    name
                )))
            }
        };
        let tile = self
            .tiles
            .get_mut(id as usize)
            .ok_or(LevelError::InvalidTileId { id, count })?;
        tile.properties = record;
        Ok(())
    }

    /// Advance every tile animation
    pub fn advance(&mut self, ticks: u32) {
        for tile in &mut self.tiles {
            tile.clip.advance(ticks);
        }
    }

    pub fn drain_events(&mut self) -> Vec<CatalogEvent> {
        std::mem::take(&mut self.events)
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}
