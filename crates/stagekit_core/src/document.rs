//! On-disk shape of the level document (`map.json`)
//!
//! These types mirror the file one to one. [`crate::LevelGraph`] converts
//! between them and its in-memory model.

use crate::block_pattern::{BlockPattern, BlockPlacement};
use crate::join::Join;
use crate::music::MusicDocument;
use crate::screen::{EntitySpawn, Teleport};
use serde::{Deserialize, Serialize};
use stagekit_animation::Point;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapDocument {
    #[serde(default)]
    pub name: String,
    /// Tileset document, relative to the level directory
    pub tiles: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<StartDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub continues: Vec<ContinueDocument>,
    #[serde(default)]
    pub screens: Vec<ScreenDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StartDocument {
    pub screen: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ContinueDocument {
    pub screen: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScreenDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teleports: Vec<TeleportDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<BlockPatternDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EntityDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boss: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl EntityDocument {
    pub fn into_spawn(self, default_state: &str) -> EntitySpawn {
        EntitySpawn {
            name: self.name,
            state: self.state.unwrap_or_else(|| default_state.to_string()),
            position: Point::new(self.x, self.y),
            palette: self.palette,
            is_boss: self.boss,
        }
    }

    /// The state is left out when it matches `default_state`
    pub fn from_spawn(spawn: &EntitySpawn, default_state: &str) -> Self {
        Self {
            name: spawn.name.clone(),
            state: (spawn.state != default_state).then(|| spawn.state.clone()),
            x: spawn.position.x,
            y: spawn.position.y,
            palette: spawn.palette.clone(),
            boss: spawn.is_boss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TeleportDocument {
    pub from_x: i32,
    pub from_y: i32,
    pub screen: String,
    pub to_x: i32,
    pub to_y: i32,
}

impl From<TeleportDocument> for Teleport {
    fn from(doc: TeleportDocument) -> Self {
        Teleport::new(
            Point::new(doc.from_x, doc.from_y),
            doc.screen,
            Point::new(doc.to_x, doc.to_y),
        )
    }
}

impl From<&Teleport> for TeleportDocument {
    fn from(teleport: &Teleport) -> Self {
        Self {
            from_x: teleport.from.x,
            from_y: teleport.from.y,
            screen: teleport.target_screen.clone(),
            to_x: teleport.to.x,
            to_y: teleport.to.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BlockPatternDocument {
    pub left: i32,
    pub right: i32,
    pub length: u32,
    pub entity: String,
    #[serde(default)]
    pub blocks: Vec<BlockDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BlockDocument {
    pub x: i32,
    pub y: i32,
    pub on: u32,
    pub off: u32,
}

impl From<BlockPatternDocument> for BlockPattern {
    fn from(doc: BlockPatternDocument) -> Self {
        let mut pattern = BlockPattern::new(doc.entity, doc.left, doc.right, doc.length);
        pattern.blocks = doc
            .blocks
            .into_iter()
            .map(|b| BlockPlacement::new(Point::new(b.x, b.y), b.on, b.off))
            .collect();
        pattern
    }
}

impl From<&BlockPattern> for BlockPatternDocument {
    fn from(pattern: &BlockPattern) -> Self {
        Self {
            left: pattern.left,
            right: pattern.right,
            length: pattern.length,
            entity: pattern.entity.clone(),
            blocks: pattern
                .blocks
                .iter()
                .map(|b| BlockDocument {
                    x: b.position.x,
                    y: b.position.y,
                    on: b.on,
                    off: b.off,
                })
                .collect(),
        }
    }
}
