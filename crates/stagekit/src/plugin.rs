use bevy::prelude::*;
use stagekit_animation::ClipAnimationPlugin;
use stagekit_core::{CatalogEvent, LevelGraph};

/// Plugin ticking level tile animations and clip players on `FixedUpdate`
///
/// Insert a [`LevelGraph`] resource to have its tiles animated.
pub struct StagekitPlugin;

impl Plugin for StagekitPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ClipAnimationPlugin)
            .add_systems(FixedUpdate, advance_level_tiles);
    }
}

fn advance_level_tiles(level: Option<ResMut<LevelGraph>>) {
    let Some(mut level) = level else {
        return;
    };
    let mut tileset = level.tileset_mut();
    tileset.advance(1);
    for event in tileset.drain_events() {
        match event {
            CatalogEvent::TileAdded(id) => bevy::log::debug!("Tile {} added to level tileset", id),
        }
    }
}
