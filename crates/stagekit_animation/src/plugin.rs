//! Bevy integration: tick clips once per fixed game step

use crate::{AnimationClip, ClipEvent};
use bevy::prelude::*;

/// Component wrapping a clip that plays on an entity
#[derive(Component, Debug, Clone, Default)]
pub struct ClipPlayer {
    pub clip: AnimationClip,
    /// Events collected since the owner last drained them
    pub pending: Vec<ClipEvent>,
}

impl ClipPlayer {
    /// Create a player and start the clip
    pub fn playing(mut clip: AnimationClip) -> Self {
        clip.play();
        Self {
            clip,
            pending: Vec::new(),
        }
    }
}

/// Plugin advancing every [`ClipPlayer`] by one tick per `FixedUpdate`
pub struct ClipAnimationPlugin;

impl Plugin for ClipAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, advance_clip_players);
    }
}

fn advance_clip_players(mut query: Query<&mut ClipPlayer>) {
    for mut player in query.iter_mut() {
        player.clip.advance(1);
        let events = player.clip.drain_events();
        player.pending.extend(events);
    }
}
