pub use stagekit_animation::{
    AnimationClip, AnimationDirection, AnimationStyle, ClipEvent, Frame, FramePresentation, Point,
    Rect, SpriteDef,
};
pub use stagekit_core::{
    AssetPath, BlockPattern, BlockPlacement, ContinuePoint, EntitySpawn, ErrorKind, Join,
    JoinDirection, JoinType, LevelConfig, LevelError, LevelGraph, Music, Screen, Teleport, Tile,
    TileCatalog, TileId, TileProperties, ValidationIssue,
};

#[cfg(feature = "bevy")]
pub use crate::StagekitPlugin;
#[cfg(feature = "bevy")]
pub use stagekit_animation::{ClipAnimationPlugin, ClipPlayer};
