//! Serializable sprite definitions

use crate::{AnimationClip, AnimationStyle, Frame, Point, Rect};
use serde::{Deserialize, Serialize};

/// One frame of a sprite definition: sheet position and duration in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDef {
    pub x: i32,
    pub y: i32,
    pub duration: u32,
}

/// On-disk form of an [`AnimationClip`]
///
/// Frame rectangles are not stored; every frame is `width × height` pixels
/// starting at its `(x, y)` sheet position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Sheet image, relative to the file that holds this definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilesheet: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub layer: i32,
    #[serde(default)]
    pub hotspot: Point,
    #[serde(default)]
    pub style: AnimationStyle,
    #[serde(default)]
    pub frames: Vec<FrameDef>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl SpriteDef {
    /// Build a stopped clip from this definition
    pub fn to_clip(&self) -> AnimationClip {
        let frames = self.frames.iter().map(|f| {
            Frame::new(Rect::new(f.x, f.y, self.width, self.height), f.duration)
        });
        let mut clip = AnimationClip::with_frames(self.width, self.height, frames)
            .with_style(self.style)
            .with_hotspot(self.hotspot);
        clip.name = self.name.clone();
        clip.layer = self.layer;
        clip
    }

    /// Capture a clip's definition (not its playback state)
    pub fn from_clip(clip: &AnimationClip, tilesheet: Option<String>) -> Self {
        Self {
            name: clip.name.clone(),
            width: clip.width,
            height: clip.height,
            tilesheet,
            layer: clip.layer,
            hotspot: clip.hotspot,
            style: clip.style(),
            frames: clip
                .frames()
                .iter()
                .map(|f| FrameDef {
                    x: f.source.x,
                    y: f.source.y,
                    duration: f.duration,
                })
                .collect(),
        }
    }

    /// Parse a definition from JSON
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize a definition to pretty JSON
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
