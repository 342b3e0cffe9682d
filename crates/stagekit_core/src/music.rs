//! Level and screen background music

use crate::asset_path::AssetPath;
use crate::error::LevelError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Background music: a wave intro/loop pair, or a track of the game's NSF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Music {
    Wave {
        intro: Option<AssetPath>,
        looped: Option<AssetPath>,
    },
    Nsf {
        track: u32,
    },
}

impl Music {
    /// At least one of the intro and loop must be given
    pub fn wave(intro: Option<AssetPath>, looped: Option<AssetPath>) -> Result<Self, LevelError> {
        if intro.is_none() && looped.is_none() {
            return Err(LevelError::malformed(
                "music",
                "wave music needs an intro or a loop",
            ));
        }
        Ok(Music::Wave { intro, looped })
    }

    /// NSF tracks are numbered from 1
    pub fn nsf(track: u32) -> Result<Self, LevelError> {
        if track == 0 {
            return Err(LevelError::malformed(
                "music",
                "track must be greater than zero",
            ));
        }
        Ok(Music::Nsf { track })
    }

    pub fn is_wave(&self) -> bool {
        matches!(self, Music::Wave { .. })
    }
}

/// Persisted form; paths are relative to the referencing file's directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MusicDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub looped: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<u32>,
}

impl MusicDocument {
    /// Resolve against `base`; a document with neither paths nor a track
    /// describes no music
    pub fn resolve(&self, base: &Path, context: &str) -> Result<Option<Music>, LevelError> {
        if self.intro.is_some() || self.looped.is_some() {
            let intro = self.intro.as_deref().map(|p| AssetPath::from_relative(p, base));
            let looped = self.looped.as_deref().map(|p| AssetPath::from_relative(p, base));
            return Ok(Some(Music::Wave { intro, looped }));
        }
        match self.track {
            Some(0) => Err(LevelError::malformed(
                context,
                "music track must be greater than zero",
            )),
            Some(track) => Ok(Some(Music::Nsf { track })),
            None => Ok(None),
        }
    }

    /// `None` for a wave with neither part, which has nothing to write
    pub fn from_music(music: &Music, base: &Path) -> Option<Self> {
        let doc = match music {
            Music::Wave {
                intro: None,
                looped: None,
            } => return None,
            Music::Wave { intro, looped } => Self {
                intro: intro.as_ref().map(|p| p.rebased(base).relative().to_string()),
                looped: looped.as_ref().map(|p| p.rebased(base).relative().to_string()),
                track: None,
            },
            Music::Nsf { track } => Self {
                intro: None,
                looped: None,
                track: Some(*track),
            },
        };
        Some(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nsf_track_must_be_positive() {
        assert!(Music::nsf(0).is_err());
        assert_eq!(Music::nsf(4).unwrap(), Music::Nsf { track: 4 });
    }

    #[test]
    fn test_resolve_wave_paths() {
        let doc: MusicDocument =
            serde_json::from_str(r#"{ "intro": "music/intro.ogg", "loop": "music/loop.ogg" }"#)
                .unwrap();
        let music = doc.resolve(Path::new("/game/stage"), "map.json").unwrap().unwrap();
        match &music {
            Music::Wave { intro, looped } => {
                assert_eq!(
                    intro.as_ref().unwrap().absolute(),
                    Path::new("/game/stage/music/intro.ogg")
                );
                assert_eq!(looped.as_ref().unwrap().relative(), "music/loop.ogg");
            }
            other => panic!("Expected wave music, got {:?}", other),
        }

        // Written back relative to a different directory
        let written = MusicDocument::from_music(&music, Path::new("/game")).unwrap();
        assert_eq!(written.intro.as_deref(), Some("stage/music/intro.ogg"));
        assert_eq!(written.track, None);
    }

    #[test]
    fn test_resolve_track_and_empty() {
        let base = Path::new("/game");
        let track = MusicDocument {
            track: Some(3),
            ..Default::default()
        };
        assert_eq!(track.resolve(base, "x").unwrap(), Some(Music::Nsf { track: 3 }));

        let zero = MusicDocument {
            track: Some(0),
            ..Default::default()
        };
        assert!(zero.resolve(base, "x").is_err());

        assert_eq!(MusicDocument::default().resolve(base, "x").unwrap(), None);
    }

    #[test]
    fn test_empty_wave_is_rejected_and_never_written() {
        assert!(Music::wave(None, None).is_err());
        let intro = AssetPath::from_relative("intro.ogg", "/game");
        assert!(Music::wave(Some(intro), None).is_ok());

        let empty = Music::Wave {
            intro: None,
            looped: None,
        };
        assert_eq!(MusicDocument::from_music(&empty, Path::new("/game")), None);
    }
}
