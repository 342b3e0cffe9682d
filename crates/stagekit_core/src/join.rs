//! Screen-to-screen adjacency rules

use crate::error::LevelError;
use serde::{Deserialize, Serialize};

/// Orientation of the shared edge
///
/// A `Horizontal` join is a horizontal seam: screen A sits above screen B and
/// offsets count tiles from the left edge. A `Vertical` join is a vertical
/// seam: A sits left of B and offsets count tiles from the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Horizontal,
    Vertical,
}

/// Which ways the player may cross a join
///
/// Forward is A to B: top to bottom across a horizontal seam, left to right
/// across a vertical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinDirection {
    #[default]
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "forward")]
    ForwardOnly,
    #[serde(rename = "backward")]
    BackwardOnly,
}

/// An edge connecting two screens
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Join {
    #[serde(rename = "type")]
    pub kind: JoinType,
    #[serde(rename = "s1")]
    pub screen_a: String,
    #[serde(rename = "s2")]
    pub screen_b: String,
    #[serde(rename = "offset1")]
    pub offset_a: u32,
    #[serde(rename = "offset2")]
    pub offset_b: u32,
    pub size: u32,
    #[serde(default)]
    pub direction: JoinDirection,
    /// Entity type of the boss door covering this join, if any. Whether the
    /// door has been destroyed is game state and is not tracked here.
    #[serde(rename = "bossdoor", default, skip_serializing_if = "Option::is_none")]
    pub boss_door: Option<String>,
}

impl Join {
    pub fn new(
        kind: JoinType,
        screen_a: impl Into<String>,
        screen_b: impl Into<String>,
        offset_a: u32,
        offset_b: u32,
        size: u32,
    ) -> Self {
        Self {
            kind,
            screen_a: screen_a.into(),
            screen_b: screen_b.into(),
            offset_a,
            offset_b,
            size,
            direction: JoinDirection::Both,
            boss_door: None,
        }
    }

    pub fn with_direction(mut self, direction: JoinDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_boss_door(mut self, entity: impl Into<String>) -> Self {
        self.boss_door = Some(entity.into());
        self
    }

    pub fn is_boss_door(&self) -> bool {
        self.boss_door.is_some()
    }

    pub fn allows_forward(&self) -> bool {
        self.direction != JoinDirection::BackwardOnly
    }

    pub fn allows_backward(&self) -> bool {
        self.direction != JoinDirection::ForwardOnly
    }

    /// Whether the rule permits moving from screen `from` into screen `to`
    ///
    /// Returns false when the pair is not the two sides of this join.
    pub fn can_cross(&self, from: &str, to: &str) -> bool {
        if from == self.screen_a && to == self.screen_b {
            self.allows_forward()
        } else if from == self.screen_b && to == self.screen_a {
            self.allows_backward()
        } else {
            false
        }
    }

    pub fn involves(&self, screen: &str) -> bool {
        self.screen_a == screen || self.screen_b == screen
    }

    /// The screen on the other side from `screen`
    pub fn other_side(&self, screen: &str) -> Option<&str> {
        if self.screen_a == screen {
            Some(&self.screen_b)
        } else if self.screen_b == screen {
            Some(&self.screen_a)
        } else {
            None
        }
    }

    pub(crate) fn rename_screen(&mut self, old: &str, new: &str) {
        if self.screen_a == old {
            self.screen_a = new.to_string();
        }
        if self.screen_b == old {
            self.screen_b = new.to_string();
        }
    }

    /// Check the span against the dimensions of both screens, given as
    /// `(width, height)` in tiles
    pub fn check_span(&self, a: (u32, u32), b: (u32, u32)) -> Result<(), LevelError> {
        if self.size == 0 {
            return Err(LevelError::InvalidJoin(format!(
                "join {} - {} has zero size",
                self.screen_a, self.screen_b
            )));
        }
        let extent = |dims: (u32, u32)| match self.kind {
            JoinType::Horizontal => dims.0,
            JoinType::Vertical => dims.1,
        };
        for (name, offset, dims) in [
            (&self.screen_a, self.offset_a, a),
            (&self.screen_b, self.offset_b, b),
        ] {
            let end = u64::from(offset) + u64::from(self.size);
            if end > u64::from(extent(dims)) {
                return Err(LevelError::InvalidJoin(format!(
                    "span {}..{} exceeds screen '{}' ({} tiles)",
                    offset,
                    end,
                    name,
                    extent(dims)
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_rules() {
        let join = Join::new(JoinType::Horizontal, "A", "B", 0, 0, 5)
            .with_direction(JoinDirection::ForwardOnly);
        assert!(join.can_cross("A", "B"));
        assert!(!join.can_cross("B", "A"));
        assert!(!join.can_cross("A", "C"));

        let back = join.clone().with_direction(JoinDirection::BackwardOnly);
        assert!(!back.can_cross("A", "B"));
        assert!(back.can_cross("B", "A"));

        let both = join.with_direction(JoinDirection::Both);
        assert!(both.can_cross("A", "B") && both.can_cross("B", "A"));
    }

    #[test]
    fn test_serialized_field_names() {
        let join = Join::new(JoinType::Vertical, "Intro", "Hall", 2, 0, 4)
            .with_direction(JoinDirection::BackwardOnly)
            .with_boss_door("BossDoor");
        let json = serde_json::to_value(&join).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "vertical",
                "s1": "Intro",
                "s2": "Hall",
                "offset1": 2,
                "offset2": 0,
                "size": 4,
                "direction": "backward",
                "bossdoor": "BossDoor"
            })
        );
        let back: Join = serde_json::from_value(json).unwrap();
        assert_eq!(back, join);
    }

    #[test]
    fn test_direction_defaults_to_both() {
        let json = r#"{ "type": "horizontal", "s1": "A", "s2": "B",
                        "offset1": 0, "offset2": 0, "size": 3 }"#;
        let join: Join = serde_json::from_str(json).unwrap();
        assert_eq!(join.direction, JoinDirection::Both);
        assert!(!join.is_boss_door());
    }

    #[test]
    fn test_bad_enum_rejected() {
        let json = r#"{ "type": "diagonal", "s1": "A", "s2": "B",
                        "offset1": 0, "offset2": 0, "size": 3 }"#;
        assert!(serde_json::from_str::<Join>(json).is_err());
    }

    #[test]
    fn test_check_span() {
        let join = Join::new(JoinType::Horizontal, "A", "B", 6, 0, 4);
        assert!(join.check_span((10, 5), (10, 5)).is_ok());
        assert!(join.check_span((9, 5), (10, 5)).is_err());

        let vertical = Join::new(JoinType::Vertical, "A", "B", 0, 2, 4);
        assert!(vertical.check_span((3, 4), (3, 6)).is_ok());
        assert!(vertical.check_span((3, 4), (3, 5)).is_err());

        let empty = Join::new(JoinType::Vertical, "A", "B", 0, 0, 0);
        assert!(matches!(
            empty.check_span((3, 4), (3, 4)),
            Err(LevelError::InvalidJoin(_))
        ));
    }

    #[test]
    fn test_other_side_and_rename() {
        let mut join = Join::new(JoinType::Vertical, "A", "B", 0, 0, 1);
        assert_eq!(join.other_side("A"), Some("B"));
        assert_eq!(join.other_side("Z"), None);
        join.rename_screen("B", "Boss");
        assert!(join.involves("Boss"));
        assert!(!join.involves("B"));
    }
}
