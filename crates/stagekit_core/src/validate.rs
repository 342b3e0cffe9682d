//! Cross-reference checks over a whole level

use crate::error::LevelError;
use crate::level::LevelGraph;
use std::fmt;

/// A problem found by [`LevelGraph::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A join names a screen the level does not have
    JoinUnknownScreen { join: usize, screen: String },
    /// A join's span does not fit its screens
    JoinSpan { join: usize, message: String },
    StartUnknownScreen { screen: String },
    ContinueUnknownScreen { screen: String },
    TeleportUnknownScreen { screen: String, target: String },
    /// A screen's grid holds ids the catalog does not have
    UnknownTileIds { screen: String, count: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::JoinUnknownScreen { join, screen } => {
                write!(f, "join #{} references unknown screen '{}'", join, screen)
            }
            ValidationIssue::JoinSpan { join, message } => write!(f, "join #{}: {}", join, message),
            ValidationIssue::StartUnknownScreen { screen } => {
                write!(f, "start screen '{}' does not exist", screen)
            }
            ValidationIssue::ContinueUnknownScreen { screen } => {
                write!(f, "continue point on unknown screen '{}'", screen)
            }
            ValidationIssue::TeleportUnknownScreen { screen, target } => write!(
                f,
                "teleport on screen '{}' targets unknown screen '{}'",
                screen, target
            ),
            ValidationIssue::UnknownTileIds { screen, count } => write!(
                f,
                "screen '{}' has {} tile(s) not in the tileset",
                screen, count
            ),
        }
    }
}

impl ValidationIssue {
    pub fn into_error(self) -> LevelError {
        match self {
            ValidationIssue::JoinSpan { .. } => LevelError::InvalidJoin(self.to_string()),
            other => LevelError::InvalidReference(other.to_string()),
        }
    }
}

impl LevelGraph {
    /// Check every cross-reference in the level
    ///
    /// Loading and [`LevelGraph::add_join`] accept dangling references; this
    /// reports them all at once instead of failing on the first.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (index, join) in self.joins().iter().enumerate() {
            let a = self.screen(&join.screen_a);
            let b = self.screen(&join.screen_b);
            for (name, screen) in [(&join.screen_a, a), (&join.screen_b, b)] {
                if screen.is_none() {
                    issues.push(ValidationIssue::JoinUnknownScreen {
                        join: index,
                        screen: name.clone(),
                    });
                }
            }
            if let (Some(a), Some(b)) = (a, b) {
                if let Err(err) = join.check_span((a.width(), a.height()), (b.width(), b.height())) {
                    let message = match err {
                        LevelError::InvalidJoin(message) => message,
                        other => other.to_string(),
                    };
                    issues.push(ValidationIssue::JoinSpan {
                        join: index,
                        message,
                    });
                }
            }
        }

        if let Some(start) = self.start_screen() {
            if !self.contains_screen(start) {
                issues.push(ValidationIssue::StartUnknownScreen {
                    screen: start.to_string(),
                });
            }
        }

        for point in self.continue_points() {
            if !self.contains_screen(&point.screen) {
                issues.push(ValidationIssue::ContinueUnknownScreen {
                    screen: point.screen.clone(),
                });
            }
        }

        for screen in self.screens() {
            for teleport in screen.teleports() {
                if !self.contains_screen(&teleport.target_screen) {
                    issues.push(ValidationIssue::TeleportUnknownScreen {
                        screen: screen.name().to_string(),
                        target: teleport.target_screen.clone(),
                    });
                }
            }

            let tileset = screen.tileset();
            let count = screen
                .grid()
                .cells()
                .iter()
                .filter(|id| !tileset.contains(**id))
                .count();
            if count > 0 {
                issues.push(ValidationIssue::UnknownTileIds {
                    screen: screen.name().to_string(),
                    count,
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::{Join, JoinType};
    use crate::screen::Teleport;
    use crate::tileset::TileCatalog;
    use crate::ErrorKind;
    use stagekit_animation::Point;
    use std::sync::Arc;

    fn level() -> LevelGraph {
        let mut catalog = TileCatalog::new("/sheets/tiles.png", 16);
        catalog.add_tile();
        catalog.add_tile();
        let mut level = LevelGraph::new("Test", Arc::new(catalog));
        level.new_screen("A", 10, 5).unwrap();
        level.new_screen("B", 10, 5).unwrap();
        level
    }

    #[test]
    fn test_clean_level_has_no_issues() {
        let mut level = level();
        level.add_join(Join::new(JoinType::Horizontal, "A", "B", 0, 0, 5));
        assert!(level.validate().is_empty());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut level = level();
        level.add_join(Join::new(JoinType::Horizontal, "A", "Nowhere", 0, 0, 5));
        level.add_join(Join::new(JoinType::Vertical, "A", "B", 3, 0, 4));
        level.add_continue_point("Gone", Point::new(1, 1));
        level
            .screen_mut("B")
            .unwrap()
            .add_teleport(Teleport::new(Point::ZERO, "Lost", Point::ZERO));

        let issues = level.validate();
        assert_eq!(issues.len(), 4, "{:?}", issues);
        assert!(matches!(
            &issues[0],
            ValidationIssue::JoinUnknownScreen { join: 0, screen } if screen == "Nowhere"
        ));
        assert!(matches!(issues[1], ValidationIssue::JoinSpan { join: 1, .. }));
        assert_eq!(issues[1].clone().into_error().kind(), ErrorKind::OutOfRange);
        assert_eq!(issues[2].clone().into_error().kind(), ErrorKind::InvalidReference);
    }
}
