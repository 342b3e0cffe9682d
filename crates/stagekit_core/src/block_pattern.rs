//! Timed appearing/disappearing block groups

use stagekit_animation::Point;

/// One block of a pattern and the window of the cycle in which it is solid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    pub position: Point,
    pub on: u32,
    pub off: u32,
}

impl BlockPlacement {
    pub fn new(position: Point, on: u32, off: u32) -> Self {
        Self { position, on, off }
    }

    /// Whether the block is solid at `tick` within a cycle of `length` ticks
    ///
    /// The window is `[on, off)`. When `on > off` it wraps past the end of
    /// the cycle. A zero `length` disables the modulo.
    pub fn is_solid_at(&self, tick: u64, length: u32) -> bool {
        let t = if length == 0 {
            tick
        } else {
            tick % u64::from(length)
        };
        let (on, off) = (u64::from(self.on), u64::from(self.off));
        if on <= off {
            t >= on && t < off
        } else {
            t >= on || t < off
        }
    }
}

/// A set of blocks cycling on and off, spawned as one entity type
///
/// `left` and `right` are the column boundaries the player must be within
/// for the pattern to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPattern {
    pub entity: String,
    pub left: i32,
    pub right: i32,
    pub length: u32,
    pub blocks: Vec<BlockPlacement>,
}

impl BlockPattern {
    pub fn new(entity: impl Into<String>, left: i32, right: i32, length: u32) -> Self {
        Self {
            entity: entity.into(),
            left,
            right,
            length,
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, position: Point, on: u32, off: u32) -> Self {
        self.blocks.push(BlockPlacement::new(position, on, off));
        self
    }

    /// Whether column `x` lies within the pattern's boundaries
    pub fn covers_column(&self, x: i32) -> bool {
        x >= self.left && x <= self.right
    }

    /// Blocks solid at `tick`
    pub fn solid_at(&self, tick: u64) -> impl Iterator<Item = &BlockPlacement> {
        let length = self.length;
        self.blocks
            .iter()
            .filter(move |block| block.is_solid_at(tick, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_window() {
        let block = BlockPlacement::new(Point::new(2, 3), 10, 30);
        assert!(!block.is_solid_at(9, 60));
        assert!(block.is_solid_at(10, 60));
        assert!(block.is_solid_at(29, 60));
        assert!(!block.is_solid_at(30, 60));
        // Second cycle
        assert!(block.is_solid_at(75, 60));
    }

    #[test]
    fn test_wrapping_window() {
        let block = BlockPlacement::new(Point::ZERO, 50, 10);
        assert!(block.is_solid_at(55, 60));
        assert!(block.is_solid_at(5, 60));
        assert!(!block.is_solid_at(30, 60));
    }

    #[test]
    fn test_zero_length_uses_raw_ticks() {
        let block = BlockPlacement::new(Point::ZERO, 100, 200);
        assert!(block.is_solid_at(150, 0));
        assert!(!block.is_solid_at(250, 0));
    }

    #[test]
    fn test_pattern_solid_blocks() {
        let pattern = BlockPattern::new("Appear", 0, 15, 120)
            .with_block(Point::new(4, 6), 0, 60)
            .with_block(Point::new(6, 6), 30, 90)
            .with_block(Point::new(8, 6), 60, 120);

        let solid: Vec<Point> = pattern.solid_at(45).map(|b| b.position).collect();
        assert_eq!(solid, vec![Point::new(4, 6), Point::new(6, 6)]);

        let solid: Vec<Point> = pattern.solid_at(100).map(|b| b.position).collect();
        assert_eq!(solid, vec![Point::new(8, 6)]);

        assert!(pattern.covers_column(15));
        assert!(!pattern.covers_column(16));
    }
}
