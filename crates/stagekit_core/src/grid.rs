//! Row-major tile id grid and its `.scn` text form
//!
//! The text form is a `"<width> <height>"` header line followed by `height`
//! lines of `width` whitespace-separated tile ids.

use crate::error::LevelError;
use crate::tileset::TileId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<TileId>,
}

impl TileGrid {
    /// A grid filled with the empty tile
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    /// Build from rows; every row must have the same length
    pub fn from_rows(rows: &[Vec<TileId>]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        if rows.iter().any(|r| r.len() as u32 != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<TileId> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Returns false when the position is outside the grid
    pub fn set(&mut self, x: i32, y: i32, id: TileId) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = id;
                true
            }
            None => false,
        }
    }

    /// Change dimensions, keeping the top-left overlap and zero-filling the rest
    pub fn resize(&mut self, width: u32, height: u32) {
        let mut cells = vec![0; width as usize * height as usize];
        let keep_w = width.min(self.width) as usize;
        let keep_h = height.min(self.height) as usize;
        for y in 0..keep_h {
            let src = y * self.width as usize;
            let dst = y * width as usize;
            cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    pub fn cells(&self) -> &[TileId] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        // chunks(0) panics, and a zero-width grid has no cells to yield anyway
        let width = (self.width as usize).max(1);
        self.cells.chunks(width)
    }

    /// Parse the `.scn` text form; `context` names the source in errors
    pub fn parse(text: &str, context: &str) -> Result<Self, LevelError> {
        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| LevelError::malformed(context, "missing size line"))?;
        let mut dims = header.split_whitespace();
        let width = parse_number(dims.next(), context, "width")?;
        let height = parse_number(dims.next(), context, "height")?;

        // Cells grow with the input, never with the header
        let mut cells = Vec::new();
        for y in 0..height as usize {
            let line = lines
                .next()
                .ok_or_else(|| LevelError::malformed(context, format!("missing row {}", y)))?;
            let start = cells.len();
            for token in line.split_whitespace() {
                let id: TileId = token.parse().map_err(|_| {
                    LevelError::malformed(
                        context,
                        format!("row {} has invalid tile id '{}'", y, token),
                    )
                })?;
                cells.push(id);
            }
            let count = cells.len() - start;
            if count != width as usize {
                return Err(LevelError::malformed(
                    context,
                    format!("row {} has {} values, expected {}", y, count, width),
                ));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Render the `.scn` text form
    pub fn to_text(&self) -> String {
        let mut out = format!("{} {}\n", self.width, self.height);
        for y in 0..self.height as usize {
            let start = y * self.width as usize;
            let row = &self.cells[start..start + self.width as usize];
            let line: Vec<String> = row.iter().map(|id| id.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

fn parse_number(token: Option<&str>, context: &str, what: &str) -> Result<u32, LevelError> {
    let token = token.ok_or_else(|| LevelError::malformed(context, format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| LevelError::malformed(context, format!("invalid {} '{}'", what, token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_grid() {
        let grid = TileGrid::parse("3 2\n0 1 0 \n2 2 2\n", "a.scn").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 0), Some(1));
        assert_eq!(grid.get(2, 1), Some(2));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(-1, 0), None);
    }

    #[test]
    fn test_text_round_trip() {
        let mut grid = TileGrid::new(17, 5);
        for (i, (x, y)) in (0..17).flat_map(|x| (0..5).map(move |y| (x, y))).enumerate() {
            grid.set(x, y, (i * 37 % 1000) as TileId);
        }
        let parsed = TileGrid::parse(&grid.to_text(), "round.scn").unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_parse_errors() {
        for text in ["", "3\n", "2 1\n0 x\n", "2 2\n0 0\n0\n", "2 1\n0 -1\n", "2 1\n0 0 0\n"] {
            let err = TileGrid::parse(text, "bad.scn").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "input {:?}", text);
        }
    }

    #[test]
    fn test_oversized_header_is_malformed() {
        for text in [
            "4294967295 4294967295\n",
            "4294967295 4294967295\n0\n",
            "0 4294967295\n",
            "2 3\n0 0\n0 0\n",
        ] {
            let err = TileGrid::parse(text, "huge.scn").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "input {:?}", text);
        }
    }

    #[test]
    fn test_empty_rows_of_zero_width_grid() {
        let grid = TileGrid::parse("0 2\n\n\n", "thin.scn").unwrap();
        assert_eq!(grid.height(), 2);
        assert!(grid.cells().is_empty());
        assert_eq!(TileGrid::parse(&grid.to_text(), "thin.scn").unwrap(), grid);
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut grid = TileGrid::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        grid.resize(2, 3);
        assert_eq!(grid.cells(), &[1, 2, 4, 5, 0, 0]);

        grid.resize(4, 1);
        assert_eq!(grid.cells(), &[1, 2, 0, 0]);
    }

    #[test]
    fn test_rows() {
        let grid = TileGrid::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let rows: Vec<&[TileId]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..]]);
        assert!(TileGrid::from_rows(&[vec![1], vec![2, 3]]).is_none());
    }
}
