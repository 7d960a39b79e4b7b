//! Grid data model.
//!
//! This module contains the [`Cell`] coordinate type, the per-cell [`Tile`] state and the
//! [`Grid`] occupancy array shared by the generator and the pathfinder.

use std::{fmt, str::FromStr};

use crate::error::{MazeError, Result};

/// Orthogonal unit offsets in the order neighbors are expanded during search.
pub(crate) const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Grid coordinate.
///
/// Cells compare lexicographically on `(x, y)`, which is the tie-break order the pathfinder
/// relies on when two frontier entries share a priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    /// Column, growing to the right.
    pub x: usize,
    /// Row, growing downwards.
    pub y: usize,
}

impl Cell {
    /// Builds a cell from its column and row.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the cell displaced by `(dx, dy)`, or `None` if either coordinate would go
    /// negative.
    pub const fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };
        Some(Self { x, y })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Cell {
    type Err = MazeError;

    /// Parses the `x,y` form accepted on the command line.
    fn from_str(input: &str) -> Result<Self> {
        let malformed = || MazeError::MalformedCell {
            input: input.to_owned(),
        };

        let (x, y) = input.split_once(',').ok_or_else(malformed)?;
        let x = x.trim().parse().map_err(|_err| malformed())?;
        let y = y.trim().parse().map_err(|_err| malformed())?;

        Ok(Self { x, y })
    }
}

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Passable cell.
    Open,
    /// Impassable cell.
    #[default]
    Wall,
}

impl Tile {
    /// Character used for the tile in the textual grid form.
    pub const fn symbol(self) -> char {
        match self {
            Self::Open => '.',
            Self::Wall => '#',
        }
    }
}

/// Rectangular occupancy grid stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Row-major tile storage of `width * height` entries.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid where every cell is a wall.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimensions`] if either dimension is zero.
    pub fn walled(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions {
                width,
                height,
                reason: "a grid needs at least one row and one column",
            });
        }

        let len = width
            .checked_mul(height)
            .ok_or(MazeError::InvalidDimensions {
                width,
                height,
                reason: "cell count overflows the address space",
            })?;

        Ok(Self {
            width,
            height,
            tiles: vec![Tile::Wall; len],
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether `cell` lies inside the grid.
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Whether `cell` lies on the outermost ring of the grid. Cells outside the grid are not on
    /// the border.
    pub const fn is_border(&self, cell: Cell) -> bool {
        self.contains(cell)
            && (cell.x == 0
                || cell.y == 0
                || cell.x == self.width - 1
                || cell.y == self.height - 1)
    }

    /// Tile at `cell`, or `None` when out of bounds.
    pub fn get(&self, cell: Cell) -> Option<Tile> {
        self.index(cell)
            .and_then(|idx| self.tiles.get(idx))
            .copied()
    }

    /// Whether `cell` is in bounds and open.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.get(cell) == Some(Tile::Open)
    }

    /// Overwrites the tile at `cell`. Out-of-bounds writes are ignored.
    pub(crate) fn set(&mut self, cell: Cell, tile: Tile) {
        if let Some(slot) = self.index(cell).and_then(|idx| self.tiles.get_mut(idx)) {
            *slot = tile;
        }
    }

    /// In-bounds open neighbors of `cell`, in west, east, north, south order.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        ORTHOGONAL
            .into_iter()
            .filter_map(move |(dx, dy)| cell.offset(dx, dy))
            .filter(move |neighbor| self.is_open(*neighbor))
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Every open cell of the grid in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(move |cell| self.is_open(*cell))
    }

    /// Row-major storage index of `cell`.
    const fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y * self.width + cell.x)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    /// Writes one line per row, `#` for walls and `.` for open cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.tiles.chunks(self.width).enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            for tile in row {
                write!(f, "{}", tile.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = MazeError;

    /// Parses the textual form written by [`Display`](fmt::Display). Leading and trailing blank
    /// lines are ignored, every row must have the same width.
    fn from_str(input: &str) -> Result<Self> {
        let rows: Vec<&str> = input.trim().lines().map(str::trim).collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::walled(width, rows.len())?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MazeError::MalformedGrid {
                    row: y,
                    reason: format!("expected {width} columns, found {}", row.chars().count()),
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let tile = match symbol {
                    '.' => Tile::Open,
                    '#' => Tile::Wall,
                    other => {
                        return Err(MazeError::MalformedGrid {
                            row: y,
                            reason: format!("unexpected symbol '{other}' at column {x}"),
                        })
                    }
                };
                grid.set(Cell::new(x, y), tile);
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walled_grid_has_no_open_cells() {
        let grid = Grid::walled(4, 3).expect("dimensions are valid");

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.open_cells().count(), 0);
        assert_eq!(grid.cells().count(), 12);
    }

    #[test]
    fn test_walled_rejects_zero_dimensions() {
        assert!(Grid::walled(0, 3).is_err());
        assert!(Grid::walled(3, 0).is_err());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::walled(3, 3).expect("dimensions are valid");

        assert_eq!(grid.get(Cell::new(2, 2)), Some(Tile::Wall));
        assert_eq!(grid.get(Cell::new(3, 0)), None);
        assert!(!grid.is_open(Cell::new(0, 3)));
    }

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut grid = Grid::walled(3, 3).expect("dimensions are valid");
        grid.set(Cell::new(1, 1), Tile::Open);
        grid.set(Cell::new(7, 7), Tile::Open);

        assert_eq!(grid.open_cells().collect::<Vec<_>>(), vec![Cell::new(1, 1)]);
    }

    #[test]
    fn test_parse_and_display() {
        let text = "#####\n#..##\n#.#.#\n#####";
        let grid: Grid = text.parse().expect("grid text is well formed");

        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert!(grid.is_open(Cell::new(2, 1)));
        assert!(!grid.is_open(Cell::new(2, 2)));
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let result = "###\n#.\n###".parse::<Grid>();

        assert_eq!(
            result,
            Err(MazeError::MalformedGrid {
                row: 1,
                reason: "expected 3 columns, found 2".to_owned(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_symbols() {
        assert!("###\n#x#\n###".parse::<Grid>().is_err());
        assert!("".parse::<Grid>().is_err());
    }

    #[test]
    fn test_open_neighbors_order_and_bounds() {
        let grid: Grid = "...\n...\n...".parse().expect("grid text is well formed");

        let center: Vec<Cell> = grid.open_neighbors(Cell::new(1, 1)).collect();
        assert_eq!(
            center,
            vec![
                Cell::new(0, 1),
                Cell::new(2, 1),
                Cell::new(1, 0),
                Cell::new(1, 2)
            ]
        );

        let corner: Vec<Cell> = grid.open_neighbors(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_is_border() {
        let grid = Grid::walled(4, 4).expect("dimensions are valid");

        assert!(grid.is_border(Cell::new(0, 2)));
        assert!(grid.is_border(Cell::new(3, 1)));
        assert!(grid.is_border(Cell::new(2, 3)));
        assert!(!grid.is_border(Cell::new(1, 2)));
    }

    #[test]
    fn test_cells_outside_are_not_border() {
        let grid = Grid::walled(4, 4).expect("dimensions are valid");

        assert!(!grid.is_border(Cell::new(usize::MAX, 1)));
        assert!(!grid.is_border(Cell::new(1, usize::MAX)));
        assert!(!grid.is_border(Cell::new(4, 0)));
    }

    #[test]
    fn test_cell_ordering_is_x_then_y() {
        assert!(Cell::new(1, 9) < Cell::new(2, 0));
        assert!(Cell::new(2, 1) < Cell::new(2, 2));
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!("3,4".parse::<Cell>(), Ok(Cell::new(3, 4)));
        assert_eq!(" 10 , 2 ".parse::<Cell>(), Ok(Cell::new(10, 2)));
        assert!("3".parse::<Cell>().is_err());
        assert!("-1,2".parse::<Cell>().is_err());
        assert!("a,b".parse::<Cell>().is_err());
    }

    #[test]
    fn test_cell_offset() {
        assert_eq!(Cell::new(2, 2).offset(-2, 1), Some(Cell::new(0, 3)));
        assert_eq!(Cell::new(0, 2).offset(-1, 0), None);
    }
}
