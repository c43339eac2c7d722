//! This crate renders 2-D grid mazes as color-coded raster images for visually
//! debugging maze-solving algorithms. It uses the `image` and `imageproc` crates
//! for rendering and `insta` for snapshot testing.
//!
//! A maze is a rectangular grid of [`Cell`]s. The library stamps solution paths
//! and markers into a copy of the grid, validates that the start and goal markers
//! are present, and draws one filled square per cell through a fixed palette.
//!
//! # Example
//! ```
//! use mazeviz::{maze, Coord, Maze};
//!
//! let maze = maze![
//!     [1, 1, 1, 1],
//!     [1, 0, 0, 1],
//!     [1, 0, 0, 1],
//!     [1, 1, 1, 1],
//! ].unwrap();
//!
//! // Overlay a traversal, mark the goal corners and the runner.
//! let annotated = maze
//!     .annotated(Some(Coord::new(1, 2)), Some(&[Coord::new(2, 2)]), [true; 4])
//!     .unwrap();
//! assert!(annotated.is_complete());
//! ```

/// Debug module for saving rendered mazes to disk.
///
/// # Example
/// ```no_run
/// use mazeviz::{debug, drawing::MazeDrawingConfig, Coord, Maze};
///
/// let maze = Maze::sample();
/// let annotated = maze
///     .annotated(Some(Coord::new(5, 6)), None, [true; 4])
///     .unwrap();
/// debug::save_maze_image(&annotated, "output.png", &MazeDrawingConfig::default()).unwrap();
/// ```
#[cfg(feature = "debug")]
pub mod debug;
/// This module provides functionality for drawing mazes as color-coded images.
/// It is feature-gated under the `drawing` feature and requires the `image` and
/// `imageproc` crates.
///
/// The main components of this module are:
/// - [`drawing::Palette`]: The fixed ordered palette indexed by cell code.
/// - [`drawing::MazeDrawingConfig`]: Configuration for cell size and colors.
/// - [`drawing::Drawable`]: A trait implemented by types that can be drawn
///   into an image buffer, such as [`Maze`].
#[cfg(feature = "drawing")]
pub mod drawing;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::*;

// Sample mazes are 12 cells wide, so a full row stays inline
const DEFAULT_SMALLVEC_SIZE: usize = 32;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("Invalid maze dimensions: height={height}, width={width} (minimum 3x3)")]
    InvalidDimensions { height: usize, width: usize },

    #[error("Ragged row {row}: expected {expected} cells, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown cell code {code} at ({row}, {col})")]
    UnknownCellCode { code: u8, row: usize, col: usize },

    #[error("Coordinate ({row}, {col}) is out of bounds")]
    OutOfBounds { row: usize, col: usize },

    #[error("Invalid path: failed to add ({row}, {col})")]
    InvalidPath { row: usize, col: usize },

    #[error("Incomplete maze: must contain at least one start and one goal cell")]
    IncompleteMaze,

    #[error("({row}, {col}) is not a goal corner")]
    NotACorner { row: usize, col: usize },

    #[error("Solution segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("Cell size must be non-zero")]
    InvalidCellSize,

    #[error("Failed to write image: {0}")]
    ImageWriteError(String),
}

/// A type alias for SmallVec with an optimized stack-allocated buffer size.
pub type SmallVecLine<T> = SmallVec<[T; DEFAULT_SMALLVEC_SIZE]>;

/// Configuration for maze processing.
///
/// # Example
/// ```
/// use mazeviz::MazeConfig;
///
/// let config = MazeConfig::default();
/// assert_eq!(config.enable_parallel, true);
/// ```
#[derive(Debug, Clone)]
pub struct MazeConfig {
    /// Enable parallel marker scanning (default: true)
    pub enable_parallel: bool,
}

impl MazeConfig {
    /// Creates a new `MazeConfig` with the specified parameters.
    ///
    /// # Example
    /// ```
    /// use mazeviz::MazeConfig;
    ///
    /// let config = MazeConfig::new(false);
    /// assert_eq!(config.enable_parallel, false);
    /// ```
    pub fn new(enable_parallel: bool) -> Self {
        Self { enable_parallel }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig::new(true)
    }
}

/// Marker code for a single maze cell.
///
/// The discriminants are the raw grid codes accepted by [`Maze::from_rows`],
/// and double as indices into the rendering palette.
///
/// # Example
/// ```
/// use mazeviz::Cell;
///
/// assert_eq!(Cell::from_code(1), Some(Cell::Wall));
/// assert_eq!(Cell::from_code(9), None);
/// assert_eq!(Cell::Goal.code(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Cell {
    Empty = 0,
    Wall = 1,
    Start = 2,
    Path = 3,
    Goal = 4,
}

impl Cell {
    /// Converts a raw grid code into a `Cell`, or `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            2 => Some(Cell::Start),
            3 => Some(Cell::Path),
            4 => Some(Cell::Goal),
            _ => None,
        }
    }

    /// Returns the raw grid code for this cell.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` for cells a path may pass through.
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }
}

/// A `(row, column)` pair indexing into a [`Maze`]; valid iff within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord::new(row, col)
    }
}

// Walls of the built-in 12x12 test maze.
const SAMPLE_WALLS: [[u8; 12]; 12] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 0, 1, 1, 0, 1, 1],
    [1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1],
    [1, 1, 0, 1, 0, 0, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 0, 0, 1, 1, 1],
    [1, 0, 0, 0, 0, 1, 1, 1, 0, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// A rectangular grid of [`Cell`]s representing a maze.
///
/// Invariants: at least 3x3 (so the four goal corners exist), all rows equal
/// length, all cell values in the known code range. All three are enforced
/// at construction.
///
/// # Example
/// ```
/// use mazeviz::{Cell, Coord, Maze};
///
/// let maze = Maze::from_rows(vec![
///     vec![1, 1, 1],
///     vec![1, 0, 1],
///     vec![1, 1, 1],
/// ]).unwrap();
/// assert_eq!(maze.get(Coord::new(1, 1)), Some(Cell::Empty));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Maze {
    rows: SmallVecLine<SmallVecLine<Cell>>,
}

impl Maze {
    /// Builds a `Maze` from rows of raw cell codes.
    ///
    /// # Errors
    /// Returns [`MazeError::InvalidDimensions`] for grids smaller than 3x3,
    /// [`MazeError::RaggedRow`] when rows differ in length, and
    /// [`MazeError::UnknownCellCode`] for codes outside the known range.
    ///
    /// # Example
    /// ```
    /// use mazeviz::{Maze, MazeError};
    ///
    /// let err = Maze::from_rows(vec![vec![0, 7, 0]; 3]).unwrap_err();
    /// assert!(matches!(err, MazeError::UnknownCellCode { code: 7, row: 0, col: 1 }));
    /// ```
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, MazeError> {
        trace!("Building maze from {} raw rows", rows.len());
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height < 3 || width < 3 {
            error!("Invalid maze dimensions: height={}, width={}", height, width);
            return Err(MazeError::InvalidDimensions { height, width });
        }

        let mut cells = SmallVecLine::with_capacity(height);
        for (row, raw) in rows.iter().enumerate() {
            if raw.len() != width {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: width,
                    found: raw.len(),
                });
            }
            let mut line = SmallVecLine::with_capacity(width);
            for (col, &code) in raw.iter().enumerate() {
                let cell =
                    Cell::from_code(code).ok_or(MazeError::UnknownCellCode { code, row, col })?;
                line.push(cell);
            }
            cells.push(line);
        }

        Ok(Maze { rows: cells })
    }

    /// Creates an open maze of the given dimensions bordered by walls.
    pub fn blank(height: usize, width: usize) -> Result<Self, MazeError> {
        if height < 3 || width < 3 {
            error!("Invalid maze dimensions: height={}, width={}", height, width);
            return Err(MazeError::InvalidDimensions { height, width });
        }
        let rows = (0..height)
            .map(|row| {
                (0..width)
                    .map(|col| {
                        if row == 0 || row == height - 1 || col == 0 || col == width - 1 {
                            Cell::Wall
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(Maze { rows })
    }

    /// Returns the built-in 12x12 test maze.
    pub fn sample() -> Self {
        let rows = SAMPLE_WALLS
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| if code == 1 { Cell::Wall } else { Cell::Empty })
                    .collect()
            })
            .collect();
        Maze { rows }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Returns `true` iff the coordinate addresses a cell of this maze.
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.height() && coord.col < self.width()
    }

    /// Returns the cell at the coordinate, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.rows.get(coord.row)?.get(coord.col).copied()
    }

    /// Returns an iterator over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Returns an iterator over all cells with their coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, &cell)| (Coord::new(row, col), cell))
        })
    }

    /// Returns `true` iff at least one cell holds the given marker.
    pub fn contains(&self, marker: Cell) -> bool {
        self.rows
            .iter()
            .any(|line| line.iter().any(|&cell| cell == marker))
    }

    /// Counts the cells holding the given marker.
    ///
    /// # Example
    /// ```
    /// use mazeviz::{Cell, Maze};
    ///
    /// let maze = Maze::blank(3, 4).unwrap();
    /// assert_eq!(maze.count_cells(Cell::Empty), 2);
    /// ```
    pub fn count_cells(&self, marker: Cell) -> usize {
        self.rows
            .iter()
            .map(|line| line.iter().filter(|&&cell| cell == marker).count())
            .sum()
    }

    /// Converts the maze back into rows of raw cell codes.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|line| line.iter().map(|cell| cell.code()).collect())
            .collect()
    }

    /// The four goal corners: just inside the border at each extreme.
    pub fn corner_coords(&self) -> [Coord; 4] {
        let height = self.height();
        let width = self.width();
        [
            Coord::new(1, 1),
            Coord::new(1, width - 2),
            Coord::new(height - 2, 1),
            Coord::new(height - 2, width - 2),
        ]
    }

    /// Stamps a traversal onto the maze, overwriting each targeted cell with
    /// [`Cell::Path`].
    ///
    /// Every coordinate is checked before anything is written: a coordinate
    /// out of bounds fails with [`MazeError::OutOfBounds`], and one targeting
    /// a wall fails with [`MazeError::InvalidPath`] identifying the offending
    /// coordinate. On failure the maze is left untouched.
    ///
    /// # Example
    /// ```
    /// use mazeviz::{Cell, Coord, Maze};
    ///
    /// let mut maze = Maze::blank(3, 3).unwrap();
    /// maze.stamp_path(&[Coord::new(1, 1)]).unwrap();
    /// assert_eq!(maze.get(Coord::new(1, 1)), Some(Cell::Path));
    ///
    /// let err = maze.stamp_path(&[Coord::new(0, 0)]).unwrap_err();
    /// assert_eq!(err.to_string(), "Invalid path: failed to add (0, 0)");
    /// ```
    pub fn stamp_path(&mut self, path: &[Coord]) -> Result<(), MazeError> {
        trace!("Stamping path of {} cells", path.len());
        for &coord in path {
            match self.get(coord) {
                None => {
                    error!("Path coordinate ({}, {}) is out of bounds", coord.row, coord.col);
                    return Err(MazeError::OutOfBounds {
                        row: coord.row,
                        col: coord.col,
                    });
                }
                Some(cell) if !cell.is_passable() => {
                    return Err(MazeError::InvalidPath {
                        row: coord.row,
                        col: coord.col,
                    });
                }
                Some(_) => {}
            }
        }
        for &coord in path {
            self.rows[coord.row][coord.col] = Cell::Path;
        }
        Ok(())
    }

    /// Returns a copy of the maze with the traversal stamped onto it, leaving
    /// `self` untouched.
    pub fn with_path(&self, path: &[Coord]) -> Result<Self, MazeError> {
        let mut copy = self.clone();
        copy.stamp_path(path)?;
        Ok(copy)
    }

    /// Overwrites the cell at `start` with [`Cell::Start`].
    ///
    /// The overwrite is unconditional, walls included: solution frames place
    /// the runner on whatever cell the traversal has reached.
    pub fn mark_start(&mut self, start: Coord) -> Result<(), MazeError> {
        if !self.in_bounds(start) {
            error!("Start coordinate ({}, {}) is out of bounds", start.row, start.col);
            return Err(MazeError::OutOfBounds {
                row: start.row,
                col: start.col,
            });
        }
        self.rows[start.row][start.col] = Cell::Start;
        Ok(())
    }

    /// Stamps [`Cell::Goal`] into each goal corner enabled in `show`.
    ///
    /// The corner order matches [`Maze::corner_coords`].
    pub fn mark_corners(&mut self, show: [bool; 4]) {
        for (coord, enabled) in self.corner_coords().into_iter().zip(show) {
            if enabled {
                self.rows[coord.row][coord.col] = Cell::Goal;
            }
        }
    }

    /// Builds the fully annotated copy used for rendering: the traversal is
    /// stamped first, then the enabled goal corners, then the start marker,
    /// so the start overwrites a path cell at the same coordinate.
    ///
    /// # Example
    /// ```
    /// use mazeviz::{Cell, Coord, Maze};
    ///
    /// let maze = Maze::sample();
    /// let annotated = maze
    ///     .annotated(Some(Coord::new(5, 6)), Some(&[Coord::new(6, 6)]), [true; 4])
    ///     .unwrap();
    /// assert_eq!(annotated.get(Coord::new(5, 6)), Some(Cell::Start));
    /// assert_eq!(annotated.get(Coord::new(6, 6)), Some(Cell::Path));
    /// // The original maze is untouched.
    /// assert_eq!(maze.get(Coord::new(5, 6)), Some(Cell::Empty));
    /// ```
    pub fn annotated(
        &self,
        start: Option<Coord>,
        path: Option<&[Coord]>,
        corners: [bool; 4],
    ) -> Result<Self, MazeError> {
        let mut copy = self.clone();
        if let Some(path) = path {
            copy.stamp_path(path)?;
        }
        copy.mark_corners(corners);
        if let Some(start) = start {
            copy.mark_start(start)?;
        }
        Ok(copy)
    }

    /// Returns `true` iff the maze holds at least one start and one goal cell.
    ///
    /// # Example
    /// ```
    /// use mazeviz::{Coord, Maze};
    ///
    /// let mut maze = Maze::blank(5, 5).unwrap();
    /// assert!(!maze.is_complete());
    ///
    /// maze.mark_start(Coord::new(2, 2)).unwrap();
    /// maze.mark_corners([true, false, false, false]);
    /// assert!(maze.is_complete());
    /// ```
    pub fn is_complete(&self) -> bool {
        self.is_complete_with_config(&MazeConfig::default())
    }

    /// Scans for the start and goal markers with custom configuration.
    pub fn is_complete_with_config(&self, config: &MazeConfig) -> bool {
        trace!(
            "Scanning for markers, parallel={}",
            config.enable_parallel
        );
        let (has_start, has_goal) = if config.enable_parallel {
            rayon::join(|| self.contains(Cell::Start), || self.contains(Cell::Goal))
        } else {
            (self.contains(Cell::Start), self.contains(Cell::Goal))
        };
        has_start && has_goal
    }

    /// Fails with [`MazeError::IncompleteMaze`] when either required marker
    /// is absent. Callers that require validity propagate the error.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.is_complete() {
            Ok(())
        } else {
            error!("Maze is missing a start or goal marker");
            Err(MazeError::IncompleteMaze)
        }
    }
}

impl TryFrom<Vec<Vec<u8>>> for Maze {
    type Error = MazeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        // Delegate to the checked constructor
        Maze::from_rows(rows)
    }
}

/// Creates a [`Maze`] from rows of integer cell-code literals.
///
/// Expands to a [`Maze::from_rows`] call, so invalid literals surface as the
/// same `Result` errors.
///
/// # Example
/// ```
/// use mazeviz::{maze, Cell, Coord};
///
/// let maze = maze![
///     [1, 1, 1],
///     [1, 2, 1],
///     [1, 4, 1],
/// ].unwrap();
/// assert_eq!(maze.get(Coord::new(1, 1)), Some(Cell::Start));
/// assert!(maze.is_complete());
/// ```
#[macro_export]
macro_rules! maze {
    ($([$($cell:expr),* $(,)?]),* $(,)?) => {
        $crate::Maze::from_rows(vec![$(vec![$($cell),*]),*])
    };
}
