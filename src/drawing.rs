//! This module provides functionality for drawing mazes as color-coded images.
//! It is feature-gated under the `drawing` feature and requires the `image` and
//! `imageproc` crates.
//!
//! Each cell is drawn as one filled square of `cell_size` pixels, colored
//! through a fixed [`Palette`] indexed by the cell's marker code. No axes, no
//! labels, no grid lines.
//!
//! # Examples
//!
//! ```rust
//! use mazeviz::{drawing::*, Coord, Maze};
//!
//! let maze = Maze::sample();
//! let annotated = maze
//!     .annotated(Some(Coord::new(5, 6)), None, [true; 4])
//!     .unwrap();
//!
//! let config = MazeDrawingConfig {
//!     cell_size: 8,
//!     ..MazeDrawingConfig::default()
//! };
//! let image = annotated.render(&config).unwrap();
//! assert_eq!(image.width(), 12 * 8);
//! ```

use std::fmt;

use crate::{Cell, Coord, Maze, MazeError};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::*;

/// The fixed ordered palette mapping cell codes to colors.
///
/// The default is the classic debugging palette: white open cells, black
/// walls, a yellow start marker, blue path cells, and red goal corners.
///
/// # Example
/// ```
/// use image::Rgba;
/// use mazeviz::{drawing::Palette, Cell};
///
/// let palette = Palette::default();
/// assert_eq!(palette.color(Cell::Wall), Rgba([0, 0, 0, 255]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub empty: Rgba<u8>,
    pub wall: Rgba<u8>,
    pub start: Rgba<u8>,
    pub path: Rgba<u8>,
    pub goal: Rgba<u8>,
}

impl Palette {
    /// Returns the color for the given cell.
    pub fn color(&self, cell: Cell) -> Rgba<u8> {
        match cell {
            Cell::Empty => self.empty,
            Cell::Wall => self.wall,
            Cell::Start => self.start,
            Cell::Path => self.path,
            Cell::Goal => self.goal,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            empty: Rgba([255, 255, 255, 255]), // White
            wall: Rgba([0, 0, 0, 255]),        // Black
            start: Rgba([255, 255, 0, 255]),   // Yellow
            path: Rgba([0, 0, 255, 255]),      // Blue
            goal: Rgba([255, 0, 0, 255]),      // Red
        }
    }
}

/// Configuration for drawing mazes.
///
/// Users can rely on the fixed [`Palette`] or provide a custom color provider
/// function for more advanced configurations.
pub struct MazeDrawingConfig {
    /// Edge length of one rendered cell, in pixels.
    pub cell_size: u32,
    /// Palette indexed by cell code.
    pub palette: Palette,
    /// Optional function overriding the palette per cell.
    pub cell_color_provider: Option<Box<dyn Fn(Coord, Cell) -> Rgba<u8>>>,
}

// Manually implement Debug for MazeDrawingConfig
impl fmt::Debug for MazeDrawingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MazeDrawingConfig")
            .field("cell_size", &self.cell_size)
            .field("palette", &self.palette)
            .field("cell_color_provider", &"<function>")
            .finish()
    }
}

impl Default for MazeDrawingConfig {
    fn default() -> Self {
        MazeDrawingConfig {
            cell_size: 16,
            palette: Palette::default(),
            cell_color_provider: None,
        }
    }
}

/// Trait for types that can be drawn into an image buffer.
pub trait Drawable {
    /// Draws the object on the provided image using the given configuration.
    ///
    /// # Errors
    /// Returns [`MazeError`] if drawing fails.
    fn draw(&self, image: &mut RgbaImage, config: &MazeDrawingConfig) -> Result<(), MazeError>;
}

impl Drawable for Maze {
    fn draw(&self, image: &mut RgbaImage, config: &MazeDrawingConfig) -> Result<(), MazeError> {
        if config.cell_size == 0 {
            return Err(MazeError::InvalidCellSize);
        }
        for (coord, cell) in self.cells() {
            let color = if let Some(ref provider) = config.cell_color_provider {
                provider(coord, cell)
            } else {
                config.palette.color(cell)
            };
            let rect = Rect::at(
                (coord.col as u32 * config.cell_size) as i32,
                (coord.row as u32 * config.cell_size) as i32,
            )
            .of_size(config.cell_size, config.cell_size);
            draw_filled_rect_mut(image, rect, color);
        }
        Ok(())
    }
}

impl Maze {
    /// Renders the maze into a freshly allocated image buffer.
    ///
    /// The result is `width * cell_size` by `height * cell_size` pixels.
    ///
    /// # Errors
    /// Returns [`MazeError::InvalidCellSize`] when `cell_size` is zero.
    pub fn render(&self, config: &MazeDrawingConfig) -> Result<RgbaImage, MazeError> {
        if config.cell_size == 0 {
            error!("Cell size must be non-zero");
            return Err(MazeError::InvalidCellSize);
        }
        let width = self.width() as u32 * config.cell_size;
        let height = self.height() as u32 * config.cell_size;
        debug!(
            "Rendering {}x{} maze into {}x{} image",
            self.height(),
            self.width(),
            height,
            width
        );
        let mut image = RgbaImage::new(width, height);
        self.draw(&mut image, config)?;
        Ok(image)
    }
}
