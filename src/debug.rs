use crate::drawing::MazeDrawingConfig;
use crate::{Coord, Maze, MazeError};
use tracing::*;

/// Validates the maze, renders it, and saves the result.
///
/// This is the rendering sink: an incomplete maze (no start or no goal cell)
/// is rejected before anything is drawn.
///
/// # Arguments
/// * `maze` - The finalized maze, usually from [`Maze::annotated`].
/// * `output_path` - The path to save the output image.
/// * `config` - The drawing configuration.
///
/// # Errors
/// Returns [`MazeError::IncompleteMaze`] when a required marker is absent and
/// [`MazeError::ImageWriteError`] when saving fails.
///
/// # Examples
///
/// ```no_run
/// use mazeviz::{debug::save_maze_image, drawing::MazeDrawingConfig, Coord, Maze};
///
/// let maze = Maze::sample();
/// let annotated = maze
///     .annotated(Some(Coord::new(5, 6)), None, [true; 4])
///     .unwrap();
/// save_maze_image(&annotated, "maze.png", &MazeDrawingConfig::default()).unwrap();
/// ```
pub fn save_maze_image(
    maze: &Maze,
    output_path: &str,
    config: &MazeDrawingConfig,
) -> Result<(), MazeError> {
    maze.validate()?;
    let image = maze.render(config)?;
    image
        .save(output_path)
        .map_err(|e| MazeError::ImageWriteError(e.to_string()))
}

/// Renders the complete solution found by a search, one frame per segment.
///
/// Each segment is drawn over the base maze with the segment stamped as the
/// path, the segment's head as the start marker, and the goal corners still
/// outstanding marked. A corner stops being marked in the frames after the
/// segment that ends on it. Frames are written to `output_dir` as
/// `frame_000.png`, `frame_001.png`, ... and the written paths are returned.
///
/// # Errors
/// Returns [`MazeError::EmptySegment`] for a segment with no coordinates and
/// [`MazeError::NotACorner`] when a segment does not end on a goal corner.
pub fn save_solution_frames(
    maze: &Maze,
    segments: &[Vec<Coord>],
    output_dir: &str,
    config: &MazeDrawingConfig,
) -> Result<Vec<String>, MazeError> {
    debug!("Rendering solution of {} segments", segments.len());
    let corners = maze.corner_coords();
    let mut show = [true; 4];
    let mut written = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let head = *segment
            .first()
            .ok_or(MazeError::EmptySegment { index })?;
        let tail = *segment
            .last()
            .ok_or(MazeError::EmptySegment { index })?;

        let frame = maze.annotated(Some(head), Some(segment.as_slice()), show)?;
        let output_path = format!("{}/frame_{:03}.png", output_dir, index);
        save_maze_image(&frame, &output_path, config)?;
        written.push(output_path);

        let reached = corners
            .iter()
            .position(|&corner| corner == tail)
            .ok_or(MazeError::NotACorner {
                row: tail.row,
                col: tail.col,
            })?;
        show[reached] = false;
    }

    Ok(written)
}
