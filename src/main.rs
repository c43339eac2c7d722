use anyhow::{Context, Result};
use clap::Parser;
use mazeviz::{debug::save_maze_image, drawing::MazeDrawingConfig, Coord, Maze};
use tracing_subscriber::EnvFilter;

/// Render the built-in sample maze as a color-coded PNG.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output image path
    #[arg(short, long, default_value = "maze.png")]
    output: String,

    /// Edge length of one rendered cell, in pixels
    #[arg(long, default_value_t = 16)]
    cell_size: u32,

    /// Skip the demo solution path overlay
    #[arg(long)]
    no_path: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let maze = Maze::sample();

    // A searched route through the sample maze
    let path: Vec<Coord> = [
        (6, 6),
        (6, 5),
        (6, 4),
        (5, 4),
        (5, 3),
        (5, 2),
        (5, 1),
        (4, 1),
        (3, 1),
        (2, 1),
    ]
    .map(Coord::from)
    .to_vec();

    let annotated = maze
        .annotated(
            Some(Coord::new(5, 6)),
            if args.no_path { None } else { Some(&path) },
            [true; 4],
        )
        .context("Failed to annotate maze")?;

    let config = MazeDrawingConfig {
        cell_size: args.cell_size,
        ..MazeDrawingConfig::default()
    };
    save_maze_image(&annotated, &args.output, &config)
        .with_context(|| format!("Failed to write {}", args.output))?;

    Ok(())
}

/// Unit tests for the maze annotation, validation, and rendering logic.
#[cfg(test)]
mod tests {
    use image::Rgba;
    use insta::assert_yaml_snapshot;
    use mazeviz::debug::{save_maze_image, save_solution_frames};
    use mazeviz::drawing::{MazeDrawingConfig, Palette};
    use mazeviz::{maze, Cell, Coord, Maze, MazeConfig, MazeError};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn stamp_marks_single_cell() {
        let mut maze = Maze::blank(3, 3).unwrap();
        maze.stamp_path(&[Coord::new(1, 1)]).unwrap();

        let expected = maze![[1, 1, 1], [1, 3, 1], [1, 1, 1]].unwrap();
        assert_eq!(maze, expected);
    }

    #[test]
    fn stamp_rejects_wall_coordinate() {
        let mut maze = Maze::blank(3, 3).unwrap();
        let err = maze.stamp_path(&[Coord::new(0, 0)]).unwrap_err();
        assert!(matches!(err, MazeError::InvalidPath { row: 0, col: 0 }));
    }

    #[test]
    fn stamp_rejects_out_of_bounds_coordinate() {
        let mut maze = Maze::blank(3, 3).unwrap();
        let err = maze.stamp_path(&[Coord::new(5, 1)]).unwrap_err();
        assert!(matches!(err, MazeError::OutOfBounds { row: 5, col: 1 }));
    }

    #[test]
    fn failed_stamp_leaves_maze_untouched() {
        let maze = Maze::blank(5, 5).unwrap();
        let mut target = maze.clone();

        let err = target
            .stamp_path(&[Coord::new(1, 1), Coord::new(2, 2), Coord::new(0, 3)])
            .unwrap_err();

        assert!(matches!(err, MazeError::InvalidPath { row: 0, col: 3 }));
        assert_eq!(target, maze);
    }

    #[test]
    fn with_path_leaves_original_untouched() {
        let maze = Maze::blank(4, 4).unwrap();
        let stamped = maze
            .with_path(&[Coord::new(1, 1), Coord::new(1, 2)])
            .unwrap();

        assert_eq!(stamped.get(Coord::new(1, 2)), Some(Cell::Path));
        assert_eq!(maze.get(Coord::new(1, 2)), Some(Cell::Empty));
    }

    #[test]
    fn sample_route_stamps_ten_cells() {
        // The demo route rendered by the binary
        let path: Vec<Coord> = [
            (6, 6),
            (6, 5),
            (6, 4),
            (5, 4),
            (5, 3),
            (5, 2),
            (5, 1),
            (4, 1),
            (3, 1),
            (2, 1),
        ]
        .map(Coord::from)
        .to_vec();

        let stamped = Maze::sample().with_path(&path).unwrap();
        assert_eq!(stamped.count_cells(Cell::Path), path.len());
    }

    #[test_case(true, true, true ; "start and goal present")]
    #[test_case(true, false, false ; "goal missing")]
    #[test_case(false, true, false ; "start missing")]
    #[test_case(false, false, false ; "both missing")]
    fn completeness_requires_both_markers(with_start: bool, with_goal: bool, expected: bool) {
        let mut maze = Maze::blank(6, 6).unwrap();
        if with_start {
            maze.mark_start(Coord::new(2, 2)).unwrap();
        }
        if with_goal {
            maze.mark_corners([true, false, false, false]);
        }
        assert_eq!(maze.is_complete(), expected);
    }

    #[test]
    fn validate_reports_incomplete_maze() {
        let maze = Maze::blank(4, 4).unwrap();
        assert!(matches!(
            maze.validate().unwrap_err(),
            MazeError::IncompleteMaze
        ));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Maze::from_rows(vec![vec![1, 1, 1], vec![1, 1], vec![1, 1, 1]]).unwrap_err();
        assert!(matches!(
            err,
            MazeError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn from_rows_rejects_unknown_code() {
        let err = Maze::from_rows(vec![vec![0, 0, 0], vec![0, 5, 0], vec![0, 0, 0]]).unwrap_err();
        assert!(matches!(
            err,
            MazeError::UnknownCellCode {
                code: 5,
                row: 1,
                col: 1
            }
        ));
    }

    #[test_case(0, 0 ; "empty grid")]
    #[test_case(2, 5 ; "two rows")]
    #[test_case(5, 2 ; "two columns")]
    fn from_rows_rejects_grids_without_corners(height: usize, width: usize) {
        let rows = vec![vec![0u8; width]; height];
        assert!(matches!(
            Maze::from_rows(rows).unwrap_err(),
            MazeError::InvalidDimensions { .. }
        ));
    }

    #[test]
    fn sample_maze_is_a_bordered_twelve_by_twelve() {
        let maze = Maze::sample();
        assert_eq!((maze.height(), maze.width()), (12, 12));
        assert_eq!(maze.get(Coord::new(0, 0)), Some(Cell::Wall));
        assert_eq!(maze.get(Coord::new(1, 1)), Some(Cell::Empty));
        assert!(!maze.is_complete());
    }

    #[test]
    fn corners_are_marked_in_declaration_order() {
        let mut maze = Maze::blank(6, 5).unwrap();
        maze.mark_corners([true, false, true, false]);

        assert_eq!(maze.get(Coord::new(1, 1)), Some(Cell::Goal));
        assert_eq!(maze.get(Coord::new(1, 3)), Some(Cell::Empty));
        assert_eq!(maze.get(Coord::new(4, 1)), Some(Cell::Goal));
        assert_eq!(maze.get(Coord::new(4, 3)), Some(Cell::Empty));
        assert_eq!(maze.count_cells(Cell::Goal), 2);
    }

    #[test]
    fn start_overwrites_path_cell() {
        let maze = Maze::blank(5, 5).unwrap();
        let annotated = maze
            .annotated(
                Some(Coord::new(2, 2)),
                Some(&[Coord::new(2, 2), Coord::new(2, 3)]),
                [false; 4],
            )
            .unwrap();

        assert_eq!(annotated.get(Coord::new(2, 2)), Some(Cell::Start));
        assert_eq!(annotated.get(Coord::new(2, 3)), Some(Cell::Path));
    }

    #[test]
    fn codes_roundtrip_through_construction() {
        let codes = vec![
            vec![1, 1, 1, 1],
            vec![1, 2, 0, 1],
            vec![1, 3, 4, 1],
            vec![1, 1, 1, 1],
        ];
        let maze = Maze::from_rows(codes.clone()).unwrap();
        assert_eq!(maze.to_codes(), codes);
    }

    #[test]
    fn maze_macro_matches_checked_constructor() {
        let built = maze![[1, 1, 1], [1, 0, 1], [1, 1, 1]].unwrap();
        assert_eq!(built, Maze::blank(3, 3).unwrap());
    }

    #[test]
    fn blank_maze_codes_snapshot() {
        let maze = Maze::blank(4, 4).unwrap();
        assert_yaml_snapshot!(maze.to_codes(), @r###"
        - - 1
          - 1
          - 1
          - 1
        - - 1
          - 0
          - 0
          - 1
        - - 1
          - 0
          - 0
          - 1
        - - 1
          - 1
          - 1
          - 1
        "###);
    }

    #[test]
    fn annotated_row_snapshot() {
        let maze = maze![[1, 1, 1], [1, 0, 1], [1, 1, 1]].unwrap();
        let annotated = maze
            .annotated(Some(Coord::new(1, 1)), None, [false; 4])
            .unwrap();
        let row: Vec<Cell> = annotated.rows().nth(1).unwrap().to_vec();
        assert_yaml_snapshot!(row, @r###"
        - Wall
        - Start
        - Wall
        "###);
    }

    proptest! {
        #[test]
        fn parallel_and_sequential_scans_agree(height in 3usize..16, width in 3usize..16) {
            let rows: Vec<Vec<u8>> = (0..height)
                .map(|_| (0..width).map(|_| rand::random::<u8>() % 5).collect())
                .collect();
            let maze = Maze::from_rows(rows).unwrap();

            prop_assert_eq!(
                maze.is_complete_with_config(&MazeConfig::new(true)),
                maze.is_complete_with_config(&MazeConfig::new(false))
            );
        }

        #[test]
        fn stamping_open_cells_marks_exactly_those(height in 4usize..16, width in 4usize..16) {
            let maze = Maze::blank(height, width).unwrap();
            let path: Vec<Coord> = (1..height - 1).map(|row| Coord::new(row, 1)).collect();
            let stamped = maze.with_path(&path).unwrap();

            for &coord in &path {
                prop_assert_eq!(stamped.get(coord), Some(Cell::Path));
            }
            // Every cell off the path is unchanged
            for (coord, cell) in maze.cells() {
                if !path.contains(&coord) {
                    prop_assert_eq!(stamped.get(coord), Some(cell));
                }
            }
        }

        #[test]
        fn stamping_through_a_wall_is_atomic(
            height in 4usize..16,
            width in 4usize..16,
            col in 0usize..64,
        ) {
            let col = col % width;
            let maze = Maze::blank(height, width).unwrap();
            let mut target = maze.clone();

            let err = target
                .stamp_path(&[Coord::new(1, 1), Coord::new(0, col)])
                .unwrap_err();

            let is_invalid_path_row_0 = matches!(err, MazeError::InvalidPath { row: 0, .. });
            prop_assert!(is_invalid_path_row_0);
            prop_assert_eq!(target, maze);
        }
    }

    #[test]
    fn render_has_cell_size_scaled_dimensions() {
        let maze = Maze::blank(3, 4).unwrap();
        let config = MazeDrawingConfig {
            cell_size: 2,
            ..MazeDrawingConfig::default()
        };
        let image = maze.render(&config).unwrap();
        assert_eq!((image.width(), image.height()), (8, 6));
    }

    #[test]
    fn render_paints_cells_through_the_palette() {
        let maze = maze![[1, 1, 1], [1, 2, 1], [1, 1, 1]].unwrap();
        let config = MazeDrawingConfig {
            cell_size: 2,
            ..MazeDrawingConfig::default()
        };
        let image = maze.render(&config).unwrap();
        let palette = Palette::default();

        assert_eq!(*image.get_pixel(0, 0), palette.wall);
        assert_eq!(*image.get_pixel(3, 3), palette.start);
        assert_eq!(*image.get_pixel(5, 5), palette.wall);
    }

    #[test]
    fn render_paints_path_cells_blue() {
        let maze = Maze::blank(3, 3)
            .unwrap()
            .with_path(&[Coord::new(1, 1)])
            .unwrap();
        let config = MazeDrawingConfig {
            cell_size: 1,
            ..MazeDrawingConfig::default()
        };
        let image = maze.render(&config).unwrap();

        assert_eq!(*image.get_pixel(1, 1), Palette::default().path);
        assert_eq!(*image.get_pixel(0, 1), Palette::default().wall);
    }

    #[test]
    fn render_rejects_zero_cell_size() {
        let maze = Maze::blank(3, 3).unwrap();
        let config = MazeDrawingConfig {
            cell_size: 0,
            ..MazeDrawingConfig::default()
        };
        assert!(matches!(
            maze.render(&config).unwrap_err(),
            MazeError::InvalidCellSize
        ));
    }

    #[test]
    fn custom_color_provider_overrides_palette() {
        let maze = Maze::blank(3, 3).unwrap();
        let config = MazeDrawingConfig {
            cell_size: 1,
            cell_color_provider: Some(Box::new(|_, _| Rgba([0, 255, 0, 255]))),
            ..MazeDrawingConfig::default()
        };
        let image = maze.render(&config).unwrap();

        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*image.get_pixel(1, 1), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn save_maze_image_writes_file() {
        let maze = Maze::sample()
            .annotated(Some(Coord::new(5, 6)), None, [true; 4])
            .unwrap();

        let output_path = "test_output_maze.png";
        save_maze_image(&maze, output_path, &MazeDrawingConfig::default()).unwrap();

        // Check that the file was created
        assert!(std::path::Path::new(output_path).exists());

        // Clean up the test file
        std::fs::remove_file(output_path).unwrap();
    }

    #[test]
    fn save_maze_image_rejects_incomplete_maze() {
        let maze = Maze::sample();
        let output_path = "test_output_incomplete.png";
        let err = save_maze_image(&maze, output_path, &MazeDrawingConfig::default()).unwrap_err();

        assert!(matches!(err, MazeError::IncompleteMaze));
        assert!(!std::path::Path::new(output_path).exists());
    }

    #[test]
    fn save_solution_frames_writes_one_frame_per_segment() {
        let maze = Maze::blank(5, 5).unwrap();
        // Two legs, each ending on a goal corner
        let segments = vec![
            vec![Coord::new(2, 2), Coord::new(2, 1), Coord::new(1, 1)],
            vec![Coord::new(2, 2), Coord::new(2, 3), Coord::new(3, 3)],
        ];

        let dir = std::env::temp_dir().join("mazeviz_solution_frames");
        std::fs::create_dir_all(&dir).unwrap();
        let dir = dir.to_str().unwrap();

        let config = MazeDrawingConfig {
            cell_size: 2,
            ..MazeDrawingConfig::default()
        };
        let written = save_solution_frames(&maze, &segments, dir, &config).unwrap();

        assert_eq!(written.len(), 2);
        for path in &written {
            assert!(std::path::Path::new(path).exists());
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn solution_segment_must_end_on_a_corner() {
        let maze = Maze::blank(5, 5).unwrap();
        let segments = vec![vec![Coord::new(2, 2)]];

        let dir = std::env::temp_dir().join("mazeviz_non_corner_frames");
        std::fs::create_dir_all(&dir).unwrap();
        let dir = dir.to_str().unwrap();

        let config = MazeDrawingConfig {
            cell_size: 2,
            ..MazeDrawingConfig::default()
        };
        let err = save_solution_frames(&maze, &segments, dir, &config).unwrap_err();

        assert!(matches!(err, MazeError::NotACorner { row: 2, col: 2 }));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_solution_segment_is_rejected() {
        let maze = Maze::blank(5, 5).unwrap();
        let segments: Vec<Vec<Coord>> = vec![vec![]];

        let err = save_solution_frames(
            &maze,
            &segments,
            "unused_dir",
            &MazeDrawingConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, MazeError::EmptySegment { index: 0 }));
    }
}
