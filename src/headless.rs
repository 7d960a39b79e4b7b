//! Non-interactive mode that prints a solved maze as text.

use std::io::Write;

use color_eyre::eyre::Result;

use crate::{
    config::Settings,
    generator::{farthest_room, MazeGenerator, ORIGIN},
    grid::{Cell, Tile},
    pathfinding::astar,
};

/// Generates a maze, solves it and writes the result to `out`.
///
/// The first line names the seed, the maze follows with `#` for walls, `.` for open cells, `o`
/// for the path and `S`/`E` for the endpoints, and a last line reports the path length. Endpoints
/// default to the top-left room and the room farthest from it.
///
/// # Errors
///
/// This function may return errors if the settings describe an invalid maze or endpoint, or if
/// writing to `out` fails.
pub fn print_solution<W: Write>(settings: &Settings, out: &mut W) -> Result<Vec<Cell>> {
    let mut generator = match settings.seed {
        Some(seed) => MazeGenerator::with_seed(settings.width, settings.height, seed)?,
        None => MazeGenerator::new(settings.width, settings.height)?,
    };
    let _steps = generator.run_to_end();
    let seed = generator.seed();
    let grid = generator.into_grid();

    let start = settings.start.unwrap_or(ORIGIN);
    let end = settings
        .end
        .unwrap_or_else(|| farthest_room(settings.width, settings.height));
    let path = astar(grid.clone(), start, end)?;

    if let Some(seed) = seed {
        writeln!(out, "seed {seed}")?;
    }
    for y in 0..grid.height() {
        let row: String = (0..grid.width())
            .map(|x| {
                let cell = Cell::new(x, y);
                if cell == start {
                    'S'
                } else if cell == end {
                    'E'
                } else if path.contains(&cell) {
                    'o'
                } else {
                    grid.get(cell).map_or('#', Tile::symbol)
                }
            })
            .collect();
        writeln!(out, "{row}")?;
    }
    if path.is_empty() {
        writeln!(out, "no path from {start} to {end}")?;
    } else {
        writeln!(out, "path of {} cells from {start} to {end}", path.len())?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Seeded settings for a small maze.
    fn seeded(width: usize, height: usize) -> Settings {
        Settings {
            width,
            height,
            seed: Some(21),
            ..Settings::default()
        }
    }

    #[test]
    fn test_prints_seed_maze_and_summary() {
        let mut out = Vec::new();
        let path = print_solution(&seeded(9, 7), &mut out).expect("printing succeeds");
        let text = String::from_utf8(out).expect("output is utf-8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.first(), Some(&"seed 21"));
        assert_eq!(lines.len(), 1 + 7 + 1);
        assert_eq!(lines.get(1), Some(&"#########"));
        assert!(lines.get(2).is_some_and(|row| row.starts_with("#S")));
        assert!(lines.get(6).is_some_and(|row| row.ends_with("E#")));
        assert_eq!(
            lines.last().copied(),
            Some(format!("path of {} cells from (1, 1) to (7, 5)", path.len()).as_str())
        );
        let marked: usize = lines
            .iter()
            .skip(1)
            .take(7)
            .map(|row| row.matches('o').count())
            .sum();
        assert_eq!(marked, path.len() - 2);
    }

    #[test]
    fn test_same_seed_prints_the_same_maze() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        let _ = print_solution(&seeded(15, 11), &mut first).expect("printing succeeds");
        let _ = print_solution(&seeded(15, 11), &mut second).expect("printing succeeds");

        assert_eq!(first, second);
    }

    #[test]
    fn test_wall_endpoint_is_an_error() {
        let settings = Settings {
            end: Some(Cell::new(2, 2)),
            ..seeded(9, 7)
        };

        assert!(print_solution(&settings, &mut Vec::new()).is_err());
    }
}
