//! User interface rendering for the maze and its status bar.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, DOT},
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    generator::MazeGenerator,
    grid::{Cell, Grid},
    App,
};

/// Updates the application UI based on the persistent state.
///
/// This function renders the maze being carved or solved, centered in the terminal, with a status
/// bar underneath describing the current phase.
///
/// # Errors
///
/// This function may return errors from layout retrieval or coordinate conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Maze and padding area
        Constraint::Length(3), // Status bar
    ])
    .split(frame.area());

    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    maze(app, frame, maze_content_area)?;
    status_bar(app, frame, status_area);

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the maze with the search overlay, start, end and cursor markers.
///
/// This function paints every category of cell on its own [`Canvas`] layer so that later layers
/// (the path, the endpoints, the cursor) always win over earlier ones (walls, visited cells).
///
/// # Errors
///
/// This function may return errors from layout retrieval or coordinate conversion failures.
pub(crate) fn maze(app: &App, frame: &mut Frame, area: Rect) -> Result<()> {
    let grid = app.grid();
    let maze_rows = u16::try_from(grid.height())?;
    let maze_columns = u16::try_from(grid.width())?;

    let rows = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(maze_rows),
        Constraint::Min(1),
    ])
    .split(area);
    let maze_area = rows.get(1).ok_or_eyre("failed to get maze area from layout")?;

    let space = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(maze_columns),
        Constraint::Min(1),
    ])
    .split(*maze_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze space from horizontal layout")?;

    // Pre-compute screen coordinates to handle errors before closures
    let walls: Vec<Cell> = grid.cells().filter(|cell| !grid.is_open(*cell)).collect();
    let wall_coords = transform_to_screen_coords(&walls, grid)?;

    let (visited, frontier, path) = app.pathfinder.as_ref().map_or_else(
        || (Vec::new(), Vec::new(), Vec::new()),
        |pathfinder| {
            let snapshot = pathfinder.snapshot();
            (
                snapshot.visited().iter().copied().collect(),
                snapshot.frontier().into_iter().collect(),
                snapshot.path().map(<[Cell]>::to_vec).unwrap_or_default(),
            )
        },
    );
    let visited_coords = transform_to_screen_coords(&visited, grid)?;
    let frontier_coords = transform_to_screen_coords(&frontier, grid)?;
    let path_coords = transform_to_screen_coords(&path, grid)?;

    let head = app.generator.as_ref().and_then(MazeGenerator::head);
    let head_coords = transform_to_screen_coords(head.as_slice(), grid)?;
    let start_coords = transform_to_screen_coords(app.start.as_slice(), grid)?;
    let end_coords = transform_to_screen_coords(app.end.as_slice(), grid)?;
    let cursor_coords = if app.phase.is_animating() {
        Vec::new()
    } else {
        transform_to_screen_coords(&[app.cursor], grid)?
    };

    let layers = [
        (&wall_coords, Color::Green),
        (&visited_coords, Color::DarkGray),
        (&frontier_coords, Color::Magenta),
        (&path_coords, Color::Blue),
        (&head_coords, Color::Cyan),
        (&start_coords, Color::Yellow),
        (&end_coords, Color::Red),
        (&cursor_coords, Color::White),
    ];

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Block)
        .paint(|ctx| {
            for (coords, color) in &layers {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
                ctx.layer();
            }
        });

    frame.render_widget(canvas, space);

    Ok(())
}

/// Renders the status bar with the phase, seed, step counter and latest message.
pub(crate) fn status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::bordered()
        .title(app.phase.repr())
        .title_bottom(app.phase.help())
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP | Borders::BOTTOM);

    let inner_space = block.inner(area);
    frame.render_widget(block, area);

    let seed = app
        .seed
        .map_or_else(|| "custom rng".to_owned(), |seed| format!("seed {seed}"));
    let line = Line::raw(format!(
        "{seed} {DOT} {} steps {DOT} {}",
        app.steps, app.status
    ))
    .centered();

    frame.render_widget(line, inner_space);
}

/// Transforms grid cells to canvas coordinates.
///
/// This function converts cell coordinates (col, row) to canvas coordinates (x, y) using the
/// standard transformation formulas: coordinate[i] = (n - 1) / 2 - i for rows (ascending order) and
/// coordinate[i] = i - (n - 1) / 2 for columns (descending order).
///
/// # Errors
///
/// This function may return errors if the grid or a cell does not fit the terminal's coordinate
/// range.
pub(crate) fn transform_to_screen_coords(cells: &[Cell], grid: &Grid) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(grid.height())?);
    let cols_n = f64::from(u16::try_from(grid.width())?);

    cells
        .iter()
        .map(|cell| {
            // Row transformation: coordinate[i] = (n - 1) / 2 - i
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(cell.y)?);

            // Column transformation: coordinate[i] = i - (n - 1) / 2
            let screen_x = f64::from(u16::try_from(cell.x)?) - (cols_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, time::Duration};

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{config::Settings, generator::ORIGIN};

    /// Creates a seeded 11x9 test app.
    fn create_test_app(animate: bool, start: Option<Cell>, end: Option<Cell>) -> App {
        App::new(Settings {
            width: 11,
            height: 9,
            seed: Some(5),
            tick: Duration::ZERO,
            steps_per_tick: NonZeroUsize::MIN,
            animate,
            start,
            end,
        })
        .expect("test settings are valid")
    }

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Concatenates every symbol of the rendered buffer.
    fn rendered_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_draw_while_generating() {
        let app = create_test_app(true, None, None);
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing generation should succeed");
        let text = rendered_text(&terminal);
        assert!(text.contains("Generating"));
        assert!(text.contains("seed 5"));
    }

    #[test]
    fn test_draw_solved_maze() {
        let app = create_test_app(false, Some(ORIGIN), Some(Cell::new(9, 7)));
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing a solved maze should succeed");
        assert!(rendered_text(&terminal).contains("Path of"));
    }

    #[test]
    fn test_draw_mid_search() {
        let mut app = create_test_app(false, None, None);
        app.start = Some(ORIGIN);
        app.end = Some(Cell::new(9, 7));
        app.settings.animate = true;
        app.begin_solving().expect("search starts");
        app.tick().expect("tick succeeds");
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing a running search should succeed");
        assert!(rendered_text(&terminal).contains("Solving"));
    }

    #[test]
    fn test_draw_in_tiny_terminal() {
        let app = create_test_app(false, None, None);
        let mut terminal =
            Terminal::new(TestBackend::new(8, 4)).expect("failed to create test terminal");

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "a cramped terminal clips instead of failing");
    }

    #[test]
    fn test_clear_function() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            clear(frame);
        });

        assert!(result.is_ok(), "clearing screen should succeed");
    }

    #[test]
    fn test_transform_to_screen_coords() {
        let grid = Grid::walled(3, 5).expect("dimensions are valid");

        let coords = transform_to_screen_coords(
            &[Cell::new(0, 0), Cell::new(1, 2), Cell::new(2, 4)],
            &grid,
        )
        .expect("cells fit the coordinate range");

        assert_eq!(coords, vec![(-1.0, 2.0), (0.0, 0.0), (1.0, -2.0)]);
    }

    #[test]
    fn test_transform_rejects_oversized_cells() {
        let grid = Grid::walled(3, 3).expect("dimensions are valid");

        assert!(transform_to_screen_coords(&[Cell::new(70_000, 0)], &grid).is_err());
    }
}
