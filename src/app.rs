//! Core application state and logic for the maze animator.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use log::debug;
use ratatui::DefaultTerminal;

use crate::{
    animation::AnimationClock,
    config::Settings,
    error::Endpoint,
    events,
    generator::{MazeGenerator, ORIGIN},
    grid::{Cell, Grid},
    pathfinding::Pathfinder,
    types::Phase,
    ui,
};

/// Application state container for the maze animator.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the maze and Crossterm events will help writing to. It drives the
/// generator while a maze is being carved and the pathfinder while it is being solved, and never
/// lets the two run at the same time.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Validated configuration the session runs with.
    pub(crate) settings: Settings,
    /// Current stage of the session.
    ///
    /// This field is used to determine which algorithm advances on each tick and what actions to
    /// take based on user input.
    pub(crate) phase: Phase,
    /// Generator carving the current maze.
    ///
    /// This field is only populated while the maze is being generated; once carving completes the
    /// generator is consumed and its grid moves into [`grid`](App::grid).
    pub(crate) generator: Option<MazeGenerator>,
    /// Most recently completed maze.
    ///
    /// This field is shared with the pathfinder, which only ever reads it.
    pub(crate) grid: Rc<Grid>,
    /// Seed of the maze on screen.
    pub(crate) seed: Option<u64>,
    /// Whether the configured seed has already been used.
    ///
    /// This field makes the first maze reproducible from the command line while later
    /// regenerations still produce fresh mazes.
    pub(crate) seed_consumed: bool,
    /// Cell under the selection cursor.
    pub(crate) cursor: Cell,
    /// Start cell chosen by the user.
    pub(crate) start: Option<Cell>,
    /// End cell chosen by the user.
    pub(crate) end: Option<Cell>,
    /// Search over the current maze, if one was started.
    pub(crate) pathfinder: Option<Pathfinder>,
    /// Animation pacing for both algorithms.
    pub(crate) clock: AnimationClock,
    /// Steps taken by the algorithm of the current phase.
    pub(crate) steps: usize,
    /// Latest message for the status bar.
    pub(crate) status: String,
}

impl App {
    /// Creates a new application and starts carving the first maze.
    ///
    /// # Errors
    ///
    /// This function may return errors if the configured dimensions cannot hold a maze.
    pub fn new(settings: Settings) -> Result<Self> {
        let clock = AnimationClock::new(settings.tick, settings.steps_per_tick);
        let mut app = Self {
            exit: false,
            grid: Rc::new(Grid::walled(settings.width, settings.height)?),
            settings,
            phase: Phase::Generating,
            generator: None,
            seed: None,
            seed_consumed: false,
            cursor: ORIGIN,
            start: None,
            end: None,
            pathfinder: None,
            clock,
            steps: 0,
            status: String::new(),
        };
        app.regenerate()?;

        Ok(app)
    }

    /// Runs the main loop of the application.
    ///
    /// This function draws the current state, handles user input and advances the running
    /// algorithm. The loop continues until the exit condition is `true`, after which the function
    /// returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Grid to render: the one being carved, or the last finished one.
    pub(crate) fn grid(&self) -> &Grid {
        self.generator
            .as_ref()
            .map_or(self.grid.as_ref(), MazeGenerator::grid)
    }

    /// Discards the current maze and search, and starts carving a new maze.
    ///
    /// Endpoints placed with the cursor are dropped. Preset endpoints from the settings are put
    /// back, so the new maze is solved between them as soon as it is carved.
    ///
    /// # Errors
    ///
    /// This function may return errors if the configured dimensions cannot hold a maze.
    pub(crate) fn regenerate(&mut self) -> Result<()> {
        let generator = match self.settings.seed {
            Some(seed) if !self.seed_consumed => {
                MazeGenerator::with_seed(self.settings.width, self.settings.height, seed)?
            }
            _ => MazeGenerator::new(self.settings.width, self.settings.height)?,
        };
        self.seed_consumed = true;
        self.seed = generator.seed();
        debug!("regenerating maze with seed {:?}", self.seed);

        self.generator = Some(generator);
        self.pathfinder = None;
        self.start = self.settings.start;
        self.end = self.settings.end;
        self.phase = Phase::Generating;
        self.steps = 0;
        self.status = "Carving a new maze".to_owned();
        self.clock.reset();

        if !self.settings.animate {
            self.fast_forward()?;
        }

        Ok(())
    }

    /// Advances the running algorithm if the animation clock allows it.
    ///
    /// # Errors
    ///
    /// This function may return errors if a finished phase cannot hand over to the next one.
    pub(crate) fn tick(&mut self) -> Result<()> {
        if self.phase.is_animating() && self.clock.due() {
            self.advance(self.clock.steps_per_tick.get())?;
        }

        Ok(())
    }

    /// Runs the algorithm of the current phase until it completes.
    ///
    /// # Errors
    ///
    /// This function may return errors if a finished phase cannot hand over to the next one.
    pub(crate) fn fast_forward(&mut self) -> Result<()> {
        while self.phase.is_animating() {
            self.advance(usize::MAX)?;
        }

        Ok(())
    }

    /// Performs up to `budget` steps of the algorithm of the current phase.
    fn advance(&mut self, budget: usize) -> Result<()> {
        match self.phase {
            Phase::Generating => {
                let generator = self
                    .generator
                    .as_mut()
                    .ok_or_eyre("failed to retrieve the running maze generator")?;
                let mut taken = 0;
                while taken < budget && generator.step().is_some() {
                    taken += 1;
                }
                self.steps += taken;
                if generator.is_finished() {
                    self.finish_generation()?;
                }
            }
            Phase::Solving => {
                let pathfinder = self
                    .pathfinder
                    .as_mut()
                    .ok_or_eyre("failed to retrieve the running search")?;
                let mut taken = 0;
                while taken < budget && pathfinder.step().is_some() {
                    taken += 1;
                }
                self.steps += taken;
                if pathfinder.is_finished() {
                    self.finish_search();
                }
            }
            Phase::Editing | Phase::Solved => {}
        }

        Ok(())
    }

    /// Moves the carved grid out of the generator and waits for endpoints.
    fn finish_generation(&mut self) -> Result<()> {
        let generator = self
            .generator
            .take()
            .ok_or_eyre("failed to retrieve the finished maze generator")?;
        self.grid = Rc::new(generator.into_grid());
        self.phase = Phase::Editing;
        self.status = format!("Maze ready after {} steps", self.steps);

        if self.start.is_some() && self.end.is_some() {
            self.begin_solving()?;
        }

        Ok(())
    }

    /// Records the final path in the status bar.
    fn finish_search(&mut self) {
        self.phase = Phase::Solved;
        let (visited, length) = self.pathfinder.as_ref().map_or((0, 0), |pathfinder| {
            (
                pathfinder.snapshot().visited().len(),
                pathfinder.path().map_or(0, <[Cell]>::len),
            )
        });
        self.status = if length == 0 {
            format!("No path exists ({visited} cells explored)")
        } else {
            format!("Path of {length} cells found ({visited} cells explored)")
        };
    }

    /// Starts a search between the chosen endpoints.
    ///
    /// Requests made while the maze is still being carved, or before both endpoints are placed,
    /// only update the status bar.
    ///
    /// # Errors
    ///
    /// This function may return errors if the search finishes instantly and cannot hand over.
    pub(crate) fn begin_solving(&mut self) -> Result<()> {
        if self.phase == Phase::Generating {
            self.status = "Wait for the maze to finish".to_owned();
            return Ok(());
        }
        let (Some(start), Some(end)) = (self.start, self.end) else {
            self.status = "Place both a start (s) and an end (e) first".to_owned();
            return Ok(());
        };

        match Pathfinder::new(Rc::clone(&self.grid), start, end) {
            Ok(pathfinder) => {
                self.pathfinder = Some(pathfinder);
                self.phase = Phase::Solving;
                self.steps = 0;
                self.status = format!("Searching from {start} to {end}");
                self.clock.reset();
                if !self.settings.animate {
                    self.fast_forward()?;
                }
            }
            Err(err) => self.status = err.to_string(),
        }

        Ok(())
    }

    /// Moves the cursor by `(dx, dy)`, staying inside the grid.
    pub(crate) fn move_cursor(&mut self, dx: isize, dy: isize) {
        let width = self.grid().width();
        let height = self.grid().height();
        if let Some(next) = self.cursor.offset(dx, dy) {
            if next.x < width && next.y < height {
                self.cursor = next;
            }
        }
    }

    /// Places `endpoint` under the cursor.
    ///
    /// Placement is refused while carving and on walls. Moving an endpoint clears any previous
    /// search result.
    pub(crate) fn place(&mut self, endpoint: Endpoint) {
        if self.phase == Phase::Generating {
            self.status = "Wait for the maze to finish".to_owned();
            return;
        }
        if !self.grid.is_open(self.cursor) {
            self.status = format!("Cannot place the {endpoint} on a wall");
            return;
        }

        match endpoint {
            Endpoint::Start => self.start = Some(self.cursor),
            Endpoint::End => self.end = Some(self.cursor),
        }
        self.pathfinder = None;
        self.phase = Phase::Editing;
        self.status = format!("{endpoint} set to {}", self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, time::Duration};

    use super::*;
    use crate::generator::farthest_room;

    /// Settings for a small, seeded, instantly ticking session.
    fn test_settings() -> Settings {
        Settings {
            width: 11,
            height: 9,
            seed: Some(17),
            tick: Duration::ZERO,
            steps_per_tick: NonZeroUsize::MIN,
            animate: true,
            start: None,
            end: None,
        }
    }

    /// Creates a test app for the given settings.
    fn create_test_app(settings: Settings) -> App {
        App::new(settings).expect("test settings are valid")
    }

    #[test]
    fn test_new_app_starts_generating() {
        let app = create_test_app(test_settings());

        assert_eq!(app.phase, Phase::Generating);
        assert_eq!(app.seed, Some(17));
        assert!(app.generator.is_some());
        assert_eq!(app.grid().open_cells().count(), 1);
    }

    #[test]
    fn test_tick_advances_one_step_at_a_time() {
        let mut app = create_test_app(test_settings());

        app.tick().expect("tick succeeds");
        assert_eq!(app.steps, 1);
        assert_eq!(app.grid().open_cells().count(), 3);
    }

    #[test]
    fn test_generation_hands_over_to_editing() {
        let mut app = create_test_app(test_settings());
        app.fast_forward().expect("generation completes");

        assert_eq!(app.phase, Phase::Editing);
        assert!(app.generator.is_none());
        assert_eq!(app.steps, 2 * 20 - 1, "a 5x4 room lattice takes 39 steps");
        assert_eq!(*app.grid, crate::generator::generate(11, 9, 17).expect("valid"));
    }

    #[test]
    fn test_solving_is_deferred_while_generating() {
        let mut app = create_test_app(test_settings());
        app.start = Some(ORIGIN);
        app.end = Some(farthest_room(11, 9));

        app.begin_solving().expect("request is handled");

        assert_eq!(app.phase, Phase::Generating);
        assert!(app.pathfinder.is_none());
    }

    #[test]
    fn test_solving_requires_both_endpoints() {
        let mut app = create_test_app(test_settings());
        app.fast_forward().expect("generation completes");
        app.start = Some(ORIGIN);

        app.begin_solving().expect("request is handled");

        assert_eq!(app.phase, Phase::Editing);
        assert!(app.status.contains("Place both"));
    }

    #[test]
    fn test_place_refuses_walls() {
        let mut app = create_test_app(test_settings());
        app.fast_forward().expect("generation completes");
        app.cursor = Cell::new(0, 0);

        app.place(Endpoint::Start);

        assert_eq!(app.start, None);
        assert_eq!(app.status, "Cannot place the start on a wall");
    }

    #[test]
    fn test_full_session_finds_a_path() {
        let mut app = create_test_app(test_settings());
        app.fast_forward().expect("generation completes");

        app.cursor = ORIGIN;
        app.place(Endpoint::Start);
        app.cursor = farthest_room(11, 9);
        app.place(Endpoint::End);
        app.begin_solving().expect("search starts");
        assert_eq!(app.phase, Phase::Solving);

        app.fast_forward().expect("search completes");

        assert_eq!(app.phase, Phase::Solved);
        let path = app
            .pathfinder
            .as_ref()
            .and_then(Pathfinder::path)
            .expect("search finished");
        assert_eq!(path.first(), Some(&ORIGIN));
        assert_eq!(path.last(), Some(&farthest_room(11, 9)));
        assert!(app.status.starts_with("Path of"));
    }

    #[test]
    fn test_preset_endpoints_without_animation_solve_immediately() {
        let settings = Settings {
            animate: false,
            start: Some(ORIGIN),
            end: Some(farthest_room(11, 9)),
            ..test_settings()
        };
        let app = create_test_app(settings);

        assert_eq!(app.phase, Phase::Solved);
        assert!(app
            .pathfinder
            .as_ref()
            .is_some_and(Pathfinder::is_finished));
    }

    #[test]
    fn test_moving_an_endpoint_clears_the_search() {
        let settings = Settings {
            animate: false,
            start: Some(ORIGIN),
            end: Some(farthest_room(11, 9)),
            ..test_settings()
        };
        let mut app = create_test_app(settings);
        app.cursor = Cell::new(3, 3);

        app.place(Endpoint::End);

        assert_eq!(app.phase, Phase::Editing);
        assert!(app.pathfinder.is_none());
        assert_eq!(app.end, Some(Cell::new(3, 3)));
    }

    #[test]
    fn test_regenerate_draws_a_fresh_seed() {
        let mut app = create_test_app(test_settings());
        app.fast_forward().expect("generation completes");

        app.regenerate().expect("regeneration succeeds");

        assert_eq!(app.phase, Phase::Generating);
        assert!(app.seed.is_some());
        assert!(app.start.is_none());
    }

    #[test]
    fn test_regenerate_reapplies_preset_endpoints() {
        let settings = Settings {
            start: Some(ORIGIN),
            end: Some(farthest_room(11, 9)),
            ..test_settings()
        };
        let mut app = create_test_app(settings);
        app.fast_forward().expect("generation and search complete");
        assert_eq!(app.phase, Phase::Solved);

        app.regenerate().expect("regeneration succeeds");

        assert_eq!(app.phase, Phase::Generating);
        assert!(app.pathfinder.is_none());
        assert_eq!(app.start, Some(ORIGIN));
        assert_eq!(app.end, Some(farthest_room(11, 9)));

        app.fast_forward().expect("generation and search complete");
        assert_eq!(app.phase, Phase::Solved);
    }

    #[test]
    fn test_cursor_stays_inside_grid() {
        let mut app = create_test_app(test_settings());
        app.cursor = Cell::new(0, 0);

        app.move_cursor(-1, 0);
        assert_eq!(app.cursor, Cell::new(0, 0));

        app.cursor = Cell::new(10, 8);
        app.move_cursor(1, 0);
        app.move_cursor(0, 1);
        assert_eq!(app.cursor, Cell::new(10, 8));

        app.move_cursor(-1, -1);
        assert_eq!(app.cursor, Cell::new(9, 7));
    }
}
