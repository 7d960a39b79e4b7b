//! Type definitions for the application state.

/// Stage of the maze session shown on screen.
///
/// This enumeration holds information about what the application is currently doing. It is used
/// to decide which algorithm advances on each animation tick and which key presses are honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Maze carving in progress.
    ///
    /// This variant represents the generator being stepped; solving requests are ignored until it
    /// completes.
    Generating,
    /// Finished maze awaiting endpoints.
    ///
    /// This variant represents the user placing the start and end cells before a search.
    Editing,
    /// Search in progress.
    ///
    /// This variant represents the pathfinder being stepped and its snapshots being rendered.
    Solving,
    /// Search complete.
    ///
    /// This variant represents a finished search whose final path stays on screen.
    Solved,
}

impl Phase {
    /// Returns the string representation of the phase.
    ///
    /// This function provides the display name for each phase, used as the title of the status
    /// bar when rendering the interface.
    pub(crate) const fn repr(self) -> &'static str {
        match self {
            Self::Generating => "Generating",
            Self::Editing => "Place endpoints",
            Self::Solving => "Solving",
            Self::Solved => "Solved",
        }
    }

    /// Returns the key bindings that are meaningful in this phase.
    ///
    /// This function provides the hint rendered in the bottom border of the status bar.
    pub(crate) const fn help(self) -> &'static str {
        match self {
            Self::Generating | Self::Solving => "(f) skip / (space) new maze / (q) quit",
            Self::Editing | Self::Solved => {
                "(hjkl) move / (s) start / (e) end / (enter) solve / (space) new maze / (q) quit"
            }
        }
    }

    /// Whether an algorithm is being stepped in this phase.
    pub(crate) const fn is_animating(self) -> bool {
        matches!(self, Self::Generating | Self::Solving)
    }
}
