//! Error types for maze construction and search setup.
//!
//! Every variant here is a configuration error: it is raised when a caller hands the core a
//! value that violates a precondition, and it names which precondition was violated. Search
//! outcomes, including an unreachable goal, are never errors.

use std::fmt;

use crate::grid::Cell;

/// Search endpoint that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The cell the search starts from.
    Start,
    /// The cell the search tries to reach.
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Errors raised by the maze core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Grid dimensions cannot hold the requested structure.
    InvalidDimensions {
        /// Requested width in cells.
        width: usize,
        /// Requested height in cells.
        height: usize,
        /// Which bound was violated.
        reason: &'static str,
    },

    /// A search endpoint lies outside the grid.
    OutOfBounds {
        /// Endpoint that was rejected.
        endpoint: Endpoint,
        /// The offending cell.
        cell: Cell,
        /// Grid width the cell was checked against.
        width: usize,
        /// Grid height the cell was checked against.
        height: usize,
    },

    /// A search endpoint sits on a wall.
    BlockedEndpoint {
        /// Endpoint that was rejected.
        endpoint: Endpoint,
        /// The offending cell.
        cell: Cell,
    },

    /// Textual grid could not be parsed.
    MalformedGrid {
        /// Zero-based row where parsing stopped.
        row: usize,
        /// Description of what's wrong with the row.
        reason: String,
    },

    /// Textual cell coordinate could not be parsed.
    MalformedCell {
        /// The input that failed to parse.
        input: String,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions {
                width,
                height,
                reason,
            } => write!(f, "invalid maze dimensions {width}x{height}: {reason}"),
            Self::OutOfBounds {
                endpoint,
                cell,
                width,
                height,
            } => write!(
                f,
                "{endpoint} cell {cell} is outside the {width}x{height} grid"
            ),
            Self::BlockedEndpoint { endpoint, cell } => {
                write!(f, "{endpoint} cell {cell} is a wall")
            }
            Self::MalformedGrid { row, reason } => {
                write!(f, "malformed grid at row {row}: {reason}")
            }
            Self::MalformedCell { input } => {
                write!(f, "malformed cell '{input}': expected two integers as `x,y`")
            }
        }
    }
}

impl std::error::Error for MazeError {}

/// Convenience alias for results carrying a [`MazeError`].
pub type Result<T> = std::result::Result<T, MazeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_endpoint() {
        let err = MazeError::BlockedEndpoint {
            endpoint: Endpoint::End,
            cell: Cell::new(2, 4),
        };

        assert_eq!(err.to_string(), "end cell (2, 4) is a wall");
    }

    #[test]
    fn test_display_out_of_bounds() {
        let err = MazeError::OutOfBounds {
            endpoint: Endpoint::Start,
            cell: Cell::new(9, 0),
            width: 5,
            height: 5,
        };

        assert_eq!(err.to_string(), "start cell (9, 0) is outside the 5x5 grid");
    }

    #[test]
    fn test_display_invalid_dimensions() {
        let err = MazeError::InvalidDimensions {
            width: 2,
            height: 7,
            reason: "width must be at least 3",
        };

        assert_eq!(
            err.to_string(),
            "invalid maze dimensions 2x7: width must be at least 3"
        );
    }
}
