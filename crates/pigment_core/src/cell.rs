//! Cell states held by each lattice site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single lattice site.
///
/// The set is closed: a site is always exactly one of these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// No pigment cell occupies the site.
    #[default]
    Empty,
    /// Yellow pigment cell.
    Xanthophore,
    /// Black pigment cell.
    Melanophore,
}

impl CellState {
    /// All states, in code order (`S`, `X`, `M`).
    pub const ALL: [CellState; 3] = [
        CellState::Empty,
        CellState::Xanthophore,
        CellState::Melanophore,
    ];

    /// One-character code used in text dumps.
    pub fn code(self) -> char {
        match self {
            CellState::Empty => 'S',
            CellState::Xanthophore => 'X',
            CellState::Melanophore => 'M',
        }
    }

    /// Parse a one-character code. Returns `None` for anything else.
    pub fn from_code(ch: char) -> Option<Self> {
        match ch {
            'S' => Some(CellState::Empty),
            'X' => Some(CellState::Xanthophore),
            'M' => Some(CellState::Melanophore),
            _ => None,
        }
    }

    /// Whether the site holds a pigment cell of either kind.
    #[inline]
    pub fn is_occupied(self) -> bool {
        self != CellState::Empty
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
