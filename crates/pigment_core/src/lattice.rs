//! Toroidal lattice of cell states and its iridophore mask.
//!
//! Both grids are stored row-major (`index = row * cols + col`). Every
//! coordinate accepted by the public accessors is signed and wraps around
//! both axes, so any `(row, col)` pair addresses exactly one site.

use crate::cell::CellState;

/// A row/column position inside the lattice bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Shared torus geometry for the lattice and the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Torus {
    rows: usize,
    cols: usize,
}

impl Torus {
    /// Wrap a signed coordinate pair onto the torus.
    #[inline]
    fn wrap(&self, row: isize, col: isize) -> Location {
        Location {
            row: row.rem_euclid(self.rows as isize) as usize,
            col: col.rem_euclid(self.cols as isize) as usize,
        }
    }

    #[inline]
    fn index(&self, row: isize, col: isize) -> usize {
        let loc = self.wrap(row, col);
        loc.row * self.cols + loc.col
    }

    fn len(&self) -> usize {
        self.rows * self.cols
    }
}

/// Population of each cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellCounts {
    pub empty: usize,
    pub xanthophore: usize,
    pub melanophore: usize,
}

impl CellCounts {
    /// Total number of sites counted.
    pub fn total(&self) -> usize {
        self.empty + self.xanthophore + self.melanophore
    }
}

/// A rows × cols toroidal grid of [`CellState`].
///
/// # Panics
/// Construction panics if either dimension is zero; callers building a
/// lattice from user input validate the config first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    torus: Torus,
    cells: Vec<CellState>,
}

impl Lattice {
    /// Create a lattice with every site `Empty`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, CellState::Empty)
    }

    /// Create a lattice with every site set to `state`.
    pub fn filled(rows: usize, cols: usize, state: CellState) -> Self {
        assert!(rows > 0 && cols > 0, "lattice dimensions must be positive");
        let torus = Torus { rows, cols };
        Self {
            torus,
            cells: vec![state; torus.len()],
        }
    }

    /// Build a lattice by evaluating `f(row, col)` for each site.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> CellState) -> Self {
        let mut lattice = Self::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                lattice.cells[row * cols + col] = f(row, col);
            }
        }
        lattice
    }

    /// Parse a lattice from lines of `S`/`X`/`M` codes. Whitespace is ignored.
    ///
    /// Returns `None` for ragged rows, unknown codes, or empty input.
    pub fn from_text(text: &str) -> Option<Self> {
        let rows: Vec<Vec<CellState>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(CellState::from_code).collect::<Option<Vec<_>>>())
            .collect::<Option<Vec<_>>>()?;

        let cols = rows.first()?.len();
        if cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        Some(Self {
            torus: Torus { rows: n_rows, cols },
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.torus.rows, self.torus.cols)
    }

    pub fn rows(&self) -> usize {
        self.torus.rows
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// State at `(row, col)`, wrapping both coordinates.
    #[inline]
    pub fn get(&self, row: isize, col: isize) -> CellState {
        self.cells[self.torus.index(row, col)]
    }

    /// State at an in-bounds location.
    #[inline]
    pub fn at(&self, loc: Location) -> CellState {
        self.cells[loc.row * self.torus.cols + loc.col]
    }

    /// Set the state at `(row, col)`, wrapping both coordinates.
    #[inline]
    pub fn set(&mut self, row: isize, col: isize, state: CellState) {
        let idx = self.torus.index(row, col);
        self.cells[idx] = state;
    }

    /// Set the state at an in-bounds location.
    #[inline]
    pub fn set_at(&mut self, loc: Location, state: CellState) {
        let cols = self.torus.cols;
        self.cells[loc.row * cols + loc.col] = state;
    }

    /// Wrap a signed coordinate pair onto this lattice.
    #[inline]
    pub fn wrap(&self, row: isize, col: isize) -> Location {
        self.torus.wrap(row, col)
    }

    /// Row-major view of all sites.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterate over `(location, state)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Location, CellState)> + '_ {
        let cols = self.torus.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &s)| (Location::new(i / cols, i % cols), s))
    }

    /// Count sites in each state.
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for &cell in &self.cells {
            match cell {
                CellState::Empty => counts.empty += 1,
                CellState::Xanthophore => counts.xanthophore += 1,
                CellState::Melanophore => counts.melanophore += 1,
            }
        }
        counts
    }

    /// One line of `S`/`X`/`M` codes per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.len() + self.rows());
        for row in self.cells.chunks(self.torus.cols) {
            out.extend(row.iter().map(|c| c.code()));
            out.push('\n');
        }
        out
    }
}

/// Fixed per-site markers that forbid melanophore formation.
///
/// There is no way to change an entry after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IridophoreMask {
    torus: Torus,
    cells: Vec<bool>,
}

impl IridophoreMask {
    /// A mask with no iridophores.
    pub fn clear(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| false)
    }

    /// Build a mask by evaluating `f(row, col)` for each site.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        assert!(rows > 0 && cols > 0, "mask dimensions must be positive");
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Self {
            torus: Torus { rows, cols },
            cells,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.torus.rows, self.torus.cols)
    }

    /// Whether `(row, col)` carries an iridophore, wrapping both coordinates.
    #[inline]
    pub fn is_iridophore(&self, row: isize, col: isize) -> bool {
        self.cells[self.torus.index(row, col)]
    }

    /// Whether an in-bounds location carries an iridophore.
    #[inline]
    pub fn at(&self, loc: Location) -> bool {
        self.cells[loc.row * self.torus.cols + loc.col]
    }

    /// Number of marked sites.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&b| b).count()
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }
}
