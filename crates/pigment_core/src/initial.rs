//! Standard initial conditions.
//!
//! Each constructor returns the starting lattice together with its
//! iridophore mask.

use crate::cell::CellState;
use crate::lattice::{IridophoreMask, Lattice, Location};
use crate::rng::SimRng;
use serde::{Deserialize, Serialize};

/// Which starting configuration to build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialCondition {
    /// All sites empty, no iridophores.
    #[default]
    Blank,
    /// All sites empty, with a horizontal band of iridophore rows centred
    /// vertically.
    IridophoreBand { bandwidth: usize },
    /// Each site independently empty, xanthophore or melanophore with equal
    /// odds; each site an iridophore with probability `iridophore_ratio`.
    Random { iridophore_ratio: f64 },
}

impl InitialCondition {
    /// Build the lattice and mask for this condition.
    pub fn build(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut dyn SimRng,
    ) -> (Lattice, IridophoreMask) {
        match *self {
            InitialCondition::Blank => blank(rows, cols),
            InitialCondition::IridophoreBand { bandwidth } => {
                iridophore_band(rows, cols, bandwidth)
            }
            InitialCondition::Random { iridophore_ratio } => {
                random_start(rows, cols, iridophore_ratio, rng)
            }
        }
    }
}

pub fn blank(rows: usize, cols: usize) -> (Lattice, IridophoreMask) {
    (Lattice::new(rows, cols), IridophoreMask::clear(rows, cols))
}

/// Empty lattice with `bandwidth` consecutive iridophore rows.
///
/// The band starts at row `floor((rows - bandwidth) / 2)` and wraps past the
/// bottom edge if it has to. A bandwidth of at least `rows` marks every row.
pub fn iridophore_band(rows: usize, cols: usize, bandwidth: usize) -> (Lattice, IridophoreMask) {
    let band = bandwidth.min(rows);
    let start = (rows as isize - band as isize).div_euclid(2);
    let mask = IridophoreMask::from_fn(rows, cols, |row, _| {
        let offset = (row as isize - start).rem_euclid(rows as isize) as usize;
        offset < band
    });
    (Lattice::new(rows, cols), mask)
}

/// Random occupancy with thirds split between the three states, plus an
/// independent random iridophore mask.
///
/// For each site `u < 1/3` gives a xanthophore and `u > 2/3` a melanophore.
/// All lattice draws happen before the mask draws. Melanophores drawn on an
/// iridophore site are left empty.
pub fn random_start(
    rows: usize,
    cols: usize,
    iridophore_ratio: f64,
    rng: &mut dyn SimRng,
) -> (Lattice, IridophoreMask) {
    let mut lattice = Lattice::from_fn(rows, cols, |_, _| {
        let u = rng.next_double();
        if u < 1.0 / 3.0 {
            CellState::Xanthophore
        } else if u > 2.0 / 3.0 {
            CellState::Melanophore
        } else {
            CellState::Empty
        }
    });
    let mask = IridophoreMask::from_fn(rows, cols, |_, _| rng.next_double() < iridophore_ratio);

    for row in 0..rows {
        for col in 0..cols {
            let loc = Location::new(row, col);
            if mask.at(loc) && lattice.at(loc) == CellState::Melanophore {
                lattice.set_at(loc, CellState::Empty);
            }
        }
    }
    (lattice, mask)
}
