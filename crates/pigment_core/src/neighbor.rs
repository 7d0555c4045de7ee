//! Spatial context lookup for short-range and long-range processes.
//!
//! Short-range events read a uniformly chosen adjacent site (4- or
//! 8-connected). Long-range events read the site at distance `h` in a
//! uniformly random direction; rounding each axis to the nearest integer
//! turns the circle into a discrete ring whose shape depends on `h`.

use crate::cell::CellState;
use crate::lattice::{Lattice, Location};
use crate::rng::SimRng;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Offsets (row, col) of the von Neumann neighborhood: up, down, left, right.
const VON_NEUMANN: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Offsets of the Moore neighborhood: von Neumann first, then the diagonals.
const MOORE: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Short-range neighborhood shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "i64")]
pub enum Connectivity {
    /// Up, down, left, right.
    #[default]
    VonNeumann,
    /// Von Neumann plus the four diagonals.
    Moore,
}

impl Connectivity {
    /// Resolve a neighbor count. Anything other than 8 yields the 4-connected
    /// default.
    pub fn from_count(count: i64) -> Self {
        match count {
            8 => Connectivity::Moore,
            4 => Connectivity::VonNeumann,
            other => {
                tracing::warn!(
                    requested = other,
                    "unsupported neighbor count, using 4-connected neighborhood"
                );
                Connectivity::VonNeumann
            }
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Connectivity::VonNeumann => 4,
            Connectivity::Moore => 8,
        }
    }

    /// Neighbor offsets in selection order.
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::VonNeumann => &VON_NEUMANN,
            Connectivity::Moore => &MOORE,
        }
    }
}

impl From<Connectivity> for i64 {
    fn from(c: Connectivity) -> i64 {
        i64::from(c.count())
    }
}

/// Reads any integer neighbor count; unsupported counts resolve through
/// [`Connectivity::from_count`].
impl<'de> Deserialize<'de> for Connectivity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountVisitor;

        impl Visitor<'_> for CountVisitor {
            type Value = Connectivity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer neighbor count")
            }

            fn visit_i64<E: de::Error>(self, count: i64) -> Result<Connectivity, E> {
                Ok(Connectivity::from_count(count))
            }

            fn visit_u64<E: de::Error>(self, count: u64) -> Result<Connectivity, E> {
                Ok(Connectivity::from_count(i64::try_from(count).unwrap_or(i64::MAX)))
            }
        }

        deserializer.deserialize_i64(CountVisitor)
    }
}

/// Resolves the neighbor or long-range point an event reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborLocator {
    connectivity: Connectivity,
    h: f64,
}

impl NeighborLocator {
    pub fn new(connectivity: Connectivity, h: f64) -> Self {
        Self { connectivity, h }
    }

    /// Pick one short-range neighbor of `loc` uniformly, wrapped onto the
    /// lattice.
    pub fn nearest_neighbor_location(
        &self,
        lattice: &Lattice,
        loc: Location,
        rng: &mut dyn SimRng,
    ) -> Location {
        let offsets = self.connectivity.offsets();
        let (dr, dc) = offsets[rng.next_usize_max(offsets.len())];
        lattice.wrap(loc.row as isize + dr, loc.col as isize + dc)
    }

    /// State of a uniformly chosen short-range neighbor of `loc`.
    pub fn nearest_neighbor(
        &self,
        lattice: &Lattice,
        loc: Location,
        rng: &mut dyn SimRng,
    ) -> CellState {
        lattice.at(self.nearest_neighbor_location(lattice, loc, rng))
    }

    /// Location at distance `h` from `loc` in a uniformly random direction.
    pub fn long_range_location(
        &self,
        lattice: &Lattice,
        loc: Location,
        rng: &mut dyn SimRng,
    ) -> Location {
        ring_point(lattice, loc, self.h, rng.next_angle())
    }

    /// State of the site at distance `h` from `loc` in a random direction.
    pub fn long_range_point(
        &self,
        lattice: &Lattice,
        loc: Location,
        rng: &mut dyn SimRng,
    ) -> CellState {
        lattice.at(self.long_range_location(lattice, loc, rng))
    }
}

/// Site at distance `h` from `loc` along `angle` (cosine on rows, sine on
/// columns). Each axis is rounded half-to-even, then wrapped independently.
pub fn ring_point(lattice: &Lattice, loc: Location, h: f64, angle: f64) -> Location {
    let row = (loc.row as f64 + h * angle.cos()).round_ties_even() as isize;
    let col = (loc.col as f64 + h * angle.sin()).round_ties_even() as isize;
    lattice.wrap(row, col)
}
