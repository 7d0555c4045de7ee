//! Transition rules, one per elementary process.
//!
//! Every rule is a pure function of the well's current state and whatever
//! context its event reads. When the precondition does not hold the rule
//! returns the well unchanged.

use crate::cell::CellState;
use crate::rates::EventType;

/// Empty well becomes a xanthophore.
#[inline]
pub fn birth_xanthophore(well: CellState) -> CellState {
    match well {
        CellState::Empty => CellState::Xanthophore,
        other => other,
    }
}

/// Empty well without an iridophore becomes a melanophore.
#[inline]
pub fn birth_melanophore(well: CellState, iridophore: bool) -> CellState {
    match well {
        CellState::Empty if !iridophore => CellState::Melanophore,
        other => other,
    }
}

#[inline]
pub fn death_xanthophore(well: CellState) -> CellState {
    match well {
        CellState::Xanthophore => CellState::Empty,
        other => other,
    }
}

#[inline]
pub fn death_melanophore(well: CellState) -> CellState {
    match well {
        CellState::Melanophore => CellState::Empty,
        other => other,
    }
}

/// Xanthophore well next to a melanophore dies.
#[inline]
pub fn kill_by_melanophore(well: CellState, neighbor: CellState) -> CellState {
    match (well, neighbor) {
        (CellState::Xanthophore, CellState::Melanophore) => CellState::Empty,
        (other, _) => other,
    }
}

/// Melanophore well next to a xanthophore dies.
#[inline]
pub fn kill_by_xanthophore(well: CellState, neighbor: CellState) -> CellState {
    match (well, neighbor) {
        (CellState::Melanophore, CellState::Xanthophore) => CellState::Empty,
        (other, _) => other,
    }
}

/// Empty well without an iridophore becomes a melanophore when the point at
/// distance h holds a xanthophore.
#[inline]
pub fn long_range_activation(well: CellState, point: CellState, iridophore: bool) -> CellState {
    match (well, point) {
        (CellState::Empty, CellState::Xanthophore) if !iridophore => CellState::Melanophore,
        (other, _) => other,
    }
}

impl EventType {
    /// Whether the event can change a well in this state at all, ignoring
    /// spatial context. Lets the loop skip neighbor draws that could only
    /// lead to the identity.
    pub fn may_fire(self, well: CellState, iridophore: bool) -> bool {
        match self {
            EventType::BirthXanthophore => well == CellState::Empty,
            EventType::BirthMelanophore | EventType::LongRangeActivation => {
                well == CellState::Empty && !iridophore
            }
            EventType::DeathXanthophore | EventType::KillByMelanophore => {
                well == CellState::Xanthophore
            }
            EventType::DeathMelanophore | EventType::KillByXanthophore => {
                well == CellState::Melanophore
            }
        }
    }
}

/// Dispatch `event` to its rule.
///
/// `sampled` is the neighbor or long-range point state for events that read
/// one; it is ignored by the others. A context event given `None` leaves the
/// well unchanged.
pub fn apply(
    event: EventType,
    well: CellState,
    iridophore: bool,
    sampled: Option<CellState>,
) -> CellState {
    match event {
        EventType::BirthXanthophore => birth_xanthophore(well),
        EventType::BirthMelanophore => birth_melanophore(well, iridophore),
        EventType::DeathXanthophore => death_xanthophore(well),
        EventType::DeathMelanophore => death_melanophore(well),
        EventType::KillByMelanophore => match sampled {
            Some(neighbor) => kill_by_melanophore(well, neighbor),
            None => well,
        },
        EventType::KillByXanthophore => match sampled {
            Some(neighbor) => kill_by_xanthophore(well, neighbor),
            None => well,
        },
        EventType::LongRangeActivation => match sampled {
            Some(point) => long_range_activation(well, point, iridophore),
            None => well,
        },
    }
}
