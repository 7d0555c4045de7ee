//! Elementary processes and the rate model that weights them.
//!
//! Each of the seven rate constants maps to exactly one [`EventType`], and
//! each event type to exactly one transition rule. [`RateModel`] normalizes
//! the rates into a categorical distribution used by the event sampler.

use crate::error::RateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial context an event needs before its rule can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Rule reads only the well.
    None,
    /// Rule reads one random short-range neighbor.
    Neighbor,
    /// Rule reads one random point at distance h.
    LongRange,
}

/// An elementary process that may change the state of a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    BirthXanthophore,
    BirthMelanophore,
    DeathXanthophore,
    DeathMelanophore,
    /// A melanophore neighbor kills a xanthophore well.
    KillByMelanophore,
    /// A xanthophore neighbor kills a melanophore well.
    KillByXanthophore,
    /// A xanthophore at distance h turns an empty well melanophore.
    LongRangeActivation,
}

impl EventType {
    /// All event types, in rate order.
    pub const ALL: [EventType; 7] = [
        EventType::BirthXanthophore,
        EventType::BirthMelanophore,
        EventType::DeathXanthophore,
        EventType::DeathMelanophore,
        EventType::KillByMelanophore,
        EventType::KillByXanthophore,
        EventType::LongRangeActivation,
    ];

    /// Position of this event in [`EventType::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Which spatial context the event's rule reads.
    pub fn context(self) -> ContextKind {
        match self {
            EventType::KillByMelanophore | EventType::KillByXanthophore => ContextKind::Neighbor,
            EventType::LongRangeActivation => ContextKind::LongRange,
            _ => ContextKind::None,
        }
    }

    /// Short name used in logs and config keys.
    pub fn name(self) -> &'static str {
        match self {
            EventType::BirthXanthophore => "birth_xanthophore",
            EventType::BirthMelanophore => "birth_melanophore",
            EventType::DeathXanthophore => "death_xanthophore",
            EventType::DeathMelanophore => "death_melanophore",
            EventType::KillByMelanophore => "kill_by_melanophore",
            EventType::KillByXanthophore => "kill_by_xanthophore",
            EventType::LongRangeActivation => "long_range_activation",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven raw rate constants.
///
/// Defaults are the stripe-forming parameters of the reference model
/// (birth-X 1, short-range kills 1, long-range activation 2.5, rest 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConstants {
    pub birth_xanthophore: f64,
    pub birth_melanophore: f64,
    pub death_xanthophore: f64,
    pub death_melanophore: f64,
    pub kill_by_melanophore: f64,
    pub kill_by_xanthophore: f64,
    pub long_range_activation: f64,
}

impl Default for RateConstants {
    fn default() -> Self {
        Self {
            birth_xanthophore: 1.0,
            birth_melanophore: 0.0,
            death_xanthophore: 0.0,
            death_melanophore: 0.0,
            kill_by_melanophore: 1.0,
            kill_by_xanthophore: 1.0,
            long_range_activation: 2.5,
        }
    }
}

impl RateConstants {
    /// All rates zero. Useful as a base for struct-update syntax.
    pub fn zero() -> Self {
        Self {
            birth_xanthophore: 0.0,
            birth_melanophore: 0.0,
            death_xanthophore: 0.0,
            death_melanophore: 0.0,
            kill_by_melanophore: 0.0,
            kill_by_xanthophore: 0.0,
            long_range_activation: 0.0,
        }
    }

    /// Only `event` has a non-zero rate (1.0).
    pub fn only(event: EventType) -> Self {
        let mut rates = Self::zero();
        *rates.rate_mut(event) = 1.0;
        rates
    }

    /// The rate belonging to `event`.
    pub fn rate(&self, event: EventType) -> f64 {
        match event {
            EventType::BirthXanthophore => self.birth_xanthophore,
            EventType::BirthMelanophore => self.birth_melanophore,
            EventType::DeathXanthophore => self.death_xanthophore,
            EventType::DeathMelanophore => self.death_melanophore,
            EventType::KillByMelanophore => self.kill_by_melanophore,
            EventType::KillByXanthophore => self.kill_by_xanthophore,
            EventType::LongRangeActivation => self.long_range_activation,
        }
    }

    fn rate_mut(&mut self, event: EventType) -> &mut f64 {
        match event {
            EventType::BirthXanthophore => &mut self.birth_xanthophore,
            EventType::BirthMelanophore => &mut self.birth_melanophore,
            EventType::DeathXanthophore => &mut self.death_xanthophore,
            EventType::DeathMelanophore => &mut self.death_melanophore,
            EventType::KillByMelanophore => &mut self.kill_by_melanophore,
            EventType::KillByXanthophore => &mut self.kill_by_xanthophore,
            EventType::LongRangeActivation => &mut self.long_range_activation,
        }
    }

    /// Sum of all seven rates.
    pub fn sum(&self) -> f64 {
        EventType::ALL.iter().map(|&e| self.rate(e)).sum()
    }
}

/// Validated rates and their normalized probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct RateModel {
    probabilities: [f64; 7],
}

impl RateModel {
    /// Validate `constants` and normalize them.
    ///
    /// Fails when any rate is negative or non-finite, or when the sum is not
    /// strictly positive.
    pub fn new(constants: RateConstants) -> Result<Self, RateError> {
        for event in EventType::ALL {
            let value = constants.rate(event);
            if !value.is_finite() {
                return Err(RateError::NonFinite { event, value });
            }
            if value < 0.0 {
                return Err(RateError::Negative { event, value });
            }
        }

        let sum = constants.sum();
        if sum <= 0.0 {
            return Err(RateError::NonPositiveSum(sum));
        }

        let mut probabilities = [0.0; 7];
        for event in EventType::ALL {
            probabilities[event.index()] = constants.rate(event) / sum;
        }

        Ok(Self { probabilities })
    }

    /// Categorical distribution over event types.
    pub fn distribution(&self) -> EventDistribution {
        EventDistribution::new(self.probabilities)
    }

    /// Probability of a single event type.
    pub fn probability(&self, event: EventType) -> f64 {
        self.probabilities[event.index()]
    }
}

/// Probabilities for each event type, with a precomputed cumulative table for
/// sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDistribution {
    probabilities: [f64; 7],
    cumulative: [f64; 7],
    /// Last event with non-zero probability; absorbs float round-off at the top.
    last_nonzero: usize,
}

impl EventDistribution {
    fn new(probabilities: [f64; 7]) -> Self {
        let mut cumulative = [0.0; 7];
        let mut running = 0.0;
        let mut last_nonzero = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            running += p;
            cumulative[i] = running;
            if p > 0.0 {
                last_nonzero = i;
            }
        }
        Self {
            probabilities,
            cumulative,
            last_nonzero,
        }
    }

    pub fn probability(&self, event: EventType) -> f64 {
        self.probabilities[event.index()]
    }

    /// `(event, probability)` pairs in rate order.
    pub fn iter(&self) -> impl Iterator<Item = (EventType, f64)> + '_ {
        EventType::ALL
            .iter()
            .map(move |&e| (e, self.probabilities[e.index()]))
    }

    /// Map a uniform draw `u` in [0, 1) to an event.
    ///
    /// Events with zero probability are never returned.
    pub fn event_for(&self, u: f64) -> EventType {
        for (i, &edge) in self.cumulative.iter().enumerate() {
            if u < edge && self.probabilities[i] > 0.0 {
                return EventType::ALL[i];
            }
        }
        EventType::ALL[self.last_nonzero]
    }
}
