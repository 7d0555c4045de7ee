//! Batch sampling of (location, event) work items.

use crate::lattice::Location;
use crate::rates::{EventDistribution, EventType, RateModel};
use crate::rng::SimRng;

/// One unit of work: apply `event` to the well at `location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledEvent {
    pub location: Location,
    pub event: EventType,
}

/// Draws uniformly random wells paired with events from the rate
/// distribution. Locations and events are drawn independently and with
/// replacement.
#[derive(Debug, Clone)]
pub struct EventSampler {
    rows: usize,
    cols: usize,
    distribution: EventDistribution,
}

impl EventSampler {
    pub fn new(rows: usize, cols: usize, rates: &RateModel) -> Self {
        Self {
            rows,
            cols,
            distribution: rates.distribution(),
        }
    }

    /// Events in one sweep: one per site.
    pub fn sweep_size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn distribution(&self) -> &EventDistribution {
        &self.distribution
    }

    /// Draw a single work item.
    #[inline]
    pub fn sample(&self, rng: &mut dyn SimRng) -> SampledEvent {
        let row = rng.next_usize_max(self.rows);
        let col = rng.next_usize_max(self.cols);
        let event = self.distribution.event_for(rng.next_double());
        SampledEvent {
            location: Location::new(row, col),
            event,
        }
    }

    /// Draw `count` work items in generation order.
    pub fn sample_batch(&self, count: usize, rng: &mut dyn SimRng) -> Vec<SampledEvent> {
        let mut batch = Vec::with_capacity(count);
        self.sample_batch_into(count, rng, &mut batch);
        batch
    }

    /// Clear `out` and refill it with `count` work items.
    pub fn sample_batch_into(
        &self,
        count: usize,
        rng: &mut dyn SimRng,
        out: &mut Vec<SampledEvent>,
    ) {
        out.clear();
        out.reserve(count);
        for _ in 0..count {
            out.push(self.sample(rng));
        }
    }
}
