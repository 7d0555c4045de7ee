//! The simulation loop.
//!
//! [`Simulation`] owns the lattice for the duration of a run and advances it
//! one batch at a time:
//! - draw a batch of (location, event) pairs from the [`EventSampler`]
//! - for each pair, in generation order, read the well, resolve the neighbor
//!   or long-range point when the event needs one, apply the rule, and write
//!   the result back
//!
//! Mutation is strictly sequential, so later events in a batch observe the
//! writes of earlier ones.

use crate::cell::CellState;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::lattice::{IridophoreMask, Lattice};
use crate::neighbor::NeighborLocator;
use crate::rates::ContextKind;
use crate::rng::{SimRng, StdRandom};
use crate::rules;
use crate::sampler::{EventSampler, SampledEvent};
use tracing::{debug, info, trace};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// All requested iterations have been processed.
    Completed,
}

/// A single simulation run.
///
/// # Example
///
/// ```
/// use pigment_core::{initial, Simulation, SimulationConfig};
///
/// let config = SimulationConfig {
///     rows: 16,
///     cols: 16,
///     h: 3.0,
///     iterations: 5,
///     ..Default::default()
/// };
/// let (lattice, mask) = initial::blank(config.rows, config.cols);
/// let mut sim = Simulation::new(&config, lattice, mask).unwrap();
/// let iterations = sim.run();
/// assert_eq!(iterations, 5);
/// assert!(!sim.is_running());
/// ```
pub struct Simulation {
    lattice: Lattice,
    mask: IridophoreMask,
    sampler: EventSampler,
    locator: NeighborLocator,
    random: Box<dyn SimRng>,
    batch_size: usize,
    target_iterations: usize,
    counter: usize,
    state: RunState,
    /// Reused between batches.
    batch: Vec<SampledEvent>,
    last_sweep_changes: usize,
}

impl Simulation {
    /// Set up a run seeded from `config.seed`.
    pub fn new(
        config: &SimulationConfig,
        lattice: Lattice,
        mask: IridophoreMask,
    ) -> ConfigResult<Self> {
        Self::with_rng(
            config,
            lattice,
            mask,
            Box::new(StdRandom::from_seed(config.seed)),
        )
    }

    /// Set up a run drawing from `random`.
    ///
    /// Fails if the config is invalid, the lattice and mask do not match
    /// the configured dimensions, or a melanophore sits on an iridophore.
    pub fn with_rng(
        config: &SimulationConfig,
        lattice: Lattice,
        mask: IridophoreMask,
        random: Box<dyn SimRng>,
    ) -> ConfigResult<Self> {
        let rates = config.validate()?;

        let (rows, cols) = lattice.dimensions();
        let (mask_rows, mask_cols) = mask.dimensions();
        if (rows, cols) != (config.rows, config.cols) {
            return Err(ConfigError::LatticeSizeMismatch {
                expected_rows: config.rows,
                expected_cols: config.cols,
                rows,
                cols,
            });
        }
        if (rows, cols) != (mask_rows, mask_cols) {
            return Err(ConfigError::DimensionMismatch {
                rows,
                cols,
                mask_rows,
                mask_cols,
            });
        }

        if let Some((loc, _)) = lattice
            .iter()
            .find(|&(loc, state)| state == CellState::Melanophore && mask.at(loc))
        {
            return Err(ConfigError::MelanophoreOnIridophore {
                row: loc.row,
                col: loc.col,
            });
        }

        let sampler = EventSampler::new(rows, cols, &rates);
        let locator = NeighborLocator::new(config.connectivity, config.h);
        let batch_size = config.events_per_batch();

        info!(
            rows,
            cols,
            h = config.h,
            neighbors = config.connectivity.count(),
            iterations = config.iterations,
            batch_size,
            iridophores = mask.count(),
            "simulation ready"
        );

        Ok(Self {
            lattice,
            mask,
            sampler,
            locator,
            random,
            batch_size,
            target_iterations: config.iterations,
            counter: 0,
            state: RunState::Running,
            batch: Vec::with_capacity(batch_size),
            last_sweep_changes: 0,
        })
    }

    /// Build the configured initial condition and set up a run for it.
    ///
    /// The initial condition draws from its own generator seeded from
    /// `config.seed`, so the run's event stream does not depend on it.
    pub fn from_config(config: &SimulationConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut setup_rng = StdRandom::from_seed(config.seed);
        let run_seed = setup_rng.next_u64();
        let (lattice, mask) = config.initial.build(config.rows, config.cols, &mut setup_rng);
        Self::with_rng(
            config,
            lattice,
            mask,
            Box::new(StdRandom::from_seed(run_seed)),
        )
    }

    /// Process one batch.
    ///
    /// Returns `true` while more iterations remain. Once the target is
    /// reached the run is `Completed` and further calls do nothing.
    pub fn step(&mut self) -> bool {
        if self.state == RunState::Completed {
            return false;
        }

        self.sampler
            .sample_batch_into(self.batch_size, self.random.as_mut(), &mut self.batch);

        let mut changes = 0;
        for i in 0..self.batch.len() {
            if self.apply_event(self.batch[i]) {
                changes += 1;
            }
        }

        self.last_sweep_changes = changes;
        self.counter += 1;

        debug!(
            iteration = self.counter,
            changes,
            counts = ?self.lattice.counts(),
            "sweep done"
        );

        if self.counter >= self.target_iterations {
            self.state = RunState::Completed;
            let counts = self.lattice.counts();
            info!(
                iterations = self.counter,
                empty = counts.empty,
                xanthophore = counts.xanthophore,
                melanophore = counts.melanophore,
                "simulation completed"
            );
            trace!("final lattice:\n{}", self.lattice.to_text());
        }

        self.state == RunState::Running
    }

    /// Evaluate one work item against the current lattice. Returns whether
    /// the well changed.
    fn apply_event(&mut self, item: SampledEvent) -> bool {
        let SampledEvent { location, event } = item;
        let well = self.lattice.at(location);
        let iridophore = self.mask.at(location);

        // The rule is the identity here whatever the context, so skip the draw.
        if !event.may_fire(well, iridophore) {
            return false;
        }

        let rng = self.random.as_mut();
        let sampled = match event.context() {
            ContextKind::None => None,
            ContextKind::Neighbor => {
                Some(self.locator.nearest_neighbor(&self.lattice, location, rng))
            }
            ContextKind::LongRange => {
                Some(self.locator.long_range_point(&self.lattice, location, rng))
            }
        };

        let next: CellState = rules::apply(event, well, iridophore, sampled);
        if next != well {
            self.lattice.set_at(location, next);
            true
        } else {
            false
        }
    }

    /// Run all remaining iterations. Returns the iteration counter.
    pub fn run(&mut self) -> usize {
        while self.step() {}
        self.counter
    }

    /// Run until completion and hand back the final lattice.
    pub fn run_to_completion(mut self) -> Lattice {
        self.run();
        self.into_lattice()
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn mask(&self) -> &IridophoreMask {
        &self.mask
    }

    /// Iterations processed so far.
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn target_iterations(&self) -> usize {
        self.target_iterations
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Number of wells whose state changed in the last processed batch.
    pub fn last_sweep_changes(&self) -> usize {
        self.last_sweep_changes
    }

    /// Consume the run, returning the lattice as it stands.
    pub fn into_lattice(self) -> Lattice {
        self.lattice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial;
    use crate::neighbor::Connectivity;
    use crate::rates::{EventType, RateConstants};
    use crate::rng::ScriptedRng;

    fn config(rows: usize, cols: usize, rates: RateConstants) -> SimulationConfig {
        SimulationConfig {
            rows,
            cols,
            h: 1.0,
            iterations: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_returns_false_when_done() {
        let cfg = SimulationConfig {
            iterations: 3,
            ..config(4, 4, RateConstants::default())
        };
        let (lattice, mask) = initial::blank(4, 4);
        let mut sim = Simulation::new(&cfg, lattice, mask).unwrap();

        assert!(sim.is_running());
        assert!(sim.step());
        assert!(sim.step());
        assert!(!sim.step());
        assert_eq!(sim.state(), RunState::Completed);
        assert_eq!(sim.counter(), 3);

        // Completed runs stay put.
        let before = sim.lattice().clone();
        assert!(!sim.step());
        assert_eq!(sim.counter(), 3);
        assert_eq!(sim.lattice(), &before);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let cfg = config(4, 4, RateConstants::default());
        let lattice = Lattice::new(4, 4);
        let mask = IridophoreMask::clear(4, 5);
        assert!(matches!(
            Simulation::new(&cfg, lattice, mask),
            Err(ConfigError::DimensionMismatch { .. })
        ));

        let (lattice, mask) = initial::blank(3, 3);
        assert!(matches!(
            Simulation::new(&cfg, lattice, mask),
            Err(ConfigError::LatticeSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_melanophore_on_iridophore_rejected() {
        let cfg = config(4, 4, RateConstants::default());
        let (mut lattice, mask) = initial::iridophore_band(4, 4, 2);
        // band covers rows 1 and 2
        lattice.set(0, 3, CellState::Melanophore);
        lattice.set(2, 1, CellState::Melanophore);
        assert!(matches!(
            Simulation::new(&cfg, lattice, mask),
            Err(ConfigError::MelanophoreOnIridophore { row: 2, col: 1 })
        ));

        let (mut lattice, mask) = initial::iridophore_band(4, 4, 2);
        lattice.set(0, 3, CellState::Melanophore);
        lattice.set(1, 1, CellState::Xanthophore);
        assert!(Simulation::new(&cfg, lattice, mask).is_ok());
    }

    #[test]
    fn test_random_start_keeps_mask_through_run() {
        let cfg = SimulationConfig {
            iterations: 20,
            h: 3.0,
            seed: 11,
            initial: crate::initial::InitialCondition::Random {
                iridophore_ratio: 0.3,
            },
            ..config(24, 24, RateConstants::default())
        };
        let check = |sim: &Simulation| {
            for (loc, state) in sim.lattice().iter() {
                if sim.mask().at(loc) {
                    assert_ne!(state, CellState::Melanophore, "iteration {}", sim.counter());
                }
            }
        };
        let mut sim = Simulation::from_config(&cfg).unwrap();
        check(&sim);
        while sim.step() {
            check(&sim);
        }
        check(&sim);
        assert_eq!(sim.counter(), 20);
    }

    #[test]
    fn test_invalid_rates_block_start() {
        let cfg = config(4, 4, RateConstants::zero());
        let (lattice, mask) = initial::blank(4, 4);
        assert!(matches!(
            Simulation::new(&cfg, lattice, mask),
            Err(ConfigError::Rates(_))
        ));
    }

    #[test]
    fn test_events_see_earlier_writes_in_same_batch() {
        // Two events on the same well: a birth, then a death. The death only
        // fires if it observes the birth.
        let cfg = SimulationConfig {
            batch_size: Some(2),
            ..config(
                2,
                2,
                RateConstants {
                    birth_xanthophore: 1.0,
                    death_xanthophore: 1.0,
                    ..RateConstants::zero()
                },
            )
        };
        // doubles: event draws (0.1 -> birth, 0.9 -> death)
        // indices: row, col for each event
        let rng = ScriptedRng::new(vec![0.1, 0.9], vec![1, 1, 1, 1]);
        let (lattice, mask) = initial::blank(2, 2);
        let mut sim = Simulation::with_rng(&cfg, lattice, mask, Box::new(rng)).unwrap();
        sim.step();
        assert_eq!(sim.lattice().get(1, 1), CellState::Empty);
        assert_eq!(sim.last_sweep_changes(), 2);
    }

    #[test]
    fn test_failed_precondition_does_not_abandon_batch() {
        // First event cannot fire (death on an empty well); the second, a
        // birth elsewhere, must still be applied.
        let cfg = SimulationConfig {
            batch_size: Some(2),
            ..config(
                2,
                2,
                RateConstants {
                    birth_xanthophore: 1.0,
                    death_xanthophore: 1.0,
                    ..RateConstants::zero()
                },
            )
        };
        let rng = ScriptedRng::new(vec![0.9, 0.1], vec![0, 0, 1, 0]);
        let (lattice, mask) = initial::blank(2, 2);
        let mut sim = Simulation::with_rng(&cfg, lattice, mask, Box::new(rng)).unwrap();
        sim.step();
        assert_eq!(sim.lattice().get(0, 0), CellState::Empty);
        assert_eq!(sim.lattice().get(1, 0), CellState::Xanthophore);
        assert_eq!(sim.last_sweep_changes(), 1);
    }

    #[test]
    fn test_short_range_kill_uses_neighbor() {
        // Xanthophore at (1, 1) with a melanophore directly above it.
        let cfg = SimulationConfig {
            batch_size: Some(1),
            ..config(3, 3, RateConstants::only(EventType::KillByMelanophore))
        };
        let mut lattice = Lattice::new(3, 3);
        lattice.set(1, 1, CellState::Xanthophore);
        lattice.set(0, 1, CellState::Melanophore);
        // row 1, col 1, neighbor index 0 (up)
        let rng = ScriptedRng::new(vec![0.5], vec![1, 1, 0]);
        let mut sim = Simulation::with_rng(
            &cfg,
            lattice,
            IridophoreMask::clear(3, 3),
            Box::new(rng),
        )
        .unwrap();
        sim.step();
        assert_eq!(sim.lattice().get(1, 1), CellState::Empty);
        assert_eq!(sim.lattice().get(0, 1), CellState::Melanophore);
    }

    #[test]
    fn test_mask_permanence_under_melanophore_pressure() {
        let cfg = SimulationConfig {
            iterations: 40,
            connectivity: Connectivity::Moore,
            h: 2.0,
            ..config(
                12,
                12,
                RateConstants {
                    birth_xanthophore: 1.0,
                    birth_melanophore: 3.0,
                    death_xanthophore: 0.5,
                    death_melanophore: 0.5,
                    kill_by_melanophore: 1.0,
                    kill_by_xanthophore: 1.0,
                    long_range_activation: 3.0,
                },
            )
        };
        let (lattice, mask) = initial::iridophore_band(12, 12, 4);
        let mut sim = Simulation::new(&cfg, lattice, mask).unwrap();
        while sim.step() {
            for (loc, state) in sim.lattice().iter() {
                if sim.mask().at(loc) {
                    assert_ne!(
                        state,
                        CellState::Melanophore,
                        "melanophore on iridophore at {:?}",
                        loc
                    );
                }
            }
        }
        assert!(sim.lattice().counts().melanophore > 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let cfg = SimulationConfig {
            iterations: 10,
            h: 3.0,
            seed: 99,
            initial: crate::initial::InitialCondition::Random {
                iridophore_ratio: 0.1,
            },
            ..config(16, 16, RateConstants::default())
        };
        let a = Simulation::from_config(&cfg).unwrap().run_to_completion();
        let b = Simulation::from_config(&cfg).unwrap().run_to_completion();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_config_uses_initial_condition() {
        let cfg = SimulationConfig {
            initial: crate::initial::InitialCondition::IridophoreBand { bandwidth: 2 },
            ..config(6, 6, RateConstants::default())
        };
        let sim = Simulation::from_config(&cfg).unwrap();
        assert_eq!(sim.mask().count(), 12);
        assert_eq!(sim.target_iterations(), 1);
    }
}
