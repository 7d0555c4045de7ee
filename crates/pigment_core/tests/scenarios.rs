//! End-to-end runs through the public API.

use pigment_core::{
    initial, CellState, Connectivity, EventType, IridophoreMask, Lattice, RateConstants,
    SimRng, Simulation, SimulationConfig,
};
use std::f64::consts::TAU;

/// Visits every site once per sweep in row-major order and replays a fixed
/// list of doubles for event and angle draws.
struct SweepRng {
    rows: usize,
    cols: usize,
    site: usize,
    pending_col: Option<usize>,
    doubles: Vec<f64>,
    double_pos: usize,
}

impl SweepRng {
    fn new(rows: usize, cols: usize, doubles: Vec<f64>) -> Self {
        Self {
            rows,
            cols,
            site: 0,
            pending_col: None,
            doubles,
            double_pos: 0,
        }
    }
}

impl SimRng for SweepRng {
    fn next_double(&mut self) -> f64 {
        let v = self.doubles[self.double_pos % self.doubles.len()];
        self.double_pos += 1;
        v
    }

    fn next_usize_max(&mut self, max: usize) -> usize {
        // Location draws come in (row, col) pairs.
        match self.pending_col.take() {
            Some(col) => col % max.max(1),
            None => {
                let idx = self.site % (self.rows * self.cols);
                self.site += 1;
                self.pending_col = Some(idx % self.cols);
                (idx / self.cols) % max.max(1)
            }
        }
    }

    fn next_u64(&mut self) -> u64 {
        0
    }
}

fn single_event_config(rows: usize, cols: usize, event: EventType) -> SimulationConfig {
    SimulationConfig {
        rows,
        cols,
        rates: RateConstants::only(event),
        h: 1.0,
        iterations: 1,
        batch_size: None,
        ..Default::default()
    }
}

#[test]
fn birth_sweep_fills_blank_lattice() {
    let config = single_event_config(4, 4, EventType::BirthXanthophore);
    let (lattice, mask) = initial::blank(4, 4);
    let rng = SweepRng::new(4, 4, vec![0.0, 0.5, 0.999]);
    let mut sim = Simulation::with_rng(&config, lattice, mask, Box::new(rng)).unwrap();

    assert!(!sim.step());
    assert_eq!(sim.lattice().counts().xanthophore, 16);
    assert_eq!(sim.last_sweep_changes(), 16);
}

#[test]
fn birth_only_never_produces_other_states() {
    let config = SimulationConfig {
        iterations: 50,
        seed: 5,
        ..single_event_config(4, 4, EventType::BirthXanthophore)
    };
    let (lattice, mask) = initial::blank(4, 4);
    let mut sim = Simulation::new(&config, lattice, mask).unwrap();
    while sim.step() {
        let counts = sim.lattice().counts();
        assert_eq!(counts.melanophore, 0);
        assert_eq!(counts.empty + counts.xanthophore, 16);
    }
    // 800 uniform draws over 16 sites leave none untouched in practice.
    assert_eq!(sim.lattice().counts().xanthophore, 16);
}

#[test]
fn death_sweep_clears_full_lattice() {
    let config = single_event_config(4, 4, EventType::DeathXanthophore);
    let lattice = Lattice::filled(4, 4, CellState::Xanthophore);
    let rng = SweepRng::new(4, 4, vec![0.25]);
    let mut sim = Simulation::with_rng(
        &config,
        lattice,
        IridophoreMask::clear(4, 4),
        Box::new(rng),
    )
    .unwrap();

    sim.step();
    assert_eq!(sim.lattice().counts().empty, 16);
}

#[test]
fn long_range_activation_at_unit_distance_converts_center() {
    let config = SimulationConfig {
        batch_size: Some(1),
        ..single_event_config(3, 3, EventType::LongRangeActivation)
    };

    for step in 0..64 {
        let angle_fraction = step as f64 / 64.0;
        let mut lattice = Lattice::filled(3, 3, CellState::Xanthophore);
        lattice.set(1, 1, CellState::Empty);

        // Skip the first four sites so the single event lands on (1, 1).
        let mut rng = SweepRng::new(3, 3, vec![0.5, angle_fraction]);
        for _ in 0..4 {
            rng.next_usize_max(3);
            rng.next_usize_max(3);
        }

        let mut sim = Simulation::with_rng(
            &config,
            lattice,
            IridophoreMask::clear(3, 3),
            Box::new(rng),
        )
        .unwrap();
        sim.step();

        let angle = angle_fraction * TAU;
        assert_eq!(
            sim.lattice().get(1, 1),
            CellState::Melanophore,
            "angle {:.3} should reach a xanthophore",
            angle
        );
        assert_eq!(sim.lattice().counts().xanthophore, 8);
    }
}

#[test]
fn long_range_activation_needs_a_xanthophore() {
    let config = SimulationConfig {
        batch_size: Some(1),
        ..single_event_config(3, 3, EventType::LongRangeActivation)
    };
    let mut rng = SweepRng::new(3, 3, vec![0.5, 0.3]);
    for _ in 0..4 {
        rng.next_usize_max(3);
        rng.next_usize_max(3);
    }
    let mut lattice = Lattice::filled(3, 3, CellState::Melanophore);
    lattice.set(1, 1, CellState::Empty);
    let mut sim = Simulation::with_rng(
        &config,
        lattice,
        IridophoreMask::clear(3, 3),
        Box::new(rng),
    )
    .unwrap();
    sim.step();
    assert_eq!(sim.lattice().get(1, 1), CellState::Empty);
}

#[test]
fn default_rates_keep_states_closed_and_respect_mask() {
    for connectivity in [Connectivity::VonNeumann, Connectivity::Moore] {
        let config = SimulationConfig {
            rows: 24,
            cols: 24,
            h: 4.0,
            connectivity,
            iterations: 30,
            seed: 11,
            initial: pigment_core::InitialCondition::Random {
                iridophore_ratio: 0.3,
            },
            ..Default::default()
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        let mask = sim.mask().clone();
        while sim.step() {
            assert_eq!(sim.lattice().counts().total(), 24 * 24);
            assert_eq!(sim.mask(), &mask);
            for (loc, state) in sim.lattice().iter() {
                if mask.at(loc) {
                    assert_ne!(state, CellState::Melanophore);
                }
            }
        }
        assert_eq!(sim.counter(), 30);
    }
}

#[test]
fn stripe_band_grows_pattern_from_blank() {
    let config = SimulationConfig {
        rows: 40,
        cols: 40,
        h: 6.0,
        iterations: 40,
        seed: 3,
        initial: pigment_core::InitialCondition::IridophoreBand { bandwidth: 4 },
        ..Default::default()
    };
    let lattice = Simulation::from_config(&config).unwrap().run_to_completion();
    let counts = lattice.counts();
    assert!(
        counts.xanthophore > 0,
        "xanthophores should appear: {:?}",
        counts
    );
    assert!(
        counts.melanophore > 0,
        "melanophores should appear: {:?}",
        counts
    );
}
