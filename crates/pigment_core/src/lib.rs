//! Stochastic pigment-cell pattern formation.
//!
//! A cellular automaton on a toroidal lattice where xanthophores and
//! melanophores are born, die, and kill each other through short-range and
//! long-range interactions, producing Turing-like stripes and spots.
//!
//! This crate provides:
//! - `Lattice` / `IridophoreMask`: the toroidal cell grid and its fixed mask
//! - `RateModel`: rate constants normalized into an event distribution
//! - `rules`: the seven state transition rules
//! - `NeighborLocator`: short-range neighbors and long-range ring points
//! - `EventSampler`: uniform location plus categorical event draws
//! - `Simulation`: the batch loop that applies events in order
//! - `initial`: blank, iridophore band and random starting lattices
//! - `render`: PNG output of a lattice
//!
//! ## Example
//!
//! ```ignore
//! use pigment_core::{render_to_png, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let lattice = Simulation::from_config(&config)?.run_to_completion();
//! render_to_png(&lattice, "out/stripes.png".as_ref(), 4)?;
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod initial;
pub mod lattice;
pub mod neighbor;
pub mod rates;
pub mod render;
pub mod rng;
pub mod rules;
pub mod sampler;
pub mod simulation;

pub use cell::CellState;
pub use config::{load_config, save_config, SimulationConfig};
pub use error::{ConfigError, ConfigResult, RateError, RenderError};
pub use initial::InitialCondition;
pub use lattice::{CellCounts, IridophoreMask, Lattice, Location};
pub use neighbor::{Connectivity, NeighborLocator};
pub use rates::{ContextKind, EventDistribution, EventType, RateConstants, RateModel};
pub use render::{lattice_rgba, render_lattice, render_to_png, RenderPalette};
pub use rng::{SimRng, StdRandom};
pub use sampler::{EventSampler, SampledEvent};
pub use simulation::{RunState, Simulation};
