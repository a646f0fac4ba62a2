//! Deterministic models of mating-system evolution after Ehlers &
//! Bataillon (2007): iterate genotype frequencies of an infinite plant
//! population to equilibrium, and classify the outcome over a grid of
//! cosex pollen (Q) and ovule (F) outputs.

pub mod classify;
pub mod cli;
pub mod error;
pub mod export;
pub mod genotype;
pub mod grid;
pub mod params;
pub mod recurrence;
pub mod sweep;

pub use classify::{classify, Classification};
pub use error::SweepError;
pub use genotype::{Aggregates, Frequencies, GenotypeSpace, ModelVariant, StartingRegime};
pub use grid::Grid;
pub use params::ModelParams;
pub use recurrence::{iterate, Recurrence, Workspace};
pub use sweep::{sweep, single_run, AxisMapping, RunOutcome, SweepConfig, SweepResult};
