//! Drive the recurrence over a grid of (Q, F) values.

use std::time::Instant;

use rayon::prelude::*;

use crate::classify::{classify, Classification};
use crate::error::SweepError;
use crate::genotype::{Aggregates, Frequencies, ModelVariant, StartingRegime};
use crate::grid::Grid;
use crate::params::ModelParams;
use crate::recurrence::{Recurrence, Workspace};

/// How a grid coordinate becomes a (Q, F) pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AxisMapping {
    /// Q and F run linearly over [0, 1].
    Linear,
    /// K and k run linearly over [0, limit]; Q = 1/(1+K), F = 1/(1+k).
    Legacy { limit: f64 },
}

impl AxisMapping {
    /// Upper end of both axes, as drawn on the graph.
    pub fn axis_limit(self) -> f64 {
        match self {
            AxisMapping::Linear => 1.0,
            AxisMapping::Legacy { limit } => limit,
        }
    }
}

/// `(Q, F)` for cell `(x, y)` of a `subdivisions` x `subdivisions` grid.
///
/// `subdivisions` must be at least 2.
pub fn cell_parameters(
    mapping: AxisMapping,
    x: usize,
    y: usize,
    subdivisions: usize,
) -> (f64, f64) {
    let span = (subdivisions - 1) as f64;
    let u = x as f64 / span;
    let v = y as f64 / span;
    match mapping {
        AxisMapping::Linear => (u, v),
        AxisMapping::Legacy { limit } => {
            let male_k = u * limit;
            let female_k = v * limit;
            (1.0 / (1.0 + male_k), 1.0 / (1.0 + female_k))
        }
    }
}

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub variant: ModelVariant,
    /// Q and F are only read in single-run mode; a sweep overrides them per cell.
    pub params: ModelParams,
    pub generations: u32,
    pub threshold: f64,
    pub regime: StartingRegime,
    pub subdivisions: usize,
    pub mapping: AxisMapping,
    /// Keep the female frequency of every cell.
    pub record_female: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::OneLocus,
            params: ModelParams::default(),
            generations: 10000,
            threshold: 0.01,
            regime: StartingRegime::Dioecy,
            subdivisions: 201,
            mapping: AxisMapping::Linear,
            record_female: false,
        }
    }
}

/// Final state of one simulated cell.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub variant: ModelVariant,
    pub params: ModelParams,
    pub frequencies: Frequencies,
    pub aggregates: Aggregates,
    pub classification: Classification,
}

pub struct SweepResult {
    pub labels: Grid<Classification>,
    /// Present when [`SweepConfig::record_female`] was set.
    pub female: Option<Grid<f64>>,
}

/// Simulate a single cell with cosex outputs `q` and `f`.
pub fn evaluate_cell(config: &SweepConfig, q: f64, f: f64, work: &mut Workspace) -> RunOutcome {
    let space = config.variant.space();
    let params = config.params.with_outputs(q, f);
    let engine = Recurrence::new(space, params);
    let mut frequencies = space.initial(config.regime);
    engine.run(&mut frequencies, config.generations, work);
    let aggregates = space.aggregate(&frequencies);
    RunOutcome {
        variant: config.variant,
        params,
        frequencies,
        aggregates,
        classification: classify(aggregates, config.threshold),
    }
}

/// Run once with the Q and F already present in `config.params`.
pub fn single_run(config: &SweepConfig) -> RunOutcome {
    let mut work = Workspace::new(config.variant.space());
    evaluate_cell(config, config.params.Q, config.params.F, &mut work)
}

fn fill_row(
    config: &SweepConfig,
    work: &mut Workspace,
    y: usize,
    labels: &mut [Classification],
    mut female: Option<&mut [f64]>,
) {
    for (x, label) in labels.iter_mut().enumerate() {
        let (q, f) = cell_parameters(config.mapping, x, y, config.subdivisions);
        let outcome = evaluate_cell(config, q, f, work);
        *label = outcome.classification;
        if let Some(row) = female.as_deref_mut() {
            row[x] = outcome.aggregates.female;
        }
    }
    log::debug!("row {} of {} done", y + 1, config.subdivisions);
}

/// Classify every cell of the grid.
///
/// Rows are spread over the rayon pool; cells share nothing but the
/// read-only configuration, so the result does not depend on the
/// number of threads.
pub fn sweep(config: &SweepConfig) -> Result<SweepResult, SweepError> {
    let n = config.subdivisions;
    if n < 2 {
        return Err(SweepError::GridTooSmall(n));
    }
    let mut labels = Grid::new(n, Classification::None)?;
    let mut female = if config.record_female {
        Some(Grid::new(n, 0.0)?)
    } else {
        None
    };

    let space = config.variant.space();
    let started = Instant::now();
    match female.as_mut() {
        Some(female) => labels
            .as_mut_slice()
            .par_chunks_mut(n)
            .zip(female.as_mut_slice().par_chunks_mut(n))
            .enumerate()
            .for_each_init(
                || Workspace::new(space),
                |work, (y, (labels, female))| fill_row(config, work, y, labels, Some(female)),
            ),
        None => labels
            .as_mut_slice()
            .par_chunks_mut(n)
            .enumerate()
            .for_each_init(
                || Workspace::new(space),
                |work, (y, labels)| fill_row(config, work, y, labels, None),
            ),
    }
    log::info!(
        "classified {} cells in {:.1?}",
        n * n,
        started.elapsed()
    );

    Ok(SweepResult { labels, female })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SweepConfig {
        SweepConfig {
            generations: 200,
            subdivisions: 5,
            record_female: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_linear_mapping_corners() {
        assert_eq!(cell_parameters(AxisMapping::Linear, 0, 0, 201), (0.0, 0.0));
        assert_eq!(cell_parameters(AxisMapping::Linear, 200, 200, 201), (1.0, 1.0));
        assert_eq!(cell_parameters(AxisMapping::Linear, 100, 50, 201), (0.5, 0.25));
    }

    #[test]
    fn test_legacy_mapping_corners() {
        let mapping = AxisMapping::Legacy { limit: 4.0 };
        let (q, f) = cell_parameters(mapping, 200, 200, 201);
        assert!((q - 0.2).abs() < 1e-12);
        assert!((f - 0.2).abs() < 1e-12);
        assert_eq!(cell_parameters(mapping, 0, 0, 201), (1.0, 1.0));
        let (q, f) = cell_parameters(mapping, 50, 100, 201);
        assert!((q - 0.5).abs() < 1e-12);
        assert!((f - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_too_small() {
        for subdivisions in [0, 1] {
            let config = SweepConfig {
                subdivisions,
                ..small_config()
            };
            assert!(matches!(
                sweep(&config),
                Err(SweepError::GridTooSmall(n)) if n == subdivisions
            ));
        }
    }

    #[test]
    fn test_sweep_matches_cell_by_cell() {
        for variant in [ModelVariant::OneLocus, ModelVariant::TwoLocus] {
            for regime in [StartingRegime::Dioecy, StartingRegime::PseudoGynodioecy] {
                let config = SweepConfig {
                    variant,
                    regime,
                    ..small_config()
                };
                let result = sweep(&config).unwrap();
                let female = result.female.as_ref().unwrap();
                let mut work = Workspace::new(variant.space());
                for y in 0..config.subdivisions {
                    for x in 0..config.subdivisions {
                        let (q, f) = cell_parameters(config.mapping, x, y, config.subdivisions);
                        let outcome = evaluate_cell(&config, q, f, &mut work);
                        assert_eq!(result.labels.get(x, y), Some(&outcome.classification));
                        assert_eq!(female.get(x, y), Some(&outcome.aggregates.female));
                    }
                }
            }
        }
    }

    #[test]
    fn test_female_grid_only_on_request() {
        let config = SweepConfig {
            record_female: false,
            ..small_config()
        };
        let result = sweep(&config).unwrap();
        assert!(result.female.is_none());
        assert_eq!(result.labels.size(), 5);
    }

    #[test]
    fn test_zero_cosex_outputs_keep_dioecy() {
        // With Q = F = 0 cosexes neither give pollen nor ovules, and an
        // inconstant is just a worse male: dioecy persists.
        let config = SweepConfig {
            generations: 2000,
            ..Default::default()
        };
        let outcome = evaluate_cell(&config, 0.0, 0.0, &mut Workspace::new(config.variant.space()));
        assert_eq!(outcome.classification, Classification::Dio);
    }

    #[test]
    fn test_single_run_uses_given_outputs() {
        let config = SweepConfig {
            params: ModelParams {
                Q: 0.7,
                F: 0.3,
                ..Default::default()
            },
            generations: 10,
            ..Default::default()
        };
        let outcome = single_run(&config);
        assert_eq!(outcome.params.Q, 0.7);
        assert_eq!(outcome.params.F, 0.3);
        assert_eq!(outcome.frequencies.len(), 6);
        assert!((outcome.frequencies.total() - 1.0).abs() < 1e-9);

        let again = single_run(&config);
        assert_eq!(outcome, again);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let config = small_config();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let sequential = pool.install(|| sweep(&config)).unwrap();
        let parallel = sweep(&config).unwrap();
        assert_eq!(sequential.labels, parallel.labels);
        assert_eq!(sequential.female, parallel.female);
    }
}
