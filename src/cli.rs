use std::path::PathBuf;

use clap::Parser;

use crate::genotype::{ModelVariant, StartingRegime};
use crate::params::ModelParams;
use crate::sweep::{AxisMapping, SweepConfig};

/// Command-line options. `-h` is the inconstancy parameter, so help
/// is only available as `--help`.
#[derive(Parser, Debug)]
#[command(
    about = "Equilibrium mating systems of the Ehlers & Bataillon (2007) models over a (Q, F) grid",
    disable_help_flag = true
)]
pub struct Args {
    #[allow(dead_code)]
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
    /// Model 1 (one locus) or model 2 (two loci)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub model: u8,
    /// Probability that an inconstant reproduces as a cosex
    #[arg(short = 'h', short_alias = 'H', long = "inconstanth", default_value_t = 0.5)]
    pub h: f64,
    /// Selfing rate of cosexes
    #[arg(short = 'S', short_alias = 's', long = "selfing", default_value_t = 0.0)]
    pub selfing: f64,
    /// Inbreeding depression of selfed offspring
    #[arg(short = 'd', short_alias = 'D', long = "depression", default_value_t = 0.0)]
    pub depression: f64,
    /// Viability of YY individuals
    #[arg(short = 'V', short_alias = 'v', default_value_t = 1.0, conflicts_with_all = ["yy_penalty", "ancient", "recent"])]
    pub yy_viability: f64,
    /// YY viability penalty, i.e. V = 1 - value
    #[arg(long = "yypenalty", conflicts_with_all = ["ancient", "recent"])]
    pub yy_penalty: Option<f64>,
    /// Ancient dioecy: V = 0
    #[arg(long, alias = "ancientdioecy", conflicts_with = "recent")]
    pub ancient: bool,
    /// Recent dioecy: V = 1
    #[arg(long, alias = "recentdioecy")]
    pub recent: bool,
    /// Cosex pollen output relative to a male (single run)
    #[arg(short = 'Q', short_alias = 'q', default_value_t = 1.0)]
    pub q: f64,
    /// Cosex ovule output relative to a female (single run)
    #[arg(short = 'F', short_alias = 'f', default_value_t = 1.0)]
    pub f: f64,
    /// K, giving Q = 1 / (1 + K)
    #[arg(short = 'K', long = "malek", conflicts_with_all = ["q", "pi"])]
    pub male_k: Option<f64>,
    /// pi, giving Q = 1 / pi
    #[arg(long, conflicts_with = "q")]
    pub pi: Option<f64>,
    /// k, giving F = 1 / (1 + k)
    #[arg(short = 'k', long = "femalek", conflicts_with_all = ["f", "omega"])]
    pub female_k: Option<f64>,
    /// omega, giving F = 1 / omega
    #[arg(long, conflicts_with = "f")]
    pub omega: Option<f64>,
    /// Population pollen output that saturates female ovules (0: no limitation)
    #[arg(long = "PSatF", default_value_t = 0.0)]
    pub psat_f: f64,
    /// Viability of Y pollen (model 1 only)
    #[arg(long = "ppY", default_value_t = 1.0)]
    pub ppy: f64,
    /// Frequency above which a morph counts as present
    #[arg(long, default_value_t = 0.01)]
    pub threshold: f64,
    /// Width and height of the grid
    #[arg(long, default_value_t = 201)]
    pub subdivisions: usize,
    /// Generations before assuming equilibrium
    #[arg(long, alias = "endpoint", default_value_t = 10000)]
    pub iterations: u32,
    /// Run once with the given Q and F instead of sweeping the grid
    #[arg(long)]
    pub onerun: bool,
    /// Start from pseudo-gynodioecy and let males invade
    #[arg(long)]
    pub pgd: bool,
    /// Sweep K and k rather than Q and F
    #[arg(long)]
    pub oldformat: bool,
    /// Largest K and k of an --oldformat sweep
    #[arg(long = "oldformatlimit", default_value_t = 4)]
    pub oldformat_limit: u32,
    /// Also write female frequencies as a tab-separated grid
    #[arg(long)]
    pub gnuplot: bool,
    /// Pixels per grid cell in the bitmap
    #[arg(long, default_value_t = 1)]
    pub magnify: usize,
    /// Worker threads for the sweep
    #[arg(long)]
    pub threads: Option<usize>,
    /// Directory receiving the output files
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

impl Args {
    pub fn variant(&self) -> ModelVariant {
        ModelVariant::from_number(self.model).unwrap_or_default()
    }

    pub fn params(&self) -> ModelParams {
        let viability = if self.ancient {
            0.0
        } else if self.recent {
            1.0
        } else {
            self.yy_penalty
                .map_or(self.yy_viability, |penalty| 1.0 - penalty)
        };
        let pollen_output = self
            .male_k
            .map(|k| 1.0 / (1.0 + k))
            .or(self.pi.map(|pi| 1.0 / pi))
            .unwrap_or(self.q);
        let ovule_output = self
            .female_k
            .map(|k| 1.0 / (1.0 + k))
            .or(self.omega.map(|omega| 1.0 / omega))
            .unwrap_or(self.f);
        ModelParams {
            h: self.h,
            S: self.selfing,
            d: self.depression,
            V: viability,
            Q: pollen_output,
            F: ovule_output,
            PSatF: self.psat_f,
            ppY: self.ppy,
        }
    }

    pub fn config(&self) -> SweepConfig {
        SweepConfig {
            variant: self.variant(),
            params: self.params(),
            generations: self.iterations,
            threshold: self.threshold,
            regime: if self.pgd {
                StartingRegime::PseudoGynodioecy
            } else {
                StartingRegime::Dioecy
            },
            subdivisions: self.subdivisions,
            mapping: if self.oldformat {
                AxisMapping::Legacy {
                    limit: self.oldformat_limit as f64,
                }
            } else {
                AxisMapping::Linear
            },
            record_female: self.gnuplot && !self.onerun,
        }
    }
}

/// Log the settings banner that precedes every run.
pub fn log_settings(config: &SweepConfig, onerun: bool) {
    let p = &config.params;
    log::info!("Model {}", config.variant.number());
    if onerun {
        log::info!("Q = {} (K = {}, pi = {})", p.Q, p.male_k(), 1.0 / p.Q);
        log::info!("F = {} (k = {}, omega = {})", p.F, p.female_k(), 1.0 / p.F);
    }
    log::info!("h = {}", p.h);
    log::info!("Selfing rate = {}", p.S);
    log::info!("Inbreeding depression = {}", p.d);
    log::info!("YY viability = {} (YY penalty = {})", p.V, 1.0 - p.V);
    log::info!("PSatF = {}", p.PSatF);
    if config.variant.space().honours_pollen_viability() {
        log::info!("ppY = {}", p.ppY);
    } else if p.ppY != 1.0 {
        log::warn!(
            "ppY = {} is ignored by model {}",
            p.ppY,
            config.variant.number()
        );
    }
    log::info!("Iterations = {}", config.generations);

    if !onerun {
        let (male_axis, female_axis) = match config.mapping {
            AxisMapping::Linear => ("Q", "F"),
            AxisMapping::Legacy { .. } => ("K", "k"),
        };
        log::warn!(
            "no --onerun: sweeping {} {}/{} combinations, this may take a long time",
            config.subdivisions * config.subdivisions,
            male_axis,
            female_axis
        );
        log::info!(
            "x axis: {} from 0 to {}, y axis: {} from 0 to {}",
            male_axis,
            config.mapping.axis_limit(),
            female_axis,
            config.mapping.axis_limit()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dioecy-sweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).config();
        assert_eq!(config.variant, ModelVariant::OneLocus);
        assert_eq!(config.params, ModelParams::default());
        assert_eq!(config.generations, 10000);
        assert_eq!(config.threshold, 0.01);
        assert_eq!(config.subdivisions, 201);
        assert_eq!(config.regime, StartingRegime::Dioecy);
        assert_eq!(config.mapping, AxisMapping::Linear);
        assert!(!config.record_female);
    }

    #[test]
    fn test_short_and_long_forms() {
        let p = parse(&["-H", "0.3", "-s", "0.2", "--depression", "0.1", "-v", "0.5"]).params();
        assert_eq!(p.h, 0.3);
        assert_eq!(p.S, 0.2);
        assert_eq!(p.d, 0.1);
        assert_eq!(p.V, 0.5);
        let p = parse(&["-h", "0.7", "--PSatF", "1.5", "--ppY", "0.25"]).params();
        assert_eq!(p.h, 0.7);
        assert_eq!(p.PSatF, 1.5);
        assert_eq!(p.ppY, 0.25);
    }

    #[test]
    fn test_viability_shortcuts() {
        assert_eq!(parse(&["--ancient"]).params().V, 0.0);
        assert_eq!(parse(&["--recentdioecy"]).params().V, 1.0);
        assert!((parse(&["--yypenalty", "0.25"]).params().V - 0.75).abs() < 1e-12);
        assert!(Args::try_parse_from(["dioecy-sweep", "--ancient", "--recent"]).is_err());
    }

    #[test]
    fn test_output_reparameterisations() {
        let p = parse(&["--onerun", "-K", "4", "-k", "1"]).params();
        assert!((p.Q - 0.2).abs() < 1e-12);
        assert!((p.F - 0.5).abs() < 1e-12);
        let p = parse(&["--onerun", "--pi", "4", "--omega", "2"]).params();
        assert!((p.Q - 0.25).abs() < 1e-12);
        assert!((p.F - 0.5).abs() < 1e-12);
        let p = parse(&["--onerun", "-Q", "0.3", "-f", "0.6"]).params();
        assert_eq!((p.Q, p.F), (0.3, 0.6));
        assert!(Args::try_parse_from(["dioecy-sweep", "-Q", "0.3", "-K", "1"]).is_err());
    }

    #[test]
    fn test_sweep_options() {
        let config = parse(&[
            "--model",
            "2",
            "--pgd",
            "--oldformat",
            "--oldformatlimit",
            "8",
            "--gnuplot",
            "--subdivisions",
            "11",
            "--endpoint",
            "50",
            "--threshold",
            "0.05",
        ])
        .config();
        assert_eq!(config.variant, ModelVariant::TwoLocus);
        assert_eq!(config.regime, StartingRegime::PseudoGynodioecy);
        assert_eq!(config.mapping, AxisMapping::Legacy { limit: 8.0 });
        assert!(config.record_female);
        assert_eq!(config.subdivisions, 11);
        assert_eq!(config.generations, 50);
        assert_eq!(config.threshold, 0.05);
    }

    #[test]
    fn test_gnuplot_ignored_in_single_run() {
        assert!(!parse(&["--gnuplot", "--onerun"]).config().record_female);
    }

    #[test]
    fn test_rejects_unknown_and_bad_model() {
        assert!(Args::try_parse_from(["dioecy-sweep", "--bogus"]).is_err());
        assert!(Args::try_parse_from(["dioecy-sweep", "--model", "3"]).is_err());
    }
}
