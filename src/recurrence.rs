//! One generation of the deterministic recurrence, and the fixed-length
//! iteration built on it.

use crate::genotype::{normalize, Frequencies, Genotype, GenotypeSpace, Morph};
use crate::params::ModelParams;

/// Scratch buffers for [`Recurrence::step`].
///
/// Each worker owns one of these; nothing in here carries
/// information from one generation to the next.
#[derive(Debug, Default, Clone)]
pub struct Workspace {
    pollen: Vec<f64>,
    eggs: Vec<f64>,
    next: Vec<f64>,
}

impl Workspace {
    pub fn new(space: &GenotypeSpace) -> Self {
        Self {
            pollen: vec![0.0; space.num_bins()],
            eggs: vec![0.0; space.num_bins()],
            next: vec![0.0; space.num_genotypes()],
        }
    }

    /// Normalized pollen pool of the last step.
    pub fn pollen(&self) -> &[f64] {
        &self.pollen
    }

    /// Un-normalized egg pool of the last step.
    pub fn eggs(&self) -> &[f64] {
        &self.eggs
    }
}

/// The recurrence for one genotype space and one parameter record.
///
/// Everything that depends only on the parameters is folded into
/// per-genotype coefficient rows up front, so a step is a handful of
/// multiply-adds. A `Recurrence` is immutable and can be shared
/// between threads.
pub struct Recurrence<'a> {
    space: &'a GenotypeSpace,
    params: ModelParams,
    psat_cosex: f64,
    // genotype-major rows, num_bins wide
    pollen: Vec<f64>,
    female_eggs: Vec<f64>,
    cosex_eggs: Vec<f64>,
    // genotype-major rows, num_genotypes wide
    selfed: Vec<f64>,
    viability: Vec<f64>,
}

// Offspring distribution of a selfing cosex. The plant's own pollen
// competes after the pollen-viability penalty; when none of it is
// viable the split stays Mendelian.
fn selfed_offspring(space: &GenotypeSpace, genotype: &Genotype, bin_viability: &[f64]) -> Vec<f64> {
    let mut rv = vec![0.0; space.num_genotypes()];
    let weighted: f64 = genotype
        .gametes
        .iter()
        .map(|(bin, frac)| frac * bin_viability[*bin])
        .sum();
    for &(egg, egg_frac) in genotype.gametes {
        for &(pollen, pollen_frac) in genotype.gametes {
            let pollen_frac = if weighted > 0.0 {
                pollen_frac * bin_viability[pollen] / weighted
            } else {
                pollen_frac
            };
            rv[space.zygote(pollen, egg)] += egg_frac * pollen_frac;
        }
    }
    rv
}

// Fraction of a receiver's ovules that get fertilised.
fn saturation(raw_pollen: f64, threshold: f64) -> f64 {
    if raw_pollen >= threshold {
        1.0
    } else {
        raw_pollen / threshold
    }
}

impl<'a> Recurrence<'a> {
    pub fn new(space: &'a GenotypeSpace, params: ModelParams) -> Self {
        let num_bins = space.num_bins();
        let num_genotypes = space.num_genotypes();

        let ppy = if space.honours_pollen_viability() {
            params.ppY
        } else {
            1.0
        };
        let bin_viability = space
            .gametes()
            .iter()
            .map(|g| if g.carries_y { ppy } else { 1.0 })
            .collect::<Vec<f64>>();

        let inconstant_pollen = params.h * params.Q + (1.0 - params.h);
        let cosex_ovules = params.h * (1.0 - params.S) * params.F;
        let selfing = params.S * (1.0 - params.d) * params.h * params.F;

        let mut pollen = vec![0.0; num_genotypes * num_bins];
        let mut female_eggs = vec![0.0; num_genotypes * num_bins];
        let mut cosex_eggs = vec![0.0; num_genotypes * num_bins];
        let mut selfed = vec![0.0; num_genotypes * num_genotypes];
        let mut viability = vec![1.0; num_genotypes];

        for (g, genotype) in space.genotypes().iter().enumerate() {
            let pollen_output = match genotype.morph {
                Morph::Female => 0.0,
                Morph::Male => 1.0,
                Morph::Inconstant => inconstant_pollen,
            };
            for &(bin, frac) in genotype.gametes {
                let index = g * num_bins + bin;
                pollen[index] += frac * pollen_output * bin_viability[bin];
                match genotype.morph {
                    Morph::Female => female_eggs[index] += frac,
                    Morph::Inconstant => cosex_eggs[index] += frac * cosex_ovules,
                    Morph::Male => (),
                }
            }
            if genotype.morph == Morph::Inconstant {
                let row = &mut selfed[g * num_genotypes..(g + 1) * num_genotypes];
                for (s, o) in row
                    .iter_mut()
                    .zip(selfed_offspring(space, genotype, &bin_viability))
                {
                    *s = selfing * o;
                }
            }
            if genotype.yy {
                viability[g] = params.V;
            }
        }

        Self {
            space,
            params,
            psat_cosex: params.cosex_saturation(),
            pollen,
            female_eggs,
            cosex_eggs,
            selfed,
            viability,
        }
    }

    pub fn space(&self) -> &'a GenotypeSpace {
        self.space
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Fill `pool` with the normalized pollen pool and return the raw
    /// (pre-normalization) pollen total.
    pub fn pollen_pool(&self, freqs: &[f64], pool: &mut [f64]) -> f64 {
        let num_bins = pool.len();
        pool.fill(0.0);
        for (g, f) in freqs.iter().enumerate() {
            let row = &self.pollen[g * num_bins..(g + 1) * num_bins];
            pool.iter_mut().zip(row).for_each(|(p, c)| *p += f * c);
        }
        normalize(pool)
    }

    /// Fill `pool` with outcrossed eggs, limited by the raw pollen total.
    ///
    /// The pool is not normalized: selfed offspring are
    /// added on top of the outcrossed ones.
    pub fn egg_pool(&self, freqs: &[f64], raw_pollen: f64, pool: &mut [f64]) {
        let num_bins = pool.len();
        let female = saturation(raw_pollen, self.params.PSatF);
        let cosex = saturation(raw_pollen, self.psat_cosex);
        pool.fill(0.0);
        for (g, f) in freqs.iter().enumerate() {
            let range = g * num_bins..(g + 1) * num_bins;
            pool.iter_mut()
                .zip(&self.female_eggs[range.clone()])
                .zip(&self.cosex_eggs[range])
                .for_each(|((e, fe), ce)| *e += f * (female * fe + cosex * ce));
        }
    }

    /// Advance `freqs` by one generation.
    #[inline(never)]
    pub fn step(&self, freqs: &mut Frequencies, work: &mut Workspace) {
        debug_assert_eq!(freqs.len(), self.space.num_genotypes());
        let Workspace { pollen, eggs, next } = work;
        let current = freqs.as_slice();

        let raw_pollen = self.pollen_pool(current, pollen);
        self.egg_pool(current, raw_pollen, eggs);

        next.fill(0.0);
        for (p, pf) in pollen.iter().enumerate() {
            for (e, ef) in eggs.iter().enumerate() {
                next[self.space.zygote(p, e)] += pf * ef;
            }
        }

        let num_genotypes = next.len();
        for (g, f) in current.iter().enumerate() {
            let row = &self.selfed[g * num_genotypes..(g + 1) * num_genotypes];
            next.iter_mut().zip(row).for_each(|(n, s)| *n += f * s);
        }

        next.iter_mut()
            .zip(&self.viability)
            .for_each(|(n, v)| *n *= v);

        // A population with no offspring stays all-zero.
        normalize(next);
        freqs.as_mut_slice().copy_from_slice(next);
    }

    /// The next generation of `current`, leaving it untouched.
    pub fn advance(&self, current: &Frequencies) -> Frequencies {
        let mut work = Workspace::new(self.space);
        let mut rv = current.clone();
        self.step(&mut rv, &mut work);
        rv
    }

    /// Apply exactly `generations` steps to `freqs`.
    pub fn run(&self, freqs: &mut Frequencies, generations: u32, work: &mut Workspace) {
        for _ in 0..generations {
            self.step(freqs, work);
        }
    }
}

/// Iterate the recurrence a fixed number of generations.
///
/// There is no convergence test: the generation count alone stands in
/// for "equilibrium".
pub fn iterate(engine: &Recurrence, initial: Frequencies, generations: u32) -> Frequencies {
    let mut work = Workspace::new(engine.space());
    let mut rv = initial;
    engine.run(&mut rv, generations, &mut work);
    rv
}
