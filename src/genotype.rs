//! Genotype spaces of the two Ehlers & Bataillon (2007) models.
//!
//! A [`GenotypeSpace`] is pure data: the genotypes, the gamete
//! (allele-combination) bins they produce, the zygote table that maps
//! a pair of bins back onto a genotype, and the two fixed starting
//! conditions. The recurrence in [`crate::recurrence`] is written
//! once against this description.

/// How an individual of a genotype reproduces.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Morph {
    /// Ovules only.
    Female,
    /// Pollen only.
    Male,
    /// A cosex with probability `h`, otherwise a male.
    Inconstant,
}

/// One pollen/egg bin.
#[derive(Copy, Clone, Debug)]
pub struct Gamete {
    pub label: &'static str,
    /// Carries the recessive sex-determining allele, so its pollen is
    /// subject to `ppY` when the model honours pollen viability.
    pub carries_y: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct Genotype {
    /// Ehlers & Bataillon (2007) notation.
    pub name: &'static str,
    /// Crossman & Charlesworth (2012) notation.
    pub alt_name: &'static str,
    pub morph: Morph,
    /// Mendelian gamete output as `(bin, fraction)`; fractions sum to 1.
    pub gametes: &'static [(usize, f64)],
    /// Homozygous for the recessive sex allele (the YY-equivalent class).
    pub yy: bool,
}

/// Which fixed initial condition a run starts from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StartingRegime {
    /// Dioecy with a few inconstants trying to invade.
    #[default]
    Dioecy,
    /// Pseudo-gynodioecy with a few males trying to invade.
    PseudoGynodioecy,
}

impl StartingRegime {
    pub fn label(self) -> &'static str {
        match self {
            StartingRegime::Dioecy => "DIO",
            StartingRegime::PseudoGynodioecy => "PGD",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ModelVariant {
    /// Model 1: a single sex locus with alleles A, a and a*.
    #[default]
    OneLocus,
    /// Model 2: a sex locus (A/a) and an inconstancy modifier (M/m).
    TwoLocus,
}

impl ModelVariant {
    pub fn from_number(model: u8) -> Option<Self> {
        match model {
            1 => Some(ModelVariant::OneLocus),
            2 => Some(ModelVariant::TwoLocus),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            ModelVariant::OneLocus => 1,
            ModelVariant::TwoLocus => 2,
        }
    }

    pub fn space(self) -> &'static GenotypeSpace {
        match self {
            ModelVariant::OneLocus => &ONE_LOCUS,
            ModelVariant::TwoLocus => &TWO_LOCUS,
        }
    }
}

/// Sum of frequencies per sex morph.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aggregates {
    pub female: f64,
    pub male: f64,
    pub inconstant: f64,
}

/// Genotype frequencies, indexed like [`GenotypeSpace::genotypes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frequencies(Vec<f64>);

impl Frequencies {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_extinct(&self) -> bool {
        self.0.iter().all(|f| *f == 0.0)
    }
}

/// Rescale `values` to sum to one when their total is positive.
/// Returns the raw total; a non-positive total leaves `values` untouched.
pub fn normalize(values: &mut [f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
    total
}

pub struct GenotypeSpace {
    variant: ModelVariant,
    genotypes: &'static [Genotype],
    gametes: &'static [Gamete],
    /// `zygotes[pollen][egg]` is the offspring genotype index.
    zygotes: &'static [&'static [usize]],
    pollen_viability: bool,
    dioecy_start: &'static [f64],
    pgd_start: &'static [f64],
}

impl GenotypeSpace {
    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn genotypes(&self) -> &[Genotype] {
        self.genotypes
    }

    pub fn gametes(&self) -> &[Gamete] {
        self.gametes
    }

    pub fn num_genotypes(&self) -> usize {
        self.genotypes.len()
    }

    pub fn num_bins(&self) -> usize {
        self.gametes.len()
    }

    pub fn zygote(&self, pollen: usize, egg: usize) -> usize {
        self.zygotes[pollen][egg]
    }

    /// Whether `ppY` takes part in this model.
    pub fn honours_pollen_viability(&self) -> bool {
        self.pollen_viability
    }

    pub fn initial(&self, regime: StartingRegime) -> Frequencies {
        match regime {
            StartingRegime::Dioecy => Frequencies::new(self.dioecy_start.to_vec()),
            StartingRegime::PseudoGynodioecy => Frequencies::new(self.pgd_start.to_vec()),
        }
    }

    pub fn aggregate(&self, freqs: &Frequencies) -> Aggregates {
        let mut rv = Aggregates::default();
        for (genotype, f) in self.genotypes.iter().zip(freqs.as_slice()) {
            match genotype.morph {
                Morph::Female => rv.female += f,
                Morph::Male => rv.male += f,
                Morph::Inconstant => rv.inconstant += f,
            }
        }
        rv
    }
}

// Model 1 bins: A, a, a*
const ONE_LOCUS_GAMETES: [Gamete; 3] = [
    Gamete {
        label: "A",
        carries_y: false,
    },
    Gamete {
        label: "a",
        carries_y: true,
    },
    Gamete {
        label: "a*",
        carries_y: true,
    },
];

const ONE_LOCUS_GENOTYPES: [Genotype; 6] = [
    Genotype {
        name: "AA",
        alt_name: "mm",
        morph: Morph::Female,
        gametes: &[(0, 1.0)],
        yy: false,
    },
    Genotype {
        name: "Aa",
        alt_name: "Mm",
        morph: Morph::Male,
        gametes: &[(0, 0.5), (1, 0.5)],
        yy: false,
    },
    Genotype {
        name: "Aa*",
        alt_name: "M*m",
        morph: Morph::Inconstant,
        gametes: &[(0, 0.5), (2, 0.5)],
        yy: false,
    },
    Genotype {
        name: "aa",
        alt_name: "MM",
        morph: Morph::Male,
        gametes: &[(1, 1.0)],
        yy: true,
    },
    Genotype {
        name: "aa*",
        alt_name: "M*M",
        morph: Morph::Inconstant,
        gametes: &[(1, 0.5), (2, 0.5)],
        yy: true,
    },
    Genotype {
        name: "a*a*",
        alt_name: "M*M*",
        morph: Morph::Inconstant,
        gametes: &[(2, 1.0)],
        yy: true,
    },
];

const ONE_LOCUS_ZYGOTES: [&[usize]; 3] = [&[0, 1, 2], &[1, 3, 4], &[2, 4, 5]];

pub static ONE_LOCUS: GenotypeSpace = GenotypeSpace {
    variant: ModelVariant::OneLocus,
    genotypes: &ONE_LOCUS_GENOTYPES,
    gametes: &ONE_LOCUS_GAMETES,
    zygotes: &ONE_LOCUS_ZYGOTES,
    pollen_viability: true,
    dioecy_start: &[0.499, 0.499, 0.002, 0.0, 0.0, 0.0],
    pgd_start: &[0.499, 0.002, 0.499, 0.0, 0.0, 0.0],
};

// Model 2 bins: AM, Am, aM, am
const TWO_LOCUS_GAMETES: [Gamete; 4] = [
    Gamete {
        label: "A M",
        carries_y: false,
    },
    Gamete {
        label: "A m",
        carries_y: false,
    },
    Gamete {
        label: "a M",
        carries_y: true,
    },
    Gamete {
        label: "a m",
        carries_y: true,
    },
];

const TWO_LOCUS_GENOTYPES: [Genotype; 9] = [
    Genotype {
        name: "AA MM",
        alt_name: "mm AA",
        morph: Morph::Female,
        gametes: &[(0, 1.0)],
        yy: false,
    },
    Genotype {
        name: "AA Mm",
        alt_name: "mm Aa",
        morph: Morph::Female,
        gametes: &[(0, 0.5), (1, 0.5)],
        yy: false,
    },
    Genotype {
        name: "AA mm",
        alt_name: "mm aa",
        morph: Morph::Female,
        gametes: &[(1, 1.0)],
        yy: false,
    },
    Genotype {
        name: "Aa MM",
        alt_name: "Mm AA",
        morph: Morph::Inconstant,
        gametes: &[(0, 0.5), (2, 0.5)],
        yy: false,
    },
    Genotype {
        name: "Aa Mm",
        alt_name: "Mm Aa",
        morph: Morph::Inconstant,
        gametes: &[(0, 0.25), (1, 0.25), (2, 0.25), (3, 0.25)],
        yy: false,
    },
    Genotype {
        name: "Aa mm",
        alt_name: "Mm aa",
        morph: Morph::Male,
        gametes: &[(1, 0.5), (3, 0.5)],
        yy: false,
    },
    Genotype {
        name: "aa MM",
        alt_name: "MM AA",
        morph: Morph::Inconstant,
        gametes: &[(2, 1.0)],
        yy: true,
    },
    Genotype {
        name: "aa Mm",
        alt_name: "MM Aa",
        morph: Morph::Inconstant,
        gametes: &[(2, 0.5), (3, 0.5)],
        yy: true,
    },
    Genotype {
        name: "aa mm",
        alt_name: "MM aa",
        morph: Morph::Male,
        gametes: &[(3, 1.0)],
        yy: true,
    },
];

// Offspring index is 3 * (number of a alleles) + (number of m alleles).
const TWO_LOCUS_ZYGOTES: [&[usize]; 4] = [
    &[0, 1, 3, 4],
    &[1, 2, 4, 5],
    &[3, 4, 6, 7],
    &[4, 5, 7, 8],
];

pub static TWO_LOCUS: GenotypeSpace = GenotypeSpace {
    variant: ModelVariant::TwoLocus,
    genotypes: &TWO_LOCUS_GENOTYPES,
    gametes: &TWO_LOCUS_GAMETES,
    zygotes: &TWO_LOCUS_ZYGOTES,
    pollen_viability: false,
    dioecy_start: &[0.0, 0.0, 0.499, 0.0, 0.002, 0.499, 0.0, 0.0, 0.0],
    pgd_start: &[0.499, 0.0, 0.0, 0.499, 0.0, 0.002, 0.0, 0.0, 0.0],
};
