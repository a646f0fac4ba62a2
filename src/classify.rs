use std::fmt;

use crate::genotype::Aggregates;

/// Long-run mating system of a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// No morph above threshold.
    #[default]
    None,
    /// Pseudo-gynodioecy: females and inconstants.
    Pgd,
    /// Stable coexistence of all three morphs.
    Ssd,
    /// Dioecy: females and males.
    Dio,
    /// Males and inconstants.
    Pad,
    /// Inconstants only.
    Inc,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::None => "NONE",
            Classification::Pgd => "PGD",
            Classification::Ssd => "SSD",
            Classification::Dio => "DIO",
            Classification::Pad => "PAD",
            Classification::Inc => "INC",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduce morph frequencies to a label. The first matching rule wins.
pub fn classify(aggregates: Aggregates, threshold: f64) -> Classification {
    let female = aggregates.female > threshold;
    let male = aggregates.male > threshold;
    let inconstant = aggregates.inconstant > threshold;

    if male && female && inconstant {
        Classification::Ssd
    } else if male && female {
        Classification::Dio
    } else if female && inconstant {
        Classification::Pgd
    } else if male && inconstant {
        Classification::Pad
    } else if inconstant {
        Classification::Inc
    } else {
        Classification::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn agg(female: f64, male: f64, inconstant: f64) -> Aggregates {
        Aggregates {
            female,
            male,
            inconstant,
        }
    }

    #[test]
    fn test_each_label() {
        let t = 0.01;
        assert_eq!(classify(agg(0.3, 0.3, 0.4), t), Classification::Ssd);
        assert_eq!(classify(agg(0.5, 0.5, 0.0), t), Classification::Dio);
        assert_eq!(classify(agg(0.5, 0.0, 0.5), t), Classification::Pgd);
        assert_eq!(classify(agg(0.0, 0.5, 0.5), t), Classification::Pad);
        assert_eq!(classify(agg(0.0, 0.0, 1.0), t), Classification::Inc);
        assert_eq!(classify(agg(1.0, 0.0, 0.0), t), Classification::None);
        assert_eq!(classify(agg(0.0, 1.0, 0.0), t), Classification::None);
        assert_eq!(classify(agg(0.0, 0.0, 0.0), t), Classification::None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let t = 0.01;
        assert_eq!(classify(agg(0.01, 0.99, 0.01), t), Classification::None);
        assert_eq!(classify(agg(0.5, 0.5, 0.01), t), Classification::Dio);
    }

    proptest! {
        #[test]
        fn test_coexistence_wins(threshold in 0.0..0.3_f64, eps in 1e-9..0.01_f64) {
            let x = threshold + eps;
            assert_eq!(classify(agg(x, x, x), threshold), Classification::Ssd);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Classification::Ssd.to_string(), "SSD");
        assert_eq!(Classification::None.to_string(), "NONE");
    }
}
