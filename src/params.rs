/// Reproductive parameters shared by every generation of a run.
///
/// Field names follow the usual notation of the model.
#[allow(non_snake_case)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModelParams {
    /// Probability that an inconstant reproduces as a cosex.
    pub h: f64,
    /// Selfing rate of cosexes.
    pub S: f64,
    /// Inbreeding depression of selfed offspring.
    pub d: f64,
    /// Viability of the YY-equivalent class.
    pub V: f64,
    /// Cosex pollen output relative to a male.
    pub Q: f64,
    /// Cosex ovule output relative to a female.
    pub F: f64,
    /// Population pollen output saturating female ovules; 0 disables
    /// pollen limitation.
    pub PSatF: f64,
    /// Viability of pollen carrying the recessive sex allele.
    pub ppY: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            h: 0.5,
            S: 0.0,
            d: 0.0,
            V: 1.0,
            Q: 1.0,
            F: 1.0,
            PSatF: 0.0,
            ppY: 1.0,
        }
    }
}

impl ModelParams {
    /// Same record with the cosex outputs replaced, as done per grid cell.
    pub fn with_outputs(self, q: f64, f: f64) -> Self {
        Self { Q: q, F: f, ..self }
    }

    /// Pollen needed to saturate the outcrossed ovules of a cosex.
    pub fn cosex_saturation(&self) -> f64 {
        self.PSatF * self.F * (1.0 - self.S)
    }

    /// K, the male-side parameter of Ehlers & Bataillon.
    pub fn male_k(&self) -> f64 {
        1.0 / self.Q - 1.0
    }

    /// k, the female-side parameter of Ehlers & Bataillon.
    pub fn female_k(&self) -> f64 {
        1.0 / self.F - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = ModelParams::default();
        assert_eq!(p.h, 0.5);
        assert_eq!(p.V, 1.0);
        assert_eq!(p.PSatF, 0.0);
        assert_eq!(p.cosex_saturation(), 0.0);
    }

    #[test]
    fn test_with_outputs() {
        let p = ModelParams {
            S: 0.5,
            PSatF: 2.0,
            ..Default::default()
        }
        .with_outputs(0.2, 0.4);
        assert_eq!(p.Q, 0.2);
        assert_eq!(p.F, 0.4);
        assert_eq!(p.S, 0.5);
        assert!((p.cosex_saturation() - 0.4).abs() < 1e-12);
        assert!((p.male_k() - 4.0).abs() < 1e-12);
        assert!((p.female_k() - 1.5).abs() < 1e-12);
    }
}
