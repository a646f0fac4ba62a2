//! Everything that leaves the process: the bitmap, the tab-separated
//! female grid for gnuplot, and the single-run report.

use std::fmt;
use std::io::Write;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::classify::Classification;
use crate::error::SweepError;
use crate::genotype::{ModelVariant, StartingRegime};
use crate::grid::Grid;
use crate::params::ModelParams;
use crate::sweep::RunOutcome;

pub fn colour(label: Classification) -> Rgb<u8> {
    match label {
        Classification::Pgd => Rgb([255, 127, 127]),
        Classification::Dio => Rgb([127, 0, 255]),
        Classification::Ssd => Rgb([255, 255, 0]),
        Classification::Pad => Rgb([180, 180, 255]),
        Classification::Inc => Rgb([255, 255, 255]),
        Classification::None => Rgb([0, 0, 0]),
    }
}

/// One `magnify` x `magnify` block per cell, with `y = 0` at the bottom.
pub fn render_bitmap(labels: &Grid<Classification>, magnify: usize) -> RgbImage {
    let magnify = magnify.max(1);
    let side = labels.size() * magnify;
    RgbImage::from_fn(side as u32, side as u32, |px, py| {
        let x = px as usize / magnify;
        let y = (side - 1 - py as usize) / magnify;
        labels.get(x, y).copied().map(colour).unwrap_or(Rgb([0, 0, 0]))
    })
}

/// Write an uncompressed 24-bit BMP.
pub fn save_bitmap(
    path: &Path,
    labels: &Grid<Classification>,
    magnify: usize,
) -> Result<(), SweepError> {
    render_bitmap(labels, magnify).save_with_format(path, ImageFormat::Bmp)?;
    Ok(())
}

/// One line per grid row, tab-separated, six decimals.
pub fn write_female_tsv<W: Write>(out: &mut W, female: &Grid<f64>) -> std::io::Result<()> {
    for row in female.rows() {
        let line = row
            .iter()
            .map(|f| format!("{:.6}", f))
            .collect::<Vec<String>>()
            .join("\t");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn save_female_tsv(path: &Path, female: &Grid<f64>) -> Result<(), SweepError> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_female_tsv(&mut out, female)?;
    out.flush()?;
    Ok(())
}

/// File name without extension, built from the run settings.
pub fn output_stem(variant: ModelVariant, regime: StartingRegime, params: &ModelParams) -> String {
    format!(
        "model{}_start{}_V{}_S{}_d{}_h{}_PSatF{}_ppY{}",
        variant.number(),
        regime.label(),
        params.V,
        params.S,
        params.d,
        params.h,
        params.PSatF,
        params.ppY
    )
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Females       Males         Inconstants")?;
        writeln!(
            f,
            "{:.6}      {:.6}      {:.6}",
            self.aggregates.female, self.aggregates.male, self.aggregates.inconstant
        )?;
        writeln!(f)?;

        let genotypes = self.variant.space().genotypes();
        writeln!(
            f,
            "Genotype frequencies, as notated by E&B (2007), or C&C (2012):"
        )?;
        writeln!(f)?;
        write!(f, "E&B:  ")?;
        for genotype in genotypes {
            write!(f, "{:<10}", genotype.name)?;
        }
        writeln!(f)?;
        write!(f, "C&C:  ")?;
        for genotype in genotypes {
            write!(f, "{:<10}", genotype.alt_name)?;
        }
        writeln!(f)?;
        write!(f, "      ")?;
        for freq in self.frequencies.as_slice() {
            write!(f, "{:<10.6}", freq)?;
        }
        writeln!(f)?;
        writeln!(f)?;

        let label = match self.classification {
            Classification::None => "???",
            other => other.label(),
        };
        write!(f, "Final state: {}", label)
    }
}
