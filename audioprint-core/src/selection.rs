//! # Candidate Selection Module
//!
//! Picks a small set of salient spectral peaks for the hash key pipelines,
//! as an alternative to chroma folding. Two strategies: the strongest peaks
//! across the whole spectrum, or the strongest peak within each of four
//! frequency bands.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::config::Config;
use crate::spectrum::{SpectralSample, Spectrum, quantize_frequency};

/// Number of equal width bands the spectrum is split into for banded
/// selection. Deliberately independent of the required candidate count.
const FREQUENCY_BANDS: usize = 4;

/// A salient spectral peak retained for fingerprinting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candidate {
    /// Quantized peak frequency in Hz.
    pub frequency: f32,
    /// Power of the peak.
    pub power: f32,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:9.2} ({:.2})", self.frequency, self.power)
    }
}

fn by_descending_power(a: &Candidate, b: &Candidate) -> Ordering {
    b.power.partial_cmp(&a.power).unwrap_or(Ordering::Equal)
}

fn by_descending_frequency(a: &Candidate, b: &Candidate) -> Ordering {
    b.frequency.partial_cmp(&a.frequency).unwrap_or(Ordering::Equal)
}

/// Selects the strongest `required_candidates` peaks across the spectrum.
///
/// Samples clearing the admissibility floors are ranked by power and the
/// strongest ones kept, then re-sorted by descending frequency: the final
/// ordering is governed by pitch rather than by the accidental ranking of
/// near-tied powers.
///
/// Returns `None` when fewer samples qualify than the required count.
pub fn select_top(spectrum: &Spectrum, config: &Config) -> Option<Vec<Candidate>> {
    let mut candidates: Vec<Candidate> = spectrum
        .samples()
        .filter(|sample| sample.passes_floors(config.power_floor, config.frequency_floor))
        .map(|sample| Candidate {
            frequency: quantize_frequency(sample.frequency, config.quantize_step),
            power: sample.power,
        })
        .collect();

    if candidates.len() < config.required_candidates {
        return None;
    }

    candidates.sort_by(by_descending_power);
    candidates.truncate(config.required_candidates);

    // Order by pitch so minor power variance between peaks cannot reshuffle
    // the key input.
    candidates.sort_by(by_descending_frequency);

    Some(candidates)
}

/// Band index of a frequency on a grid of `FREQUENCY_BANDS` equal width
/// bands between the frequency floor and the Nyquist limit. The top edge
/// is clamped into the last band.
fn frequency_band(frequency: f32, frequency_floor: f32, nyquist: f32) -> usize {
    let offset = frequency - frequency_floor;
    let range = nyquist - frequency_floor;
    let band = (FREQUENCY_BANDS as f32 * offset / range + 0.5) as usize;
    band.min(FREQUENCY_BANDS - 1)
}

/// Selects the strongest admissible peak within each frequency band.
///
/// Emits one candidate per non-empty band sorted by descending frequency:
/// between zero and `FREQUENCY_BANDS` results. Unlike [`select_top`] there
/// is no minimum count at this level; callers decide whether a sparse frame
/// is usable.
pub fn select_banded(spectrum: &Spectrum, nyquist: f32, config: &Config) -> Vec<Candidate> {
    if nyquist <= config.frequency_floor {
        return Vec::new();
    }

    let mut strongest: [Option<SpectralSample>; FREQUENCY_BANDS] = [None; FREQUENCY_BANDS];
    for sample in spectrum.samples() {
        if !sample.passes_floors(config.power_floor, config.frequency_floor) {
            continue;
        }
        let band = frequency_band(sample.frequency, config.frequency_floor, nyquist);
        if strongest[band].map_or(true, |current| sample.power > current.power) {
            strongest[band] = Some(sample);
        }
    }

    let mut candidates: Vec<Candidate> = strongest
        .iter()
        .flatten()
        .map(|sample| Candidate {
            frequency: quantize_frequency(sample.frequency, config.quantize_step),
            power: sample.power,
        })
        .collect();
    candidates.sort_by(by_descending_frequency);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nyquist limit of the 11025 Hz analysis rate.
    const NYQUIST: f32 = 5512.5;

    fn spectrum_of(bins: &[(f32, f32)]) -> Spectrum {
        Spectrum::new(
            bins.iter().map(|bin| bin.1).collect(),
            bins.iter().map(|bin| bin.0).collect(),
        )
    }

    #[test]
    fn top_selection_needs_the_required_count() {
        let spectrum = spectrum_of(&[(440.0, 200.0), (880.0, 300.0), (1320.0, 150.0)]);
        assert!(select_top(&spectrum, &Config::default()).is_none());
    }

    #[test]
    fn top_selection_keeps_the_strongest_and_orders_by_frequency() {
        let spectrum = spectrum_of(&[
            (440.0, 200.0),
            (880.0, 300.0),
            (1320.0, 150.0),
            (2000.0, 500.0),
            (3000.0, 120.0),
        ]);
        let candidates = select_top(&spectrum, &Config::default()).unwrap();

        assert_eq!(candidates.len(), 4);
        let frequencies: Vec<f32> = candidates.iter().map(|c| c.frequency).collect();
        assert_eq!(frequencies, [2000.0, 1320.0, 880.0, 440.0]);
    }

    #[test]
    fn top_selection_ignores_samples_on_the_floor() {
        // The 2000 Hz bin sits exactly on the power floor and is excluded.
        let spectrum = spectrum_of(&[
            (440.0, 200.0),
            (880.0, 300.0),
            (1320.0, 150.0),
            (2000.0, 100.0),
        ]);
        assert!(select_top(&spectrum, &Config::default()).is_none());
    }

    #[test]
    fn top_selection_quantizes_candidate_frequencies() {
        let spectrum = spectrum_of(&[
            (444.9, 200.0),
            (885.0, 300.0),
            (1323.0, 150.0),
            (2001.0, 500.0),
        ]);
        let candidates = select_top(&spectrum, &Config::default()).unwrap();
        let frequencies: Vec<f32> = candidates.iter().map(|c| c.frequency).collect();
        assert_eq!(frequencies, [2000.0, 1320.0, 890.0, 440.0]);
    }

    #[test]
    fn banded_selection_caps_at_one_candidate_per_band() {
        let spectrum = spectrum_of(&[
            (100.0, 200.0),
            (150.0, 400.0),
            (700.0, 300.0),
            (2000.0, 250.0),
            (2756.0, 150.0),
            (4000.0, 500.0),
            (5000.0, 450.0),
            (5500.0, 480.0),
        ]);
        let candidates = select_banded(&spectrum, NYQUIST, &Config::default());

        assert_eq!(candidates.len(), 4);
        let frequencies: Vec<f32> = candidates.iter().map(|c| c.frequency).collect();
        assert_eq!(frequencies, [4000.0, 2760.0, 700.0, 150.0]);
    }

    #[test]
    fn banded_selection_returns_whatever_bands_are_populated() {
        let spectrum = spectrum_of(&[(440.0, 200.0)]);
        let candidates = select_banded(&spectrum, NYQUIST, &Config::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].frequency, 440.0);
    }

    #[test]
    fn banded_selection_is_empty_for_sub_floor_frames() {
        let spectrum = spectrum_of(&[(440.0, 50.0), (880.0, 100.0)]);
        assert!(select_banded(&spectrum, NYQUIST, &Config::default()).is_empty());
    }

    #[test]
    fn band_grid_covers_the_top_edge() {
        assert_eq!(frequency_band(NYQUIST, 0.0, NYQUIST), FREQUENCY_BANDS - 1);
        assert_eq!(frequency_band(1.0, 0.0, NYQUIST), 0);
    }
}
