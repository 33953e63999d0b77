//! # Spectral Input Module
//!
//! Carries one frame's power spectral estimate into the fingerprinting
//! pipeline. The estimate itself is produced by an external backend behind
//! the [`SpectralEstimator`] trait; this module defines the data crossing
//! that seam, the admissibility floors applied to it, and the coarse
//! frequency grid that absorbs estimator jitter.

use tracing::{Level, debug, enabled};

/// One raw audio analysis frame handed to the estimator.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// PCM samples of the analysis window.
    pub samples: Vec<f32>,
    /// Seconds from the start of the stream.
    pub timestamp: f64,
}

/// A single bin of a power spectral estimate.
#[derive(Debug, Clone, Copy)]
pub struct SpectralSample {
    /// Bin frequency in Hz.
    pub frequency: f32,
    /// Signal power at that frequency.
    pub power: f32,
}

impl SpectralSample {
    /// Whether this sample clears both admissibility floors: power strictly
    /// above the power floor, frequency strictly above the frequency floor.
    /// The frequency floor keeps DC and sub-audio artifacts out of every
    /// selection step.
    pub fn passes_floors(&self, power_floor: f32, frequency_floor: f32) -> bool {
        self.power > power_floor && self.frequency > frequency_floor
    }
}

/// Power spectral estimate of one analysis frame.
///
/// Powers and frequencies are parallel sequences, as delivered by the
/// estimation backends.
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    pub powers: Vec<f32>,
    pub frequencies: Vec<f32>,
}

impl Spectrum {
    pub fn new(powers: Vec<f32>, frequencies: Vec<f32>) -> Self {
        Self { powers, frequencies }
    }

    /// Iterates the estimate as (frequency, power) samples.
    pub fn samples(&self) -> impl Iterator<Item = SpectralSample> + '_ {
        self.frequencies
            .iter()
            .zip(self.powers.iter())
            .map(|(&frequency, &power)| SpectralSample { frequency, power })
    }
}

/// A spectral estimation backend.
///
/// Implementations live outside this crate (Welch's method, windowed
/// overlap analysis); the pipeline only consumes the (frequency, power)
/// sequences they produce. An implementation must be a pure function of the
/// frame it is given, holding no state across calls.
pub trait SpectralEstimator {
    /// Estimates the power spectrum of one analysis frame.
    fn estimate(&self, frame: &FrameBuffer, sample_rate: u32) -> Spectrum;
}

/// Rounds a frequency to the nearest multiple of `step` Hz, halves rounding
/// up.
///
/// Repeated analyses of correlated audio jitter by a few Hz; snapping to a
/// coarse grid keeps the same true tone on an identical value so that keys
/// derived from it stay stable.
pub fn quantize_frequency(frequency: f32, step: f32) -> f32 {
    (frequency / step + 0.5).floor() * step
}

/// Logs a power distribution summary of the admissible part of a spectrum.
/// The summary pass is skipped entirely unless debug logging is enabled.
pub fn log_spectrum_stats(spectrum: &Spectrum, power_floor: f32, frequency_floor: f32) {
    if !enabled!(Level::DEBUG) {
        return;
    }

    let mut count = 0usize;
    let mut sum = 0.0f32;
    let mut strongest: Option<SpectralSample> = None;
    let mut weakest: Option<SpectralSample> = None;

    for sample in spectrum.samples() {
        if !sample.passes_floors(power_floor, frequency_floor) {
            continue;
        }
        count += 1;
        sum += sample.power;
        if strongest.map_or(true, |top| sample.power > top.power) {
            strongest = Some(sample);
        }
        if weakest.map_or(true, |bottom| sample.power < bottom.power) {
            weakest = Some(sample);
        }
    }

    if let (Some(top), Some(bottom)) = (strongest, weakest) {
        debug!(
            "spectrum: {} admissible bins, top {:.1} Hz ({:.1}), bottom {:.1} Hz ({:.1}), mean power {:.1}",
            count,
            top.frequency,
            top.power,
            bottom.frequency,
            bottom.power,
            sum / count as f32
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_rounds_half_up() {
        assert_eq!(quantize_frequency(445.0, 10.0), 450.0);
        assert_eq!(quantize_frequency(444.9, 10.0), 440.0);
    }

    #[test]
    fn quantize_is_exact_on_grid_values() {
        assert_eq!(quantize_frequency(440.0, 10.0), 440.0);
        assert_eq!(quantize_frequency(0.0, 10.0), 0.0);
    }

    #[test]
    fn quantize_honours_the_grid_size() {
        assert_eq!(quantize_frequency(442.0, 5.0), 440.0);
        assert_eq!(quantize_frequency(443.0, 5.0), 445.0);
    }

    #[test]
    fn samples_zip_the_parallel_sequences() {
        let spectrum = Spectrum::new(vec![10.0, 20.0], vec![100.0, 200.0]);
        let samples: Vec<SpectralSample> = spectrum.samples().collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].frequency, 100.0);
        assert_eq!(samples[0].power, 10.0);
        assert_eq!(samples[1].frequency, 200.0);
        assert_eq!(samples[1].power, 20.0);
    }

    #[test]
    fn floors_are_strict() {
        let on_the_floor = SpectralSample { frequency: 440.0, power: 100.0 };
        assert!(!on_the_floor.passes_floors(100.0, 0.0));

        let above = SpectralSample { frequency: 440.0, power: 100.1 };
        assert!(above.passes_floors(100.0, 0.0));

        let dc = SpectralSample { frequency: 0.0, power: 500.0 };
        assert!(!dc.passes_floors(100.0, 0.0));
    }
}
