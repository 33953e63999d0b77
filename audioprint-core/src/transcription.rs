//! # Transcription Module
//!
//! Folds a frame's spectral estimate into a fixed table of 12 chroma bins,
//! keeping the strongest admissible component observed for each pitch
//! class. The table is the input of the power key pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;
use crate::pitch::{self, PITCH_CLASS_COUNT, PitchClass};
use crate::spectrum::{Spectrum, quantize_frequency};

/// The strongest admissible component observed for one pitch class within a
/// frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChromaBin {
    pub pitch_class: PitchClass,
    /// Quantized frequency of the retained component; 0 while the bin is
    /// empty.
    pub frequency: f32,
    /// Power of the retained component; 0 while the bin is empty.
    pub strength: f32,
}

impl ChromaBin {
    fn empty(pitch_class: PitchClass) -> Self {
        Self {
            pitch_class,
            frequency: 0.0,
            strength: 0.0,
        }
    }

    /// Whether no component has been committed to this bin.
    pub fn is_empty(&self) -> bool {
        self.strength == 0.0
    }
}

/// Per-frame table of the strongest component for each of the 12 pitch
/// classes. Bin `i` always carries pitch class `i`, populated or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    bins: [ChromaBin; PITCH_CLASS_COUNT],
}

impl Transcription {
    pub(crate) fn empty() -> Self {
        Self {
            bins: PitchClass::ALL.map(ChromaBin::empty),
        }
    }

    /// Bins in chroma order, A through G#.
    pub fn bins(&self) -> &[ChromaBin] {
        &self.bins
    }

    /// The bin of one pitch class.
    pub fn bin(&self, pitch_class: PitchClass) -> &ChromaBin {
        &self.bins[pitch_class.index()]
    }

    /// Strength of the strongest populated bin, 0 when all bins are empty.
    pub fn max_strength(&self) -> f32 {
        self.bins.iter().map(|bin| bin.strength).fold(0.0, f32::max)
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bin in &self.bins {
            write!(f, "[{}] {:6.1} ", bin.pitch_class, bin.frequency)?;
        }
        Ok(())
    }
}

/// Folds a spectral estimate into chroma bins.
///
/// Each sample in arrival order is classified and competes for its class's
/// bin: it is committed only when its power is strictly greater than the
/// bin's current strength and it clears both admissibility floors. The
/// strict comparison makes the first-seen sample win between equal-power
/// components of the same class. A commit overwrites the bin's pitch class,
/// quantized frequency and strength together.
///
/// Returns `None` when no sample was committed at all; a silent or
/// sub-threshold frame has no meaningful transcription.
pub fn transcribe(spectrum: &Spectrum, config: &Config) -> Option<Transcription> {
    let mut transcription = Transcription::empty();
    let mut committed = 0usize;

    for sample in spectrum.samples() {
        let pitch_class = pitch::classify(sample.frequency);
        let bin = &mut transcription.bins[pitch_class.index()];
        if sample.power > bin.strength
            && sample.passes_floors(config.power_floor, config.frequency_floor)
        {
            *bin = ChromaBin {
                pitch_class,
                frequency: quantize_frequency(sample.frequency, config.quantize_step),
                strength: sample.power,
            };
            committed += 1;
        }
    }

    if committed == 0 { None } else { Some(transcription) }
}
