//! # Frame Processing Module
//!
//! Assembles fingerprints for single analysis frames: runs the configured
//! spectral estimation backend, dispatches to the configured key pipeline
//! and stamps the result with the frame's timestamp. Nothing is held across
//! frames, so independent frames may be fingerprinted concurrently.

use anyhow::Result;
use tracing::debug;

use crate::Fingerprint;
use crate::config::{Config, KeyStrategy};
use crate::key;
use crate::selection;
use crate::spectrum::{self, FrameBuffer, SpectralEstimator};
use crate::transcription;

/// Per-frame fingerprint assembler.
///
/// Couples a validated [`Config`] with the spectral estimation backend the
/// host selected for `config.spectral_estimator`.
pub struct Fingerprinter {
    config: Config,
    estimator: Box<dyn SpectralEstimator + Send + Sync>,
}

impl Fingerprinter {
    /// Builds an assembler, validating the configuration exactly once.
    ///
    /// # Arguments
    /// * `config` - Pipeline selection and tunables
    /// * `estimator` - Backend matching `config.spectral_estimator`
    ///
    /// # Returns
    /// * `Ok(fingerprinter)` - Ready to process frames
    /// * `Err(e)` - The configuration is invalid; the host should abort
    pub fn new(
        config: Config,
        estimator: Box<dyn SpectralEstimator + Send + Sync>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    /// The configuration this assembler runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fingerprints one analysis frame.
    ///
    /// Returns `None` when the frame carries insufficient signal for the
    /// configured pipeline: nothing cleared the admissibility floors, or a
    /// hash pipeline found fewer peaks than required. Callers are expected
    /// to skip such frames.
    pub fn fingerprint(&self, frame: &FrameBuffer, sample_rate: u32) -> Option<Fingerprint> {
        let spectrum = self.estimator.estimate(frame, sample_rate);
        spectrum::log_spectrum_stats(
            &spectrum,
            self.config.power_floor,
            self.config.frequency_floor,
        );

        match self.config.key_strategy {
            KeyStrategy::PowerKey => {
                let transcription = transcription::transcribe(&spectrum, &self.config)?;
                debug!("transcription: {transcription}");
                Some(Fingerprint {
                    key: key::power_key(&transcription),
                    timestamp: frame.timestamp,
                    candidates: None,
                    transcription: Some(transcription),
                })
            }
            KeyStrategy::HashTopN => {
                let candidates = selection::select_top(&spectrum, &self.config)?;
                Some(Fingerprint {
                    key: key::hash_key(&candidates),
                    timestamp: frame.timestamp,
                    candidates: Some(candidates),
                    transcription: None,
                })
            }
            KeyStrategy::HashBanded => {
                let nyquist = sample_rate as f32 / 2.0;
                let candidates = selection::select_banded(&spectrum, nyquist, &self.config);
                if candidates.len() < self.config.required_candidates {
                    return None;
                }
                Some(Fingerprint {
                    key: key::hash_key(&candidates),
                    timestamp: frame.timestamp,
                    candidates: Some(candidates),
                    transcription: None,
                })
            }
        }
    }
}
