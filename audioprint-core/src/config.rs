//! # Configuration Module
//!
//! Pipeline selection and tunable thresholds for the fingerprinting core.
//! A configuration is validated once at startup and passed immutably into
//! every pipeline call, so the core carries no process-wide state and one
//! process can fingerprint with different tunings concurrently.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which external spectral estimation backend produces the (frequency,
/// power) sequences. The core never inspects the selection beyond passing
/// it through to the host that wires the backend in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Welch's method.
    Welch,
    /// Windowed overlap analysis.
    Overlap,
}

impl FromStr for EstimatorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "welch" => Ok(EstimatorKind::Welch),
            "overlap" => Ok(EstimatorKind::Overlap),
            other => bail!("unrecognised spectral estimator {other:?}"),
        }
    }
}

/// Which pipeline derives the fingerprint key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Chroma transcription folded into a 12 byte scaled strength key.
    PowerKey,
    /// Digest over the strongest peaks across the whole spectrum.
    HashTopN,
    /// Digest over the strongest peak per frequency band.
    HashBanded,
}

impl FromStr for KeyStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "power_key" => Ok(KeyStrategy::PowerKey),
            "hash_top_n" => Ok(KeyStrategy::HashTopN),
            "hash_banded" => Ok(KeyStrategy::HashBanded),
            other => bail!("unrecognised key strategy {other:?}"),
        }
    }
}

/// Immutable tuning for the fingerprinting pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spectral estimation backend the host wires in.
    pub spectral_estimator: EstimatorKind,
    /// Key derivation pipeline.
    pub key_strategy: KeyStrategy,
    /// Samples must exceed this power to take part in any selection.
    pub power_floor: f32,
    /// Samples must exceed this frequency; keeps DC and sub-audio artifacts
    /// out of the pipeline.
    pub frequency_floor: f32,
    /// Number of peaks a hash key needs.
    pub required_candidates: usize,
    /// Grid size in Hz for frequency quantization.
    pub quantize_step: f32,
    /// Minimum time difference between key matches for downstream temporal
    /// hit counting. Carried for consumers; not enforced by this crate.
    pub time_delta_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spectral_estimator: EstimatorKind::Welch,
            key_strategy: KeyStrategy::PowerKey,
            power_floor: 100.0,
            frequency_floor: 0.0,
            required_candidates: 4,
            quantize_step: 10.0,
            time_delta_threshold: 0.2,
        }
    }
}

impl Config {
    /// Checks the numeric tunables. Run once at startup: a failure here is
    /// a deployment mistake, and the host is expected to abort rather than
    /// fingerprint with degraded settings.
    pub fn validate(&self) -> Result<()> {
        if !self.power_floor.is_finite() || self.power_floor < 0.0 {
            bail!(
                "power floor must be finite and non-negative, got {}",
                self.power_floor
            );
        }
        if !self.frequency_floor.is_finite() || self.frequency_floor < 0.0 {
            bail!(
                "frequency floor must be finite and non-negative, got {}",
                self.frequency_floor
            );
        }
        if self.required_candidates == 0 {
            bail!("required candidate count must be at least 1");
        }
        if !self.quantize_step.is_finite() || self.quantize_step <= 0.0 {
            bail!(
                "quantization step must be finite and positive, got {}",
                self.quantize_step
            );
        }
        if !self.time_delta_threshold.is_finite() || self.time_delta_threshold < 0.0 {
            bail!(
                "time delta threshold must be finite and non-negative, got {}",
                self.time_delta_threshold
            );
        }
        Ok(())
    }
}
