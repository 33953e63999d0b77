// audioprint-core/src/lib.rs

//! The core logic for audio fingerprinting. This crate converts a frame's
//! power spectral estimate into a compact, noise tolerant identifying key
//! for matching near identical audio segments across distinct recordings.
//! It is completely headless and performs no I/O: spectral estimation, PCM
//! capture and fingerprint storage belong to its collaborators.

pub mod config;
pub mod frame_processing;
pub mod key;
pub mod pitch;
pub mod selection;
pub mod spectrum;
pub mod transcription;

use serde::{Deserialize, Serialize};

use crate::selection::Candidate;
use crate::transcription::Transcription;

/// Fingerprint of one block of audio data.
///
/// Exactly one of `candidates` / `transcription` is populated, depending on
/// which pipeline derived the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Lookup key: 12 scaled strengths for a power key, a 20 byte digest
    /// for a hash key.
    pub key: Vec<u8>,
    /// Seconds from the start of the stream.
    pub timestamp: f64,
    /// The peaks behind a hash key; `None` for power keys.
    pub candidates: Option<Vec<Candidate>>,
    /// The chroma table behind a power key; `None` for hash keys.
    pub transcription: Option<Transcription>,
}

/// The data that a fingerprint key maps to in a reference store.
///
/// Consumers build and persist these records; this crate only produces the
/// keys that join to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub filename: String,
    pub timestamp: f64,
}
