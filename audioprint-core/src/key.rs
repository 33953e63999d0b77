//! # Key Generation Module
//!
//! Derives the identifying byte key of a fingerprint. Two strategies: a
//! 12 byte scaled strength key over a chroma transcription, tolerant of
//! absolute volume differences between recordings, and a SHA-1 digest over
//! a candidate set, maximally discriminative but sensitive to any single
//! peak moving across a quantization boundary.

use sha1::{Digest, Sha1};

use crate::selection::Candidate;
use crate::transcription::Transcription;

/// Resolution of the power key: the strongest pitch class maps to this
/// value and the rest scale linearly below it.
const POWER_KEY_SCALE: f32 = 8.0;

/// Derives a 12 byte key from a chroma transcription.
///
/// Each pitch class contributes one byte in chroma order, its strength
/// scaled against the strongest bin and rounded into 0..=8. The globally
/// strongest class always contributes 8, so the key captures the relative
/// balance of harmonic strength rather than absolute levels.
///
/// # Panics
/// Panics when every bin is empty. `transcribe` never produces such a
/// table, so reaching the assertion is a caller bug, not a data condition.
pub fn power_key(transcription: &Transcription) -> Vec<u8> {
    let max_strength = transcription.max_strength();
    assert!(
        max_strength > 0.0,
        "power key derived from a transcription with no populated bins"
    );

    transcription
        .bins()
        .iter()
        .map(|bin| (bin.strength / max_strength * POWER_KEY_SCALE).round() as u8)
        .collect()
}

/// Derives a 20 byte digest key from a candidate set.
///
/// Each candidate's quantized frequency is serialized with fixed precision
/// scientific notation and the concatenation is hashed, making the key a
/// pure function of the peak frequencies in sequence order.
pub fn hash_key(candidates: &[Candidate]) -> Vec<u8> {
    let mut hasher = Sha1::new();
    for candidate in candidates {
        hasher.update(format!("{:.6e}", candidate.frequency).as_bytes());
    }
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::spectrum::Spectrum;
    use crate::transcription::transcribe;

    fn spectrum_of(bins: &[(f32, f32)]) -> Spectrum {
        Spectrum::new(
            bins.iter().map(|bin| bin.1).collect(),
            bins.iter().map(|bin| bin.0).collect(),
        )
    }

    #[test]
    fn power_key_scales_against_the_strongest_class() {
        let config = Config {
            power_floor: 0.0,
            ..Config::default()
        };
        // A# at the maximum power, B at half of it.
        let spectrum = spectrum_of(&[(466.16, 8.0), (493.88, 4.0)]);
        let transcription = transcribe(&spectrum, &config).unwrap();

        let key = power_key(&transcription);
        assert_eq!(key, vec![0, 8, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn power_key_rounds_intermediate_strengths() {
        let config = Config {
            power_floor: 0.0,
            ..Config::default()
        };
        // A at 300, E at 100: 100 / 300 * 8 = 2.67 rounds to 3.
        let spectrum = spectrum_of(&[(440.0, 300.0), (659.25, 100.0)]);
        let transcription = transcribe(&spectrum, &config).unwrap();

        let key = power_key(&transcription);
        assert_eq!(key[0], 8);
        assert_eq!(key[7], 3);
    }

    #[test]
    #[should_panic(expected = "no populated bins")]
    fn power_key_rejects_a_degenerate_transcription() {
        power_key(&Transcription::empty());
    }

    #[test]
    fn hash_key_is_a_20_byte_digest() {
        let candidates = [
            Candidate { frequency: 2000.0, power: 500.0 },
            Candidate { frequency: 880.0, power: 300.0 },
        ];
        assert_eq!(hash_key(&candidates).len(), 20);
    }

    #[test]
    fn hash_key_depends_on_candidate_order() {
        let a = Candidate { frequency: 2000.0, power: 500.0 };
        let b = Candidate { frequency: 880.0, power: 300.0 };
        assert_ne!(hash_key(&[a, b]), hash_key(&[b, a]));
    }

    #[test]
    fn hash_key_ignores_candidate_powers() {
        let loud = [Candidate { frequency: 2000.0, power: 500.0 }];
        let quiet = [Candidate { frequency: 2000.0, power: 150.0 }];
        assert_eq!(hash_key(&loud), hash_key(&quiet));
    }
}
