//! # Pitch Classification Module
//!
//! Maps frequencies onto the 12 pitch classes (chroma) of the equal
//! tempered scale, folding all octaves of a frequency onto a single scale
//! anchored at A4 = 440 Hz.
//!
//! ## Features
//! - Semitone distance measurement from the 440 Hz reference tone
//! - Octave-invariant classification into 12 pitch classes
//! - Display names for all pitch classes ("A" through "G#")

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference tone of the equal tempered scale (A4).
pub const REFERENCE_PITCH_HZ: f32 = 440.0;

/// Number of pitch classes in the equal tempered scale.
pub const PITCH_CLASS_COUNT: usize = 12;

/// Natural log of the semitone ratio 2^(1/12), computed once at startup.
static LOG_SEMITONE_RATIO: Lazy<f32> = Lazy::new(|| 2.0_f32.powf(1.0 / 12.0).ln());

/// One of the 12 pitch classes of the equal tempered scale.
///
/// The ordering starts at A so that class indices count semitones up from
/// the 440 Hz reference tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchClass {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl PitchClass {
    /// All pitch classes in chroma order, A through G#.
    pub const ALL: [PitchClass; PITCH_CLASS_COUNT] = [
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
    ];

    /// Chroma index of this pitch class: 0 for A through 11 for G#.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class for a chroma index. Indices wrap modulo 12.
    pub fn from_index(index: usize) -> PitchClass {
        Self::ALL[index % PITCH_CLASS_COUNT]
    }

    /// Display name of this pitch class, e.g. "A#".
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of semitones, possibly fractional and negative, between a
/// frequency and the 440 Hz reference tone.
fn semitone_steps(frequency: f32) -> f32 {
    (frequency / REFERENCE_PITCH_HZ).ln() / *LOG_SEMITONE_RATIO
}

/// Classifies a frequency into its pitch class.
///
/// Rounds the semitone distance from the reference tone to the nearest
/// whole step and folds it onto the chroma scale. The fold uses a true
/// modulo, so frequencies below the reference (negative step counts) still
/// land in the 12-class range.
///
/// Only meaningful for finite positive frequencies; callers keep DC and
/// sub-audio content out through the frequency floor.
pub fn classify(frequency: f32) -> PitchClass {
    let steps = semitone_steps(frequency).round() as i32;
    PitchClass::from_index(steps.rem_euclid(PITCH_CLASS_COUNT as i32) as usize)
}
