//! Frequency and pitch conversions
//!
//! MIDI numbering follows the usual convention: A4 = 440 Hz = 69, C-1 = 0,
//! G9 = 127.
//!
//! # Example
//!
//! ```
//! use note_segmenter::preprocessing::pitch::{hz_to_midi, midi_to_note_name, parse_note_name};
//!
//! assert!((hz_to_midi(440.0) - 69.0).abs() < 1e-5);
//! assert_eq!(parse_note_name("Bb4"), Some(70));
//! assert_eq!(midi_to_note_name(61), "C#4");
//! ```

/// Reference frequency of A4 in Hz
pub const A4_HZ: f32 = 440.0;

/// MIDI number of A4
pub const A4_MIDI: f32 = 69.0;

/// Highest valid MIDI note number
pub const MAX_MIDI_NOTE: u8 = 127;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a frequency in Hz to a (fractional) MIDI note number
///
/// Non-positive frequencies have no pitch and map to negative infinity.
pub fn hz_to_midi(hz: f32) -> f32 {
    if hz <= 0.0 {
        return f32::NEG_INFINITY;
    }
    12.0 * (hz / A4_HZ).log2() + A4_MIDI
}

/// Convert a (fractional) MIDI note number to a frequency in Hz
pub fn midi_to_hz(midi: f32) -> f32 {
    A4_HZ * 2.0f32.powf((midi - A4_MIDI) / 12.0)
}

/// Clamp a rounded pitch value into the MIDI range
pub fn clamp_to_midi(pitch: f32) -> u8 {
    if !pitch.is_finite() {
        return 0;
    }
    pitch.clamp(0.0, MAX_MIDI_NOTE as f32) as u8
}

/// Parse a scientific pitch name such as `"A4"`, `"C#-1"` or `"Bb3"`
///
/// Accepts a letter (case-insensitive), any number of `#` / `b` accidentals
/// and an integer octave from -1 upward.
///
/// # Returns
///
/// `Some(midi)` if the name is well formed and within 0-127, `None` otherwise
pub fn parse_note_name(name: &str) -> Option<u8> {
    let name = name.trim();
    let mut chars = name.chars();

    let pitch_class: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let octave_start = rest
        .find(|c: char| c != '#' && c != 'b')
        .unwrap_or(rest.len());
    let (accidentals, octave) = rest.split_at(octave_start);

    let offset: i32 = accidentals
        .chars()
        .map(|c| if c == '#' { 1 } else { -1 })
        .sum();
    let octave: i32 = octave.parse().ok()?;

    let midi = 12 * (octave + 1) + pitch_class + offset;
    u8::try_from(midi).ok().filter(|&m| m <= MAX_MIDI_NOTE)
}

/// Name of a MIDI note using sharps, e.g. `69 -> "A4"`
pub fn midi_to_note_name(midi: u8) -> String {
    let octave = midi as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[midi as usize % 12], octave)
}
