/// Convert a MIDI note number to Hz (A4 = 69 = 440Hz, equal temperament).
///
/// Accepts notes outside 0..=127; the generator can reach them with extreme
/// key and octave settings.
pub fn midi_to_hz(note: i32) -> f32 {
    440.0 * 2f32.powf((note - 69) as f32 / 12.0)
}
