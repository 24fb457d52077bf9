//! Staff position to pitch mapping.
//!
//! Positions count diatonic steps (lines and spaces) upward from the bottom
//! line: `0` is the bottom line, `8` the top line. Positions outside the staff
//! are clamped onto it, so ledger-line notes fold onto the outer lines.
use crate::types::{Clef, DetectedStaff, Pitch};

pub const MIN_POSITION: i32 = 0;
pub const MAX_POSITION: i32 = 8;

const TREBLE: [(Pitch, i32); 9] = [
    (Pitch::E, 4),
    (Pitch::F, 4),
    (Pitch::G, 4),
    (Pitch::A, 4),
    (Pitch::B, 4),
    (Pitch::C, 5),
    (Pitch::D, 5),
    (Pitch::E, 5),
    (Pitch::F, 5),
];

const BASS: [(Pitch, i32); 9] = [
    (Pitch::G, 2),
    (Pitch::A, 2),
    (Pitch::B, 2),
    (Pitch::C, 3),
    (Pitch::D, 3),
    (Pitch::E, 3),
    (Pitch::F, 3),
    (Pitch::G, 3),
    (Pitch::A, 3),
];

/// Unclamped step index of `y` relative to the bottom line.
pub fn raw_position(y: f32, staff: &DetectedStaff) -> i32 {
    let half_step = staff.spacing * 0.5;
    if half_step <= 0.0 || !half_step.is_finite() {
        return MIN_POSITION;
    }
    ((staff.bottom() - y) / half_step).round() as i32
}

/// Step index clamped to `[0, 8]`.
pub fn staff_position(y: f32, staff: &DetectedStaff) -> i32 {
    raw_position(y, staff).clamp(MIN_POSITION, MAX_POSITION)
}

/// Pitch and octave for a clamped staff position.
pub fn position_to_pitch(position: i32, clef: Clef) -> (Pitch, i32) {
    let table = match clef {
        Clef::Treble => &TREBLE,
        Clef::Bass => &BASS,
    };
    table[position.clamp(MIN_POSITION, MAX_POSITION) as usize]
}

/// Map a vertical pixel coordinate to `(pitch, octave)` on `staff`.
pub fn map_pitch(y: f32, staff: &DetectedStaff, clef: Clef) -> (Pitch, i32) {
    position_to_pitch(staff_position(y, staff), clef)
}
