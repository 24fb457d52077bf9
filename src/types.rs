use crate::normalize::SourceMapping;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clef used to map staff positions to pitches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    #[default]
    Treble,
    Bass,
}

impl std::str::FromStr for Clef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "treble" => Ok(Clef::Treble),
            "bass" => Ok(Clef::Bass),
            other => Err(format!("unknown clef '{other}' (expected treble or bass)")),
        }
    }
}

/// Natural pitch letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pitch {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Pitch {
    /// Semitone offset above C within the octave.
    pub fn semitone(self) -> i32 {
        match self {
            Pitch::C => 0,
            Pitch::D => 2,
            Pitch::E => 4,
            Pitch::F => 5,
            Pitch::G => 7,
            Pitch::A => 9,
            Pitch::B => 11,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned box around a staff, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Five staff lines sorted top to bottom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedStaff {
    /// Line y-coordinates, strictly increasing.
    pub lines: [f32; 5],
    /// Mean distance between adjacent lines.
    pub spacing: f32,
    pub bounds: StaffBounds,
}

impl DetectedStaff {
    pub fn top(&self) -> f32 {
        self.lines[0]
    }

    pub fn bottom(&self) -> f32 {
        self.lines[4]
    }

    pub fn middle(&self) -> f32 {
        self.lines[2]
    }

    /// Population variance of the four inter-line distances.
    pub fn spacing_variance(&self) -> f32 {
        spacing_variance(&self.lines)
    }

    /// Map into source-image pixels. Line rows and `bounds.y` are positions;
    /// `bounds.x..bounds.x + bounds.width` is a column span and maps by its
    /// edges.
    pub(crate) fn mapped(&self, mapping: &SourceMapping) -> DetectedStaff {
        DetectedStaff {
            lines: self.lines.map(|y| mapping.y(y)),
            spacing: mapping.height(self.spacing),
            bounds: StaffBounds {
                x: self.bounds.x * mapping.scale_x,
                y: mapping.y(self.bounds.y),
                width: mapping.width(self.bounds.width),
                height: mapping.height(self.bounds.height),
            },
        }
    }
}

pub(crate) fn spacing_variance(lines: &[f32]) -> f32 {
    if lines.len() < 2 {
        return 0.0;
    }
    let n = (lines.len() - 1) as f32;
    let mean = (lines[lines.len() - 1] - lines[0]) / n;
    lines
        .windows(2)
        .map(|w| {
            let d = (w[1] - w[0]) - mean;
            d * d
        })
        .sum::<f32>()
        / n
}

/// A recognized note head.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedNote {
    pub pitch: Pitch,
    pub octave: i32,
    /// Centre of the note head in source-image pixels.
    pub position: Position,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f32,
    pub staff_index: usize,
}

impl DetectedNote {
    /// MIDI key number (C4 = 60).
    pub fn midi_number(&self) -> i32 {
        (self.octave + 1) * 12 + self.pitch.semitone()
    }

    /// Scientific pitch name, e.g. `B4`.
    pub fn name(&self) -> String {
        format!("{}{}", self.pitch, self.octave)
    }
}

/// Output of one recognition call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    pub detected_staffs: Vec<DetectedStaff>,
    pub detected_notes: Vec<DetectedNote>,
    /// Mean note confidence, `0` when no notes were found.
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clef: Option<Clef>,
}

impl OcrResult {
    pub fn assemble(
        detected_staffs: Vec<DetectedStaff>,
        detected_notes: Vec<DetectedNote>,
        clef: Option<Clef>,
    ) -> Self {
        let confidence = mean_confidence(&detected_notes);
        Self {
            detected_staffs,
            detected_notes,
            confidence,
            clef,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.detected_staffs.is_empty() && self.detected_notes.is_empty()
    }
}

fn mean_confidence(notes: &[DetectedNote]) -> f32 {
    if notes.is_empty() {
        return 0.0;
    }
    let sum: f64 = notes.iter().map(|n| n.confidence as f64).sum();
    (sum / notes.len() as f64) as f32
}
