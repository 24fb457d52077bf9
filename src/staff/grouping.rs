//! Grouping of merged line peaks into five-line staves.
use serde::Serialize;

/// A run of five consecutive peaks that passed the spacing checks.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffCandidate {
    /// Index of the first peak in the merged peak list.
    pub start: usize,
    pub lines: [f32; 5],
    pub spacing: f32,
    pub variance: f32,
}

impl StaffCandidate {
    fn overlaps(&self, other: &StaffCandidate) -> bool {
        self.start < other.start + 5 && other.start < self.start + 5
    }
}

/// Evaluate every window of five consecutive peaks.
///
/// A window qualifies when each spacing deviates from the window mean by
/// less than `tolerance × mean` and the mean lies strictly inside
/// `(min_spacing, max_spacing)`.
pub fn candidate_windows(
    peaks: &[f32],
    tolerance: f32,
    min_spacing: f32,
    max_spacing: f32,
) -> Vec<StaffCandidate> {
    if peaks.len() < 5 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for start in 0..=peaks.len() - 5 {
        let lines = [
            peaks[start],
            peaks[start + 1],
            peaks[start + 2],
            peaks[start + 3],
            peaks[start + 4],
        ];
        let spacings = [
            lines[1] - lines[0],
            lines[2] - lines[1],
            lines[3] - lines[2],
            lines[4] - lines[3],
        ];
        let mean = spacings.iter().sum::<f32>() / 4.0;
        if !(mean > min_spacing && mean < max_spacing) {
            continue;
        }
        if spacings.iter().any(|s| (s - mean).abs() >= tolerance * mean) {
            continue;
        }
        let variance = spacings.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / 4.0;
        out.push(StaffCandidate {
            start,
            lines,
            spacing: mean,
            variance,
        });
    }
    out
}

/// Greedy overlap-free selection, most regular spacing first.
///
/// Candidates are ranked by ascending variance with a stable sort, so equal
/// variances keep their top-to-bottom order. A candidate sharing any peak
/// with an accepted one is skipped. The result is sorted top to bottom.
pub fn select_staves(mut candidates: Vec<StaffCandidate>) -> Vec<StaffCandidate> {
    candidates.sort_by(|a, b| {
        a.variance
            .partial_cmp(&b.variance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut accepted: Vec<StaffCandidate> = Vec::new();
    for cand in candidates {
        if accepted.iter().any(|a| a.overlaps(&cand)) {
            continue;
        }
        accepted.push(cand);
    }
    accepted.sort_by(|a, b| {
        a.lines[0]
            .partial_cmp(&b.lines[0])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    accepted
}
