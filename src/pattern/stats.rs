use serde::Serialize;

use super::classify::DrumHits;
use super::grid::StepGrid;

/// Summary of a transcribed loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub bpm: u32,
    pub beats: usize,
    pub bars: usize,
    pub kicks: usize,
    pub snares: usize,
    pub hihats: usize,
    /// Loop length in seconds, two decimal places
    pub duration: String,
}

impl Pattern {
    pub fn summarize(hits: &DrumHits, grid: &StepGrid, bpm: f32, duration: f32) -> Self {
        Self {
            bpm: bpm.round() as u32,
            beats: grid.beat_count,
            bars: grid.bar_count(),
            kicks: hits.kick.count(),
            snares: hits.snare.count(),
            hihats: hits.hihat.count(),
            duration: format!("{:.2}", duration),
        }
    }
}
