use crate::error::{AnalysisError, AnalysisResult};

/// Grid resolution: 8 steps per quarter-note beat (32nd notes).
pub const STEPS_PER_BEAT: usize = 8;
pub const BEATS_PER_BAR: usize = 4;

pub const MIN_BEATS: i64 = 2;
pub const MAX_BEATS: i64 = 16;

/// Quantization grid for one loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepGrid {
    pub beat_count: usize,
    pub step_count: usize,
    pub steps_per_beat: usize,
}

impl StepGrid {
    /// Fit a grid to a loop of `duration` seconds at `bpm`.
    pub fn build(duration: f32, bpm: f32) -> AnalysisResult<Self> {
        let beats = (duration / 60.0 * bpm).round() as i64;
        if !(MIN_BEATS..=MAX_BEATS).contains(&beats) {
            return Err(AnalysisError::BeatCount { beats });
        }

        let beat_count = beats as usize;
        Ok(Self {
            beat_count,
            step_count: beat_count * STEPS_PER_BEAT,
            steps_per_beat: STEPS_PER_BEAT,
        })
    }

    pub fn bar_count(&self) -> usize {
        self.beat_count / BEATS_PER_BAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_bars_at_120() {
        let grid = StepGrid::build(8.0, 120.0).unwrap();
        assert_eq!(grid.beat_count, 16);
        assert_eq!(grid.step_count, 128);
        assert_eq!(grid.bar_count(), 4);
    }

    #[test]
    fn two_seconds_at_240_is_eight_beats() {
        let grid = StepGrid::build(2.0, 240.0).unwrap();
        assert_eq!(grid.beat_count, 8);
        assert_eq!(grid.step_count, 64);
    }

    #[test]
    fn rounds_to_nearest_beat() {
        assert_eq!(StepGrid::build(3.1, 120.0).unwrap().beat_count, 6);
        assert_eq!(StepGrid::build(3.3, 120.0).unwrap().beat_count, 7);
    }

    #[test]
    fn single_beat_is_rejected_with_count() {
        let err = StepGrid::build(0.5, 120.0).unwrap_err();
        assert!(matches!(err, AnalysisError::BeatCount { beats: 1 }));
        assert!(err.to_string().contains("Detected 1 beats"));
    }

    #[test]
    fn seventeen_beats_is_rejected() {
        let err = StepGrid::build(6.8, 150.0).unwrap_err();
        assert!(matches!(err, AnalysisError::BeatCount { beats: 17 }));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(StepGrid::build(1.0, 120.0).unwrap().beat_count, 2);
        assert_eq!(StepGrid::build(8.0, 120.0).unwrap().beat_count, 16);
    }
}
