use super::bands::extract_bands;
use std::path::Path;

use super::decode::{decode_audio, decode_file, AudioData};
use super::tempo::estimate_tempo;
use crate::error::{AnalysisError, AnalysisResult};
use crate::pattern::classify::{classify, DrumHits};
use crate::pattern::grid::StepGrid;
use crate::pattern::notation;
use crate::pattern::stats::Pattern;

/// Longest loop accepted, in seconds.
pub const MAX_DURATION: f32 = 8.0;

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub max_duration: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_duration: MAX_DURATION,
        }
    }
}

/// Everything produced by one run over one loop.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct Analysis {
    pub tempo: f32,
    pub grid: StepGrid,
    pub hits: DrumHits,
    pub pattern: Pattern,
    pub code: String,
}

/// Decode `bytes` and transcribe the loop.
#[allow(dead_code)]
pub fn analyze_bytes(
    bytes: Vec<u8>,
    format: Option<&str>,
    config: &AnalysisConfig,
) -> AnalysisResult<Analysis> {
    let audio = decode_audio(bytes, format, Some(config.max_duration))?;
    analyze_samples(&audio, config)
}

/// Decode the file at `path` and transcribe the loop.
pub fn analyze_file(
    path: &Path,
    format: Option<&str>,
    config: &AnalysisConfig,
) -> AnalysisResult<Analysis> {
    let audio = decode_file(path, format, Some(config.max_duration))?;
    analyze_samples(&audio, config)
}

/// Transcribe an already decoded loop.
///
/// Length and beat count are validated before the band filters run, so an
/// unusable loop fails without doing the expensive work.
pub fn analyze_samples(audio: &AudioData, config: &AnalysisConfig) -> AnalysisResult<Analysis> {
    let duration = audio.duration();
    if duration > config.max_duration {
        return Err(AnalysisError::Duration {
            seconds: duration,
            max: config.max_duration,
        });
    }

    log::info!("Estimating tempo...");
    let tempo = estimate_tempo(&audio.samples, audio.sample_rate);

    let grid = StepGrid::build(duration, tempo)?;
    log::info!(
        "Grid: {} beats, {} steps ({} per beat)",
        grid.beat_count,
        grid.step_count,
        grid.steps_per_beat
    );

    log::info!("Extracting band energies...");
    let bands = extract_bands(audio, grid.step_count);

    let hits = classify(&bands);
    let pattern = Pattern::summarize(&hits, &grid, tempo, duration);
    log::info!(
        "Pattern: {} kicks, {} snares, {} hi-hats over {} bars",
        pattern.kicks,
        pattern.snares,
        pattern.hihats,
        pattern.bars
    );

    let code = notation::render(&hits, pattern.bpm, grid.beat_count);

    Ok(Analysis {
        tempo,
        grid,
        hits,
        pattern,
        code,
    })
}
