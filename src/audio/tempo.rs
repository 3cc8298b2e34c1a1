const WINDOW_SIZE: usize = 2048;
const HOP_SIZE: usize = 512;

/// Fraction of the loudest window an energy peak must exceed.
const PEAK_THRESHOLD: f32 = 0.3;
const MIN_PEAKS: usize = 4;

/// Inter-onset intervals outside this open range (seconds) are discarded.
const MIN_INTERVAL: f32 = 0.15;
const MAX_INTERVAL: f32 = 2.0;

pub const DEFAULT_BPM: f32 = 120.0;
pub const MIN_BPM: f32 = 75.0;
pub const MAX_BPM: f32 = 160.0;

/// Estimate the tempo of a loop in BPM, folded into [`MIN_BPM`, `MAX_BPM`].
///
/// Onsets are local maxima of a windowed RMS energy curve. The median
/// inter-onset interval gives the beat period. Too few onsets is not an
/// error: the estimate falls back to [`DEFAULT_BPM`].
pub fn estimate_tempo(samples: &[f32], sample_rate: u32) -> f32 {
    let energy = energy_curve(samples);
    let peaks = pick_peaks(&energy);

    if peaks.len() < MIN_PEAKS {
        log::warn!(
            "Only {} onsets detected, assuming {} BPM",
            peaks.len(),
            DEFAULT_BPM
        );
        return DEFAULT_BPM;
    }

    let onset_times: Vec<f32> = peaks
        .iter()
        .map(|&i| (i * HOP_SIZE) as f32 / sample_rate as f32)
        .collect();

    let Some(interval) = median_interval(&onset_times) else {
        log::warn!(
            "No plausible inter-onset intervals among {} onsets, assuming {} BPM",
            onset_times.len(),
            DEFAULT_BPM
        );
        return DEFAULT_BPM;
    };

    let raw_bpm = 60.0 / interval;
    let bpm = fold_tempo(raw_bpm);

    log::info!(
        "Tempo: onsets={}, median interval={:.3}s, raw={:.1} BPM, folded={:.1} BPM",
        peaks.len(),
        interval,
        raw_bpm,
        bpm
    );

    bpm
}

/// RMS of each `WINDOW_SIZE` window, advancing by `HOP_SIZE`.
fn energy_curve(samples: &[f32]) -> Vec<f32> {
    let mut energy = Vec::new();
    let mut pos = 0;
    while pos + WINDOW_SIZE <= samples.len() {
        let window = &samples[pos..pos + WINDOW_SIZE];
        let rms = (window.iter().map(|s| s * s).sum::<f32>() / WINDOW_SIZE as f32).sqrt();
        energy.push(rms);
        pos += HOP_SIZE;
    }
    energy
}

/// Indices strictly greater than two neighbours on each side and above
/// `PEAK_THRESHOLD` of the curve maximum.
fn pick_peaks(energy: &[f32]) -> Vec<usize> {
    if energy.len() < 5 {
        return Vec::new();
    }

    let max_energy = energy.iter().copied().fold(0.0f32, f32::max);
    let threshold = max_energy * PEAK_THRESHOLD;

    (2..energy.len() - 2)
        .filter(|&i| {
            let e = energy[i];
            e > threshold
                && e > energy[i - 1]
                && e > energy[i - 2]
                && e > energy[i + 1]
                && e > energy[i + 2]
        })
        .collect()
}

/// Median of the plausible gaps between consecutive onsets.
fn median_interval(onset_times: &[f32]) -> Option<f32> {
    let mut intervals: Vec<f32> = onset_times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&i| i > MIN_INTERVAL && i < MAX_INTERVAL)
        .collect();

    if intervals.is_empty() {
        return None;
    }

    intervals.sort_by(|a, b| a.total_cmp(b));
    Some(intervals[intervals.len() / 2])
}

/// Double or halve until the tempo lands in the working range.
fn fold_tempo(mut bpm: f32) -> f32 {
    if !bpm.is_finite() || bpm <= 0.0 {
        return DEFAULT_BPM;
    }
    while bpm < MIN_BPM {
        bpm *= 2.0;
    }
    while bpm > MAX_BPM {
        bpm /= 2.0;
    }
    bpm
}
