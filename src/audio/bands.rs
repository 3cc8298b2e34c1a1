use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F32};

use super::decode::AudioData;
use super::features::{BandProfiles, EnergyProfile, StepEnergy};

/// Frequency band isolating one drum class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    /// Low-pass at 150 Hz, kick fundamental
    Low,
    /// Band-pass at 400 Hz, Q = 1, snare body
    Mid,
    /// High-pass at 5 kHz, hi-hat shimmer
    High,
}

impl Band {
    pub fn name(self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Mid => "mid",
            Band::High => "high",
        }
    }

    /// `None` when the cutoff sits at or above Nyquist, so the signal holds
    /// nothing in this band.
    fn coefficients(self, sample_rate: u32) -> Option<Coefficients<f32>> {
        let (filter_type, cutoff, q) = match self {
            Band::Low => (Type::LowPass, 150.0f32, Q_BUTTERWORTH_F32),
            Band::Mid => (Type::BandPass, 400.0f32, 1.0),
            Band::High => (Type::HighPass, 5000.0f32, Q_BUTTERWORTH_F32),
        };
        if 2.0 * cutoff >= sample_rate as f32 {
            return None;
        }
        Coefficients::<f32>::from_params(
            filter_type,
            (sample_rate as f32).hz(),
            cutoff.hz(),
            q,
        )
        .ok()
    }
}

/// Run the band's filter over a copy of the whole signal.
///
/// A band the sample rate cannot represent comes back as silence.
pub fn filter_band(samples: &[f32], sample_rate: u32, band: Band) -> Vec<f32> {
    let Some(coeffs) = band.coefficients(sample_rate) else {
        log::warn!(
            "{}Hz audio cannot carry the {} band, treating it as silent",
            sample_rate,
            band.name()
        );
        return vec![0.0; samples.len()];
    };
    let mut filter = DirectForm2Transposed::<f32>::new(coeffs);
    samples.iter().map(|&s| filter.run(s)).collect()
}

/// Slice `filtered` into `step_count` equal steps and measure each one.
///
/// Every step's RMS and peak is divided by the largest absolute sample in the
/// whole filtered buffer (or by 1 for a silent buffer). Trailing samples that
/// do not fill a whole step are ignored.
pub fn step_energies(filtered: &[f32], step_count: usize) -> EnergyProfile {
    let global_peak = filtered.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    let norm = if global_peak > 0.0 { global_peak } else { 1.0 };
    let step_size = if step_count == 0 {
        0
    } else {
        filtered.len() / step_count
    };

    (0..step_count)
        .map(|step| {
            let slice = &filtered[step * step_size..(step + 1) * step_size];
            if slice.is_empty() {
                return StepEnergy::default();
            }
            let rms = (slice.iter().map(|s| s * s).sum::<f32>() / slice.len() as f32).sqrt();
            let peak = slice.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
            StepEnergy {
                rms: rms / norm,
                peak: peak / norm,
            }
        })
        .collect()
}

fn band_profile(audio: &AudioData, step_count: usize, band: Band) -> EnergyProfile {
    let filtered = filter_band(&audio.samples, audio.sample_rate, band);
    let profile = step_energies(&filtered, step_count);
    log::debug!("Band {}: {} steps", band.name(), profile.len());
    profile
}

/// Extract the low, mid and high profiles concurrently.
///
/// Each band filters and slices its own copy of the signal; results are only
/// combined once all three have finished.
pub fn extract_bands(audio: &AudioData, step_count: usize) -> BandProfiles {
    let (low, (mid, high)) = rayon::join(
        || band_profile(audio, step_count, Band::Low),
        || {
            rayon::join(
                || band_profile(audio, step_count, Band::Mid),
                || band_profile(audio, step_count, Band::High),
            )
        },
    );

    BandProfiles { low, mid, high }
}
