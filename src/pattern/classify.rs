use crate::audio::features::{BandProfiles, StepEnergy};

/// The three drum classes a loop is transcribed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instrument {
    Kick,
    Snare,
    HiHat,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [Instrument::Kick, Instrument::Snare, Instrument::HiHat];

    /// Sample name used in the notation.
    pub fn token(self) -> &'static str {
        match self {
            Instrument::Kick => "bd",
            Instrument::Snare => "sd",
            Instrument::HiHat => "hh",
        }
    }

    /// Whether one step's band energies count as a hit for this instrument.
    pub fn detect(self, low: StepEnergy, mid: StepEnergy, high: StepEnergy) -> bool {
        match self {
            Instrument::Kick => low.rms > 0.15 && low.peak > 0.3 && low.rms > high.rms * 1.5,
            Instrument::Snare => mid.rms > 0.15 && mid.peak > 0.25 && low.rms < 0.4,
            Instrument::HiHat => {
                high.rms > 0.05 && high.peak > 0.1 && low.rms < 0.2 && mid.rms < 0.2
            }
        }
    }
}

/// One boolean per grid step for a single instrument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitSequence {
    pub hits: Vec<bool>,
}

impl HitSequence {
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn count(&self) -> usize {
        self.hits.iter().filter(|&&h| h).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrumHits {
    pub kick: HitSequence,
    pub snare: HitSequence,
    pub hihat: HitSequence,
}

impl DrumHits {
    pub fn get(&self, instrument: Instrument) -> &HitSequence {
        match instrument {
            Instrument::Kick => &self.kick,
            Instrument::Snare => &self.snare,
            Instrument::HiHat => &self.hihat,
        }
    }
}

fn classify_instrument(bands: &BandProfiles, instrument: Instrument) -> HitSequence {
    let hits = bands
        .low
        .steps
        .iter()
        .zip(&bands.mid.steps)
        .zip(&bands.high.steps)
        .map(|((&low, &mid), &high)| instrument.detect(low, mid, high))
        .collect();
    HitSequence { hits }
}

/// Apply each instrument's rule to every step. Instruments are decided
/// independently, so one step can hold several hits.
pub fn classify(bands: &BandProfiles) -> DrumHits {
    DrumHits {
        kick: classify_instrument(bands, Instrument::Kick),
        snare: classify_instrument(bands, Instrument::Snare),
        hihat: classify_instrument(bands, Instrument::HiHat),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::audio::features::EnergyProfile;

    pub(crate) fn energy(rms: f32, peak: f32) -> StepEnergy {
        StepEnergy { rms, peak }
    }

    const QUIET: StepEnergy = StepEnergy { rms: 0.0, peak: 0.0 };

    /// Kick energy on steps 0, 8, 16, 24 and hi-hat energy on every odd step
    /// below 32, laid over a 16-beat grid.
    pub(crate) fn kick_and_hat_bands() -> BandProfiles {
        let steps = 128;
        let mut low = vec![QUIET; steps];
        let mid = vec![QUIET; steps];
        let mut high = vec![QUIET; steps];
        for step in [0, 8, 16, 24] {
            low[step] = energy(0.6, 1.0);
        }
        for step in (1..32).step_by(2) {
            high[step] = energy(0.3, 0.8);
        }
        BandProfiles {
            low: EnergyProfile { steps: low },
            mid: EnergyProfile { steps: mid },
            high: EnergyProfile { steps: high },
        }
    }

    #[test]
    fn kick_rule() {
        assert!(Instrument::Kick.detect(energy(0.5, 0.8), QUIET, energy(0.2, 0.3)));
        // Too much treble relative to bass
        assert!(!Instrument::Kick.detect(energy(0.5, 0.8), QUIET, energy(0.4, 0.6)));
        // Peak too low
        assert!(!Instrument::Kick.detect(energy(0.2, 0.3), QUIET, QUIET));
    }

    #[test]
    fn snare_rule() {
        assert!(Instrument::Snare.detect(energy(0.3, 0.5), energy(0.3, 0.5), QUIET));
        assert!(!Instrument::Snare.detect(energy(0.4, 0.8), energy(0.3, 0.5), QUIET));
        assert!(!Instrument::Snare.detect(QUIET, energy(0.15, 0.5), QUIET));
    }

    #[test]
    fn hihat_rule() {
        assert!(Instrument::HiHat.detect(QUIET, QUIET, energy(0.06, 0.11)));
        assert!(!Instrument::HiHat.detect(energy(0.2, 0.2), QUIET, energy(0.5, 0.9)));
        assert!(!Instrument::HiHat.detect(QUIET, energy(0.25, 0.3), energy(0.5, 0.9)));
    }

    #[test]
    fn instruments_can_share_a_step() {
        let low = energy(0.3, 0.6);
        let mid = energy(0.5, 0.7);
        let high = energy(0.1, 0.2);
        assert!(Instrument::Kick.detect(low, mid, high));
        assert!(Instrument::Snare.detect(low, mid, high));
    }

    #[test]
    fn classifies_kicks_and_hats_only() {
        let hits = classify(&kick_and_hat_bands());
        assert_eq!(hits.kick.len(), 128);
        assert_eq!(hits.snare.len(), 128);
        assert_eq!(hits.hihat.len(), 128);

        let kick_steps: Vec<usize> = (0..128).filter(|&i| hits.kick.hits[i]).collect();
        assert_eq!(kick_steps, vec![0, 8, 16, 24]);
        assert_eq!(hits.hihat.count(), 16);
        assert!((1..32).step_by(2).all(|i| hits.hihat.hits[i]));
        assert_eq!(hits.snare.count(), 0);
    }

    #[test]
    fn silence_has_no_hits() {
        let quiet = EnergyProfile {
            steps: vec![QUIET; 32],
        };
        let hits = classify(&BandProfiles {
            low: quiet.clone(),
            mid: quiet.clone(),
            high: quiet,
        });
        for instrument in Instrument::ALL {
            assert_eq!(hits.get(instrument).count(), 0);
        }
    }
}
