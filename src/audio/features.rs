/// Energy of one quantization step within a single frequency band.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepEnergy {
    /// RMS of the step's samples, normalized by the band's global peak (0.0-1.0)
    pub rms: f32,
    /// Absolute peak of the step's samples, normalized the same way (0.0-1.0)
    pub peak: f32,
}

/// Per-step energies for one band, one entry per grid step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergyProfile {
    pub steps: Vec<StepEnergy>,
}

impl EnergyProfile {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<StepEnergy> for EnergyProfile {
    fn from_iter<I: IntoIterator<Item = StepEnergy>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// The three band profiles, aligned by step index.
#[derive(Clone, Debug)]
pub struct BandProfiles {
    pub low: EnergyProfile,  // kick, < 150 Hz
    pub mid: EnergyProfile,  // snare body, ~400 Hz
    pub high: EnergyProfile, // hi-hat, > 5 kHz
}
