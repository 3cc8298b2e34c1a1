use thiserror::Error;

/// Fatal conditions that abort a single analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Could not decode audio: {0}")]
    Decode(String),

    #[error(
        "Loop is {seconds:.2}s long, the maximum is {max:.1}s. Trim the recording to 1-4 bars and try again."
    )]
    Duration { seconds: f32, max: f32 },

    #[error(
        "Detected {beats} beats, expected between 2 and 16. The loop may be too short or too long, or the tempo was misdetected."
    )]
    BeatCount { beats: i64 },
}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AnalysisError::Decode(err.to_string())
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
