use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loopscribe", about = "Transcribe a short drum loop into mini-notation")]
pub struct Cli {
    /// Input audio loop (WAV, MP3, FLAC, OGG, AAC), 1-4 bars
    pub input: PathBuf,

    /// Write the notation to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Declared input format, overriding the file extension
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write pattern statistics as JSON to this file
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Print statistics and notation as one JSON object
    #[arg(long)]
    pub json: bool,

    /// Longest accepted loop in seconds
    #[arg(long, default_value_t = 8.0)]
    pub max_duration: f32,

    /// Config file (defaults to loopscribe.toml or the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Reject settings that would make every loop fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.max_duration.is_finite() || self.max_duration <= 0.0 {
            anyhow::bail!(
                "--max-duration must be a positive number of seconds, got {}",
                self.max_duration
            );
        }
        Ok(())
    }
}
