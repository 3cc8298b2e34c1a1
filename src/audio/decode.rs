use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{AnalysisError, AnalysisResult};

/// Container/codec names accepted as a declared input format.
pub const SUPPORTED_FORMATS: &[&str] = &["wav", "mp3", "flac", "ogg", "aac"];

/// Decoded mono signal. Never mutated once produced.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Format reader and codec for one decode call. Both are released when the
/// session is dropped, whichever way the call returns.
struct DecodeSession {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    max_duration: Option<f32>,
}

impl DecodeSession {
    fn open(
        bytes: Vec<u8>,
        hint: Option<&str>,
        max_duration: Option<f32>,
    ) -> AnalysisResult<Self> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut container_hint = Hint::new();
        if let Some(ext) = hint {
            container_hint.with_extension(ext);
        }

        let detected = symphonia::default::get_probe()
            .format(
                &container_hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AnalysisError::Decode(format!("unrecognised audio container ({})", e)))?;

        let format = detected.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AnalysisError::Decode("no audio tracks found".into()))?;

        let track_id = track.id;
        let params = track.codec_params.clone();
        let sample_rate = params
            .sample_rate
            .ok_or_else(|| AnalysisError::Decode("unknown sample rate".into()))?;
        if sample_rate == 0 {
            return Err(AnalysisError::Decode("sample rate is zero".into()));
        }

        // Reject from the container header when it declares a length
        if let (Some(max), Some(n_frames)) = (max_duration, params.n_frames) {
            let seconds = n_frames as f32 / sample_rate as f32;
            if seconds > max {
                return Err(AnalysisError::Duration { seconds, max });
            }
        }

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            max_duration,
        })
    }

    /// Decode every packet of the selected track, downmixing to mono.
    ///
    /// Stops with a duration error as soon as the decoded length passes
    /// `max_duration`, for streams whose header carries no frame count.
    fn read_mono(&mut self) -> AnalysisResult<Vec<f32>> {
        let mut all_samples: Vec<f32> = Vec::new();

        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(msg)) => {
                    log::debug!("Skipping corrupt packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let num_frames = decoded.frames();

            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            let samples = sample_buf.samples();
            if channels == 1 {
                all_samples.extend_from_slice(samples);
            } else {
                for frame_samples in samples.chunks(channels) {
                    let mono: f32 = frame_samples.iter().sum::<f32>() / channels as f32;
                    all_samples.push(mono);
                }
            }

            if let Some(max) = self.max_duration {
                let seconds = all_samples.len() as f32 / self.sample_rate as f32;
                if seconds > max {
                    return Err(AnalysisError::Duration { seconds, max });
                }
            }
        }

        Ok(all_samples)
    }
}

impl Drop for DecodeSession {
    fn drop(&mut self) {
        log::debug!("Released decoder for track {}", self.track_id);
    }
}

/// Decode compressed audio bytes into a mono [`AudioData`].
///
/// `format` is the declared container/codec (e.g. `"wav"`). When given it must
/// be one of [`SUPPORTED_FORMATS`]; when absent the container is sniffed.
/// With `max_duration` set, a longer stream fails with
/// [`AnalysisError::Duration`] before it is fully buffered.
pub fn decode_audio(
    bytes: Vec<u8>,
    format: Option<&str>,
    max_duration: Option<f32>,
) -> AnalysisResult<AudioData> {
    let hint = match format {
        Some(f) => {
            let f = f.trim_start_matches('.').to_ascii_lowercase();
            if !SUPPORTED_FORMATS.contains(&f.as_str()) {
                return Err(AnalysisError::Decode(format!(
                    "unsupported format '{}' (expected one of: {})",
                    f,
                    SUPPORTED_FORMATS.join(", ")
                )));
            }
            Some(f)
        }
        None => None,
    };

    if bytes.is_empty() {
        return Err(AnalysisError::Decode("input is empty".into()));
    }

    let mut session = DecodeSession::open(bytes, hint.as_deref(), max_duration)?;
    let samples = session.read_mono()?;
    let sample_rate = session.sample_rate;

    if samples.is_empty() {
        return Err(AnalysisError::Decode("no audio samples decoded".into()));
    }

    let audio = AudioData {
        samples,
        sample_rate,
    };

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.2}s",
        audio.samples.len(),
        audio.sample_rate,
        audio.duration()
    );

    Ok(audio)
}

/// Format implied by a file's extension, when it names a supported one.
pub fn implied_format(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| SUPPORTED_FORMATS.contains(&e.as_str()))
}

/// Read and decode an audio file. Without a declared `format` the file
/// extension is used when it names a supported one.
pub fn decode_file(
    path: &Path,
    format: Option<&str>,
    max_duration: Option<f32>,
) -> AnalysisResult<AudioData> {
    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::Decode(format!("failed to read {}: {}", path.display(), e))
    })?;

    let declared = format.map(str::to_string).or_else(|| implied_format(path));
    decode_audio(bytes, declared.as_deref(), max_duration)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 16-bit PCM WAV bytes for the given samples.
    pub(crate) fn wav_bytes(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer.write_sample(v).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_mono_wav() {
        let samples: Vec<f32> = (0..22050).map(|i| ((i as f32) * 0.01).sin() * 0.5).collect();
        let audio = decode_audio(wav_bytes(&samples, 22050, 1), Some("wav"), None).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.samples.len(), 22050);
        assert!((audio.duration() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn downmixes_stereo() {
        // Left at +0.5, right at -0.5 cancels to silence.
        let interleaved: Vec<f32> = (0..2000)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let audio = decode_audio(wav_bytes(&interleaved, 8000, 2), None, None).unwrap();
        assert_eq!(audio.samples.len(), 1000);
        assert!(audio.samples.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn rejects_corrupt_bytes() {
        let err = decode_audio(vec![0x13, 0x37, 0x00, 0x42, 0x99], Some("mp3"), None);
        assert!(matches!(err, Err(AnalysisError::Decode(_))));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            decode_audio(Vec::new(), None, None),
            Err(AnalysisError::Decode(_))
        ));
    }

    #[test]
    fn implied_format_from_extension() {
        assert_eq!(implied_format(Path::new("loop.WAV")).as_deref(), Some("wav"));
        assert_eq!(implied_format(Path::new("take2.flac")).as_deref(), Some("flac"));
        assert_eq!(implied_format(Path::new("notes.txt")), None);
        assert_eq!(implied_format(Path::new("loop")), None);
    }

    #[test]
    fn rejects_undeclared_format() {
        let err = decode_audio(vec![1, 2, 3], Some("midi"), None).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(ref msg) if msg.contains("'midi'")));
    }

    #[test]
    fn decodes_file_using_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.wav");
        let samples = vec![0.25f32; 4410];
        std::fs::write(&path, wav_bytes(&samples, 44100, 1)).unwrap();

        let audio = decode_file(&path, None, None).unwrap();
        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.samples.len(), 4410);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(&dir.path().join("absent.wav"), None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(ref msg) if msg.contains("absent.wav")));
    }

    #[test]
    fn long_stream_is_rejected_while_decoding() {
        let samples = vec![0.0f32; 8000 * 10];
        let bytes = wav_bytes(&samples, 8000, 1);
        let err = decode_audio(bytes, Some("wav"), Some(8.0)).unwrap_err();
        match err {
            AnalysisError::Duration { seconds, max } => {
                assert!(seconds > 8.0);
                assert_eq!(max, 8.0);
            }
            other => panic!("expected duration error, got {:?}", other),
        }
    }

    #[test]
    fn short_stream_passes_the_cap() {
        let samples = vec![0.0f32; 8000 * 4];
        let bytes = wav_bytes(&samples, 8000, 1);
        let audio = decode_audio(bytes, Some("wav"), Some(8.0)).unwrap();
        assert_eq!(audio.samples.len(), 8000 * 4);
    }
}
