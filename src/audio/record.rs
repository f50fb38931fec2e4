//! Offline rendering of the circle set to a WAV file.

use std::sync::Arc;
use tracing::info;

use super::engine::SynthesisEngine;
use crate::circles::CircleSet;
use crate::error::RecordError;
use crate::params::{audio_constants::BUFFER_FRAMES, RecordingConfig, SharedParams};

/// Run the synthesis engine for `config.duration_secs` and write the result
/// as mono 32-bit float WAV. Returns the number of samples written.
///
/// Advances the circles' phases exactly as live playback would.
pub fn render_to_wav(
    config: &RecordingConfig,
    circles: &CircleSet,
    params: Arc<SharedParams>,
) -> Result<usize, RecordError> {
    if config.sample_rate_hz == 0 {
        return Err(RecordError::ZeroSampleRate);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: config.sample_rate_hz,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&config.path, spec)?;

    let mut engine = SynthesisEngine::new(circles.clone(), params, config.sample_rate_hz);
    let mut buffer = vec![0.0f32; BUFFER_FRAMES as usize];

    let total = config.total_samples();
    let mut remaining = total;
    while remaining > 0 {
        let frames = remaining.min(buffer.len());
        engine.fill(&mut buffer[..frames]);
        for &sample in &buffer[..frames] {
            writer.write_sample(sample)?;
        }
        remaining -= frames;
    }

    writer.finalize()?;

    info!(
        "Rendered {} samples ({:.2}s @ {}Hz) to {}",
        total,
        config.duration_secs,
        config.sample_rate_hz,
        config.path.display()
    );

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SynthParams;

    #[test]
    fn test_render_to_wav_writes_expected_samples() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RecordingConfig::new(dir.path().join("out.wav"), 0.1);
        config.sample_rate_hz = 8000;

        let circles = CircleSet::new();
        circles.add_with_speed(0.8, 1.0);
        let params = Arc::new(SharedParams::new(SynthParams {
            volume: 0.5,
            ..SynthParams::default()
        }));

        let written = render_to_wav(&config, &circles, params).unwrap();
        assert_eq!(written, 800);

        let mut reader = hound::WavReader::open(&config.path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 8000);

        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 800);
        assert!((samples[0] - 0.4).abs() < 1e-6);
        assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 0.4 + 1e-6));
    }

    #[test]
    fn test_render_rejects_zero_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RecordingConfig::new(dir.path().join("out.wav"), 1.0);
        config.sample_rate_hz = 0;

        let result = render_to_wav(&config, &CircleSet::new(), Arc::default());
        assert!(matches!(result, Err(RecordError::ZeroSampleRate)));
        assert!(!config.path.exists());
    }
}
