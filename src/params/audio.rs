//! Audio output and offline rendering configuration.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Audio constants shared by the output stream and offline renderer
pub mod audio_constants {
    /// Preferred output buffer size (frames per callback, mono)
    pub const BUFFER_FRAMES: u32 = 1024;

    /// Hard clip applied to the device output (linear gain)
    pub const OUTPUT_CLIP: f32 = 1.0;
}

/// Offline rendering configuration (`--render` mode)
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Destination WAV file
    pub path: PathBuf,

    /// Duration to render (seconds)
    pub duration_secs: f32,

    /// Sample rate of the rendered file (Hz)
    pub sample_rate_hz: u32,
}

impl RecordingConfig {
    pub fn new(path: impl Into<PathBuf>, duration_secs: f32) -> Self {
        Self {
            path: path.into(),
            duration_secs,
            sample_rate_hz: 44100,
        }
    }

    /// Total number of samples to render, rounded to the nearest sample
    pub fn total_samples(&self) -> usize {
        (self.duration_secs.max(0.0) as f64 * self.sample_rate_hz as f64).round() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_secs.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "duration",
                value: self.duration_secs as f64,
            });
        }
        if self.duration_secs <= 0.0 {
            return Err(ConfigError::NotPositive { name: "duration" });
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::NotPositive {
                name: "sample rate",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_samples() {
        let config = RecordingConfig::new("out.wav", 0.5);
        assert_eq!(config.total_samples(), 22050);

        // 0.3f32 * 44100 lands just above 13230 in single precision
        let config = RecordingConfig::new("out.wav", 0.3);
        assert_eq!(config.total_samples(), 13230);

        let mut config = RecordingConfig::new("out.wav", 0.1);
        config.sample_rate_hz = 8000;
        assert_eq!(config.total_samples(), 800);
    }

    #[test]
    fn test_validate() {
        assert!(RecordingConfig::new("out.wav", 1.0).validate().is_ok());
        assert!(RecordingConfig::new("out.wav", 0.0).validate().is_err());
        assert!(RecordingConfig::new("out.wav", f32::NAN).validate().is_err());

        let mut config = RecordingConfig::new("out.wav", 1.0);
        config.sample_rate_hz = 0;
        assert!(config.validate().is_err());
    }
}
