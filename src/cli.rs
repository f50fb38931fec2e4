//! Command-line argument parsing.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::info;

use crate::circles::CircleSet;
use crate::editor::CircleSpec;
use crate::error::ConfigError;
use crate::params::{RecordingConfig, RenderConfig, SynthParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "epicycle-synth")]
#[command(about = "Epicycle additive synthesizer and visualizer", long_about = None)]
pub struct Args {
    /// Fundamental frequency (Hz)
    #[arg(long, value_name = "HZ", allow_negative_numbers = true,
          default_value_t = SynthParams::default().fundamental_hz)]
    pub fundamental: f64,

    /// Zoom (pixels per unit radius)
    #[arg(long, value_name = "PX", allow_negative_numbers = true,
          default_value_t = SynthParams::default().zoom_px)]
    pub zoom: f64,

    /// Output volume (linear gain)
    #[arg(long, value_name = "GAIN", default_value_t = SynthParams::default().volume)]
    pub volume: f64,

    /// Anchor the trail at the window center (false: follow the endpoint)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set,
          default_value_t = SynthParams::default().lock_view)]
    pub lock_view: bool,

    /// Initial circle, repeatable (e.g. --circle 0.5:1 --circle 0.25:-3)
    #[arg(long = "circle", value_name = "RADIUS:SPEED", allow_hyphen_values = true)]
    pub circles: Vec<CircleSpec>,

    /// Harmonic pairs to add after the explicit circles
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub harmonics: usize,

    /// Window width (pixels)
    #[arg(long, value_name = "PX", default_value_t = RenderConfig::default().window_width)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PX", default_value_t = RenderConfig::default().window_height)]
    pub height: u32,

    /// Render audio offline to this WAV file instead of opening a window
    #[arg(long, value_name = "PATH")]
    pub render: Option<PathBuf>,

    /// Offline render duration (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 5.0)]
    pub duration: f32,

    /// Offline render sample rate (Hz)
    #[arg(long, value_name = "HZ", default_value_t = 44100)]
    pub sample_rate: u32,
}

impl Args {
    /// Reject non-finite parameters and an unusable offline render setup
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("fundamental", self.fundamental),
            ("zoom", self.zoom),
            ("volume", self.volume),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        if let Some(config) = self.recording_config() {
            config.validate()?;
        }
        Ok(())
    }

    pub fn synth_params(&self) -> SynthParams {
        SynthParams {
            fundamental_hz: self.fundamental,
            zoom_px: self.zoom,
            volume: self.volume,
            lock_view: self.lock_view,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
        }
    }

    /// Offline render configuration if `--render` was given
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.render.as_ref().map(|path| RecordingConfig {
            path: path.clone(),
            duration_secs: self.duration,
            sample_rate_hz: self.sample_rate,
        })
    }

    /// Seed the circle set: explicit circles first, then harmonic pairs
    pub fn populate(&self, circles: &CircleSet) {
        for spec in &self.circles {
            circles.add_with_speed(spec.radius, spec.relative_speed);
        }
        for _ in 0..self.harmonics {
            circles.add_harmonic_pair();
        }
        if !circles.is_empty() {
            info!("Starting with {} circle(s)", circles.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::try_parse_from(["epicycle-synth"]).unwrap();
        assert_eq!(args.synth_params(), SynthParams::default());
        assert!(args.circles.is_empty());
        assert!(args.recording_config().is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_circles_and_options() {
        let args = Args::try_parse_from([
            "epicycle-synth",
            "--fundamental",
            "-55",
            "--lock-view",
            "false",
            "--circle",
            "0.5:1",
            "--circle",
            "-0.25:-3",
            "--harmonics",
            "2",
        ])
        .unwrap();

        let params = args.synth_params();
        assert_eq!(params.fundamental_hz, -55.0);
        assert!(!params.lock_view);

        let circles = CircleSet::new();
        args.populate(&circles);
        let speeds: Vec<f64> = circles.snapshot().iter().map(|c| c.relative_speed()).collect();
        // Harmonic policy continues from the set's length
        assert_eq!(speeds, vec![1.0, -3.0, 2.0, -2.0, 3.0, -3.0]);
        assert_eq!(circles.snapshot()[1].radius(), -0.25);
    }

    #[test]
    fn test_invalid_circle_spec_is_a_parse_error() {
        assert!(Args::try_parse_from(["epicycle-synth", "--circle", "big"]).is_err());
    }

    #[test]
    fn test_validate_recording() {
        let args =
            Args::try_parse_from(["epicycle-synth", "--render", "out.wav", "--duration", "0"])
                .unwrap();
        assert!(matches!(
            args.validate(),
            Err(ConfigError::NotPositive { name: "duration" })
        ));

        let args = Args::try_parse_from(["epicycle-synth", "--volume", "inf"]).unwrap();
        assert!(matches!(
            args.validate(),
            Err(ConfigError::NonFinite { name: "volume", .. })
        ));
    }
}
