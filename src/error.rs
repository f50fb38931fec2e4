//! Error types for editing, configuration, audio output and rendering.
//!
//! None of these are raised from inside the audio callback or the per-frame
//! render path; those normalize bad numbers in place instead.

use thiserror::Error;

use crate::circles::CircleId;

/// Rejected edit of a circle field or global parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("value must be finite, got {0}")]
    NonFinite(f64),

    #[error("no circle with id {0}")]
    UnknownCircle(CircleId),

    #[error("no circle selected")]
    NoSelection,
}

/// Invalid command-line configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must be greater than zero")]
    NotPositive { name: &'static str },

    #[error("invalid circle spec '{spec}': expected RADIUS:SPEED")]
    CircleSpec { spec: String },
}

/// Failure to open or start the audio output stream.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to get audio config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Failure to render audio offline to a WAV file.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("sample rate must be > 0")]
    ZeroSampleRate,

    #[error("WAV output failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Failure to set up the GPU drawing surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}
