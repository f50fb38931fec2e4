//! Audio output system: drives the synthesis engine from the default cpal
//! output device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::clock::AudioClock;
use super::engine::SynthesisEngine;
use crate::circles::CircleSet;
use crate::error::AudioError;
use crate::params::{audio_constants::BUFFER_FRAMES, audio_constants::OUTPUT_CLIP, SharedParams};

/// Running audio output. Dropping it stops the stream and releases the device.
pub struct AudioSystem {
    /// Frames rendered so far (the display's time source)
    clock: Arc<AudioClock>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start synthesizing `circles`.
    pub fn new(circles: CircleSet, params: Arc<SharedParams>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let mut config = supported.config();
        config.buffer_size = preferred_buffer_size(supported.buffer_size());

        info!(
            "Audio: {} @ {}Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate.0,
            config.channels
        );
        debug!("Audio buffer size: {:?}", config.buffer_size);

        let sample_rate_hz = config.sample_rate.0;
        let clock = Arc::new(AudioClock::new());
        let engine = SynthesisEngine::new(circles, params, sample_rate_hz)
            .with_clock(Arc::clone(&clock));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, engine)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, engine)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, engine)?,
            other => return Err(AudioError::UnsupportedSampleFormat(other)),
        };

        stream.play()?;

        Ok(Self {
            clock,
            _stream: stream,
        })
    }

    /// Elapsed audio-clock time (seconds)
    pub fn current_time(&self) -> Option<f64> {
        self.clock.current_time()
    }
}

/// Ask for fixed 1024-frame buffers when the device allows it.
fn preferred_buffer_size(supported: &cpal::SupportedBufferSize) -> cpal::BufferSize {
    match supported {
        cpal::SupportedBufferSize::Range { min, max }
            if (*min..=*max).contains(&BUFFER_FRAMES) =>
        {
            cpal::BufferSize::Fixed(BUFFER_FRAMES)
        }
        _ => cpal::BufferSize::Default,
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: SynthesisEngine,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch = vec![0.0f32; BUFFER_FRAMES as usize];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            write_frames(data, channels, &mut engine, &mut scratch)
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

/// Render mono samples in scratch-sized chunks and copy each one to every
/// channel of its frame.
fn write_frames<T>(
    output: &mut [T],
    channels: usize,
    engine: &mut SynthesisEngine,
    scratch: &mut [f32],
) where
    T: SizedSample + FromSample<f32>,
{
    let channels = channels.max(1);

    for chunk in output.chunks_mut(channels * scratch.len()) {
        let frames = chunk.len() / channels;
        let mono = &mut scratch[..frames];
        engine.fill(mono);

        for (frame, &sample) in chunk.chunks_mut(channels).zip(mono.iter()) {
            // Safety limiter: hard clip to the device's full scale
            let value = T::from_sample(sample.clamp(-OUTPUT_CLIP, OUTPUT_CLIP));
            for out in frame.iter_mut() {
                *out = value;
            }
        }
    }
}
