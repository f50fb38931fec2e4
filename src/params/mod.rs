//! Parameter definitions with units and documented semantics.
//!
//! Plain `Default` structs hold startup values; [`SharedParams`] is the live,
//! thread-shared copy the audio engine and render loop read every tick.

mod audio;
mod render;
mod synth;

// Re-export all types
pub use audio::{audio_constants, RecordingConfig};
pub use render::{Color, DrawStyle, RenderConfig};
pub use synth::{SharedParams, SynthParams};
