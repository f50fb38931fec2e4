//! Additive synthesis of the circle set and its audio output.
//!
//! The engine is a pure sample generator; the system wires it to the default
//! cpal output device and the recorder renders it offline to WAV.

mod clock;
mod engine;
pub mod record;
mod system;

// Re-export public types
pub use clock::AudioClock;
pub use engine::{advance_phase, phase_modulus, SynthesisEngine};
pub use system::AudioSystem;
