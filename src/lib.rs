//! Epicycle synthesizer library - additive synthesis and chained-vector
//! visualization of one shared set of rotating circles.

mod atomic;

pub mod audio;
pub mod circles;
pub mod cli;
pub mod editor;
pub mod error;
pub mod params;
pub mod projection;
pub mod rendering;
pub mod scene;
pub mod trail;
