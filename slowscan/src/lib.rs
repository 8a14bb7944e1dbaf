//! Slow-scan television (SSTV) encoder.
//!
//! Turns a still image into the audio waveform of an SSTV transmission: the
//! VIS calibration header followed by the image, line by line, as frequency
//! modulated tones.
//!
//! # References
//!
//! - <http://lionel.cordesses.free.fr/gpages/sstv.html>
//! - <http://www.barberdsp.com/downloads/Dayton%20Paper.pdf>
//! - <https://web.archive.org/web/20050306193820/http://www.tima.com/~djones/vis.txt>

#[cfg(feature = "audio")]
pub mod audio;
pub mod encoder;
pub mod header;
pub mod image;
pub mod modes;
pub mod oscillator;
pub mod sink;
pub mod tone;
pub mod vis;

pub use crate::{
    encoder::SstvEncoder,
    modes::{
        LineEncoder,
        ModeSpecification,
    },
    oscillator::Oscillator,
    sink::AudioSink,
    tone::ToneWriter,
    vis::VisCode,
};

pub const LEADER_TONE: f64 = 1900.0;
pub const LEADER_TIME: f64 = 300.0;

pub const LEADER_BREAK_TIME: f64 = 10.0;

pub const VIS_BIT_TIME: f64 = 30.0;
pub const VIS_LOW_TONE: f64 = 1300.0;
pub const VIS_HIGH_TONE: f64 = 1100.0;

// sync, leader break, vis start/stop
pub const SYNC_TONE: f64 = 1200.0;

pub const PORCH_TONE: f64 = 1500.0;

pub const CHANNEL_LOW_TONE: f64 = 1500.0;
pub const CHANNEL_HIGH_TONE: f64 = 2300.0;

pub trait GetSampleRate {
    fn sample_rate(&self) -> f32;
}

impl<T: GetSampleRate> GetSampleRate for &T {
    #[inline]
    fn sample_rate(&self) -> f32 {
        (&**self).sample_rate()
    }
}

impl<T: GetSampleRate> GetSampleRate for &mut T {
    #[inline]
    fn sample_rate(&self) -> f32 {
        (&**self).sample_rate()
    }
}
