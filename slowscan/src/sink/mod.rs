//! Audio sinks the encoder writes samples into.

pub mod buffer;
pub mod wav;

pub use self::{
    buffer::BufferSink,
    wav::WavSink,
};
use crate::GetSampleRate;

/// Destination for synthesized samples.
///
/// The encoder calls [`init`](AudioSink::init) exactly once before the first
/// [`write`](AudioSink::write), writes every sample in order, and calls
/// [`finish`](AudioSink::finish) exactly once at the end. A sink may discard
/// what it received when `finish` reports a cancellation.
pub trait AudioSink: GetSampleRate {
    type Error: std::error::Error;

    fn init(&mut self, total_samples: usize) -> Result<(), Self::Error>;

    fn write(&mut self, sample: f32) -> Result<(), Self::Error>;

    fn finish(&mut self, cancelled: bool) -> Result<(), Self::Error>;
}

impl<T> AudioSink for &mut T
where
    T: AudioSink,
{
    type Error = T::Error;

    #[inline]
    fn init(&mut self, total_samples: usize) -> Result<(), Self::Error> {
        (&mut **self).init(total_samples)
    }

    #[inline]
    fn write(&mut self, sample: f32) -> Result<(), Self::Error> {
        (&mut **self).write(sample)
    }

    #[inline]
    fn finish(&mut self, cancelled: bool) -> Result<(), Self::Error> {
        (&mut **self).finish(cancelled)
    }
}
