use std::collections::TryReserveError;

use crate::{
    GetSampleRate,
    sink::AudioSink,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not allocate buffer for {num_samples} samples")]
    Allocation {
        num_samples: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Collects all samples in memory.
#[derive(Clone, Debug)]
pub struct BufferSink {
    sample_rate: f32,
    samples: Vec<f32>,
    cancelled: bool,
}

impl BufferSink {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            samples: vec![],
            cancelled: false,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Whether the last session writing into this sink was cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl GetSampleRate for BufferSink {
    #[inline]
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl AudioSink for BufferSink {
    type Error = Error;

    fn init(&mut self, total_samples: usize) -> Result<(), Self::Error> {
        self.samples.clear();
        self.cancelled = false;
        self.samples
            .try_reserve_exact(total_samples)
            .map_err(|source| {
                Error::Allocation {
                    num_samples: total_samples,
                    source,
                }
            })
    }

    #[inline]
    fn write(&mut self, sample: f32) -> Result<(), Self::Error> {
        self.samples.push(sample);
        Ok(())
    }

    fn finish(&mut self, cancelled: bool) -> Result<(), Self::Error> {
        if cancelled {
            self.samples.clear();
            self.samples.shrink_to_fit();
        }
        self.cancelled = cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sink::{
        AudioSink,
        BufferSink,
        buffer::Error,
    };

    #[test]
    fn allocation_failure_is_reported() {
        let mut sink = BufferSink::new(8000.0);
        let result = sink.init(usize::MAX);
        assert!(matches!(
            result,
            Err(Error::Allocation {
                num_samples: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn cancellation_discards_samples() {
        let mut sink = BufferSink::new(8000.0);
        sink.init(3).unwrap();
        sink.write(0.5).unwrap();
        sink.write(-0.5).unwrap();
        assert_eq!(sink.samples(), [0.5, -0.5]);

        sink.finish(true).unwrap();
        assert!(sink.is_cancelled());
        assert!(sink.samples().is_empty());
    }
}
