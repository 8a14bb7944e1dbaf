use std::f64::consts::TAU;

use crate::GetSampleRate;

#[inline]
fn step_from_frequency_and_sample_rate(frequency: f64, sample_rate: f64) -> f64 {
    (TAU * frequency / sample_rate).rem_euclid(TAU)
}

/// Phase-continuous sine oscillator.
///
/// The running phase is carried from one sample to the next, regardless of
/// frequency changes, so consecutive tones join without a discontinuity. The
/// phase is kept in `[0, 2π)` after every step.
///
/// Tone durations are rounded to whole samples. The rounding error is not
/// compensated, but it is accumulated into the tail time, which can be read
/// with [`Oscillator::timing_error`].
#[derive(Clone, Copy, Debug)]
pub struct Oscillator {
    sample_rate: f32,
    phase: f64,
    tail_time: f64,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            tail_time: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.tail_time = 0.0;
    }

    /// Current phase in radians.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Accumulated difference between the exact and the emitted tone lengths,
    /// in samples. Positive if more time was requested than emitted.
    #[inline]
    pub fn timing_error(&self) -> f64 {
        self.tail_time
    }

    /// Number of samples a tone of `duration` milliseconds is rendered with.
    #[inline]
    pub fn duration_to_samples(&self, duration: f64) -> usize {
        (self.exact_samples(duration).round()) as usize
    }

    #[inline]
    fn exact_samples(&self, duration: f64) -> f64 {
        duration * f64::from(self.sample_rate) / 1000.0
    }

    /// Records that a tone of `duration` milliseconds was rendered with
    /// `num_samples` samples.
    #[inline]
    pub(crate) fn account(&mut self, duration: f64, num_samples: usize) {
        self.tail_time += self.exact_samples(duration) - num_samples as f64;
    }

    /// Advances the phase by one sample period at `frequency` and returns the
    /// new sample.
    #[inline]
    pub fn next(&mut self, frequency: f64) -> f32 {
        let step = step_from_frequency_and_sample_rate(frequency, f64::from(self.sample_rate));
        self.phase = (self.phase + step).rem_euclid(TAU);
        self.phase.sin() as f32
    }
}

impl GetSampleRate for Oscillator {
    #[inline]
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use approx::assert_abs_diff_eq;

    use crate::oscillator::Oscillator;

    #[test]
    fn duration_rounding() {
        let oscillator = Oscillator::new(44100.0);
        assert_eq!(oscillator.duration_to_samples(300.0), 13230);
        assert_eq!(oscillator.duration_to_samples(10.0), 441);
        assert_eq!(oscillator.duration_to_samples(30.0), 1323);
        assert_eq!(oscillator.duration_to_samples(0.0), 0);

        let oscillator = Oscillator::new(11025.0);
        // 0.4576 ms * 11025 Hz = 5.045
        assert_eq!(oscillator.duration_to_samples(0.4576), 5);
        // 9 ms * 11025 Hz = 99.225
        assert_eq!(oscillator.duration_to_samples(9.0), 99);
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut oscillator = Oscillator::new(8000.0);
        for _ in 0..100_000 {
            oscillator.next(2299.0);
            let phase = oscillator.phase();
            assert!((0.0..TAU).contains(&phase), "phase out of range: {phase}");
        }
    }

    #[test]
    fn first_sample_is_advanced() {
        let mut oscillator = Oscillator::new(8000.0);
        let sample = oscillator.next(1000.0);
        assert_abs_diff_eq!(f64::from(sample), (TAU / 8.0).sin(), epsilon = 1e-6);
    }

    #[test]
    fn timing_error_accumulates() {
        let mut oscillator = Oscillator::new(11025.0);
        let num_samples = oscillator.duration_to_samples(9.0);
        oscillator.account(9.0, num_samples);
        oscillator.account(9.0, num_samples);
        assert_abs_diff_eq!(oscillator.timing_error(), 0.45, epsilon = 1e-9);

        oscillator.reset();
        assert_eq!(oscillator.timing_error(), 0.0);
        assert_eq!(oscillator.phase(), 0.0);
    }
}
