use crate::{
    CHANNEL_HIGH_TONE,
    CHANNEL_LOW_TONE,
    oscillator::Oscillator,
    sink::AudioSink,
};

/// Maps an 8-bit channel value linearly onto the video band, 1500 Hz (black)
/// to 2300 Hz (white).
#[inline]
pub fn channel_frequency(value: u8) -> f64 {
    f64::from(value) * (CHANNEL_HIGH_TONE - CHANNEL_LOW_TONE) / 255.0 + CHANNEL_LOW_TONE
}

/// Renders tone segments through the session's oscillator into its sink.
///
/// This is what mode strategies see while encoding a line.
#[derive(Debug)]
pub struct ToneWriter<'a, S> {
    oscillator: &'a mut Oscillator,
    sink: &'a mut S,
}

impl<'a, S> ToneWriter<'a, S>
where
    S: AudioSink,
{
    #[inline]
    pub fn new(oscillator: &'a mut Oscillator, sink: &'a mut S) -> Self {
        Self { oscillator, sink }
    }

    #[inline]
    pub fn oscillator(&self) -> &Oscillator {
        self.oscillator
    }

    /// Writes a single sample at `frequency`.
    #[inline]
    pub fn sample(&mut self, frequency: f64) -> Result<(), S::Error> {
        let sample = self.oscillator.next(frequency);
        self.sink.write(sample)
    }

    /// Writes a tone of `duration` milliseconds. Returns the number of samples
    /// written.
    pub fn tone(&mut self, frequency: f64, duration: f64) -> Result<usize, S::Error> {
        let num_samples = self.oscillator.duration_to_samples(duration);
        self.oscillator.account(duration, num_samples);
        for _ in 0..num_samples {
            self.sample(frequency)?;
        }
        Ok(num_samples)
    }

    #[inline]
    pub fn channel_sample(&mut self, value: u8) -> Result<(), S::Error> {
        self.sample(channel_frequency(value))
    }

    #[inline]
    pub fn channel_tone(&mut self, value: u8, duration: f64) -> Result<usize, S::Error> {
        self.tone(channel_frequency(value), duration)
    }

    /// Scans `width` pixels in `duration` milliseconds.
    ///
    /// The samples of the scan are spread evenly over the pixels, so the scan
    /// has the same length as a tone of `duration`, no matter how many samples
    /// fall onto a single pixel. `value` is called with the pixel's x
    /// coordinate.
    pub fn scan(
        &mut self,
        duration: f64,
        width: usize,
        mut value: impl FnMut(usize) -> u8,
    ) -> Result<usize, S::Error> {
        if width == 0 {
            return self.tone(CHANNEL_LOW_TONE, duration);
        }

        let num_samples = self.oscillator.duration_to_samples(duration);
        self.oscillator.account(duration, num_samples);
        for i in 0..num_samples {
            let x = i * width / num_samples;
            self.channel_sample(value(x))?;
        }
        Ok(num_samples)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        oscillator::Oscillator,
        sink::BufferSink,
        tone::{
            ToneWriter,
            channel_frequency,
        },
    };

    #[test]
    fn channel_frequency_bounds() {
        assert_eq!(channel_frequency(0), 1500.0);
        assert_eq!(channel_frequency(255), 2300.0);
        assert_eq!(channel_frequency(51), 1660.0);
    }

    #[test]
    fn channel_frequency_is_monotonic() {
        for value in 0..255u8 {
            assert!(channel_frequency(value) < channel_frequency(value + 1));
        }
    }

    #[test]
    fn tone_writes_rounded_sample_count() {
        let mut oscillator = Oscillator::new(44100.0);
        let mut sink = BufferSink::new(44100.0);
        let mut tones = ToneWriter::new(&mut oscillator, &mut sink);

        assert_eq!(tones.tone(1900.0, 300.0).unwrap(), 13230);
        assert_eq!(tones.channel_tone(128, 0.4576).unwrap(), 20);
        assert_eq!(sink.samples().len(), 13250);
    }

    #[test]
    fn scan_visits_every_pixel_in_order() {
        let mut oscillator = Oscillator::new(8000.0);
        let mut sink = BufferSink::new(8000.0);
        let mut tones = ToneWriter::new(&mut oscillator, &mut sink);

        let mut visited = vec![];
        // 10 ms at 8 kHz = 80 samples over 32 pixels
        let num_samples = tones
            .scan(10.0, 32, |x| {
                visited.push(x);
                0
            })
            .unwrap();
        assert_eq!(num_samples, 80);
        assert_eq!(visited.len(), 80);
        assert!(visited.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(visited.first(), Some(&0));
        assert_eq!(visited.last(), Some(&31));
        assert_eq!(sink.samples().len(), 80);
    }
}
