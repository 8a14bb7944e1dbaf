use std::iter::FusedIterator;

use crate::{
    GetSampleRate,
    header,
    image::FrameBuffer,
    modes::LineEncoder,
    oscillator::Oscillator,
    sink::AudioSink,
    tone::ToneWriter,
    vis::VisCode,
};

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid VIS code: {vis_code} is not a 7-bit value")]
    InvalidVisCode { vis_code: u8 },
    #[error("invalid sample rate: {sample_rate}")]
    InvalidSampleRate { sample_rate: f32 },
    #[error(
        "frame buffer is {}x{}, but the mode expects {}x{}",
        .actual.0,
        .actual.1,
        .expected.0,
        .expected.1
    )]
    FrameSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

#[derive(Debug, thiserror::Error)]
#[error("sstv encoder error")]
pub enum Error<E> {
    InvalidConfiguration(#[from] ConfigurationError),
    #[error("operation not allowed while the encoder is {state:?}")]
    InvalidState {
        state: State,
    },
    Sink(#[source] E),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Created,
    Initialized,
    /// `line` is the next line to encode.
    Encoding {
        line: usize,
    },
    Finished,
    /// A sink error aborted the session. `line` is the number of lines that
    /// were completely encoded.
    Failed {
        line: usize,
    },
}

/// Encodes one image as an SSTV transmission.
///
/// The encoder is driven by the caller: [`init`](Self::init) writes the
/// calibration header, then every call to [`process`](Self::process) encodes
/// exactly one line. This leaves the caller in control between lines, e.g. to
/// report progress or to cancel. [`finish`](Self::finish) ends the session,
/// releases the frame buffer and returns the sink.
///
/// ```no_run
/// # use slowscan::{SstvEncoder, ModeSpecification, sink::BufferSink};
/// # let image = image::RgbImage::new(320, 240);
/// let sink = BufferSink::new(44100.0);
/// let mut encoder = SstvEncoder::new(image, ModeSpecification::R36, sink)?;
/// encoder.init()?;
/// while encoder.process()? {}
/// let samples = encoder.finish(false)?.into_samples();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(derive_more::Debug)]
pub struct SstvEncoder<F, M, S> {
    #[debug(skip)]
    frame_buffer: F,
    mode: M,
    sink: S,
    oscillator: Oscillator,
    vis_code: VisCode,
    state: State,
}

impl<F, M, S> SstvEncoder<F, M, S>
where
    F: FrameBuffer,
    M: LineEncoder<F>,
    S: AudioSink,
{
    pub fn new(frame_buffer: F, mode: M, sink: S) -> Result<Self, ConfigurationError> {
        let sample_rate = sink.sample_rate();
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigurationError::InvalidSampleRate { sample_rate });
        }

        let vis_code = mode.vis_code();
        let vis_code =
            VisCode::new(vis_code).ok_or(ConfigurationError::InvalidVisCode { vis_code })?;

        mode.validate(&frame_buffer)?;

        Ok(Self {
            frame_buffer,
            mode,
            sink,
            oscillator: Oscillator::new(sample_rate),
            vis_code,
            state: State::Created,
        })
    }

    /// Number of samples the whole transmission consists of.
    pub fn total_samples(&self) -> usize {
        self.header_samples() + self.transmission_samples()
    }

    #[inline]
    pub fn header_samples(&self) -> usize {
        header::header_samples(&self.oscillator)
    }

    #[inline]
    pub fn transmission_samples(&self) -> usize {
        self.mode
            .transmission_samples(&self.frame_buffer, &self.oscillator)
    }

    /// Number of [`process`](Self::process) calls that do work, i.e. the
    /// number of lines.
    #[inline]
    pub fn process_count(&self) -> usize {
        self.frame_buffer.height()
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of lines encoded so far.
    pub fn current_line(&self) -> usize {
        match self.state {
            State::Created | State::Initialized => 0,
            State::Encoding { line } | State::Failed { line } => line,
            State::Finished => self.process_count(),
        }
    }

    #[inline]
    pub fn vis_code(&self) -> VisCode {
        self.vis_code
    }

    #[inline]
    pub fn mode(&self) -> &M {
        &self.mode
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Announces the total sample count to the sink and writes the
    /// calibration header.
    pub fn init(&mut self) -> Result<(), Error<S::Error>> {
        if self.state != State::Created {
            return Err(Error::InvalidState { state: self.state });
        }

        self.oscillator.reset();

        let total_samples = self.total_samples();
        tracing::debug!(
            vis_code = %self.vis_code,
            sample_rate = self.oscillator.sample_rate(),
            num_lines = self.process_count(),
            total_samples,
            "Starting SSTV transmission"
        );

        self.state = State::Failed { line: 0 };
        self.sink.init(total_samples).map_err(Error::Sink)?;
        header::write_header(
            &mut ToneWriter::new(&mut self.oscillator, &mut self.sink),
            self.vis_code,
        )
        .map_err(Error::Sink)?;

        self.state = if self.process_count() == 0 {
            State::Finished
        }
        else {
            State::Initialized
        };

        Ok(())
    }

    /// Encodes the next line.
    ///
    /// Returns `false` once all lines are encoded. Calling it again after that
    /// keeps returning `false` without writing anything.
    pub fn process(&mut self) -> Result<bool, Error<S::Error>> {
        let line = match self.state {
            State::Created | State::Failed { .. } => {
                return Err(Error::InvalidState { state: self.state });
            }
            State::Initialized => 0,
            State::Encoding { line } => line,
            State::Finished => return Ok(false),
        };

        tracing::trace!(line, "Encoding line");

        self.state = State::Failed { line };
        self.mode
            .encode_line(
                line,
                &self.frame_buffer,
                &mut ToneWriter::new(&mut self.oscillator, &mut self.sink),
            )
            .map_err(Error::Sink)?;

        let line = line + 1;
        self.state = if line >= self.process_count() {
            State::Finished
        }
        else {
            State::Encoding { line }
        };

        Ok(true)
    }

    /// Iterator over the remaining lines, yielding each line's index once it
    /// has been encoded.
    #[inline]
    pub fn lines(&mut self) -> Lines<'_, F, M, S> {
        Lines {
            encoder: self,
            done: false,
        }
    }

    /// Tells the sink whether the transmission completed or was cancelled, and
    /// releases the frame buffer. The frame buffer is released even if the
    /// sink fails.
    pub fn finish(self, cancel: bool) -> Result<S, Error<S::Error>> {
        let Self {
            frame_buffer,
            mut sink,
            oscillator,
            state,
            ..
        } = self;

        tracing::debug!(
            cancel,
            ?state,
            timing_error = oscillator.timing_error(),
            "Finishing SSTV transmission"
        );

        let result = sink.finish(cancel);
        drop(frame_buffer);
        result.map_err(Error::Sink)?;

        Ok(sink)
    }
}

impl<F, M, S> GetSampleRate for SstvEncoder<F, M, S> {
    #[inline]
    fn sample_rate(&self) -> f32 {
        self.oscillator.sample_rate()
    }
}

/// Iterator returned by [`SstvEncoder::lines`].
#[derive(Debug)]
pub struct Lines<'a, F, M, S> {
    encoder: &'a mut SstvEncoder<F, M, S>,
    done: bool,
}

impl<F, M, S> Iterator for Lines<'_, F, M, S>
where
    F: FrameBuffer,
    M: LineEncoder<F>,
    S: AudioSink,
{
    type Item = Result<usize, Error<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let line = self.encoder.current_line();
        match self.encoder.process() {
            Ok(true) => Some(Ok(line)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        }
        else {
            let remaining = self
                .encoder
                .process_count()
                .saturating_sub(self.encoder.current_line());
            (0, Some(remaining))
        }
    }
}

impl<F, M, S> FusedIterator for Lines<'_, F, M, S>
where
    F: FrameBuffer,
    M: LineEncoder<F>,
    S: AudioSink,
{
}

/// Encodes a whole image in one go and returns the sink.
///
/// If encoding fails, the sink is told that the transmission was cancelled.
pub fn encode<F, M, S>(frame_buffer: F, mode: M, sink: S) -> Result<S, Error<S::Error>>
where
    F: FrameBuffer,
    M: LineEncoder<F>,
    S: AudioSink,
{
    let mut encoder = SstvEncoder::new(frame_buffer, mode, sink)?;

    let result = encoder
        .init()
        .and_then(|()| encoder.lines().try_for_each(|line| line.map(|_| ())));

    match result {
        Ok(()) => encoder.finish(false),
        Err(error) => {
            if let Err(finish_error) = encoder.finish(true) {
                tracing::warn!(error = %finish_error, "Sink failed while cancelling");
            }
            Err(error)
        }
    }
}
