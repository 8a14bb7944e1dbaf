use std::{
    fs::File,
    io::{
        BufWriter,
        Seek,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
};

use crate::{
    GetSampleRate,
    sink::AudioSink,
};

#[derive(Debug, thiserror::Error)]
#[error("wav sink error")]
pub enum Error {
    Hound(#[from] hound::Error),
    Io(#[from] std::io::Error),
    #[error("wav sink is closed")]
    Closed,
    #[error("{num_samples} samples don't fit into a wav file")]
    TooLong { num_samples: usize },
    #[error("invalid sample rate for a wav file: {sample_rate}")]
    SampleRate { sample_rate: f32 },
}

/// Wav files store the sample rate as an integer, so the sink runs at the
/// requested rate rounded to the nearest whole number.
fn wav_sample_rate(sample_rate: f32) -> Result<u32, Error> {
    let rounded = sample_rate.round();
    if rounded >= 1.0 && rounded <= u32::MAX as f32 {
        Ok(rounded as u32)
    }
    else {
        Err(Error::SampleRate { sample_rate })
    }
}

/// Sample encoding of the wav file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleFormat {
    #[default]
    Float32,
    Int16,
}

impl SampleFormat {
    fn spec(&self, sample_rate: u32) -> hound::WavSpec {
        let (bits_per_sample, sample_format) = match self {
            SampleFormat::Float32 => (32, hound::SampleFormat::Float),
            SampleFormat::Int16 => (16, hound::SampleFormat::Int),
        };
        hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }

    #[inline]
    fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::Float32 => 4,
            SampleFormat::Int16 => 2,
        }
    }
}

/// Writes mono samples into a wav file.
///
/// On cancellation the writer is abandoned. If the sink was created with
/// [`WavSink::from_path`] the partial file is removed.
#[derive(derive_more::Debug)]
pub struct WavSink<W>
where
    W: Write + Seek,
{
    #[debug(skip)]
    inner: Option<hound::WavWriter<W>>,
    sample_rate: f32,
    sample_format: SampleFormat,
    path: Option<PathBuf>,
}

impl<W> WavSink<W>
where
    W: Write + Seek,
{
    pub fn from_writer(
        writer: W,
        sample_rate: f32,
        sample_format: SampleFormat,
    ) -> Result<Self, Error> {
        let sample_rate = wav_sample_rate(sample_rate)?;
        let inner = hound::WavWriter::new(writer, sample_format.spec(sample_rate))?;
        Ok(Self {
            inner: Some(inner),
            sample_rate: sample_rate as f32,
            sample_format,
            path: None,
        })
    }

    #[inline]
    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    #[inline]
    fn writer_mut(&mut self) -> Result<&mut hound::WavWriter<W>, Error> {
        self.inner.as_mut().ok_or(Error::Closed)
    }
}

impl WavSink<BufWriter<File>> {
    pub fn from_path(
        path: impl AsRef<Path>,
        sample_rate: f32,
        sample_format: SampleFormat,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let sample_rate = wav_sample_rate(sample_rate)?;
        let inner = hound::WavWriter::create(path, sample_format.spec(sample_rate))?;
        Ok(Self {
            inner: Some(inner),
            sample_rate: sample_rate as f32,
            sample_format,
            path: Some(path.to_owned()),
        })
    }
}

impl<W> GetSampleRate for WavSink<W>
where
    W: Write + Seek,
{
    #[inline]
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl<W> AudioSink for WavSink<W>
where
    W: Write + Seek,
{
    type Error = Error;

    fn init(&mut self, total_samples: usize) -> Result<(), Self::Error> {
        // the riff header needs 36 bytes besides the data chunk
        let max_data_len = u32::MAX as usize - 36;
        let fits = total_samples
            .checked_mul(self.sample_format.bytes_per_sample())
            .is_some_and(|data_len| data_len <= max_data_len);
        if !fits {
            return Err(Error::TooLong {
                num_samples: total_samples,
            });
        }

        // fail early if the sink was already used
        self.writer_mut()?;
        Ok(())
    }

    fn write(&mut self, sample: f32) -> Result<(), Self::Error> {
        let sample_format = self.sample_format;
        let writer = self.writer_mut()?;
        match sample_format {
            SampleFormat::Float32 => writer.write_sample(sample)?,
            SampleFormat::Int16 => {
                let sample = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round();
                writer.write_sample(sample as i16)?
            }
        }
        Ok(())
    }

    fn finish(&mut self, cancelled: bool) -> Result<(), Self::Error> {
        let writer = self.inner.take().ok_or(Error::Closed)?;

        if cancelled {
            drop(writer);
            if let Some(path) = &self.path {
                tracing::debug!(path = %path.display(), "Removing partial wav file");
                std::fs::remove_file(path)?;
            }
        }
        else {
            writer.finalize()?;
        }

        Ok(())
    }
}
