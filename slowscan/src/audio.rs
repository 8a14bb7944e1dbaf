//! Playback through the default audio output, using rodio.

use std::collections::TryReserveError;

use crate::{
    GetSampleRate,
    sink::AudioSink,
};

#[derive(Debug, thiserror::Error)]
#[error("audio error")]
pub enum Error {
    Stream(#[from] rodio::StreamError),
    Allocation(#[from] TryReserveError),
}

/// Buffers the transmission and plays it once it is complete.
///
/// Cancelled transmissions are not played.
#[derive(derive_more::Debug)]
pub struct PlaybackSink {
    sample_rate: f32,
    volume: f32,
    samples: Vec<f32>,
    #[debug(skip)]
    output_stream: rodio::OutputStream,
    #[debug(skip)]
    player: Option<rodio::Sink>,
}

impl PlaybackSink {
    /// The sample rate is rounded to a whole number, which is what the output
    /// stream plays at.
    pub fn new(sample_rate: f32, volume: f32) -> Result<Self, Error> {
        let output_stream = rodio::OutputStreamBuilder::open_default_stream()?;
        Ok(Self {
            sample_rate: sample_rate.round(),
            volume,
            samples: vec![],
            output_stream,
            player: None,
        })
    }

    /// Blocks until playback has ended.
    pub fn sleep_until_end(&self) {
        if let Some(player) = &self.player {
            player.sleep_until_end();
        }
    }
}

impl GetSampleRate for PlaybackSink {
    #[inline]
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl AudioSink for PlaybackSink {
    type Error = Error;

    fn init(&mut self, total_samples: usize) -> Result<(), Self::Error> {
        self.samples.clear();
        self.samples.try_reserve_exact(total_samples)?;
        Ok(())
    }

    #[inline]
    fn write(&mut self, sample: f32) -> Result<(), Self::Error> {
        self.samples.push(sample);
        Ok(())
    }

    fn finish(&mut self, cancelled: bool) -> Result<(), Self::Error> {
        let samples = std::mem::take(&mut self.samples);
        if cancelled {
            tracing::debug!("Transmission cancelled, not playing");
            return Ok(());
        }

        tracing::debug!(num_samples = samples.len(), "Starting playback");
        let player = rodio::Sink::connect_new(self.output_stream.mixer());
        player.set_volume(self.volume);
        player.append(rodio::buffer::SamplesBuffer::new(
            1,
            self.sample_rate as u32,
            samples,
        ));
        self.player = Some(player);

        Ok(())
    }
}
