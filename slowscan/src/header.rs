//! VIS calibration header.
//!
//! ```plain
//! leader  break  leader  start  b0 .. b6  parity  stop
//! 1900    1200   1900    1200   1100/1300 (1 / 0) 1200  Hz
//! 300     10     300     30     30 each   30      30    ms
//! ```

use crate::{
    LEADER_BREAK_TIME,
    LEADER_TIME,
    LEADER_TONE,
    SYNC_TONE,
    VIS_BIT_TIME,
    VIS_HIGH_TONE,
    VIS_LOW_TONE,
    oscillator::Oscillator,
    sink::AudioSink,
    tone::ToneWriter,
    vis::VisCode,
};

/// Nominal header length in milliseconds.
pub const HEADER_TIME: f64 = 2.0 * LEADER_TIME + LEADER_BREAK_TIME + 10.0 * VIS_BIT_TIME;

#[inline]
fn bit_tone(bit: bool) -> f64 {
    if bit { VIS_HIGH_TONE } else { VIS_LOW_TONE }
}

/// The header's tone segments as `(frequency, duration)` pairs.
pub fn header_tones(vis_code: VisCode) -> impl Iterator<Item = (f64, f64)> {
    let data = vis_code
        .bits()
        .chain([vis_code.parity()])
        .map(|bit| (bit_tone(bit), VIS_BIT_TIME))
        .collect::<Vec<_>>();

    [
        (LEADER_TONE, LEADER_TIME),
        (SYNC_TONE, LEADER_BREAK_TIME),
        (LEADER_TONE, LEADER_TIME),
        (SYNC_TONE, VIS_BIT_TIME),
    ]
    .into_iter()
    .chain(data)
    .chain([(SYNC_TONE, VIS_BIT_TIME)])
}

/// Number of samples the header is rendered with. Each segment is rounded on
/// its own, exactly like [`write_header`] does.
pub fn header_samples(oscillator: &Oscillator) -> usize {
    2 * oscillator.duration_to_samples(LEADER_TIME)
        + oscillator.duration_to_samples(LEADER_BREAK_TIME)
        + 10 * oscillator.duration_to_samples(VIS_BIT_TIME)
}

pub fn write_header<S>(tones: &mut ToneWriter<'_, S>, vis_code: VisCode) -> Result<usize, S::Error>
where
    S: AudioSink,
{
    tracing::debug!(%vis_code, parity = vis_code.parity(), "Writing calibration header");

    let mut num_samples = 0;
    for (frequency, duration) in header_tones(vis_code) {
        num_samples += tones.tone(frequency, duration)?;
    }
    Ok(num_samples)
}
