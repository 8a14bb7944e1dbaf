//! Robot 36: full resolution luminance on every line, chrominance at half the
//! vertical resolution. Even lines carry R-Y, odd lines B-Y, each averaged
//! over the line pair.

use crate::{
    CHANNEL_HIGH_TONE,
    CHANNEL_LOW_TONE,
    PORCH_TONE,
    SYNC_TONE,
    image::FrameBuffer,
    modes::ModeSpecification,
    oscillator::Oscillator,
    sink::AudioSink,
    tone::ToneWriter,
};

const CHROMA_PORCH_TONE: f64 = 1900.0;
const CHROMA_PORCH_TIME: f64 = 1.5;

/// Separator before R-Y lines.
const EVEN_SEPARATOR_TONE: f64 = CHANNEL_LOW_TONE;
/// Separator before B-Y lines.
const ODD_SEPARATOR_TONE: f64 = CHANNEL_HIGH_TONE;

#[inline]
fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// BT.601 studio range, as `[y, cb, cr]`.
pub fn ycbcr([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    [
        clamp_u8(16.0 + (65.738 * r + 129.057 * g + 25.064 * b) / 256.0),
        clamp_u8(128.0 + (-37.945 * r - 74.494 * g + 112.439 * b) / 256.0),
        clamp_u8(128.0 + (112.439 * r - 94.154 * g - 18.285 * b) / 256.0),
    ]
}

pub fn line_time(mode: &ModeSpecification) -> f64 {
    mode.sync_time
        + mode.porch_time
        + mode.scan_time
        + mode.sep_time
        + CHROMA_PORCH_TIME
        + mode.scan_time / 2.0
}

pub fn line_samples(mode: &ModeSpecification, oscillator: &Oscillator) -> usize {
    oscillator.duration_to_samples(mode.sync_time)
        + oscillator.duration_to_samples(mode.porch_time)
        + oscillator.duration_to_samples(mode.scan_time)
        + oscillator.duration_to_samples(mode.sep_time)
        + oscillator.duration_to_samples(CHROMA_PORCH_TIME)
        + oscillator.duration_to_samples(mode.scan_time / 2.0)
}

pub fn encode_line<F, S>(
    mode: &ModeSpecification,
    line: usize,
    frame_buffer: &F,
    tones: &mut ToneWriter<'_, S>,
) -> Result<(), S::Error>
where
    F: FrameBuffer,
    S: AudioSink,
{
    let width = frame_buffer.width();
    let height = frame_buffer.height();

    tones.tone(SYNC_TONE, mode.sync_time)?;
    tones.tone(PORCH_TONE, mode.porch_time)?;
    tones.scan(mode.scan_time, width, |x| {
        ycbcr(frame_buffer.rgb(x, line))[0]
    })?;

    // the pair partner of the last line of an odd-height image is the line
    // itself
    let (pair, separator_tone, component) = if line % 2 == 0 {
        ((line + 1).min(height - 1), EVEN_SEPARATOR_TONE, 2)
    }
    else {
        (line - 1, ODD_SEPARATOR_TONE, 1)
    };

    tones.tone(separator_tone, mode.sep_time)?;
    tones.tone(CHROMA_PORCH_TONE, CHROMA_PORCH_TIME)?;
    tones.scan(mode.scan_time / 2.0, width, |x| {
        let a = ycbcr(frame_buffer.rgb(x, line))[component];
        let b = ycbcr(frame_buffer.rgb(x, pair))[component];
        ((u16::from(a) + u16::from(b)) / 2) as u8
    })?;

    Ok(())
}
