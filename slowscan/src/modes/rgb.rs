//! Martin and Scottie modes: the three color channels are sent one after the
//! other, in green, blue, red order.

use crate::{
    PORCH_TONE,
    SYNC_TONE,
    image::{
        Channel,
        FrameBuffer,
    },
    modes::ModeSpecification,
    oscillator::Oscillator,
    sink::AudioSink,
    tone::ToneWriter,
};

const CHANNEL_ORDER: [Channel; 3] = [Channel::Green, Channel::Blue, Channel::Red];

fn scan_channel<F, S>(
    mode: &ModeSpecification,
    line: usize,
    channel: Channel,
    frame_buffer: &F,
    tones: &mut ToneWriter<'_, S>,
) -> Result<usize, S::Error>
where
    F: FrameBuffer,
    S: AudioSink,
{
    tones.scan(mode.scan_time, frame_buffer.width(), |x| {
        frame_buffer.channel(x, line, channel)
    })
}

pub fn martin_line_time(mode: &ModeSpecification) -> f64 {
    mode.sync_time + mode.porch_time + 3.0 * (mode.scan_time + mode.sep_time)
}

pub fn martin_line_samples(mode: &ModeSpecification, oscillator: &Oscillator) -> usize {
    oscillator.duration_to_samples(mode.sync_time)
        + oscillator.duration_to_samples(mode.porch_time)
        + 3 * (oscillator.duration_to_samples(mode.scan_time)
            + oscillator.duration_to_samples(mode.sep_time))
}

pub fn encode_martin_line<F, S>(
    mode: &ModeSpecification,
    line: usize,
    frame_buffer: &F,
    tones: &mut ToneWriter<'_, S>,
) -> Result<(), S::Error>
where
    F: FrameBuffer,
    S: AudioSink,
{
    tones.tone(SYNC_TONE, mode.sync_time)?;
    tones.tone(PORCH_TONE, mode.porch_time)?;
    for channel in CHANNEL_ORDER {
        scan_channel(mode, line, channel, frame_buffer, tones)?;
        tones.tone(PORCH_TONE, mode.sep_time)?;
    }
    Ok(())
}

pub fn scottie_line_time(mode: &ModeSpecification) -> f64 {
    2.0 * (mode.sep_time + mode.scan_time) + mode.sync_time + mode.porch_time + mode.scan_time
}

/// Samples per line, without the leading sync pulse of the first line.
pub fn scottie_line_samples(mode: &ModeSpecification, oscillator: &Oscillator) -> usize {
    let scan = oscillator.duration_to_samples(mode.scan_time);
    2 * (oscillator.duration_to_samples(mode.sep_time) + scan)
        + oscillator.duration_to_samples(mode.sync_time)
        + oscillator.duration_to_samples(mode.porch_time)
        + scan
}

pub fn encode_scottie_line<F, S>(
    mode: &ModeSpecification,
    line: usize,
    frame_buffer: &F,
    tones: &mut ToneWriter<'_, S>,
) -> Result<(), S::Error>
where
    F: FrameBuffer,
    S: AudioSink,
{
    if line == 0 {
        tones.tone(SYNC_TONE, mode.sync_time)?;
    }

    tones.tone(PORCH_TONE, mode.sep_time)?;
    scan_channel(mode, line, Channel::Green, frame_buffer, tones)?;
    tones.tone(PORCH_TONE, mode.sep_time)?;
    scan_channel(mode, line, Channel::Blue, frame_buffer, tones)?;
    tones.tone(SYNC_TONE, mode.sync_time)?;
    tones.tone(PORCH_TONE, mode.porch_time)?;
    scan_channel(mode, line, Channel::Red, frame_buffer, tones)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{
        Rgb,
        RgbImage,
    };

    use crate::{
        PORCH_TONE,
        SYNC_TONE,
        modes::{
            ModeSpecification,
            rgb::{
                encode_martin_line,
                encode_scottie_line,
                martin_line_samples,
                scottie_line_samples,
            },
        },
        oscillator::Oscillator,
        sink::BufferSink,
        test::{
            assert_frequencies,
            render_tones,
            segment_frequencies,
        },
        tone::{
            ToneWriter,
            channel_frequency,
        },
    };

    #[test]
    fn martin_line_layout() {
        let sample_rate = 8000.0;
        let mode = ModeSpecification::M1;
        let image = RgbImage::from_pixel(320, 1, Rgb([0xff, 0x00, 0x80]));

        let mut oscillator = Oscillator::new(sample_rate);
        let mut sink = BufferSink::new(sample_rate);
        let mut tones = ToneWriter::new(&mut oscillator, &mut sink);
        encode_martin_line(&mode, 0, &image, &mut tones).unwrap();

        let expected = martin_line_samples(&mode, &Oscillator::new(sample_rate));
        assert_eq!(sink.samples().len(), expected);
        // 4.862 ms sync + 0.572 ms porch + 3 * (146.432 ms + 0.572 ms) at 8 kHz
        assert_eq!(expected, 39 + 5 + 3 * (1171 + 5));
    }

    #[test]
    fn martin_sends_green_blue_red() {
        let mode = ModeSpecification::M1;
        let image = RgbImage::from_pixel(320, 1, Rgb([0xff, 0x00, 0x80]));
        let samples = render_tones(44100.0, |tones| {
            encode_martin_line(&mode, 0, &image, tones).unwrap();
        });

        let durations = [
            mode.sync_time,
            mode.porch_time,
            mode.scan_time,
            mode.sep_time,
            mode.scan_time,
            mode.sep_time,
            mode.scan_time,
            mode.sep_time,
        ];
        assert_eq!(
            samples.len(),
            martin_line_samples(&mode, &Oscillator::new(44100.0))
        );
        assert_frequencies(
            &segment_frequencies(&samples, 44100.0, &durations),
            &[
                SYNC_TONE,
                PORCH_TONE,
                channel_frequency(0x00),
                PORCH_TONE,
                channel_frequency(0x80),
                PORCH_TONE,
                channel_frequency(0xff),
                PORCH_TONE,
            ],
        );
    }

    #[test]
    fn scottie_syncs_before_red() {
        let mode = ModeSpecification::S1;
        let image = RgbImage::from_pixel(320, 2, Rgb([0x40, 0xc0, 0xff]));

        // only the first line starts with a sync pulse
        let samples = render_tones(44100.0, |tones| {
            encode_scottie_line(&mode, 0, &image, tones).unwrap();
        });
        let durations = [
            mode.sync_time,
            mode.sep_time,
            mode.scan_time,
            mode.sep_time,
            mode.scan_time,
            mode.sync_time,
            mode.porch_time,
            mode.scan_time,
        ];
        assert_frequencies(
            &segment_frequencies(&samples, 44100.0, &durations),
            &[
                SYNC_TONE,
                PORCH_TONE,
                channel_frequency(0xc0),
                PORCH_TONE,
                channel_frequency(0xff),
                SYNC_TONE,
                PORCH_TONE,
                channel_frequency(0x40),
            ],
        );

        let samples = render_tones(44100.0, |tones| {
            encode_scottie_line(&mode, 1, &image, tones).unwrap();
        });
        assert_eq!(
            samples.len(),
            scottie_line_samples(&mode, &Oscillator::new(44100.0))
        );
        assert_frequencies(
            &segment_frequencies(&samples, 44100.0, &durations[1..]),
            &[
                PORCH_TONE,
                channel_frequency(0xc0),
                PORCH_TONE,
                channel_frequency(0xff),
                SYNC_TONE,
                PORCH_TONE,
                channel_frequency(0x40),
            ],
        );
    }
}
