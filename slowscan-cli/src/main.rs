pub mod config;

use std::path::{
    Path,
    PathBuf,
};

use clap::Parser;
use color_eyre::eyre::Error;
use image::{
    ImageReader,
    RgbImage,
};
use slowscan::{
    AudioSink,
    ModeSpecification,
    SstvEncoder,
    sink::WavSink,
};
use tracing_subscriber::EnvFilter;

use crate::config::{
    Config,
    Settings,
    TransmitOptions,
    WavFormat,
};

fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::debug!(?args);

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Encode {
            image,
            output,
            options,
            sample_format,
        } => {
            let settings = Settings::resolve(&config, &options, sample_format, None)?;
            encode_image(&image, &output, &settings)?;
        }
        #[cfg(feature = "audio")]
        Command::Play {
            image,
            options,
            volume,
        } => {
            let settings = Settings::resolve(&config, &options, None, volume)?;
            play_image(&image, &settings)?;
        }
        Command::Modes => list_modes(),
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[clap(about = "Encode images as slow-scan television audio")]
struct Args {
    /// Config file. Defaults to `config.toml` in the platform's config
    /// directory.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Encode an image into a wav file
    Encode {
        image: PathBuf,
        output: PathBuf,

        #[clap(flatten)]
        options: TransmitOptions,

        /// Sample format of the wav file
        #[clap(long)]
        sample_format: Option<WavFormat>,
    },
    /// Encode an image and play it on the default audio output
    #[cfg(feature = "audio")]
    Play {
        image: PathBuf,

        #[clap(flatten)]
        options: TransmitOptions,

        #[clap(long)]
        volume: Option<f32>,
    },
    /// List the available modes
    Modes,
}

fn load_image(path: &Path, settings: &Settings) -> Result<RgbImage, Error> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let (width, height) = (
        settings.mode.pixels_per_line as u32,
        settings.mode.num_lines as u32,
    );
    tracing::debug!(
        path = %path.display(),
        from = ?(image.width(), image.height()),
        to = ?(width, height),
        filter = ?settings.resize,
        "Scaling image"
    );
    Ok(image
        .resize_exact(width, height, settings.resize.into())
        .into_rgb8())
}

/// Runs a complete transmission, logging progress every 10 % of the lines.
fn transmit<S>(image: RgbImage, mode: &ModeSpecification, sink: S) -> Result<S, Error>
where
    S: AudioSink,
    S::Error: Send + Sync + 'static,
{
    let mut encoder = SstvEncoder::new(image, *mode, sink)?;
    let num_lines = encoder.process_count();
    let progress_step = (num_lines / 10).max(1);

    tracing::info!(
        mode = mode.name,
        vis_code = %mode.vis_code,
        num_samples = encoder.total_samples(),
        "Encoding image"
    );

    let result = encoder.init().and_then(|()| {
        for line in encoder.lines() {
            let line = line? + 1;
            if line % progress_step == 0 || line == num_lines {
                tracing::info!(line, num_lines, "{}%", line * 100 / num_lines);
            }
        }
        Ok(())
    });

    if let Err(error) = result {
        if let Err(error) = encoder.finish(true) {
            tracing::warn!(%error, "Failed to cancel transmission");
        }
        return Err(error.into());
    }

    Ok(encoder.finish(false)?)
}

fn encode_image(image: &Path, output: &Path, settings: &Settings) -> Result<(), Error> {
    let image = load_image(image, settings)?;
    let sink = WavSink::from_path(
        output,
        settings.sample_rate,
        settings.sample_format.into(),
    )?;
    transmit(image, settings.mode, sink)?;
    tracing::info!(output = %output.display(), "Done");
    Ok(())
}

#[cfg(feature = "audio")]
fn play_image(image: &Path, settings: &Settings) -> Result<(), Error> {
    use slowscan::audio::PlaybackSink;

    let image = load_image(image, settings)?;
    let sink = PlaybackSink::new(settings.sample_rate, settings.volume)?;
    let sink = transmit(image, settings.mode, sink)?;
    sink.sleep_until_end();
    Ok(())
}

fn list_modes() {
    for mode in ModeSpecification::ALL {
        println!(
            "{:<4} {:<12} VIS {}  {}x{}  {:.1} s",
            mode.short_name,
            mode.name,
            mode.vis_code,
            mode.pixels_per_line,
            mode.num_lines,
            mode.duration() / 1000.0,
        );
    }
}
