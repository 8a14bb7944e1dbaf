use std::path::{
    Path,
    PathBuf,
};

use color_eyre::eyre::{
    Error,
    bail,
};
use directories::ProjectDirs;
use image::imageops::FilterType;
use serde::{
    Deserialize,
    Serialize,
};
use slowscan::{
    ModeSpecification,
    sink::wav::SampleFormat,
};

pub const DEFAULT_MODE: &str = "R36";
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Contents of the config file. Everything is optional, command line
/// arguments take precedence.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub mode: Option<String>,
    pub sample_rate: Option<f32>,
    pub sample_format: Option<WavFormat>,
    pub resize: Option<ResizeFilter>,
    pub volume: Option<f32>,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading config");
        let config = toml::from_str(&std::fs::read_to_string(path)?)?;
        Ok(config)
    }

    /// Loads the config from `path`, or from the default location if no path
    /// is given. A missing default config is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_path(path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "slowscan", "slowscan-cli")
        .map(|project_dirs| project_dirs.config_dir().join("config.toml"))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WavFormat {
    #[default]
    F32,
    I16,
}

impl From<WavFormat> for SampleFormat {
    fn from(value: WavFormat) -> Self {
        match value {
            WavFormat::F32 => Self::Float32,
            WavFormat::I16 => Self::Int16,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(value: ResizeFilter) -> Self {
        match value {
            ResizeFilter::Nearest => Self::Nearest,
            ResizeFilter::Triangle => Self::Triangle,
            ResizeFilter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Options shared by all commands that transmit an image.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct TransmitOptions {
    /// SSTV mode, by short name (see `modes`)
    #[clap(short, long)]
    pub mode: Option<String>,

    /// Sample rate of the generated audio
    #[clap(short, long = "samplerate")]
    pub sample_rate: Option<f32>,

    /// Filter used to scale the image to the mode's resolution
    #[clap(long)]
    pub resize: Option<ResizeFilter>,
}

/// Config file and command line merged, with defaults filled in.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub mode: &'static ModeSpecification,
    pub sample_rate: f32,
    pub sample_format: WavFormat,
    pub resize: ResizeFilter,
    pub volume: f32,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        options: &TransmitOptions,
        sample_format: Option<WavFormat>,
        volume: Option<f32>,
    ) -> Result<Self, Error> {
        let mode_name = options
            .mode
            .as_deref()
            .or(config.mode.as_deref())
            .unwrap_or(DEFAULT_MODE);
        let Some(mode) = ModeSpecification::by_name(mode_name)
        else {
            bail!("Unknown mode: {mode_name}");
        };

        let sample_rate = options
            .sample_rate
            .or(config.sample_rate)
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            bail!("Sample rate must be a positive number: {sample_rate}");
        }

        Ok(Self {
            mode,
            sample_rate,
            sample_format: sample_format.or(config.sample_format).unwrap_or_default(),
            resize: options.resize.or(config.resize).unwrap_or_default(),
            volume: volume.or(config.volume).unwrap_or(DEFAULT_VOLUME),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{
        Config,
        ResizeFilter,
        Settings,
        TransmitOptions,
        WavFormat,
    };

    #[test]
    fn parse_config_file() {
        let config: Config = toml::from_str(
            r#"
            mode = "m1"
            sample_rate = 11025.0
            sample_format = "i16"
            resize = "lanczos3"
            "#,
        )
        .unwrap();
        assert_eq!(config.mode.as_deref(), Some("m1"));
        assert_eq!(config.sample_rate, Some(11025.0));
        assert_eq!(config.sample_format, Some(WavFormat::I16));
        assert_eq!(config.resize, Some(ResizeFilter::Lanczos3));
        assert_eq!(config.volume, None);
    }

    #[test]
    fn command_line_overrides_config() {
        let config = Config {
            mode: Some("m1".to_owned()),
            sample_rate: Some(11025.0),
            ..Default::default()
        };
        let options = TransmitOptions {
            mode: Some("S2".to_owned()),
            ..Default::default()
        };

        let settings = Settings::resolve(&config, &options, None, None).unwrap();
        assert_eq!(settings.mode.short_name, "S2");
        assert_eq!(settings.sample_rate, 11025.0);
        assert_eq!(settings.sample_format, WavFormat::F32);
        assert_eq!(settings.resize, ResizeFilter::Triangle);
    }

    #[test]
    fn defaults() {
        let settings =
            Settings::resolve(&Config::default(), &TransmitOptions::default(), None, None)
                .unwrap();
        assert_eq!(settings.mode.short_name, "R36");
        assert_eq!(settings.sample_rate, 44100.0);
        assert_eq!(settings.volume, 1.0);
    }

    #[test]
    fn unknown_mode() {
        let options = TransmitOptions {
            mode: Some("pd90".to_owned()),
            ..Default::default()
        };
        assert!(Settings::resolve(&Config::default(), &options, None, None).is_err());
    }

    #[test]
    fn invalid_sample_rate() {
        for sample_rate in [0.0, -44100.0, f32::NAN, f32::INFINITY] {
            let options = TransmitOptions {
                sample_rate: Some(sample_rate),
                ..Default::default()
            };
            assert!(Settings::resolve(&Config::default(), &options, None, None).is_err());
        }

        let config = Config {
            sample_rate: Some(f32::INFINITY),
            ..Default::default()
        };
        assert!(
            Settings::resolve(&config, &TransmitOptions::default(), None, None).is_err()
        );
    }
}
