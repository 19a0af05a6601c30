//! Configuration: optional `~/.thump/config.yaml`, or an explicit path.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::instrument::{SampleSource, PAD_COUNT};

/// Config errors. Only raised at startup.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            ConfigError::Parse { path, source } => {
                write!(f, "{}: invalid config: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Color overrides, each `#RRGGBB` or a named terminal color.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeOverrides {
    pub bar_low: Option<String>,
    pub bar_high: Option<String>,
    pub pad_idle: Option<String>,
    pub pad_playing: Option<String>,
    pub pad_ripple: Option<String>,
    pub pad_focus: Option<String>,
    pub border: Option<String>,
    pub title: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// One entry per pad; `~` or a missing entry means the built-in sound.
    pub samples: Vec<Option<PathBuf>>,
    pub volume: f32,
    pub speed: f32,
    pub log_file: Option<PathBuf>,
    pub theme: ThemeOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
            volume: 0.8,
            speed: 1.0,
            log_file: None,
            theme: ThemeOverrides::default(),
        }
    }
}

/// `~/.thump/config.yaml`, if a home directory exists.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".thump").join("config.yaml"))
}

impl Config {
    /// Load from `explicit`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error. Relative sample paths resolve against the file's directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse YAML. An empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in self.samples.iter_mut().flatten() {
            *path = resolve(base, path);
        }
        if let Some(log) = self.log_file.as_mut() {
            *log = resolve(base, log);
        }
    }

    /// One source per pad. Entries past [`PAD_COUNT`] are ignored.
    pub fn sample_sources(&self) -> Vec<Option<SampleSource>> {
        self.samples
            .iter()
            .take(PAD_COUNT)
            .map(|p| p.clone().map(SampleSource::File))
            .collect()
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Sources for `--kit DIR`: the first [`PAD_COUNT`] `.wav` files by name.
pub fn kit_sources(dir: &Path) -> Result<Vec<Option<SampleSource>>, ConfigError> {
    let io_err = |source: io::Error| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut wavs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if is_wav && path.is_file() {
            wavs.push(path);
        }
    }
    wavs.sort();

    Ok(wavs
        .into_iter()
        .take(PAD_COUNT)
        .map(|p| Some(SampleSource::File(p)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert!(c.samples.is_empty());
        assert_eq!(c.volume, 0.8);
        assert_eq!(c.speed, 1.0);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(Config::parse("\n  \n").unwrap(), Config::default());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let c = Config::parse("speed: 1.2\n").unwrap();
        assert_eq!(c.speed, 1.2);
        assert_eq!(c.volume, 0.8);
    }

    #[test]
    fn samples_with_gaps() {
        let yaml = r##"
samples: [kick.wav, ~, snare.wav]
theme:
  bar_low: "#ff5e3a"
  pad_playing: yellow
"##;
        let c = Config::parse(yaml).unwrap();
        assert_eq!(c.samples.len(), 3);
        assert!(c.samples[1].is_none());
        assert_eq!(c.theme.bar_low.as_deref(), Some("#ff5e3a"));
        assert_eq!(c.theme.pad_playing.as_deref(), Some("yellow"));
        assert!(c.theme.bar_high.is_none());

        let sources = c.sample_sources();
        assert_eq!(
            sources[0],
            Some(SampleSource::File(PathBuf::from("kick.wav")))
        );
        assert_eq!(sources[1], None);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(Config::parse("samples: {{").is_err());
        assert!(Config::parse("volume: loud").is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "samples: [kick.wav, /abs/snare.wav]\nlog_file: thump.log\n").unwrap();

        let c = Config::load(Some(&path)).unwrap();
        assert_eq!(c.samples[0], Some(dir.path().join("kick.wav")));
        assert_eq!(c.samples[1], Some(PathBuf::from("/abs/snare.wav")));
        assert_eq!(c.log_file, Some(dir.path().join("thump.log")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn bad_file_reports_its_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "speed: [").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn sample_sources_cap_at_pad_count() {
        let c = Config {
            samples: (0..10).map(|i| Some(PathBuf::from(format!("{i}.wav")))).collect(),
            ..Config::default()
        };
        assert_eq!(c.sample_sources().len(), PAD_COUNT);
    }

    #[test]
    fn kit_dir_takes_sorted_wavs() {
        let dir = TempDir::new().unwrap();
        for name in ["b.wav", "a.WAV", "notes.txt", "c.wav"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("z.wav")).unwrap();

        let sources = kit_sources(dir.path()).unwrap();
        let names: Vec<String> = sources
            .iter()
            .map(|s| match s {
                Some(SampleSource::File(p)) => {
                    p.file_name().unwrap().to_string_lossy().into_owned()
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["a.WAV", "b.wav", "c.wav"]);
    }

    #[test]
    fn kit_dir_caps_at_seven() {
        let dir = TempDir::new().unwrap();
        for i in 0..9 {
            fs::write(dir.path().join(format!("{i:02}.wav")), b"").unwrap();
        }
        assert_eq!(kit_sources(dir.path()).unwrap().len(), PAD_COUNT);
    }

    #[test]
    fn missing_kit_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(kit_sources(&dir.path().join("missing")).is_err());
    }
}
