use crate::game::GridSize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Board size & speed settings
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Settings for the log file
    #[serde(default)]
    pub(crate) log: LogConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("wrapsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized, including when the game settings fail
    /// validation.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }
}

/// Validated gameplay settings.  Every `GameConfig` describes a board with
/// room for a two-segment snake plus one food item, and a nonzero minimum tick
/// interval that does not exceed the starting interval.
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub(crate) struct GameConfig {
    grid_size: GridSize,
    start_interval_ms: u64,
    min_interval_ms: u64,
    interval_step_ms: u64,
    full_scan_percent: Option<u8>,
}

impl GameConfig {
    pub(crate) fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Milliseconds between ticks at the start of a game
    pub(crate) fn start_interval_ms(&self) -> u64 {
        self.start_interval_ms
    }

    /// The shortest tick interval the snake can speed up to
    pub(crate) fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// How much the tick interval shrinks each time the snake eats
    pub(crate) fn interval_step_ms(&self) -> u64 {
        self.interval_step_ms
    }

    /// Once the snake covers at least this percentage of the board, food is
    /// placed by scanning for free cells instead of by random probing
    pub(crate) fn full_scan_percent(&self) -> Option<u8> {
        self.full_scan_percent
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        let raw = RawGameConfig::default();
        GameConfig {
            grid_size: GridSize::new(raw.grid_width, raw.grid_height),
            start_interval_ms: raw.start_interval_ms,
            min_interval_ms: raw.min_interval_ms,
            interval_step_ms: raw.interval_step_ms,
            full_scan_percent: raw.full_scan_percent,
        }
    }
}

/// Gameplay settings as written in the configuration file, prior to
/// validation
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct RawGameConfig {
    pub(crate) grid_width: u16,
    pub(crate) grid_height: u16,
    pub(crate) start_interval_ms: u64,
    pub(crate) min_interval_ms: u64,
    pub(crate) interval_step_ms: u64,
    pub(crate) full_scan_percent: Option<u8>,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        RawGameConfig {
            grid_width: 32,
            grid_height: 24,
            start_interval_ms: 100,
            min_interval_ms: 20,
            interval_step_ms: 1,
            full_scan_percent: None,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameConfigError;

    fn try_from(value: RawGameConfig) -> Result<GameConfig, GameConfigError> {
        let RawGameConfig {
            grid_width,
            grid_height,
            start_interval_ms,
            min_interval_ms,
            interval_step_ms,
            full_scan_percent,
        } = value;
        if grid_width < 2 {
            return Err(GameConfigError::Width(grid_width));
        }
        if grid_height < 1 {
            return Err(GameConfigError::Height(grid_height));
        }
        let grid_size = GridSize::new(grid_width, grid_height);
        if grid_size.area() < 3 {
            return Err(GameConfigError::TooSmall {
                width: grid_width,
                height: grid_height,
            });
        }
        if min_interval_ms == 0 {
            return Err(GameConfigError::ZeroMinInterval);
        }
        if min_interval_ms > start_interval_ms {
            return Err(GameConfigError::MinAboveStart {
                min: min_interval_ms,
                start: start_interval_ms,
            });
        }
        if let Some(pct) = full_scan_percent.filter(|pct| !(1..=100).contains(pct)) {
            return Err(GameConfigError::FullScanPercent(pct));
        }
        Ok(GameConfig {
            grid_size,
            start_interval_ms,
            min_interval_ms,
            interval_step_ms,
            full_scan_percent,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GameConfigError {
    #[error("grid width must be at least 2, got {0}")]
    Width(u16),
    #[error("grid height must be at least 1, got {0}")]
    Height(u16),
    #[error("grid must have at least 3 cells, got {width}x{height}")]
    TooSmall { width: u16, height: u16 },
    #[error("min-interval-ms must be at least 1")]
    ZeroMinInterval,
    #[error("min-interval-ms ({min}) must not exceed start-interval-ms ({start})")]
    MinAboveStart { min: u64, start: u64 },
    #[error("full-scan-percent must be between 1 and 100, got {0}")]
    FullScanPercent(u8),
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct LogConfig {
    /// File to write log messages to.  Nothing is logged if this is unset.
    pub(crate) file: Option<PathBuf>,

    /// Log filter directives in `RUST_LOG` syntax; the `RUST_LOG`
    /// environment variable takes precedence
    pub(crate) filter: Option<String>,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
