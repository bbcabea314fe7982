//! Run configuration.
//!
//! Flags from the command line are layered over an optional YAML settings
//! file, which is layered over built-in defaults. The resulting `RunConfig`
//! is validated once and threaded through the driver.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GenError, GenResult};
use crate::installer::PackageManager;

pub const DEFAULT_INPUT: &str = ".env";
pub const DEFAULT_OUTPUT: &str = "config.ts";
pub const DEFAULT_MANIFEST: &str = "package.json";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// User defaults read from `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    /// Preselected entry in the install prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
}

pub struct SettingsManager;

impl SettingsManager {
    /// `<config dir>/dotenv-ts/config.yaml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dotenv-ts").join("config.yaml"))
    }

    /// Load settings from `explicit`, or from the default location.
    ///
    /// A missing default file yields empty settings; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> GenResult<Settings> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(GenError::settings(path, "file does not exist"));
            }
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Settings::default()),
        }
    }

    pub fn load_from(path: &Path) -> GenResult<Settings> {
        let contents = fs::read_to_string(path).map_err(|e| GenError::settings(path, e))?;
        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings =
            serde_yaml::from_str(&contents).map_err(|e| GenError::settings(path, e))?;
        if settings.debounce_ms == Some(0) {
            return Err(GenError::settings(
                path,
                "debounce_ms must be at least 1 so writes can settle",
            ));
        }
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// Flags as given on the command line, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub raw: bool,
    pub watch: bool,
}

impl CliArgs {
    /// Reject flag combinations that make no sense together.
    pub fn validate(&self) -> GenResult<()> {
        if self.raw && self.watch {
            return Err(GenError::Configuration(
                "--watch cannot be combined with --raw".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where generated code goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// `--raw`: print to standard output.
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    input: PathBuf,
    output: Output,
    watch: bool,
    manifest: PathBuf,
    debounce: Duration,
    package_manager: Option<PackageManager>,
}

impl RunConfig {
    /// Merge flags over settings and validate the combination.
    pub fn resolve(args: &CliArgs, settings: &Settings) -> GenResult<Self> {
        args.validate()?;

        let input = args
            .input
            .clone()
            .or_else(|| settings.input.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

        let output = if args.raw {
            if args.output.is_some() {
                log::warn!("Ignoring --out because --raw was given");
            }
            Output::Stdout
        } else {
            Output::File(
                args.output
                    .clone()
                    .or_else(|| settings.output.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            )
        };

        Ok(Self {
            input,
            output,
            watch: args.watch,
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            debounce: Duration::from_millis(settings.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
            package_manager: settings.package_manager,
        })
    }

    /// Look for the project manifest at `path` instead of `./package.json`.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = path.into();
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// The output file, or `None` in raw mode.
    pub fn output_path(&self) -> Option<&Path> {
        match &self.output {
            Output::File(path) => Some(path),
            Output::Stdout => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.output == Output::Stdout
    }

    pub fn is_watch(&self) -> bool {
        self.watch
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn package_manager(&self) -> Option<PackageManager> {
        self.package_manager
    }
}
