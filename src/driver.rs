//! Generation and watch orchestration.
//!
//! A run goes through the dependency preflight, the overwrite preflight, and
//! then either a single generation or the watch loop. Raw mode skips both
//! preflights. Prompts and installs go through injected capabilities.

use chrono::Local;
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{Output, RunConfig};
use crate::console::{describe, missing_input_message, Console};
use crate::error::{GenError, GenResult};
use crate::generator::{Generation, RUNTIME_DEPENDENCY};
use crate::installer::{Installer, PackageManager};
use crate::interactive::Prompter;
use crate::manifest;
use crate::parser::parse_env_file;
use crate::watcher::{FileWatcher, WatchEvent};

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The output file was written.
    Generated { path: PathBuf, variables: usize },
    /// Raw mode printed the module to stdout.
    Printed { variables: usize },
    /// The input file was not found; nothing was written.
    MissingInput { path: PathBuf },
    /// The watcher stopped delivering events.
    WatchClosed,
}

/// Process exit status for a finished run.
pub fn exit_status(result: &GenResult<Outcome>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

pub struct Driver<P: Prompter, I: Installer> {
    prompter: P,
    installer: I,
    console: Console,
}

impl<P: Prompter, I: Installer> Driver<P, I> {
    pub fn new(prompter: P, installer: I, console: Console) -> Self {
        Self {
            prompter,
            installer,
            console,
        }
    }

    pub fn console(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn run(&mut self, config: &RunConfig) -> GenResult<Outcome> {
        self.console.blank();

        if !config.is_raw() {
            self.ensure_dependency(config)?;
            self.confirm_overwrite(config)?;
        }

        if config.is_watch() {
            self.watch(config)
        } else {
            self.run_once(config)
        }
    }

    /// Offer to install the runtime dependency when the manifest lacks it.
    pub fn ensure_dependency(&mut self, config: &RunConfig) -> GenResult<()> {
        if manifest::is_dependency_declared(config.manifest(), RUNTIME_DEPENDENCY) {
            log::debug!("{RUNTIME_DEPENDENCY} is declared in {}", config.manifest().display());
            return Ok(());
        }

        let mut items: Vec<String> = PackageManager::ALL
            .iter()
            .map(|manager| manager.name().to_string())
            .collect();
        items.push("Do not install".to_string());

        let default = config
            .package_manager()
            .and_then(|preferred| PackageManager::ALL.iter().position(|m| *m == preferred))
            .unwrap_or(0);

        let prompt = format!(
            "Module {} is not installed, choose your package manager",
            RUNTIME_DEPENDENCY.cyan()
        );
        let choice = self.prompter.select(&prompt, &items, default)?;

        match choice.and_then(|index| PackageManager::ALL.get(index)) {
            Some(manager) => {
                let command = manager.install_command(RUNTIME_DEPENDENCY);
                log::debug!("Running {command}");
                self.console.blank();
                self.installer.install(&command)?;
                self.console.success(format!(
                    "Successfully installed {}",
                    RUNTIME_DEPENDENCY.cyan()
                ));
            }
            None => {
                self.console.success(format!(
                    "Skipping {} installation",
                    RUNTIME_DEPENDENCY.cyan()
                ));
            }
        }

        Ok(())
    }

    /// Ask before clobbering an existing output file. Cancelling declines.
    pub fn confirm_overwrite(&mut self, config: &RunConfig) -> GenResult<()> {
        let Some(path) = config.output_path() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let prompt = format!(
            "File '{}' already exists, {}?",
            path.display().to_string().cyan(),
            "overwrite".red()
        );

        match self.prompter.confirm(&prompt)? {
            Some(true) => Ok(()),
            _ => Err(GenError::Declined {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Read, parse, generate and deliver once.
    pub fn run_once(&mut self, config: &RunConfig) -> GenResult<Outcome> {
        let generation = match self.load(config.input(), true) {
            Ok(generation) => generation,
            Err(GenError::MissingInput { path }) => {
                self.console.failure(missing_input_message(&path));
                return Ok(Outcome::MissingInput { path });
            }
            Err(e) => return Err(e),
        };

        match config.output() {
            Output::Stdout => {
                self.console.success("Successfully parsed variables.");
                self.console.blank();
                self.console
                    .emit(&generation.content)
                    .map_err(|source| GenError::Write {
                        path: PathBuf::from("<stdout>"),
                        source,
                    })?;
                Ok(Outcome::Printed {
                    variables: generation.len(),
                })
            }
            Output::File(path) => {
                write_output(path, &generation.content)?;
                self.console.success(format!(
                    "Successfully added variables to {}",
                    path.display().to_string().cyan()
                ));
                Ok(Outcome::Generated {
                    path: path.clone(),
                    variables: generation.len(),
                })
            }
        }
    }

    /// Generate now, then again after every settled change to the input.
    pub fn watch(&mut self, config: &RunConfig) -> GenResult<Outcome> {
        let watcher = FileWatcher::new(config.input()).with_debounce(config.debounce());
        let (_debouncer, events) = watcher.watch()?;

        self.console.step(format!(
            "Watching {} for changes, press Ctrl+C to stop",
            config.input().display().to_string().cyan()
        ));
        self.regenerate(config)?;

        self.watch_events(config, events)
    }

    /// Regenerate once per event until `events` runs dry.
    pub fn watch_events(
        &mut self,
        config: &RunConfig,
        events: impl IntoIterator<Item = WatchEvent>,
    ) -> GenResult<Outcome> {
        for event in events {
            if let Some(message) = event.error_message() {
                log::warn!("Watch error: {message}");
                self.console
                    .status(format!("{} Watch error: {}", "✖".red(), message));
                continue;
            }
            log::debug!("Change detected: {:?}", event.path());
            self.regenerate(config)?;
        }

        self.console.blank();
        Ok(Outcome::WatchClosed)
    }

    /// One watch-mode pass. Missing input and I/O failures are shown on the
    /// status line and do not end the watch.
    fn regenerate(&mut self, config: &RunConfig) -> GenResult<()> {
        let Some(path) = config.output_path() else {
            return Err(GenError::Configuration(
                "--watch cannot be combined with --raw".to_string(),
            ));
        };
        let stamp = Local::now().format("%H:%M:%S");

        let result = self
            .load(config.input(), false)
            .and_then(|generation| write_output(path, &generation.content).map(|_| generation));

        match result {
            Ok(generation) => {
                self.console.status(format!(
                    "{} [{stamp}] Wrote {} variable(s) to {}",
                    "✔".green(),
                    generation.len(),
                    path.display().to_string().cyan()
                ));
                Ok(())
            }
            Err(e) if e.is_recoverable_in_watch() => {
                log::debug!("Regeneration failed: {e}");
                self.console
                    .status(format!("{} [{stamp}] {}", "✖".red(), describe(&e)));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn load(&mut self, input: &Path, announce: bool) -> GenResult<Generation> {
        if announce {
            self.console.step("Reading env variables");
        }

        let contents = fs::read_to_string(input).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                GenError::MissingInput {
                    path: input.to_path_buf(),
                }
            } else {
                GenError::Read {
                    path: input.to_path_buf(),
                    source,
                }
            }
        })?;

        if announce {
            let input = input.display().to_string();
            self.console
                .step(format!("Reading {} contents", input.as_str().cyan()));
            self.console
                .step(format!("Parsing {} contents", input.as_str().cyan()));
        }

        let variables = parse_env_file(&contents);

        if announce {
            self.console
                .step(format!("Preparing {} variables", variables.len()));
        }

        Ok(Generation::new(variables))
    }
}

fn write_output(path: &Path, content: &str) -> GenResult<()> {
    fs::write(path, content).map_err(|source| GenError::Write {
        path: path.to_path_buf(),
        source,
    })
}
