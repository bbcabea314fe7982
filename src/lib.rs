//! # dotenv-ts - typed env bindings for TypeScript
//!
//! Turns a `.env` file into a TypeScript module that exports one `string`
//! constant per variable, and can keep that module in sync while the env file
//! is edited.
//!
//! ## Usage
//!
//! ```rust
//! use dotenv_ts::generator::Generation;
//! use dotenv_ts::parser::parse_env_file;
//!
//! let names = parse_env_file("API_URL=https://example.com\n# secret\nAPI_KEY=abc\n");
//! assert_eq!(names, vec!["API_URL", "API_KEY"]);
//!
//! let generation = Generation::new(names);
//! assert!(generation
//!     .content
//!     .contains("export const API_KEY: string = process.env.API_KEY!;"));
//! ```

pub mod config;
pub mod console;
pub mod driver;
pub mod error;
pub mod generator;
pub mod installer;
pub mod interactive;
pub mod manifest;
pub mod parser;
pub mod watcher;

pub use config::{CliArgs, Output, RunConfig, Settings, SettingsManager};
pub use console::Console;
pub use driver::{exit_status, Driver, Outcome};
pub use error::{GenError, GenResult};
pub use generator::Generation;
pub use installer::{InstallCommand, Installer, PackageManager, ProcessInstaller};
pub use interactive::{Prompter, TerminalPrompter};
pub use parser::parse_env_file;
pub use watcher::{FileWatcher, WatchEvent};
