use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

use dotenv_ts::{
    exit_status, CliArgs, Console, Driver, ProcessInstaller, RunConfig, SettingsManager,
    TerminalPrompter,
};

#[derive(Parser)]
#[command(name = "dotenv-ts")]
#[command(author, version, about = "Generate typed TypeScript bindings from a .env file", long_about = None)]
struct Cli {
    /// Env file to read [default: .env]
    #[arg(long = "in", value_name = "PATH")]
    input: Option<PathBuf>,

    /// TypeScript file to write [default: config.ts]
    #[arg(long = "out", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the generated code to stdout instead of writing a file
    #[arg(long)]
    raw: bool,

    /// Regenerate the output whenever the env file changes
    #[arg(long)]
    watch: bool,

    /// Settings file [default: <config dir>/dotenv-ts/config.yaml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log diagnostic details to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn args(&self) -> CliArgs {
        CliArgs {
            input: self.input.clone(),
            output: self.output.clone(),
            raw: self.raw,
            watch: self.watch,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }

    ExitCode::from(run(&cli))
}

fn run(cli: &Cli) -> u8 {
    let mut console = Console::stdio(cli.raw);

    let args = cli.args();
    let config = args
        .validate()
        .and_then(|_| SettingsManager::load(cli.config.as_deref()))
        .and_then(|settings| RunConfig::resolve(&args, &settings));
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            console.error(&e);
            return 1;
        }
    };

    let mut driver = Driver::new(TerminalPrompter::new(), ProcessInstaller::new(), console);
    let result = driver.run(&config);
    if let Err(e) = &result {
        log::debug!("Run failed: {e:?}");
        driver.console().error(e);
    }

    exit_status(&result)
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "dotenv_ts=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init()
        .context("Failed to initialize logger")
}
