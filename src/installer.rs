use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::{Command, Stdio};

use crate::error::{GenError, GenResult};

/// Package managers the install prompt offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [Self::Npm, Self::Yarn, Self::Pnpm];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// The command that adds `package` to the current project.
    pub fn install_command(&self, package: &str) -> InstallCommand {
        let verb = match self {
            Self::Npm => "install",
            Self::Yarn | Self::Pnpm => "add",
        };
        InstallCommand {
            program: self.name().to_string(),
            args: vec![verb.to_string(), package.to_string()],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs package installs on behalf of the driver.
pub trait Installer {
    /// Run `command` to completion. Any failure is reported as
    /// `GenError::Install` carrying the command line.
    fn install(&mut self, command: &InstallCommand) -> GenResult<()>;
}

/// Spawns the package manager with the terminal attached.
#[derive(Debug, Default)]
pub struct ProcessInstaller;

impl ProcessInstaller {
    pub fn new() -> Self {
        Self
    }

    // npm and friends ship as .cmd shims on Windows.
    fn program(command: &InstallCommand) -> String {
        if cfg!(windows) {
            format!("{}.cmd", command.program)
        } else {
            command.program.clone()
        }
    }
}

impl Installer for ProcessInstaller {
    fn install(&mut self, command: &InstallCommand) -> GenResult<()> {
        let failed = || GenError::Install {
            command: command.to_string(),
        };

        println!("{}", "─".repeat(50).bright_black());

        let status = Command::new(Self::program(command))
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                log::debug!("Failed to spawn {command}: {e}");
                failed()
            })?;

        println!("{}", "─".repeat(50).bright_black());

        if status.success() {
            Ok(())
        } else {
            match status.code() {
                Some(code) => log::debug!("{command} exited with code {code}"),
                None => log::debug!("{command} was terminated by signal"),
            }
            Err(failed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_commands() {
        assert_eq!(
            PackageManager::Npm.install_command("dotenv").to_string(),
            "npm install dotenv"
        );
        assert_eq!(
            PackageManager::Yarn.install_command("dotenv").to_string(),
            "yarn add dotenv"
        );
        assert_eq!(
            PackageManager::Pnpm.install_command("dotenv").to_string(),
            "pnpm add dotenv"
        );
    }

    #[test]
    fn test_missing_program_is_install_error() {
        let command = InstallCommand {
            program: "nonexistent_command_12345".to_string(),
            args: vec!["add".to_string(), "dotenv".to_string()],
        };
        let err = ProcessInstaller::new().install(&command).unwrap_err();
        match err {
            GenError::Install { command } => {
                assert_eq!(command, "nonexistent_command_12345 add dotenv")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
