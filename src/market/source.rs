use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, anyhow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Fallback,
    File(PathBuf),
    Command(String),
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            Self::Fallback => "built-in".to_owned(),
            Self::File(path) => format!("file {}", path.display()),
            Self::Command(command) => format!("command `{command}`"),
        }
    }
}

pub(super) fn read_raw(source: &DataSource) -> Result<Option<String>> {
    match source {
        DataSource::Fallback => Ok(None),
        DataSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read market data from {}", path.display()))
            .map(Some),
        DataSource::Command(command) => run_command(command).map(Some),
    }
}

fn run_command(command: &str) -> Result<String> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .with_context(|| format!("failed to spawn market data command: {command}"))?;

    if output.status.success() {
        String::from_utf8(output.stdout).context("market data command output was not valid UTF-8")
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!("market data command `{command}` failed: {stderr}"))
    }
}
