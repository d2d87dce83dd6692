// Mon Feb 02 2026 - Alex

use crate::config::Config;
use crate::error::LeakError;
use crate::parser::LeakParser;
use crate::report::{InvocationParams, Report};
use crate::utils::logging::scoped_timer;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;

/// `leaks` exits 0 when nothing leaked and 1 when it found leaks.
pub const EXIT_NO_LEAKS: i32 = 0;
pub const EXIT_LEAKS_FOUND: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub invoked_at: DateTime<Utc>,
}

impl ToolOutput {
    pub fn completed_normally(&self) -> bool {
        matches!(self.exit_code, Some(EXIT_NO_LEAKS) | Some(EXIT_LEAKS_FOUND))
    }
}

/// Anything that can produce raw `leaks` output for a target.
pub trait LeakSource {
    fn capture(&self, params: &InvocationParams) -> Result<ToolOutput, LeakError>;
}

/// Runs the `leaks` binary, through `xcrun simctl spawn` when a device
/// identifier is given.
#[derive(Debug, Clone)]
pub struct LeaksCommand {
    leaks_binary: PathBuf,
    simctl_binary: PathBuf,
}

impl LeaksCommand {
    pub fn new() -> Self {
        Self {
            leaks_binary: PathBuf::from("leaks"),
            simctl_binary: PathBuf::from("xcrun"),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            leaks_binary: config.leaks_binary.clone(),
            simctl_binary: config.simctl_binary.clone(),
        }
    }

    pub fn with_leaks_binary(mut self, path: impl AsRef<Path>) -> Self {
        self.leaks_binary = path.as_ref().to_path_buf();
        self
    }

    pub fn with_simctl_binary(mut self, path: impl AsRef<Path>) -> Self {
        self.simctl_binary = path.as_ref().to_path_buf();
        self
    }

    /// Program and arguments that `capture` would run.
    pub fn command_line(&self, params: &InvocationParams) -> (PathBuf, Vec<String>) {
        let mut leaks_args: Vec<String> = Vec::new();
        for symbol in &params.excluded_symbols {
            leaks_args.push("-exclude".to_string());
            leaks_args.push(symbol.clone());
        }
        leaks_args.push(params.target.clone());

        match &params.device_id {
            Some(device) => {
                let mut args = vec![
                    "simctl".to_string(),
                    "spawn".to_string(),
                    device.clone(),
                    self.leaks_binary.to_string_lossy().into_owned(),
                ];
                args.extend(leaks_args);
                (self.simctl_binary.clone(), args)
            }
            None => (self.leaks_binary.clone(), leaks_args),
        }
    }
}

impl Default for LeaksCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl LeakSource for LeaksCommand {
    fn capture(&self, params: &InvocationParams) -> Result<ToolOutput, LeakError> {
        params.validate()?;

        let (program, args) = self.command_line(params);
        log::info!("Running {} {}", program.display(), args.join(" "));

        let invoked_at = Utc::now();
        let _timer = scoped_timer("leaks capture");

        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|source| LeakError::ToolLaunch {
                tool: program.display().to_string(),
                source,
            })?;

        let captured = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            invoked_at,
        };

        if !captured.completed_normally() {
            log::warn!(
                "{} exited with {:?}: {}",
                program.display(),
                captured.exit_code,
                captured.stderr.trim()
            );
        } else if !captured.stderr.trim().is_empty() {
            log::debug!("stderr: {}", captured.stderr.trim());
        }

        Ok(captured)
    }
}

/// A parsed report together with how the tool run ended.
#[derive(Debug, Clone)]
pub struct CapturedReport {
    pub report: Report,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl CapturedReport {
    pub fn completed_normally(&self) -> bool {
        matches!(self.exit_code, Some(EXIT_NO_LEAKS) | Some(EXIT_LEAKS_FOUND))
    }
}

/// Captures output from `source` and parses it. Only stdout reaches the parser.
pub fn capture_report(
    source: &dyn LeakSource,
    parser: &LeakParser,
    params: InvocationParams,
) -> Result<CapturedReport, LeakError> {
    let output = source.capture(&params)?;
    let report = parser.parse(&output.stdout, params, output.invoked_at);

    Ok(CapturedReport {
        report,
        exit_code: output.exit_code,
        stderr: output.stderr,
    })
}
