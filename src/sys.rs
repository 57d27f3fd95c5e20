//! Utilities for interfacing with the X11 command line tools.

pub mod screen;
pub mod window;

use std::process::Command;

use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum SysError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("could not parse {program} output: {line:?}")]
    Parse { program: String, line: String },
    #[error("{0} is not installed")]
    MissingDependency(String),
    #[error(transparent)]
    Model(#[from] crate::model::ModelError),
}

/// Programs that must be on `PATH` before a window can be moved.
pub const DEPENDENCIES: &[&str] = &["xrandr", "xdotool"];

/// Seam between the engine and the processes it shells out to.
pub trait System {
    /// Runs `program` and returns its stdout.
    fn output(&self, program: &str, args: &[&str]) -> Result<String, SysError>;
}

/// Runs real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Actual;

impl System for Actual {
    fn output(&self, program: &str, args: &[&str]) -> Result<String, SysError> {
        trace!(program, ?args, "spawning");
        let output = Command::new(program).args(args).output().map_err(|source| {
            SysError::Spawn {
                program: program.to_string(),
                source,
            }
        })?;

        if !output.status.success() {
            return Err(SysError::Failed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(program, bytes = stdout.len(), "command finished");
        Ok(stdout)
    }
}

pub fn check_dependencies(names: &[&str]) -> Result<(), SysError> {
    for name in names {
        if which::which(name).is_err() {
            return Err(SysError::MissingDependency(name.to_string()));
        }
    }
    Ok(())
}
