use crate::error::{Result, StatsError};
use std::io::ErrorKind;
use std::process::Command;
use tracing::debug;

pub const DEFAULT_PLOT_COMMAND: &str = "plot";

/// External plotting command; reads the series file itself and writes text art to stdout.
#[derive(Debug, Clone)]
pub struct Renderer {
    program: String,
    args: Vec<String>,
}

impl Renderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Run the plot and wrap its output in a Markdown code fence.
    pub fn render(&self) -> Result<String> {
        debug!(program = %self.program, args = ?self.args, "running plot command");
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StatsError::PlotNotFound(self.program.clone()),
                _ => StatsError::Io(e),
            })?;

        if !output.status.success() {
            return Err(StatsError::PlotFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let fig = String::from_utf8(output.stdout)?;
        debug!(bytes = fig.len(), "plot rendered");
        Ok(fence(&fig))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLOT_COMMAND, Vec::new())
    }
}

pub fn fence(fig: &str) -> String {
    format!("```\n{fig}```")
}
