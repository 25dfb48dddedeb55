use std::path::Path;

use tokio::process::Command;

use crate::models::ServiceError;

/// Result of one interpreter run. The two streams are captured separately
/// and never interleaved; success is decided by the exit code alone.
#[derive(Debug)]
pub struct ImportOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ImportOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs the configured external interpreter over one uploaded file. The
/// file's internal structure is never inspected here; validation belongs
/// entirely to the interpreter.
pub struct ImportPipeline {
    program: String,
    base_args: Vec<String>,
}

impl ImportPipeline {
    /// `command` is the interpreter invocation, whitespace-split; the
    /// uploaded file's path is appended as the final argument when run.
    pub fn new(command: &str) -> Result<Self, ServiceError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            ServiceError::ValidationError("Import command is empty".to_string())
        })?;

        Ok(Self {
            program,
            base_args: parts.collect(),
        })
    }

    pub async fn run(&self, source: &Path) -> Result<ImportOutcome, ServiceError> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .arg(source)
            .output()
            .await
            .map_err(|e| {
                ServiceError::PipelineError(format!("Failed to launch import interpreter: {}", e))
            })?;

        Ok(ImportOutcome {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
