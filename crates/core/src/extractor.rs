//! Invocation of the external extraction binary.
//!
//! [`ExternalExtractor`] is the seam the worker calls; [`CommandExtractor`]
//! implements it by running the binary as a child process with the input
//! text on stdin.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default upper bound on a single extraction run.
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(600);

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutput {
    /// Trimmed stdout of the binary.
    pub raw_output: String,
    /// Whether the binary exited successfully.
    pub success: bool,
    /// Trimmed stderr, or the spawn/timeout error.
    pub diagnostic: String,
}

impl ExtractionOutput {
    fn failure(diagnostic: String) -> Self {
        Self {
            raw_output: String::new(),
            success: false,
            diagnostic,
        }
    }
}

/// Something that turns free text into raw extraction output.
#[async_trait]
pub trait ExternalExtractor: Send + Sync {
    async fn invoke(&self, text: &str) -> ExtractionOutput;
}

/// How to call the extraction binary.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// Path or name of the executable.
    pub binary: String,
    /// Extraction template passed with `-t`.
    pub template_path: String,
    /// Model identifier passed with `-m`.
    pub model: String,
    pub timeout: Duration,
}

/// Runs `<binary> -v extract -t <template> -m <model>` per request.
pub struct CommandExtractor {
    settings: ExtractorSettings,
}

impl CommandExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    /// Command-line arguments passed to the binary.
    pub fn args(&self) -> Vec<&str> {
        vec![
            "-v",
            "extract",
            "-t",
            self.settings.template_path.as_str(),
            "-m",
            self.settings.model.as_str(),
        ]
    }

    async fn run(&self, text: &str) -> std::io::Result<std::process::Output> {
        let mut child = Command::new(&self.settings.binary)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // The binary may exit before reading its input; its exit status
            // is what gets reported.
            if let Err(e) = stdin.write_all(text.as_bytes()).await {
                tracing::debug!(error = %e, "Extractor closed stdin early");
            }
        }

        child.wait_with_output().await
    }
}

#[async_trait]
impl ExternalExtractor for CommandExtractor {
    async fn invoke(&self, text: &str) -> ExtractionOutput {
        let start = std::time::Instant::now();

        let result = tokio::time::timeout(self.settings.timeout, self.run(text)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(output)) => {
                let success = output.status.success();
                let raw_output = String::from_utf8_lossy(&output.stdout).trim().to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

                if success {
                    tracing::info!(elapsed_ms, output_len = raw_output.len(), "Extraction succeeded");
                } else {
                    tracing::error!(
                        elapsed_ms,
                        exit_code = output.status.code().unwrap_or(-1),
                        stderr = %stderr,
                        "Extraction failed",
                    );
                }

                let diagnostic = if success || !stderr.is_empty() {
                    stderr
                } else {
                    format!("extractor exited with {}", output.status)
                };

                ExtractionOutput {
                    raw_output,
                    success,
                    diagnostic,
                }
            }
            Ok(Err(e)) => {
                tracing::error!(binary = %self.settings.binary, error = %e, "Failed to run extractor");
                ExtractionOutput::failure(format!(
                    "failed to spawn extractor '{}': {e}",
                    self.settings.binary
                ))
            }
            Err(_) => {
                tracing::error!(elapsed_ms, "Extraction timed out");
                ExtractionOutput::failure(format!(
                    "extraction timed out after {}s",
                    self.settings.timeout.as_secs()
                ))
            }
        }
    }
}
