// src/export/pdf.rs
//! HTML to PDF conversion through an external program.

use crate::error::AppError;
use anyhow::{bail, Context};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default converter: WeasyPrint reading HTML on stdin and writing PDF to stdout.
pub const DEFAULT_PDF_COMMAND: &str = "weasyprint - -";

/// Turns a complete HTML document into PDF bytes.
#[async_trait::async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, AppError>;
}

/// Pipes HTML through a converter command on stdin and reads the PDF from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a whitespace-separated command line such as `weasyprint - -`.
    pub fn from_command_line(command: &str) -> Result<Self, AppError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            AppError::MissingConfiguration("PDF renderer command is empty".into())
        })?;
        Ok(Self::new(program, parts.collect()))
    }

    async fn run(&self, html: &str) -> anyhow::Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start '{}'", self.program))?;

        let mut stdin = child.stdin.take().context("renderer stdin was not captured")?;
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .with_context(|| format!("failed waiting for '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        writer
            .await
            .context("renderer input task failed")?
            .context("failed to write HTML to renderer")?;

        if output.stdout.is_empty() {
            bail!("'{}' produced no output", self.program);
        }
        Ok(output.stdout)
    }
}

impl Default for CommandPdfRenderer {
    fn default() -> Self {
        Self::new("weasyprint", vec!["-".to_string(), "-".to_string()])
    }
}

#[async_trait::async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, AppError> {
        log::debug!("Rendering {} bytes of HTML with '{}'", html.len(), self.program);
        self.run(html)
            .await
            .map_err(|e| AppError::PdfRender(format!("{:#}", e)))
    }
}
