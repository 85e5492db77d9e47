//! Generated test output
//!
//! The artifact goes to stdout, or is appended to a file (created if absent).
//! A failed file write falls back to printing so the generated test is not lost.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// Where a generated artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Printed,
    Written(PathBuf),
    /// File write failed; the artifact was printed instead
    FallbackPrinted { path: PathBuf, error: String },
}

/// Receives the final artifact
pub trait ArtifactSink {
    fn emit(&mut self, artifact: &str) -> Result<Emitted, GenerateError>;
}

/// Configured destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Default file for write mode: `unit_test.<ext>` next to the source
pub fn default_output_path(source: &Path) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    let name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("unit_test.{}", ext),
        None => "unit_test".to_string(),
    };
    dir.join(name)
}

/// Sink printing to `out` or appending to a file
pub struct Output<W> {
    target: OutputTarget,
    out: W,
}

impl<W: Write> Output<W> {
    pub fn new(target: OutputTarget, out: W) -> Self {
        Self { target, out }
    }
}

impl Output<io::Stdout> {
    pub fn stdout(target: OutputTarget) -> Self {
        Self::new(target, io::stdout())
    }
}

impl<W: Write> ArtifactSink for Output<W> {
    fn emit(&mut self, artifact: &str) -> Result<Emitted, GenerateError> {
        let path = match &self.target {
            OutputTarget::Stdout => {
                writeln!(self.out, "{}", artifact)?;
                return Ok(Emitted::Printed);
            }
            OutputTarget::File(path) => path.clone(),
        };

        match append_to(&path, artifact) {
            Ok(()) => {
                writeln!(self.out, "Test case written to file: {}", path.display())?;
                Ok(Emitted::Written(path))
            }
            Err(e) => {
                log::error!("Failed to write file {:?}: {}", path, e);
                writeln!(self.out, "{}", artifact)?;
                Ok(Emitted::FallbackPrinted {
                    path,
                    error: e.to_string(),
                })
            }
        }
    }
}

fn append_to(path: &Path, artifact: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", artifact)
}
