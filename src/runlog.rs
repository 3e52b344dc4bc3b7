use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Sink for run diagnostics. Every component that reports progress or skip
/// reasons takes one of these explicitly.
pub trait Reporter {
    fn note(&mut self, message: &str);
}

/// Appending plain-text run log, echoed to stdout.
///
/// Acquire with [`RunLog::open`], release with [`RunLog::finish`]; both write
/// a timestamped banner.
pub struct RunLog {
    file: File,
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

impl RunLog {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "\n\n--- Run started at {} ---", timestamp())?;
        Ok(Self { file })
    }

    pub fn finish(mut self) {
        self.note(&format!("\n--- Run completed at {} ---", timestamp()));
    }
}

impl Reporter for RunLog {
    fn note(&mut self, message: &str) {
        println!("{message}");
        tracing::debug!(target: "runlog", "{message}");
        // A log write failure must not abort the batch.
        if let Err(e) = writeln!(self.file, "{message}").and_then(|_| self.file.flush()) {
            tracing::warn!("failed to append to run log: {e}");
        }
    }
}

/// In-memory reporter for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl MemoryLog {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

#[cfg(test)]
impl Reporter for MemoryLog {
    fn note(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}
