use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_payroll_sheet")]
    pub payroll_sheet: String,
    #[serde(default = "default_job_order_sheet")]
    pub job_order_sheet: String,
    /// Column tried first for net pay (AT).
    #[serde(default = "default_salary_column")]
    pub salary_column: usize,
    /// Rows above the job-order header row.
    #[serde(default = "default_job_order_skip_rows")]
    pub job_order_skip_rows: usize,
    #[serde(default)]
    pub debug_dump: bool,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_payroll_sheet() -> String {
    "Input".to_string()
}

fn default_job_order_sheet() -> String {
    "Bossing".to_string()
}

fn default_salary_column() -> usize {
    45
}

fn default_job_order_skip_rows() -> usize {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            payroll_sheet: default_payroll_sheet(),
            job_order_sheet: default_job_order_sheet(),
            salary_column: default_salary_column(),
            job_order_skip_rows: default_job_order_skip_rows(),
            debug_dump: false,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    serde_json::from_str(content).map_err(|e| TallyError::Settings(e.to_string()))
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Settings::default();
    };
    parse_settings(&content).unwrap_or_else(|e| {
        tracing::warn!("ignoring {}: {e}", path.display());
        Settings::default()
    })
}

impl Settings {
    /// Input folder: the command-line override, else the configured one.
    pub fn input_dir(&self, data_dir: Option<&str>) -> PathBuf {
        PathBuf::from(data_dir.unwrap_or(&self.data_dir))
    }
}

/// Folder that receives the summary and the run log: the parent of the input
/// folder, or `.` when the input folder has no parent component.
pub fn output_dir(input_dir: &std::path::Path) -> PathBuf {
    match input_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
