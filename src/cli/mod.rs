pub mod jobs;
pub mod payroll;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::summary::{format_sheet, SummarySheet};

#[derive(Parser)]
#[command(name = "tally", about = "Roll weekly payroll and job-order workbooks into summary spreadsheets.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize net pay per employee and week, one sheet per year.
    Payroll {
        /// Folder holding the weekly workbooks (default: ./data)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Save each loaded sheet under debug/ next to the summary
        #[arg(long)]
        dump: bool,
    },
    /// Summarize expense per job order and week on a single sheet.
    Jobs {
        /// Folder holding the weekly workbooks (default: ./data)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Save each loaded sheet under debug/ next to the summary
        #[arg(long)]
        dump: bool,
    },
}

pub(crate) fn print_preview(sheets: &[SummarySheet]) {
    for sheet in sheets {
        println!("\n{}", format_sheet(sheet));
    }
}

pub(crate) fn dump_dir(enabled: bool, output_dir: &Path) -> Option<std::path::PathBuf> {
    enabled.then(|| output_dir.join("debug"))
}
