use std::path::{Path, PathBuf};

use crate::aggregate::Aggregate;
use crate::error::{Result, TallyError};
use crate::loader::{dump_table, load_table};
use crate::locate::{
    data_start_row, is_grand_total, select_amount_column, JOB_ORDER_AMOUNT_COL,
    JOB_ORDER_ENTITY_COL,
};
use crate::models::{cell_at, RawTable};
use crate::normalize::{normalize, BlankPolicy};
use crate::runlog::Reporter;
use crate::settings::Settings;
use crate::summary::{write_workbook, SummarySheet};
use crate::week::{resolve_week_label, year_from_filename};

// ---------------------------------------------------------------------------
// Folder walk
// ---------------------------------------------------------------------------

/// Spreadsheet filenames in `dir`, sorted so runs are reproducible.
pub fn list_spreadsheets(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".xlsx") || name.ends_with(".xlsm") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Run `per_file` over every spreadsheet in `input_dir`. Errors from a single
/// file are logged and the batch moves on; only a missing folder is fatal.
pub fn process_folder<F>(input_dir: &Path, log: &mut dyn Reporter, mut per_file: F) -> Result<()>
where
    F: FnMut(&Path, &str, &mut dyn Reporter) -> Result<usize>,
{
    if !input_dir.is_dir() {
        let err = TallyError::Config(input_dir.display().to_string());
        log.note(&err.to_string());
        return Err(err);
    }

    let files = list_spreadsheets(input_dir)?;
    log.note(&format!("Found {} Excel files in data folder", files.len()));

    for filename in &files {
        log.note(&format!("\n--- Processing {filename} ---"));
        if let Err(e) = per_file(&input_dir.join(filename), filename, log) {
            log.note(&format!("Error processing {filename}: {e}"));
        }
    }
    Ok(())
}

/// Write the summary workbook, or note that there was nothing to write.
/// Returns whether a workbook was written.
pub fn emit_summary(sheets: &[SummarySheet], output: &Path, log: &mut dyn Reporter) -> Result<bool> {
    if sheets.is_empty() {
        log.note("No data was processed. Check your file format and content.");
        return Ok(false);
    }
    for sheet in sheets {
        log.note(&format!(
            "Created summary for {} with {} rows and {} weeks",
            sheet.name,
            sheet.rows.len(),
            sheet.weeks.len()
        ));
    }
    match write_workbook(sheets, output) {
        Ok(()) => {
            log.note(&format!("Summary saved successfully to {}", output.display()));
            Ok(true)
        }
        Err(e) => {
            log.note(&format!("Error saving summary: {e}"));
            Err(e)
        }
    }
}

fn dump_path(dump_dir: &Path, filename: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    dump_dir.join(format!("{stem}.xlsx"))
}

fn maybe_dump(table: &RawTable, dump_dir: Option<&Path>, filename: &str, log: &mut dyn Reporter) {
    let Some(dir) = dump_dir else { return };
    let path = dump_path(dir, filename);
    match dump_table(table, &path) {
        Ok(()) => log.note(&format!("Saved full sheet to {}", path.display())),
        Err(e) => log.note(&format!("Could not save debug copy {}: {e}", path.display())),
    }
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

/// Add one payroll workbook to `aggregate`. Returns the number of employee
/// rows recorded.
pub fn extract_payroll(
    file_path: &Path,
    filename: &str,
    settings: &Settings,
    dump_dir: Option<&Path>,
    aggregate: &mut Aggregate<i32>,
    log: &mut dyn Reporter,
) -> Result<usize> {
    let year = year_from_filename(filename).ok_or_else(|| {
        TallyError::Structure(format!(
            "Could not extract year from filename: {filename}. Skipping file."
        ))
    })?;
    let week = resolve_week_label(file_path, filename, &settings.payroll_sheet, log);
    log.note(&format!("Extracted year {year}, week {week} from C1 or filename: {filename}"));

    let table = load_table(file_path, &settings.payroll_sheet, 0, log)?;
    maybe_dump(&table, dump_dir, filename, log);

    let start = data_start_row(&table.rows, log);
    let rows = table.rows_from(start);
    log.note(&format!("Extracted data frame with shape: ({}, {})", rows.len(), table.width()));

    let (column, usable) = select_amount_column(rows, table.width(), settings.salary_column)
        .ok_or_else(|| TallyError::Structure("No valid salary column found. Skipping file.".to_string()))?;
    log.note(&format!("Using column {column} with {usable} valid salary entries"));

    let mut recorded = 0usize;
    for row in rows {
        let Some(employee) = cell_at(row, 0).label() else {
            continue;
        };
        let salary = cell_at(row, column);
        if salary.is_empty() {
            continue;
        }
        match normalize(salary, BlankPolicy::Zero) {
            Ok(amount) => {
                aggregate.add(year, &week, &employee, amount);
                recorded += 1;
            }
            Err(e) => log.note(&format!("Skipping invalid salary for {employee}: {e}")),
        }
    }
    log.note(&format!("Processed {recorded} employee records"));
    Ok(recorded)
}

// ---------------------------------------------------------------------------
// Job orders
// ---------------------------------------------------------------------------

/// Add one job-order workbook to `aggregate`. The week column is registered
/// before the sheet is read, so it survives a failed load.
pub fn extract_job_orders(
    file_path: &Path,
    filename: &str,
    settings: &Settings,
    dump_dir: Option<&Path>,
    aggregate: &mut Aggregate<()>,
    log: &mut dyn Reporter,
) -> Result<usize> {
    let week = resolve_week_label(file_path, filename, &settings.job_order_sheet, log);
    aggregate.touch_week((), &week);
    log.note(&format!("Using week label: {week}"));

    let table = load_table(
        file_path,
        &settings.job_order_sheet,
        settings.job_order_skip_rows,
        log,
    )?;
    maybe_dump(&table, dump_dir, filename, log);

    let mut recorded = 0usize;
    for row in &table.rows {
        let entity = cell_at(row, JOB_ORDER_ENTITY_COL);
        let amount = cell_at(row, JOB_ORDER_AMOUNT_COL);
        let Some(job_order) = entity.label() else {
            continue;
        };
        if amount.is_empty() || is_grand_total(entity) {
            continue;
        }
        match normalize(amount, BlankPolicy::Skip) {
            Ok(value) => {
                aggregate.add((), &week, &job_order, value);
                recorded += 1;
            }
            Err(e) => log.note(&format!("Skipping job order {job_order}: {e}")),
        }
    }
    log.note(&format!(
        "Processed {filename} successfully - found {recorded} valid job order entries."
    ));
    Ok(recorded)
}
