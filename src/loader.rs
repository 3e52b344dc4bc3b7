use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Xls, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::error::{Result, TallyError};
use crate::fmt::number_label;
use crate::models::{Cell, RawTable};
use crate::runlog::Reporter;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        _ => Cell::Empty,
    }
}

pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Rows as the range yields them, shifted so index (0, 0) is cell A1.
fn grid_from_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let mut grid: Vec<Vec<Cell>> = (0..first_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; first_col as usize];
        cells.extend(row.iter().map(to_cell));
        grid.push(cells);
    }
    grid
}

/// Every cell from A1 to the last used cell, read by absolute position.
fn grid_from_cells(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };
    (0..=last_row)
        .map(|r| {
            (0..=last_col)
                .map(|c| range.get_value((r, c)).map_or(Cell::Empty, to_cell))
                .collect()
        })
        .collect()
}

fn looks_like_header(row: &[Cell]) -> bool {
    row.iter().any(|c| !c.is_empty()) && row.iter().all(|c| matches!(c, Cell::Empty | Cell::Text(_)))
}

/// Resolve `sheet` in the workbook. With `fallback_first`, a missing sheet
/// resolves to the first one. Returns the range and the sheet actually used.
fn sheet_range<RS, R>(
    workbook: &mut R,
    sheet: &str,
    fallback_first: bool,
) -> std::result::Result<(Range<Data>, String), String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let names = workbook.sheet_names();
    let target = if names.iter().any(|n| n == sheet) {
        sheet.to_string()
    } else if fallback_first {
        names
            .first()
            .cloned()
            .ok_or_else(|| "workbook has no sheets".to_string())?
    } else {
        return Err(format!("sheet '{sheet}' not found (available: {names:?})"));
    };
    let range = workbook.worksheet_range(&target).map_err(|e| e.to_string())?;
    Ok((range, target))
}

// ---------------------------------------------------------------------------
// Strategy chain, enum dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Open by extension, read the named sheet, first row becomes labels.
    Structured,
    /// Explicit OOXML reader over cached values, cell by cell, first-sheet
    /// fallback, labels only when the first row looks like a header.
    CellByCell,
    /// BIFF reader for legacy `.xls` content.
    Legacy,
    /// Format detected from the bytes, no extension hint.
    Sniffed,
}

const CHAIN: &[Strategy] = &[
    Strategy::Structured,
    Strategy::CellByCell,
    Strategy::Legacy,
    Strategy::Sniffed,
];

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::CellByCell => "cell-by-cell",
            Self::Legacy => "legacy",
            Self::Sniffed => "sniffed",
        }
    }

    pub fn load(
        &self,
        file_path: &Path,
        sheet: &str,
        skip: usize,
        log: &mut dyn Reporter,
    ) -> std::result::Result<RawTable, String> {
        match self {
            Self::Structured => {
                let mut workbook = open_workbook_auto(file_path).map_err(|e| e.to_string())?;
                let (range, _) = sheet_range(&mut workbook, sheet, false)?;
                Ok(RawTable::from_grid(grid_from_rows(&range), skip, true))
            }
            Self::CellByCell => {
                let mut workbook: Xlsx<BufReader<File>> =
                    open_workbook(file_path).map_err(|e: calamine::XlsxError| e.to_string())?;
                log.note(&format!("Available sheets: {:?}", workbook.sheet_names()));
                let (range, used) = sheet_range(&mut workbook, sheet, true)?;
                if used != sheet {
                    log.note(&format!("Sheet '{sheet}' not found, using first sheet: {used}"));
                }
                let grid = grid_from_cells(&range);
                let promote = grid.get(skip).is_some_and(|row| looks_like_header(row));
                Ok(RawTable::from_grid(grid, skip, promote))
            }
            Self::Legacy => {
                let mut workbook: Xls<BufReader<File>> =
                    open_workbook(file_path).map_err(|e: calamine::XlsError| e.to_string())?;
                let (range, _) = sheet_range(&mut workbook, sheet, false)?;
                Ok(RawTable::from_grid(grid_from_rows(&range), skip, true))
            }
            Self::Sniffed => {
                let bytes = std::fs::read(file_path).map_err(|e| e.to_string())?;
                let mut workbook =
                    open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| e.to_string())?;
                let (range, _) = sheet_range(&mut workbook, sheet, false)?;
                Ok(RawTable::from_grid(grid_from_rows(&range), skip, true))
            }
        }
    }
}

/// Load `sheet` from `file_path`, dropping `skip` leading physical rows before
/// the header row. Strategies are tried in order; the first success wins.
pub fn load_table(
    file_path: &Path,
    sheet: &str,
    skip: usize,
    log: &mut dyn Reporter,
) -> Result<RawTable> {
    let mut last_error = String::from("no strategy attempted");
    for strategy in CHAIN {
        match strategy.load(file_path, sheet, skip, log) {
            Ok(table) => {
                log.note(&format!(
                    "Successfully read sheet '{sheet}' with {} strategy, shape: ({}, {})",
                    strategy.name(),
                    table.rows.len(),
                    table.width()
                ));
                return Ok(table);
            }
            Err(e) => {
                tracing::debug!(strategy = strategy.name(), file = %file_path.display(), "load failed: {e}");
                log.note(&format!("Error with {} read: {e}", strategy.name()));
                last_error = e;
            }
        }
    }
    Err(TallyError::Load {
        file: file_path.display().to_string(),
        reason: last_error,
    })
}

fn label_text(data: &Data) -> Option<String> {
    let text = match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) => number_label(*f),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).unwrap_or_else(|| number_label(dt.as_f64())),
        Data::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Text of cell C1 in `sheet` (first sheet if absent); `None` when blank.
pub fn read_label_cell(file_path: &Path, sheet: &str) -> Result<Option<String>> {
    let load_error = |reason: String| TallyError::Load {
        file: file_path.display().to_string(),
        reason,
    };
    let mut workbook = open_workbook_auto(file_path).map_err(|e| load_error(e.to_string()))?;
    let (range, _) = sheet_range(&mut workbook, sheet, true).map_err(load_error)?;
    Ok(range.get_value((0, 2)).and_then(label_text))
}

/// Write a loaded table (labels first, then rows) to a `FullSheet` workbook.
pub fn dump_table(table: &RawTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("FullSheet")?;

    let header = (!table.columns.is_empty()).then_some(&table.columns);
    for (r, row) in header.into_iter().chain(table.rows.iter()).enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r as u32, c as u16, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r as u32, c as u16, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}
