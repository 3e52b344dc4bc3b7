use crate::models::{cell_at, Cell};
use crate::normalize::looks_numeric;
use crate::runlog::Reporter;

const HEADER_NAMES: &[&str] = &["name", "employee name", "employee"];

/// Row used when no data-start row can be found.
pub const DEFAULT_DATA_START: usize = 4;

/// Job-order sheets have a fixed shape: job order in column A, amount in B.
pub const JOB_ORDER_ENTITY_COL: usize = 0;
pub const JOB_ORDER_AMOUNT_COL: usize = 1;

/// First row whose column-0 value is non-blank text other than a
/// "name"-style heading.
pub fn find_data_start(rows: &[Vec<Cell>]) -> Option<usize> {
    rows.iter().position(|row| {
        cell_at(row, 0)
            .as_text()
            .is_some_and(|s| !HEADER_NAMES.contains(&s.trim().to_lowercase().as_str()))
    })
}

pub fn data_start_row(rows: &[Vec<Cell>], log: &mut dyn Reporter) -> usize {
    match find_data_start(rows) {
        Some(i) => {
            if let Some(value) = cell_at(&rows[i], 0).as_text() {
                log.note(&format!("Found data starting at row {} with value: {value}", i + 1));
            }
            i
        }
        None => {
            log.note(&format!(
                "Could not find data start row. Using default of row {}.",
                DEFAULT_DATA_START + 1
            ));
            DEFAULT_DATA_START
        }
    }
}

/// Columns worth trying as the amount column, in trial order: the fixed
/// column when the table is wide enough, then every column with more than
/// two numeric-looking cells.
pub fn candidate_columns(rows: &[Vec<Cell>], width: usize, fixed: usize) -> Vec<usize> {
    let mut candidates = Vec::new();
    if width > fixed {
        candidates.push(fixed);
    }
    for col in 0..width {
        let numeric = rows.iter().filter(|row| looks_numeric(cell_at(row, col))).count();
        if numeric > 2 {
            candidates.push(col);
        }
    }
    candidates
}

/// Rows with a name in column 0 and a numeric-looking value in `col`.
pub fn usable_rows(rows: &[Vec<Cell>], col: usize) -> usize {
    rows.iter()
        .filter(|row| !cell_at(row, 0).is_empty() && looks_numeric(cell_at(row, col)))
        .count()
}

/// Pick the amount column: the first candidate with at least one usable row.
/// Returns the column and its usable row count.
pub fn select_amount_column(rows: &[Vec<Cell>], width: usize, fixed: usize) -> Option<(usize, usize)> {
    candidate_columns(rows, width, fixed)
        .into_iter()
        .map(|col| (col, usable_rows(rows, col)))
        .find(|(_, usable)| *usable > 0)
}

pub fn is_grand_total(cell: &Cell) -> bool {
    cell.label()
        .is_some_and(|s| s.to_lowercase() == "grand total")
}
