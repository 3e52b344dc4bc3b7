use std::collections::BTreeSet;
use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_xlsxwriter::{Format, Workbook};

use crate::aggregate::{Aggregate, GroupWeeks};
use crate::error::Result;
use crate::fmt::money;
use crate::week::WeekLabel;

pub const EMPLOYEE_HEADER: &str = "Employee Name";
pub const JOB_ORDER_HEADER: &str = "Job Order";
pub const JOB_ORDER_SHEET: &str = "Summary";
const TOTAL_HEADER: &str = "Total";

pub struct SummaryRow {
    pub entity: String,
    pub weeks: Vec<f64>,
    pub total: f64,
}

pub struct SummarySheet {
    pub name: String,
    pub entity_header: &'static str,
    pub weeks: Vec<WeekLabel>,
    pub rows: Vec<SummaryRow>,
}

impl SummarySheet {
    /// Pivot one group: a row per entity seen in any week, a column per week.
    pub fn build(name: String, entity_header: &'static str, group: &GroupWeeks) -> Self {
        let weeks: Vec<WeekLabel> = group.keys().cloned().collect();
        let entities: BTreeSet<&String> = group.values().flat_map(|totals| totals.keys()).collect();

        let rows = entities
            .into_iter()
            .map(|entity| {
                let mut total = 0.0;
                let cells = group
                    .values()
                    .map(|totals| {
                        let amount = totals.get(entity).copied().unwrap_or(0.0);
                        total += amount;
                        amount
                    })
                    .collect();
                SummaryRow {
                    entity: entity.clone(),
                    weeks: cells,
                    total,
                }
            })
            .collect();

        Self {
            name,
            entity_header,
            weeks,
            rows,
        }
    }

    pub fn header(&self) -> Vec<String> {
        std::iter::once(self.entity_header.to_string())
            .chain(self.weeks.iter().map(|w| w.as_str().to_string()))
            .chain(std::iter::once(TOTAL_HEADER.to_string()))
            .collect()
    }
}

/// One sheet per year, named after the year.
pub fn payroll_sheets(aggregate: &Aggregate<i32>) -> Vec<SummarySheet> {
    if aggregate.is_empty() {
        return Vec::new();
    }
    aggregate
        .groups()
        .map(|(year, weeks)| SummarySheet::build(year.to_string(), EMPLOYEE_HEADER, weeks))
        .collect()
}

/// A single `Summary` sheet. Weeks registered without any job order do not
/// count as data on their own.
pub fn job_order_sheets(aggregate: &Aggregate<()>) -> Vec<SummarySheet> {
    if aggregate.is_empty() {
        return Vec::new();
    }
    aggregate
        .groups()
        .map(|(_, weeks)| SummarySheet::build(JOB_ORDER_SHEET.to_string(), JOB_ORDER_HEADER, weeks))
        .collect()
}

pub fn write_workbook(sheets: &[SummarySheet], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in sheet.header().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &bold)?;
        }
        for (i, row) in sheet.rows.iter().enumerate() {
            let r = i as u32 + 1;
            worksheet.write_string(r, 0, &row.entity)?;
            for (j, amount) in row.weeks.iter().enumerate() {
                worksheet.write_number(r, j as u16 + 1, *amount)?;
            }
            worksheet.write_number(r, sheet.weeks.len() as u16 + 1, row.total)?;
        }
        worksheet.set_column_width(0, 28)?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    Ok(())
}

/// Console rendering of a summary sheet.
pub fn format_sheet(sheet: &SummarySheet) -> String {
    let mut table = Table::new();
    table.set_header(sheet.header());
    for row in &sheet.rows {
        let mut cells = vec![Cell::new(&row.entity)];
        cells.extend(row.weeks.iter().map(|a| Cell::new(money(*a))));
        cells.push(Cell::new(money(row.total).bold()));
        table.add_row(cells);
    }
    format!("{}\n{table}", sheet.name.bold())
}
