use std::path::Path;

use assert_cmd::Command;
use calamine::{open_workbook_auto, Data, Reader};
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn tally(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.current_dir(home).env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    dir
}

fn write_payroll(path: &Path, rows: &[(&str, f64)]) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Input").unwrap();
    ws.write_string(0, 0, "Weekly payroll").unwrap();
    ws.write_string(2, 0, "Name").unwrap();
    ws.write_string(2, 45, "Net Pay").unwrap();
    for (i, (name, net)) in rows.iter().enumerate() {
        let r = 3 + i as u32;
        ws.write_string(r, 0, *name).unwrap();
        ws.write_number(r, 45, *net).unwrap();
    }
    wb.save(path).unwrap();
}

fn write_bossing(path: &Path, rows: &[(&str, f64)]) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Bossing").unwrap();
    ws.write_string(0, 0, "Bossing summary").unwrap();
    ws.write_string(3, 0, "Job Order").unwrap();
    ws.write_string(3, 1, "Total Expense").unwrap();
    for (i, (name, amount)) in rows.iter().enumerate() {
        let r = 4 + i as u32;
        ws.write_string(r, 0, *name).unwrap();
        ws.write_number(r, 1, *amount).unwrap();
    }
    wb.save(path).unwrap();
}

fn read_sheet(path: &Path, sheet: &str) -> calamine::Range<Data> {
    let mut wb = open_workbook_auto(path).unwrap();
    wb.worksheet_range(sheet).unwrap()
}

fn text(s: &str) -> Data {
    Data::String(s.to_string())
}

#[test]
fn test_payroll_two_weeks_one_year() {
    let dir = workspace();
    let data = dir.path().join("data");
    write_payroll(&data.join("1 APR. 2-8, 2025.xlsx"), &[("Jane Doe", 500.0)]);
    write_payroll(&data.join("2 APR. 9-15, 2025.xlsx"), &[("Jane Doe", 300.0)]);

    tally(dir.path())
        .args(["payroll", "--data-dir", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 Excel files in data folder"))
        .stdout(predicate::str::contains("Summary saved successfully"));

    let summary = dir.path().join("EmployeeSummary.xlsx");
    let mut wb = open_workbook_auto(&summary).unwrap();
    assert_eq!(wb.sheet_names(), vec!["2025".to_string()]);

    let range = read_sheet(&summary, "2025");
    assert_eq!(range.get_value((0, 0)), Some(&text("Employee Name")));
    assert_eq!(range.get_value((0, 1)), Some(&text("APR 2-8")));
    assert_eq!(range.get_value((0, 2)), Some(&text("APR 9-15")));
    assert_eq!(range.get_value((0, 3)), Some(&text("Total")));
    assert_eq!(range.get_value((1, 0)), Some(&text("Jane Doe")));
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(500.0)));
    assert_eq!(range.get_value((1, 2)), Some(&Data::Float(300.0)));
    assert_eq!(range.get_value((1, 3)), Some(&Data::Float(800.0)));
}

#[test]
fn test_jobs_drop_grand_total() {
    let dir = workspace();
    let data = dir.path().join("data");
    write_bossing(
        &data.join("1 MAY 5-11, 2025.xlsx"),
        &[("JO-1", 4000.0), ("JO-2", 6000.0), ("Grand Total", 10000.0)],
    );

    tally(dir.path())
        .args(["jobs", "--data-dir", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("found 2 valid job order entries"));

    let range = read_sheet(&dir.path().join("Summary.xlsx"), "Summary");
    assert_eq!(range.get_value((0, 0)), Some(&text("Job Order")));
    assert_eq!(range.get_value((0, 1)), Some(&text("MAY 5-11")));
    assert_eq!(range.get_value((1, 0)), Some(&text("JO-1")));
    assert_eq!(range.get_value((1, 2)), Some(&Data::Float(4000.0)));
    assert_eq!(range.get_value((2, 0)), Some(&text("JO-2")));
    assert_eq!(range.get_value((2, 2)), Some(&Data::Float(6000.0)));
    assert_eq!(range.height(), 3);
}

#[test]
fn test_missing_data_dir_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();

    tally(dir.path())
        .args(["payroll", "--data-dir", "data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!dir.path().join("EmployeeSummary.xlsx").exists());
    let log = std::fs::read_to_string(dir.path().join("employee_script_log.txt")).unwrap();
    assert!(log.contains("The specified data folder does not exist"));
    assert!(log.contains("--- Run completed at"));
}

#[test]
fn test_text_only_salary_column_skips_file() {
    let dir = workspace();
    let data = dir.path().join("data");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Input").unwrap();
    ws.write_string(2, 0, "Name").unwrap();
    for (i, name) in ["Jane Doe", "John Roe", "Ann Lee"].iter().enumerate() {
        let r = 3 + i as u32;
        ws.write_string(r, 0, *name).unwrap();
        ws.write_string(r, 45, "n/a").unwrap();
    }
    wb.save(data.join("1 APR. 2-8, 2025.xlsx")).unwrap();
    write_payroll(&data.join("2 APR. 9-15, 2025.xlsx"), &[("Jane Doe", 300.0)]);

    tally(dir.path())
        .args(["payroll", "--data-dir", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid salary column found"));

    let range = read_sheet(&dir.path().join("EmployeeSummary.xlsx"), "2025");
    assert_eq!(range.get_value((0, 1)), Some(&text("APR 9-15")));
    assert_eq!(range.get_value((1, 0)), Some(&text("Jane Doe")));
    assert_eq!(range.get_value((1, 2)), Some(&Data::Float(300.0)));
}

#[test]
fn test_empty_folder_writes_nothing() {
    let dir = workspace();

    tally(dir.path())
        .args(["jobs", "--data-dir", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data was processed"));

    assert!(!dir.path().join("Summary.xlsx").exists());
}

#[test]
fn test_run_log_appends_across_runs() {
    let dir = workspace();
    write_bossing(&dir.path().join("data").join("1 MAY 5-11, 2025.xlsx"), &[("JO-1", 10.0)]);

    for _ in 0..2 {
        tally(dir.path())
            .args(["jobs", "--data-dir", "data"])
            .assert()
            .success();
    }

    let log = std::fs::read_to_string(dir.path().join("job_script_log.txt")).unwrap();
    assert_eq!(log.matches("--- Run started at").count(), 2);
    assert_eq!(log.matches("--- Run completed at").count(), 2);
}
