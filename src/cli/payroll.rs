use crate::aggregate::Aggregate;
use crate::cli::{dump_dir, print_preview};
use crate::error::Result;
use crate::extract::{emit_summary, extract_payroll, process_folder};
use crate::runlog::RunLog;
use crate::settings::{load_settings, output_dir};
use crate::summary::payroll_sheets;

const LOG_FILE: &str = "employee_script_log.txt";
const OUTPUT_FILE: &str = "EmployeeSummary.xlsx";

pub fn run(data_dir: Option<String>, dump: bool) -> Result<()> {
    let settings = load_settings();
    let input_dir = settings.input_dir(data_dir.as_deref());
    let out_dir = output_dir(&input_dir);
    let debug_dir = dump_dir(dump || settings.debug_dump, &out_dir);

    let mut log = RunLog::open(&out_dir.join(LOG_FILE))?;
    let mut aggregate: Aggregate<i32> = Aggregate::new();

    let result = process_folder(&input_dir, &mut log, |path, name, log| {
        extract_payroll(path, name, &settings, debug_dir.as_deref(), &mut aggregate, log)
    })
    .and_then(|()| {
        let sheets = payroll_sheets(&aggregate);
        if emit_summary(&sheets, &out_dir.join(OUTPUT_FILE), &mut log)? {
            print_preview(&sheets);
        }
        Ok(())
    });

    log.finish();
    result
}
