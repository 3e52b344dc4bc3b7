use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::loader::read_label_cell;
use crate::runlog::Reporter;

/// Reporting-period label. Equal when the text is equal; ordered naturally so
/// that `APR 9-15` sorts before `APR 16-22`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekLabel(String);

impl WeekLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for WeekLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for WeekLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare strings chunk by chunk, digit runs by numeric value.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (na, ra) = split_digits(a);
                let (nb, rb) = split_digits(b);
                let (ta, tb) = (na.trim_start_matches('0'), nb.trim_start_matches('0'));
                let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = ra;
                b = rb;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a = &a[x.len_utf8()..];
                b = &b[y.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

// ---------------------------------------------------------------------------
// Filename patterns, tried in order
// ---------------------------------------------------------------------------

static SEQUENCE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\s+(.+)$").unwrap());
static MONTH_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]+)\.?\s*([0-9]{1,2})[-–]([0-9]{1,2})").unwrap());
static WEEK_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:week|w)[\s_-]?([0-9]{1,2})").unwrap());
static DAY_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]{1,2})[-–]([0-9]{1,2})").unwrap());
static YEAR_AT_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]{4})\.xls[xm]$").unwrap());
static YEAR_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());

type Render = fn(&Captures<'_>) -> String;

fn render_month_range(c: &Captures<'_>) -> String {
    format!("{} {}-{}", c[1].to_uppercase(), &c[2], &c[3])
}

fn render_week_number(c: &Captures<'_>) -> String {
    format!("Week {}", &c[1])
}

fn render_day_range(c: &Captures<'_>) -> String {
    format!("{}-{}", &c[1], &c[2])
}

static FILENAME_PATTERNS: Lazy<[(&'static Regex, Render); 3]> = Lazy::new(|| {
    [
        (&*MONTH_RANGE, render_month_range as Render),
        (&*WEEK_NUMBER, render_week_number as Render),
        (&*DAY_RANGE, render_day_range as Render),
    ]
});

fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Derive a label from a filename alone, e.g. `14 APR. 2-8, 2025.xlsm` gives
/// `APR 2-8`. A leading sequence number is ignored.
pub fn label_from_filename(filename: &str) -> WeekLabel {
    let stem = file_stem(filename);
    let name = SEQUENCE_PREFIX
        .captures(stem)
        .and_then(|c| c.get(1))
        .map_or(stem, |m| m.as_str());

    FILENAME_PATTERNS
        .iter()
        .find_map(|(re, render)| re.captures(name).map(|c| render(&c)))
        .map(WeekLabel::new)
        .unwrap_or_else(|| WeekLabel::new(name))
}

/// Week label from cell C1 of `sheet`, falling back to the filename.
pub fn resolve_week_label(
    file_path: &Path,
    filename: &str,
    sheet: &str,
    log: &mut dyn Reporter,
) -> WeekLabel {
    match read_label_cell(file_path, sheet) {
        Ok(Some(label)) => return WeekLabel::new(label),
        Ok(None) => {}
        Err(e) => log.note(&format!("Error reading C1 for week label in {filename}: {e}")),
    }
    label_from_filename(filename)
}

/// Report year embedded in a payroll filename: the digits right before the
/// extension, else the last 4-digit run.
pub fn year_from_filename(filename: &str) -> Option<i32> {
    if let Some(c) = YEAR_AT_END.captures(filename) {
        return c[1].parse().ok();
    }
    YEAR_ANYWHERE
        .find_iter(filename)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}
