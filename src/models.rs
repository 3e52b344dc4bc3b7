use crate::fmt::number_label;

/// A single spreadsheet value after decoding. Dates arrive as their serial
/// number, booleans and ISO strings as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text that is non-blank after trimming.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// The entity key this cell would produce, if any.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Cell::Number(n) => Some(number_label(*n)),
        }
    }
}

/// One sheet materialized as a grid. `columns` holds the promoted header row
/// (empty when no row was promoted); `rows` are the remaining rows in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

static EMPTY: Cell = Cell::Empty;

impl RawTable {
    /// Build a table from physical rows, dropping `skip` leading rows first.
    /// With `promote`, the first remaining row becomes the column labels.
    pub fn from_grid(mut grid: Vec<Vec<Cell>>, skip: usize, promote: bool) -> Self {
        grid.drain(..skip.min(grid.len()));
        if promote && !grid.is_empty() {
            let columns = grid.remove(0);
            Self { columns, rows: grid }
        } else {
            Self { columns: Vec::new(), rows: grid }
        }
    }

    /// Number of columns, counting the widest row and the header.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    /// Rows from `start` onwards; empty when `start` is past the end.
    pub fn rows_from(&self, start: usize) -> &[Vec<Cell>] {
        self.rows.get(start..).unwrap_or(&[])
    }
}

pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_from_grid_skips_and_promotes() {
        let grid = vec![
            vec![text("title")],
            vec![text("Name"), text("Amount")],
            vec![text("Jane"), Cell::Number(5.0)],
        ];
        let table = RawTable::from_grid(grid, 1, true);
        assert_eq!(table.columns, vec![text("Name"), text("Amount")]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 1), &Cell::Number(5.0));
    }

    #[test]
    fn test_from_grid_skip_past_end() {
        let table = RawTable::from_grid(vec![vec![text("a")]], 5, true);
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let table = RawTable::from_grid(vec![vec![text("a")], vec![Cell::Number(1.0)]], 0, false);
        assert_eq!(table.width(), 1);
        assert!(table.cell(9, 9).is_empty());
        assert!(table.rows_from(7).is_empty());
        assert_eq!(table.rows_from(1).len(), 1);
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(text("  Jane Doe ").label(), Some("Jane Doe".to_string()));
        assert_eq!(text("   ").label(), None);
        assert_eq!(Cell::Number(1042.0).label(), Some("1042".to_string()));
        assert_eq!(Cell::Empty.label(), None);
        assert_eq!(text(" ").as_text(), None);
    }
}
