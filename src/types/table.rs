//! The `Table` type produced by the PDF text layer and consumed by extractors.

/// A rectangular grid of optional text cells detected on a page.
///
/// Cells may contain embedded newlines — a single PDF cell often carries
/// several stacked transactions (spec §4.A). An empty string and a missing
/// cell are both represented as `""`; tables are always rectangular (rows
/// padded to the widest row by the table finder).
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Table cells as rows x columns.
    pub cells: Vec<Vec<String>>,
    /// Page number the table was found on (1-indexed).
    pub page_number: usize,
}

impl Table {
    pub fn new(cells: Vec<Vec<String>>, page_number: usize) -> Self {
        Self { cells, page_number }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn col_count(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn row(&self, i: usize) -> Option<&[String]> {
        self.cells.get(i).map(|r| r.as_slice())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// Values in `col`, split on embedded newlines, rows in order.
    ///
    /// A column stream — see `extract::grammar` for how these are zipped
    /// into logical transactions.
    pub fn column_stream(&self, col: usize) -> Vec<String> {
        self.cells
            .iter()
            .filter_map(|row| row.get(col))
            .flat_map(|cell| cell.split('\n').map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect()
    }
}
