//! Load an xlsx workbook into in-memory grids
//!
//! The loader is the only fallible step of the pipeline: once the file has
//! been opened and every sheet materialized, all downstream parsing is
//! best-effort. Grids use absolute coordinates, so `grid[row][col]` matches
//! what a user sees in the spreadsheet regardless of where the used range
//! of the sheet happens to start.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};

/// A sheet as a dense row/column grid of raw cell values.
pub type Grid = Vec<Vec<Data>>;

/// An xlsx workbook materialized into named grids.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Grid)>,
}

impl Workbook {
    /// Open an xlsx file and read every sheet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut sheets = Vec::new();

        for name in sheet_names {
            let range = workbook
                .worksheet_range(&name)
                .with_context(|| format!("Failed to read sheet: {}", name))?;

            // Re-anchor the used range at A1 so row/column indices stay
            // absolute even when the sheet starts with blank rows.
            let (row_offset, col_offset) = match range.start() {
                Some((r, c)) => (r as usize, c as usize),
                None => (0, 0),
            };

            let mut grid: Grid = vec![Vec::new(); row_offset];
            for row in range.rows() {
                let mut cells = vec![Data::Empty; col_offset];
                cells.extend(row.iter().cloned());
                grid.push(cells);
            }

            sheets.push((name, grid));
        }

        Ok(Workbook { sheets })
    }

    /// Build a workbook from already-materialized grids (tests, callers
    /// that load sheets some other way).
    pub fn from_sheets(sheets: Vec<(String, Grid)>) -> Self {
        Workbook { sheets }
    }

    /// Names of all sheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Find a sheet by candidate names, case-insensitively. The first
    /// candidate that matches wins, so callers list names in priority order.
    pub fn find_sheet(&self, candidates: &[&str]) -> Option<&Grid> {
        for candidate in candidates {
            for (name, grid) in &self.sheets {
                if name.eq_ignore_ascii_case(candidate) {
                    return Some(grid);
                }
            }
        }
        None
    }
}
