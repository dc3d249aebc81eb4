//! Table types.

use super::{Alignment, BBox, BorderStyle, Rgb, Run};
use serde::{Deserialize, Serialize};

/// Width units per table (basis points).
pub const WIDTH_UNITS: u32 = 10_000;

/// A reconstructed table grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Number of rows
    pub rows: usize,

    /// Number of columns
    pub columns: usize,

    /// Declared cells in row order
    pub cells: Vec<Cell>,

    /// Relative column widths
    pub column_widths: ColumnWidths,

    /// First row is a header
    pub header_row: bool,

    /// Default border style
    pub border_style: BorderStyle,

    /// Region bounding box, used to size the table on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,

    /// Cell font size in points
    pub font_size: f32,
}

impl TableGrid {
    /// Create an empty grid with equal column widths.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: Vec::new(),
            column_widths: ColumnWidths::equal(columns),
            header_row: false,
            border_style: BorderStyle::Single,
            bbox: None,
            font_size: 9.0,
        }
    }

    /// Cell whose origin is at (row, col).
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Slot ownership matrix: each slot holds the index of the covering cell.
    pub fn slot_owners(&self) -> Vec<Vec<Option<usize>>> {
        let mut owners = vec![vec![None; self.columns]; self.rows];
        for (i, cell) in self.cells.iter().enumerate() {
            for r in cell.row..(cell.row + cell.rowspan).min(self.rows) {
                for c in cell.col..(cell.col + cell.colspan).min(self.columns) {
                    owners[r][c] = Some(i);
                }
            }
        }
        owners
    }

    /// Check if the table has merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.cells.iter().any(|c| c.rowspan > 1 || c.colspan > 1)
    }

    /// Get plain text representation of the table, one line per row.
    pub fn plain_text(&self) -> String {
        (0..self.rows)
            .map(|r| {
                self.cells
                    .iter()
                    .filter(|c| c.row == r)
                    .map(|c| c.text.replace('\n', " "))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A declared table cell with its resolved style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Origin row
    pub row: usize,

    /// Origin column
    pub col: usize,

    /// Rows covered (at least 1)
    pub rowspan: usize,

    /// Columns covered (at least 1)
    pub colspan: usize,

    /// Cell text; lines are separated by `\n`
    pub text: String,

    /// Styled runs; their concatenation equals `text`
    pub runs: Vec<Run>,

    /// Resolved text color
    pub color: Rgb,

    /// Resolved cell shading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,

    /// Resolved run highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Rgb>,

    /// Bold text (header cells)
    pub bold: bool,

    /// Forced alignment (header cells)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    /// Cell-level border override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStyle>,

    /// Cell belongs to the header row
    #[serde(default)]
    pub header: bool,
}

impl Cell {
    /// Create a plain 1x1 cell.
    pub fn new(row: usize, col: usize, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            rowspan: 1,
            colspan: 1,
            text: text.into(),
            runs: Vec::new(),
            color: Rgb::BLACK,
            background: None,
            highlight: None,
            bold: false,
            alignment: None,
            border: None,
            header: false,
        }
    }

    /// Set the span.
    pub fn with_span(mut self, rowspan: usize, colspan: usize) -> Self {
        self.rowspan = rowspan.max(1);
        self.colspan = colspan.max(1);
        self
    }
}

/// Relative column widths in basis points, always summing to [`WIDTH_UNITS`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnWidths(Vec<u32>);

impl ColumnWidths {
    /// Equal shares rounded to two decimals, remainder in the last column.
    ///
    /// When hundredths are too coarse for the column count the shares fall
    /// back to whole basis points so no column ends up empty.
    pub fn equal(columns: usize) -> Self {
        if columns == 0 {
            return ColumnWidths(Vec::new());
        }
        let n = columns as u32;
        let hundredths = round_half_even(100.0 / columns as f64) as u32;
        let mut share = hundredths * 100;
        if share == 0 || share * (n - 1) >= WIDTH_UNITS {
            share = WIDTH_UNITS / n;
        }
        let mut widths = vec![share; columns];
        widths[columns - 1] = WIDTH_UNITS - share * (n - 1);
        ColumnWidths(widths)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw basis points.
    pub fn units(&self) -> &[u32] {
        &self.0
    }

    /// Ratio of one column, 0.0 if out of range.
    pub fn ratio(&self, col: usize) -> f64 {
        self.0
            .get(col)
            .map(|&u| u as f64 / WIDTH_UNITS as f64)
            .unwrap_or(0.0)
    }

    /// All ratios in column order.
    pub fn ratios(&self) -> Vec<f64> {
        (0..self.0.len()).map(|c| self.ratio(c)).collect()
    }

    /// Split `total` proportionally; the last column absorbs rounding.
    pub fn distribute(&self, total: u32) -> Vec<u32> {
        if self.0.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<u32> = self
            .0
            .iter()
            .map(|&u| (total as u64 * u as u64 / WIDTH_UNITS as u64) as u32)
            .collect();
        let assigned: u32 = out[..out.len() - 1].iter().sum();
        if let Some(last) = out.last_mut() {
            *last = total.saturating_sub(assigned);
        }
        out
    }
}

fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if (diff - 0.5).abs() < 1e-9 {
        if floor % 2.0 == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        x.round()
    }
}
