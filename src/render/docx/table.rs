//! Table grids and side-by-side groups.

use super::fonts::resolve_fonts;
use super::text::{shading, write_paragraph, ParagraphProps};
use super::units::{norm_x_pt, pt_to_twips, text_width_twips};
use super::xml::XmlSink;
use super::PageWriter;
use crate::error::Result;
use crate::model::{BorderStyle, Cell, ColumnWidths, SideBySideGroup, TableGrid};

/// Vertical merge state of a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VMerge {
    Restart,
    Continue,
}

/// One `w:tc` to write: which cell owns it, how wide it is, and how it merges.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotCell {
    owner: Option<usize>,
    span: usize,
    width: i64,
    vmerge: Option<VMerge>,
}

/// Lay out one table row as a sequence of `w:tc` elements.
fn row_slots(
    table: &TableGrid,
    owners: &[Vec<Option<usize>>],
    widths: &[i64],
    row: usize,
) -> Vec<SlotCell> {
    let mut slots = Vec::new();
    let mut col = 0;
    while col < table.columns {
        let owner = owners[row][col];
        let span = match owner {
            Some(i) => (col..table.columns)
                .take_while(|&c| owners[row][c] == Some(i))
                .count()
                .max(1),
            None => 1,
        };
        let vmerge = owner.and_then(|i| {
            let cell = &table.cells[i];
            if row > cell.row {
                Some(VMerge::Continue)
            } else if row + 1 < table.rows && owners[row + 1][col] == Some(i) {
                Some(VMerge::Restart)
            } else {
                None
            }
        });
        slots.push(SlotCell {
            owner,
            span,
            width: widths[col..col + span].iter().sum(),
            vmerge,
        });
        col += span;
    }
    slots
}

fn border_value(style: BorderStyle) -> &'static str {
    match style {
        BorderStyle::Single => "single",
        BorderStyle::Double => "double",
        BorderStyle::None => "nil",
    }
}

fn cell_borders(sink: &mut XmlSink, style: BorderStyle) -> Result<()> {
    sink.start("w:tcBorders", &[])?;
    for side in ["w:top", "w:left", "w:bottom", "w:right"] {
        match style {
            BorderStyle::None => sink.empty(side, &[("w:val", "nil")])?,
            _ => sink.empty(
                side,
                &[
                    ("w:val", border_value(style)),
                    ("w:sz", "4"),
                    ("w:space", "0"),
                    ("w:color", "000000"),
                ],
            )?,
        }
    }
    sink.end("w:tcBorders")
}

fn table_properties(
    sink: &mut XmlSink,
    width: i64,
    style_id: Option<&str>,
    borderless: bool,
) -> Result<()> {
    sink.start("w:tblPr", &[])?;
    if let Some(id) = style_id {
        sink.empty("w:tblStyle", &[("w:val", id)])?;
    }
    let width = width.to_string();
    sink.empty("w:tblW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
    if borderless {
        sink.start("w:tblBorders", &[])?;
        let sides = [
            "w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV",
        ];
        for side in sides {
            sink.empty(side, &[("w:val", "nil")])?;
        }
        sink.end("w:tblBorders")?;
    }
    sink.empty("w:tblLayout", &[("w:type", "fixed")])?;
    sink.empty("w:tblLook", &[("w:val", "04A0")])?;
    sink.end("w:tblPr")
}

fn table_grid(sink: &mut XmlSink, widths: &[i64]) -> Result<()> {
    sink.start("w:tblGrid", &[])?;
    for width in widths {
        let width = width.to_string();
        sink.empty("w:gridCol", &[("w:w", width.as_str())])?;
    }
    sink.end("w:tblGrid")
}

fn cell_width(sink: &mut XmlSink, width: i64) -> Result<()> {
    let width = width.to_string();
    sink.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])
}

/// Column widths in twips for a total width.
fn twip_widths(widths: &ColumnWidths, columns: usize, total: i64) -> Vec<i64> {
    let total = total.max(columns as i64).min(u32::MAX as i64) as u32;
    let shares = if widths.len() == columns {
        widths.distribute(total)
    } else {
        ColumnWidths::equal(columns).distribute(total)
    };
    shares.into_iter().map(i64::from).collect()
}

impl PageWriter<'_> {
    pub(super) fn table(&mut self, table: &TableGrid) -> Result<()> {
        if table.rows == 0 || table.columns == 0 {
            return Ok(());
        }
        let total = match &table.bbox {
            Some(bbox) => pt_to_twips(norm_x_pt(bbox.width(), self.geometry)),
            None => text_width_twips(self.geometry),
        };
        let widths = twip_widths(&table.column_widths, table.columns, total);
        let owners = table.slot_owners();

        self.sink.start("w:tbl", &[])?;
        table_properties(self.sink, widths.iter().sum(), Some("TableGrid"), false)?;
        table_grid(self.sink, &widths)?;

        for row in 0..table.rows {
            self.sink.start("w:tr", &[])?;
            self.sink.start("w:trPr", &[])?;
            self.sink
                .empty("w:trHeight", &[("w:val", "0"), ("w:hRule", "atLeast")])?;
            if table.header_row && row == 0 {
                self.sink.empty("w:tblHeader", &[])?;
            }
            self.sink.end("w:trPr")?;

            for slot in row_slots(table, &owners, &widths, row) {
                let cell = slot.owner.map(|i| &table.cells[i]);
                self.table_cell(table, &slot, cell)?;
            }
            self.sink.end("w:tr")?;
        }
        self.sink.end("w:tbl")?;

        // A table directly followed by another needs a separator paragraph.
        self.sink.empty("w:p", &[])
    }

    fn table_cell(
        &mut self,
        table: &TableGrid,
        slot: &SlotCell,
        cell: Option<&Cell>,
    ) -> Result<()> {
        self.sink.start("w:tc", &[])?;
        self.sink.start("w:tcPr", &[])?;
        cell_width(self.sink, slot.width)?;
        if slot.span > 1 {
            let span = slot.span.to_string();
            self.sink.empty("w:gridSpan", &[("w:val", span.as_str())])?;
        }
        match slot.vmerge {
            Some(VMerge::Restart) => self.sink.empty("w:vMerge", &[("w:val", "restart")])?,
            Some(VMerge::Continue) => self.sink.empty("w:vMerge", &[("w:val", "continue")])?,
            None => {}
        }
        let border = cell.and_then(|c| c.border).unwrap_or(table.border_style);
        cell_borders(self.sink, border)?;
        if let Some(fill) = cell.and_then(|c| c.background) {
            shading(self.sink, fill)?;
        }
        self.sink.start("w:tcMar", &[])?;
        let margins = [
            ("w:top", "0"),
            ("w:left", "29"),
            ("w:bottom", "0"),
            ("w:right", "29"),
        ];
        for (side, width) in margins {
            self.sink.empty(side, &[("w:w", width), ("w:type", "dxa")])?;
        }
        self.sink.end("w:tcMar")?;
        self.sink.empty("w:vAlign", &[("w:val", "center")])?;
        self.sink.end("w:tcPr")?;

        let fonts = resolve_fonts(None, self.geometry);
        match cell {
            Some(cell) if slot.vmerge != Some(VMerge::Continue) => {
                let props = ParagraphProps::compact(cell.alignment);
                write_paragraph(self.sink, &props, &cell.runs, fonts)?;
            }
            _ => write_paragraph(self.sink, &ParagraphProps::compact(None), &[], fonts)?,
        }
        self.sink.end("w:tc")
    }

    /// Write a side-by-side group. Returns `false` when there was nothing to
    /// write.
    pub(super) fn side_by_side(&mut self, group: &SideBySideGroup) -> Result<bool> {
        let columns = group.columns.len();
        let rows = group.row_count();
        if columns == 0 || rows == 0 {
            return Ok(false);
        }
        let widths = twip_widths(
            &ColumnWidths::equal(columns),
            columns,
            text_width_twips(self.geometry),
        );

        self.sink.start("w:tbl", &[])?;
        table_properties(self.sink, widths.iter().sum(), None, true)?;
        table_grid(self.sink, &widths)?;

        for row in 0..rows {
            self.sink.start("w:tr", &[])?;
            for (column, width) in group.columns.iter().zip(&widths) {
                self.sink.start("w:tc", &[])?;
                self.sink.start("w:tcPr", &[])?;
                cell_width(self.sink, *width)?;
                cell_borders(self.sink, BorderStyle::None)?;
                self.sink.end("w:tcPr")?;

                match column.get(row) {
                    Some(paragraph) => {
                        let props = ParagraphProps::compact(Some(paragraph.style.alignment));
                        let fonts = resolve_fonts(paragraph.style.font_family, self.geometry);
                        write_paragraph(self.sink, &props, &paragraph.runs, fonts)?;
                    }
                    None => {
                        let fonts = resolve_fonts(None, self.geometry);
                        write_paragraph(self.sink, &ParagraphProps::compact(None), &[], fonts)?;
                    }
                }
                self.sink.end("w:tc")?;
            }
            self.sink.end("w:tr")?;
        }
        self.sink.end("w:tbl")?;
        self.sink.empty("w:p", &[])?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged_table() -> TableGrid {
        // | a (colspan 2) | b (rowspan 2) |
        // | c | d |       |
        let mut table = TableGrid::new(2, 3);
        table.cells = vec![
            Cell::new(0, 0, "a").with_span(1, 2),
            Cell::new(0, 2, "b").with_span(2, 1),
            Cell::new(1, 0, "c"),
            Cell::new(1, 1, "d"),
        ];
        table
    }

    #[test]
    fn test_row_slots_merge() {
        let table = merged_table();
        let owners = table.slot_owners();
        let widths = vec![100, 200, 300];

        let first = row_slots(&table, &owners, &widths, 0);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].span, 2);
        assert_eq!(first[0].width, 300);
        assert_eq!(first[0].vmerge, None);
        assert_eq!(first[1].vmerge, Some(VMerge::Restart));

        let second = row_slots(&table, &owners, &widths, 1);
        assert_eq!(second.len(), 3);
        assert_eq!(second[2].owner, Some(1));
        assert_eq!(second[2].vmerge, Some(VMerge::Continue));
    }

    #[test]
    fn test_empty_slots_get_own_cells() {
        let mut table = TableGrid::new(2, 2);
        table.cells = vec![Cell::new(0, 0, "x")];
        let owners = table.slot_owners();
        let slots = row_slots(&table, &owners, &[50, 50], 1);
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.owner.is_none() && s.span == 1));
    }

    #[test]
    fn test_twip_widths() {
        let widths = twip_widths(&ColumnWidths::equal(3), 3, 9000);
        assert_eq!(widths.iter().sum::<i64>(), 9000);
        assert_eq!(widths.len(), 3);

        // Stored widths for the wrong column count fall back to equal shares.
        let widths = twip_widths(&ColumnWidths::equal(2), 4, 4000);
        assert_eq!(widths, vec![1000, 1000, 1000, 1000]);
    }

    #[test]
    fn test_border_values() {
        assert_eq!(border_value(BorderStyle::Double), "double");
        assert_eq!(border_value(BorderStyle::None), "nil");
    }
}
