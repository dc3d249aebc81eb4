//! Table reconstruction from HTML table markup.
//!
//! Cells are placed on an occupancy grid the way browsers lay out spans,
//! then styled by a per-field cascade of cell, column, and row overrides.

use crate::model::{
    Alignment, BBox, Cell, ColorOverride, ColumnWidths, EffectiveStyle, KeywordStyle, Run,
    RunStyle, TableGrid,
};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Largest span accepted from markup.
const MAX_SPAN: usize = 1000;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Invalid row selector"));

/// A cell as declared in markup, before placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// Cell text; `<br>` becomes `\n`
    pub text: String,
    /// Declared rowspan (at least 1)
    pub rowspan: usize,
    /// Declared colspan (at least 1)
    pub colspan: usize,
    /// Declared with `<th>`
    pub is_header: bool,
}

/// Parse table markup into rows of raw cells. Rows without cells are dropped.
pub fn parse_table_markup(markup: &str) -> Vec<Vec<RawCell>> {
    let rows = collect_rows(&Html::parse_fragment(markup));
    if rows.is_empty() && markup.contains("<tr") && !markup.contains("<table") {
        // Bare rows are dropped by the HTML parser outside a table context.
        return collect_rows(&Html::parse_fragment(&format!("<table>{}</table>", markup)));
    }
    rows
}

fn collect_rows(document: &Html) -> Vec<Vec<RawCell>> {
    document
        .select(&ROW_SELECTOR)
        .map(|tr| {
            tr.children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .map(|el| RawCell {
                    text: cell_text(el),
                    rowspan: span_attr(el, "rowspan"),
                    colspan: span_attr(el, "colspan"),
                    is_header: el.value().name() == "th",
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

fn span_attr(el: ElementRef<'_>, name: &str) -> usize {
    el.value()
        .attr(name)
        .and_then(|v| {
            let digits: String = v.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<usize>().ok()
        })
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

fn cell_text(el: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in el.children() {
        if let Some(t) = child.value().as_text() {
            text.push_str(t);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if child_el.value().name() == "br" {
                text.push('\n');
            } else {
                text.push_str(&cell_text(child_el));
            }
        }
    }
    text.trim().to_string()
}

/// Where a raw cell landed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the row in the markup
    pub row: usize,
    /// Index of the cell within its markup row
    pub cell: usize,
    /// Origin column
    pub col: usize,
    /// Rows covered after clipping
    pub rowspan: usize,
    /// Columns covered after clipping
    pub colspan: usize,
}

/// Grid dimensions and cell placements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Placed cells in row order
    pub placements: Vec<Placement>,
}

/// Lay cells out on an occupancy grid.
///
/// The column count is the largest per-row colspan sum. Each cell takes the
/// first free column at or after the cursor; spans are clipped to the grid
/// and to slots claimed earlier so no two cells overlap. A row whose cursor
/// runs off the grid drops its remaining cells. Returns `None` for an empty
/// grid.
pub fn place_cells(rows: &[Vec<RawCell>]) -> Option<GridLayout> {
    let row_count = rows.len();
    let columns = rows
        .iter()
        .map(|row| row.iter().map(|c| c.colspan).sum::<usize>())
        .max()
        .unwrap_or(0);
    if row_count == 0 || columns == 0 {
        return None;
    }

    let mut occupied = vec![vec![false; columns]; row_count];
    let mut placements = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        let mut cursor = 0;
        for (i, raw) in row.iter().enumerate() {
            while cursor < columns && occupied[r][cursor] {
                cursor += 1;
            }
            if cursor >= columns {
                log::debug!("Row {} overflows {} columns; {} cell(s) dropped", r, columns, row.len() - i);
                break;
            }

            let mut colspan = 0;
            while colspan < raw.colspan && cursor + colspan < columns && !occupied[r][cursor + colspan] {
                colspan += 1;
            }
            let mut rowspan = 1;
            while rowspan < raw.rowspan
                && r + rowspan < row_count
                && (cursor..cursor + colspan).all(|c| !occupied[r + rowspan][c])
            {
                rowspan += 1;
            }

            for slots in occupied.iter_mut().skip(r).take(rowspan) {
                for slot in slots.iter_mut().skip(cursor).take(colspan) {
                    *slot = true;
                }
            }

            placements.push(Placement {
                row: r,
                cell: i,
                col: cursor,
                rowspan,
                colspan,
            });
            cursor += colspan;
        }
    }

    Some(GridLayout {
        rows: row_count,
        columns,
        placements,
    })
}

/// First source that specifies a field wins, independently per field.
///
/// Sources are ordered from most to least specific; missing sources are
/// skipped.
pub fn first_specified<T>(
    sources: &[Option<&ColorOverride>],
    field: impl Fn(&ColorOverride) -> Option<T>,
) -> Option<T> {
    sources.iter().flatten().find_map(|source| field(source))
}

/// Split cell text at keyword occurrences, longest keyword first.
///
/// Keyword pieces take the keyword's color, bold, and highlight, falling
/// back to the cell's color and bold; other pieces use `cell` unchanged.
pub fn split_keywords(text: &str, keywords: &[&KeywordStyle], cell: &RunStyle) -> Vec<Run> {
    let mut sorted: Vec<&KeywordStyle> = keywords
        .iter()
        .copied()
        .filter(|k| !k.keyword.is_empty())
        .collect();
    if sorted.is_empty() {
        return plain_runs(text, cell);
    }
    sorted.sort_by(|a, b| b.keyword.len().cmp(&a.keyword.len()));

    let alternation = sorted
        .iter()
        .map(|k| regex::escape(&k.keyword))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = match Regex::new(&alternation) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Keyword pattern rejected: {}", e);
            return plain_runs(text, cell);
        }
    };

    let mut runs = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.start() > last {
            runs.push(Run::styled(&text[last..m.start()], cell.clone()));
        }
        let keyword = sorted.iter().find(|k| k.keyword == m.as_str());
        let style = match keyword {
            Some(k) => RunStyle {
                color: k.color.unwrap_or(cell.color),
                bold: k.bold.unwrap_or(false) || cell.bold,
                highlight: k.highlight,
                ..cell.clone()
            },
            None => cell.clone(),
        };
        runs.push(Run::styled(m.as_str(), style));
        last = m.end();
    }
    if last < text.len() {
        runs.push(Run::styled(&text[last..], cell.clone()));
    }
    runs
}

fn plain_runs(text: &str, style: &RunStyle) -> Vec<Run> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Run::styled(text, style.clone())]
    }
}

/// Build a styled table grid from markup. Returns `None` when the markup
/// yields no usable grid.
pub fn reconstruct_table(
    markup: &str,
    style: &EffectiveStyle,
    bbox: Option<BBox>,
) -> Option<TableGrid> {
    let rows = parse_table_markup(markup);
    let layout = place_cells(&rows)?;
    log::debug!(
        "Table grid {}x{} with {} cell(s)",
        layout.rows,
        layout.columns,
        layout.placements.len()
    );

    let header_row = layout.rows > 1 && style.table_header;
    let overrides = &style.cell_overrides;

    let cells = layout
        .placements
        .iter()
        .map(|p| {
            let raw = &rows[p.row][p.cell];
            let header = header_row && p.row == 0;
            let sources = [
                overrides.cell(p.row, p.col),
                overrides.column(p.col),
                overrides.row(p.row),
            ];

            let color = first_specified(&sources, ColorOverride::text_color).unwrap_or(style.color);
            let background =
                first_specified(&sources, ColorOverride::background).or(style.background);
            let highlight = first_specified(&sources, ColorOverride::highlight);
            let border = first_specified(&sources, ColorOverride::border);

            let keywords = overrides.keywords(p.row, p.col);
            let run_style = RunStyle {
                bold: header,
                italic: false,
                font_size: style.font_size,
                color,
                highlight: if keywords.is_empty() { highlight } else { None },
                font_name: None,
                math: false,
            };
            let runs = split_keywords(&raw.text, &keywords, &run_style);

            Cell {
                row: p.row,
                col: p.col,
                rowspan: p.rowspan,
                colspan: p.colspan,
                text: raw.text.clone(),
                runs,
                color,
                background,
                highlight,
                bold: header,
                alignment: header.then_some(Alignment::Center),
                border,
                header,
            }
        })
        .collect();

    Some(TableGrid {
        rows: layout.rows,
        columns: layout.columns,
        cells,
        column_widths: ColumnWidths::equal(layout.columns),
        header_row,
        border_style: style.border_style,
        bbox,
        font_size: style.font_size,
    })
}
