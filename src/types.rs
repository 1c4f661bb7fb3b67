use std::fmt::Display;

use serde::Serialize;

/// A single normalised table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Empty text and NaN carry no value and are stored as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Number(n) => n.is_nan(),
            Cell::Text(s) => s.is_empty(),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // whole numbers keep a trailing ".0" so 12345.0 stays distinguishable from text
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationRow {
    /// Position of the row among the `<tr>` elements of the source table.
    pub index: usize,
    pub cells: Vec<Option<Cell>>,
}

impl CompensationRow {
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Distribution of wage earners by level of net compensation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationTable {
    pub headers: Vec<String>,
    pub rows: Vec<CompensationRow>,
}

impl CompensationTable {
    /// Builds a table whose rows all have exactly `headers.len()` cells.
    ///
    /// Short rows are padded with missing values and long rows are truncated.
    pub fn from_parts(headers: Vec<String>, raw_rows: Vec<Vec<Option<Cell>>>) -> Self {
        let width = headers.len();

        let rows = raw_rows
            .into_iter()
            .enumerate()
            .map(|(index, mut cells)| {
                if !cells.is_empty() && cells.len() != width {
                    log::warn!(
                        "Row {} has {} cells but the table has {} columns",
                        index,
                        cells.len(),
                        width
                    );
                }
                cells.resize(width, None);
                CompensationRow { index, cells }
            })
            .collect();

        Self { headers, rows }
    }

    /// Drops every row holding fewer than `min_present` non-missing values.
    pub fn drop_sparse_rows(&mut self, min_present: usize) {
        self.rows.retain(|row| row.present_count() >= min_present);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for CompensationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.index.to_string())
                    .chain(
                        row.cells
                            .iter()
                            .map(|c| c.as_ref().map(Cell::to_string).unwrap_or_default()),
                    )
                    .collect()
            })
            .collect();

        let header_line: Vec<&str> = std::iter::once("")
            .chain(self.headers.iter().map(String::as_str))
            .collect();

        let mut widths: Vec<usize> = header_line.iter().map(|h| h.chars().count()).collect();
        for row in &rendered {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[&str]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        };

        writeln!(f, "{}", line(header_line.as_slice()))?;
        for row in &rendered {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            writeln!(f, "{}", line(cells.as_slice()))?;
        }
        write!(f, "[{} rows x {} columns]", self.rows.len(), self.headers.len())
    }
}
