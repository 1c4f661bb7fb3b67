use crate::types::{Cell, CompensationTable};

use scraper::{ElementRef, Html, Selector};

/// Rows with fewer present values than this are separators or footnotes.
pub const MIN_PRESENT_VALUES: usize = 2;

const RANGE_SEPARATOR: char = '\u{2014}';
const CONJUNCTION: &str = "and";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(
        "Expected table structure not found: {found} table(s) matching {marker}, \
         no table at position {position}"
    )]
    TableNotFound {
        marker: String,
        found: usize,
        position: usize,
    },
    #[error("Invalid table selector: {0}")]
    InvalidSelector(String),
}

/// Picks the data table out of a page: the `position`-th `<table>` whose
/// `attribute` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelector {
    attribute: String,
    value: String,
    position: usize,
}

impl Default for TableSelector {
    /// The distribution table is the second `border="1"` table on the page.
    fn default() -> Self {
        Self::new("border", "1", 1)
    }
}

impl TableSelector {
    pub fn new(attribute: &str, value: &str, position: usize) -> Self {
        Self {
            attribute: attribute.to_string(),
            value: value.to_string(),
            position,
        }
    }

    fn marker(&self) -> String {
        format!("{}=\"{}\"", self.attribute, self.value)
    }

    pub fn locate<'a>(&self, document: &'a Html) -> Result<ElementRef<'a>, ParseError> {
        let css = format!("table[{}]", self.marker());
        let selector =
            Selector::parse(&css).map_err(|e| ParseError::InvalidSelector(e.to_string()))?;

        let tables: Vec<ElementRef<'a>> = document.select(&selector).collect();
        log::debug!("Found {} table(s) matching {}", tables.len(), self.marker());

        tables
            .get(self.position)
            .copied()
            .ok_or_else(|| ParseError::TableNotFound {
                marker: self.marker(),
                found: tables.len(),
                position: self.position,
            })
    }
}

/// Converts raw cell text to a number when possible.
///
/// Commas and `$` are stripped, and ranges ("1,000 — 1,999") or open-ended
/// brackets ("500 and over") collapse to their first number. Text that still
/// doesn't parse is returned trimmed but otherwise untouched.
pub fn normalize_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    let stripped = trimmed.replace([',', '$'], "");

    let cleaned = stripped
        .split(RANGE_SEPARATOR)
        .next()
        .unwrap_or_default()
        .split(CONJUNCTION)
        .next()
        .unwrap_or_default()
        .trim();

    match cleaned.parse::<f64>() {
        Ok(n) => Cell::Number(n),
        Err(_) => Cell::Text(trimmed.to_string()),
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_distribution_table(html: &str) -> Result<CompensationTable, ParseError> {
    parse_distribution_table_with(html, &TableSelector::default())
}

pub fn parse_distribution_table_with(
    html: &str,
    table_selector: &TableSelector,
) -> Result<CompensationTable, ParseError> {
    let document = Html::parse_document(html);
    let table = table_selector.locate(&document)?;

    let header_selector = Selector::parse(r#"th[scope="col"]"#).unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    // Headers are collapsed to single spaces rather than kept as raw text,
    // so "Cumulative\n    number" becomes "Cumulative number".
    let headers: Vec<String> = table
        .select(&header_selector)
        .map(|th| normalize_whitespace(&th.text().collect::<String>()))
        .collect();

    let rows: Vec<Vec<Option<Cell>>> = table
        .select(&row_selector)
        .map(|tr| {
            tr.select(&cell_selector)
                .map(|td| {
                    let cell = normalize_cell(&td.text().collect::<String>());
                    (!cell.is_missing()).then_some(cell)
                })
                .collect()
        })
        .collect();

    let parsed = rows.len();
    let mut table = CompensationTable::from_parts(headers, rows);
    table.drop_sparse_rows(MIN_PRESENT_VALUES);

    log::debug!(
        "Kept {} of {} rows across {} columns",
        table.len(),
        parsed,
        table.headers.len()
    );

    Ok(table)
}
