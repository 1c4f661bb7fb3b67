use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::types::{Cell, CompensationTable};

pub const DELIMITER: char = ',';

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single delimited row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", sep)?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header line followed by one line per row. Missing values become empty fields.
pub fn write_table<W: Write>(
    w: &mut W,
    table: &CompensationTable,
    include_index: bool,
) -> io::Result<()> {
    let index_header = include_index.then(String::new);
    let header: Vec<String> = index_header
        .into_iter()
        .chain(table.headers.iter().cloned())
        .collect();
    write_row(w, &header, DELIMITER)?;

    for row in &table.rows {
        let fields: Vec<String> = include_index
            .then(|| row.index.to_string())
            .into_iter()
            .chain(
                row.cells
                    .iter()
                    .map(|c| c.as_ref().map(Cell::to_string).unwrap_or_default()),
            )
            .collect();
        write_row(w, &fields, DELIMITER)?;
    }

    Ok(())
}

/// Writes `table` to `dir/file_name`, creating `dir` if needed.
pub fn save_table(
    dir: &Path,
    file_name: &str,
    table: &CompensationTable,
    include_index: bool,
) -> io::Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(file_name);
    let mut w = BufWriter::new(File::create(&path)?);
    write_table(&mut w, table, include_index)?;
    w.flush()?;

    Ok(path)
}
