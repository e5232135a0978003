//! Column-aligned text output
//!
//! Rows are buffered until `flush`, then every column but the last is padded
//! to the widest cell plus a fixed gap, never narrower than `MIN_WIDTH`.
//! Column widths are remembered across flushes and only grow, so later
//! blocks stay aligned under earlier ones.

use std::io::{self, Write};

/// Spaces between aligned columns
pub const COLUMN_PADDING: usize = 3;
/// Smallest width of a padded column, gap included
pub const MIN_WIDTH: usize = 6;

pub struct TabWriter<W: Write> {
    out: W,
    padding: usize,
    min_width: usize,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl<W: Write> TabWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            padding: COLUMN_PADDING,
            min_width: MIN_WIDTH,
            widths: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn write_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn flush(&mut self) -> io::Result<()> {
        let rows = std::mem::take(&mut self.rows);

        for row in &rows {
            // The trailing cell is never padded, so it does not widen its column
            let aligned = row.len().saturating_sub(1);
            if self.widths.len() < aligned {
                self.widths.resize(aligned, self.min_width);
            }
            for (width, cell) in self.widths.iter_mut().zip(&row[..aligned]) {
                *width = (*width).max(cell.chars().count() + self.padding);
            }
        }

        for row in &rows {
            let mut line = String::new();
            let last = row.len().saturating_sub(1);
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i < last {
                    let fill = self.widths[i] - cell.chars().count();
                    line.extend(std::iter::repeat_n(' ', fill));
                }
            }
            writeln!(self.out, "{}", line)?;
        }

        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
