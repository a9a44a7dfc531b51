/*!
 * Character Grid
 *
 * Jagged 2D character matrix: a row index pointing at independently
 * allocated rows, each holding at most `num_cols` bytes. Cells are raw bytes,
 * so any 8-bit input is kept as read.
 */

use crate::core::errors::{MatrixError, MatrixResult};
use std::fmt;
use std::io::{self, Write};
use tracing::trace;

/// Jagged byte matrix read from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharMatrix {
    num_rows: usize,
    num_cols: usize,
    rows: Vec<Box<[u8]>>,
}

impl CharMatrix {
    /// Allocate the row index for `num_rows` rows of up to `num_cols` bytes
    pub(crate) fn with_dimensions(num_rows: usize, num_cols: usize) -> MatrixResult<Self> {
        let mut rows = Vec::new();
        rows.try_reserve_exact(num_rows)
            .map_err(|_| MatrixError::AllocationFailed {
                rows: num_rows,
                cols: num_cols,
            })?;

        Ok(Self {
            num_rows,
            num_cols,
            rows,
        })
    }

    /// Append the next row, truncated to `num_cols` bytes
    ///
    /// On allocation failure the matrix is dropped by the caller, releasing
    /// every row pushed so far.
    pub(crate) fn push_row(&mut self, token: &[u8]) -> MatrixResult<()> {
        debug_assert!(self.rows.len() < self.num_rows);

        let len = token.len().min(self.num_cols);
        let mut row = Vec::new();
        row.try_reserve_exact(len)
            .map_err(|_| MatrixError::AllocationFailed {
                rows: self.num_rows,
                cols: self.num_cols,
            })?;
        row.extend_from_slice(&token[..len]);

        self.rows.push(row.into_boxed_slice());
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Bytes of row `index`; may be shorter than `num_cols`
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        self.rows.get(index).map(|row| &row[..])
    }

    /// Byte at (`row`, `col`), if that row is long enough
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.row(row).and_then(|r| r.get(col)).copied()
    }

    /// Iterate over the rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(|row| &row[..])
    }

    /// Release every row, then the row index
    ///
    /// Returns the number of rows released.
    pub fn destroy(self) -> usize {
        let CharMatrix { mut rows, .. } = self;
        let released = rows.len();

        for (index, row) in rows.drain(..).enumerate() {
            trace!(row = index, len = row.len(), "releasing matrix row");
            drop(row);
        }
        drop(rows);

        released
    }

    /// Write the rows verbatim, one per line
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in self.rows() {
            out.write_all(row)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Lossy text rendering; bytes that are not UTF-8 show as U+FFFD
impl fmt::Display for CharMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", String::from_utf8_lossy(row))?;
        }
        Ok(())
    }
}
