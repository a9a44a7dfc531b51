/*!
 * Matrix Reader
 *
 * Input format: a row count and a column count, followed by one
 * whitespace-delimited token per row. Tokens are raw bytes; those longer than
 * the column count are truncated, and missing tokens leave their row empty.
 */

use super::grid::CharMatrix;
use crate::core::errors::{MatrixError, MatrixResult};
use crate::core::limits::MATRIX_MAX_DIMENSION;
use std::io::BufRead;
use tracing::{debug, warn};

/// ASCII-whitespace tokenizer over a buffered reader, one line at a time
///
/// Works on raw bytes, so tokens may hold any non-whitespace byte.
struct TokenReader<R> {
    reader: R,
    line: Vec<u8>,
    pos: usize,
}

impl<R: BufRead> TokenReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
        }
    }

    /// Next token, or `None` at end of input
    fn next_token(&mut self) -> MatrixResult<Option<&[u8]>> {
        let (start, end) = loop {
            let rest = &self.line[self.pos..];
            if let Some(skipped) = rest.iter().position(|b| !b.is_ascii_whitespace()) {
                let start = self.pos + skipped;
                let token_len = self.line[start..]
                    .iter()
                    .position(u8::is_ascii_whitespace)
                    .unwrap_or(self.line.len() - start);
                break (start, start + token_len);
            }

            self.line.clear();
            self.pos = 0;
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
        };

        self.pos = end;
        Ok(Some(&self.line[start..end]))
    }
}

/// Parse a strictly positive dimension
fn parse_dimension(token: Option<&[u8]>) -> Result<usize, DimensionError> {
    let token = token.ok_or_else(|| DimensionError::Invalid("missing".to_string()))?;
    let text = String::from_utf8_lossy(token);
    match text.parse::<i64>() {
        Ok(value) if value > 0 => usize::try_from(value).map_err(|_| DimensionError::TooLarge),
        Ok(value) => Err(DimensionError::Invalid(format!("{} (must be positive)", value))),
        Err(_) => Err(DimensionError::Invalid(format!("'{}'", text))),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum DimensionError {
    Invalid(String),
    /// Does not fit in `usize` on this target
    TooLarge,
}

/// Read a jagged character matrix from `reader`
///
/// # Examples
///
/// ```
/// use handoff_lab::matrix::read_matrix;
///
/// let matrix = read_matrix("2 3\nabcd\nxy\n".as_bytes()).unwrap();
/// assert_eq!(matrix.to_string(), "abc\nxy\n");
/// assert_eq!(matrix.destroy(), 2);
/// ```
pub fn read_matrix<R: BufRead>(reader: R) -> MatrixResult<CharMatrix> {
    let mut tokens = TokenReader::new(reader);

    // A dimension that does not fit in usize is reported as usize::MAX
    let num_rows = match parse_dimension(tokens.next_token()?) {
        Ok(rows) => rows,
        Err(DimensionError::Invalid(reason)) => return Err(MatrixError::InvalidRowCount(reason)),
        Err(DimensionError::TooLarge) => usize::MAX,
    };
    let num_cols = match parse_dimension(tokens.next_token()?) {
        Ok(cols) => cols,
        Err(DimensionError::Invalid(reason)) => return Err(MatrixError::InvalidColCount(reason)),
        Err(DimensionError::TooLarge) => usize::MAX,
    };

    if num_rows > MATRIX_MAX_DIMENSION || num_cols > MATRIX_MAX_DIMENSION {
        return Err(MatrixError::TooLarge {
            rows: num_rows,
            cols: num_cols,
        });
    }

    let mut matrix = CharMatrix::with_dimensions(num_rows, num_cols)?;
    let mut missing = 0usize;

    for _ in 0..num_rows {
        match tokens.next_token()? {
            Some(token) => matrix.push_row(token)?,
            None => {
                missing += 1;
                matrix.push_row(b"")?;
            }
        }
    }

    if missing > 0 {
        warn!(
            rows = num_rows,
            missing, "input ended early, trailing rows left empty"
        );
    }
    debug!(rows = num_rows, cols = num_cols, "matrix read");

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokens_across_lines() {
        let mut tokens = TokenReader::new("  a bb\r\n\n\tccc  \n".as_bytes());
        assert_eq!(tokens.next_token().unwrap(), Some(&b"a"[..]));
        assert_eq!(tokens.next_token().unwrap(), Some(&b"bb"[..]));
        assert_eq!(tokens.next_token().unwrap(), Some(&b"ccc"[..]));
        assert_eq!(tokens.next_token().unwrap(), None);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension(Some(&b"12"[..])), Ok(12));
        assert!(parse_dimension(Some(&b"0"[..])).is_err());
        assert!(parse_dimension(Some(&b"-3"[..])).is_err());
        assert!(parse_dimension(Some(&b"x"[..])).is_err());
        assert!(parse_dimension(Some(&b"\xff"[..])).is_err());
        assert!(parse_dimension(None).is_err());
    }

    #[test]
    fn test_read_simple_matrix() {
        let matrix = read_matrix("3 2\nab\ncd\nef\n".as_bytes()).unwrap();
        assert_eq!(matrix.num_rows(), 3);
        assert_eq!(matrix.num_cols(), 2);
        assert_eq!(matrix.to_string(), "ab\ncd\nef\n");
    }

    #[test]
    fn test_dimensions_on_one_line_with_rows() {
        let matrix = read_matrix("2 2 ab cd".as_bytes()).unwrap();
        assert_eq!(matrix.get(1, 0), Some(b'c'));
    }

    #[test]
    fn test_invalid_header() {
        assert!(matches!(
            read_matrix("0 3\n".as_bytes()),
            Err(MatrixError::InvalidRowCount(_))
        ));
        assert!(matches!(
            read_matrix("3 -1\n".as_bytes()),
            Err(MatrixError::InvalidColCount(_))
        ));
        assert!(matches!(
            read_matrix("".as_bytes()),
            Err(MatrixError::InvalidRowCount(_))
        ));
    }

    #[test]
    fn test_latin1_bytes_in_rows() {
        let matrix = read_matrix(&b"2 3\nab\xff\nc\xe9d\n"[..]).unwrap();
        assert_eq!(matrix.row(0), Some(&b"ab\xff"[..]));
        assert_eq!(matrix.row(1), Some(&b"c\xe9d"[..]));
    }

    #[test]
    fn test_non_utf8_header_is_a_matrix_error() {
        let err = read_matrix(&b"\xff 2\nab\n"[..]).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidRowCount(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_oversized_header_rejected_before_allocation() {
        let input = format!("{} 1\n", MATRIX_MAX_DIMENSION + 1);
        assert!(matches!(
            read_matrix(input.as_bytes()),
            Err(MatrixError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_dimension_beyond_limit_is_too_large() {
        let err = read_matrix(format!("{} 1\n", i64::MAX).as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::TooLarge { cols: 1, .. }));
    }

    #[test]
    fn test_missing_rows_left_empty() {
        let matrix = read_matrix("3 4\nabcd\n".as_bytes()).unwrap();
        assert_eq!(matrix.num_rows(), 3);
        assert_eq!(matrix.row(1), Some(&[][..]));
        assert_eq!(matrix.row(2), Some(&[][..]));
        assert_eq!(matrix.destroy(), 3);
    }
}
