//! JSON-lines row reader.
//!
//! Each non-blank line is either a JSON array (positional values) or a JSON
//! object keyed by column name; columns missing from an object become null.

use std::io::BufRead;

use contracts::{Layout, Row, Value};

use crate::error::{CliError, Result};

/// Iterator over rows parsed from a line-oriented reader
pub struct RowReader<R> {
    input: R,
    layout: Layout,
    line_no: u64,
    buf: String,
    blank_lines: u64,
}

impl<R: BufRead> RowReader<R> {
    pub fn new(input: R, layout: Layout) -> Self {
        Self {
            input,
            layout,
            line_no: 0,
            buf: String::new(),
            blank_lines: 0,
        }
    }

    /// Number of the most recently read line (1-based)
    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    pub fn blank_lines(&self) -> u64 {
        self.blank_lines
    }

    fn parse_line(&self, line: &str) -> Result<Row> {
        let parsed: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| CliError::input_parse(self.line_no, e.to_string()))?;

        match parsed {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| self.to_value(item))
                .collect::<Result<Vec<_>>>()
                .map(Row::new),
            serde_json::Value::Object(mut fields) => {
                let values = self
                    .layout
                    .columns()
                    .iter()
                    .map(|column| match fields.remove(column) {
                        Some(item) => self.to_value(item),
                        None => Ok(Value::Null),
                    })
                    .collect::<Result<Vec<_>>>()?;

                if let Some(unknown) = fields.keys().next() {
                    return Err(CliError::input_parse(
                        self.line_no,
                        format!("unknown column '{}'", unknown),
                    ));
                }
                Ok(Row::new(values))
            }
            other => Err(CliError::input_parse(
                self.line_no,
                format!("expected a JSON array or object, got {}", other),
            )),
        }
    }

    fn to_value(&self, item: serde_json::Value) -> Result<Value> {
        serde_json::from_value(item).map_err(|_| {
            CliError::input_parse(
                self.line_no,
                "value is not a valid cell (nested objects are unsupported)",
            )
        })
    }
}

impl<R: BufRead> Iterator for RowReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim();
                    if line.is_empty() {
                        self.blank_lines += 1;
                        continue;
                    }
                    return Some(self.parse_line(line));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::row;
    use std::io::Cursor;

    fn reader(input: &str) -> RowReader<Cursor<Vec<u8>>> {
        let layout = Layout::new(["user", "score"]).unwrap();
        RowReader::new(Cursor::new(input.as_bytes().to_vec()), layout)
    }

    #[test]
    fn test_reads_arrays_and_objects() {
        let mut r = reader("[\"a\", 1]\n\n{\"score\": 2.5, \"user\": \"b\"}\n{\"user\": \"c\"}\n");

        assert_eq!(r.next().unwrap().unwrap(), row!["a", 1]);
        assert_eq!(r.next().unwrap().unwrap(), row!["b", 2.5]);
        assert_eq!(r.next().unwrap().unwrap(), row!["c", Value::Null]);
        assert!(r.next().is_none());
        assert_eq!(r.line_no(), 4);
        assert_eq!(r.blank_lines(), 1);
    }

    #[test]
    fn test_array_arity_passes_through() {
        let mut r = reader("[1, 2, 3]\n");
        assert_eq!(r.next().unwrap().unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_column() {
        let mut r = reader("{\"user\": \"a\", \"extra\": 1}\n");
        let err = r.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("unknown column 'extra'"));
    }

    #[test]
    fn test_invalid_lines() {
        let mut r = reader("not json\n42\n[{\"a\": 1}]\n");
        for expected_line in 1..=3 {
            match r.next().unwrap() {
                Err(CliError::InputParse { line, .. }) => assert_eq!(line, expected_line),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
