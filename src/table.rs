//! Tab-separated output tables.

use std::io::{self, Write};

/// A header row followed by rows of already formatted cells. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Index of the column named `header`.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Writes the header and every row, cells joined by tabs, one line each.
    pub fn write_tsv(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.headers.join("\t"))?;
        for row in &self.rows {
            writeln!(out, "{}", row.join("\t"))?;
        }
        Ok(())
    }

    pub fn to_tsv(&self) -> String {
        let mut buf = Vec::new();
        self.write_tsv(&mut buf)
            .expect("writing to a `Vec<u8>` does not fail");
        String::from_utf8(buf).expect("table cells are valid UTF-8 by construction")
    }
}
