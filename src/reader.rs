//! Reading graph files.
//!
//! A graph file starts with a line `dim nnz`, followed by `nnz` lines
//! `row col weight` with 1-based vertex indices.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use log::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// Typed access to the whitespace-separated fields of one line.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    line: usize,
    iter: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    /// `line` is the 1-based line number used in error messages.
    pub fn new(text: &'a str, line: usize) -> Self {
        Self {
            line,
            iter: text.split_whitespace(),
        }
    }

    /// Parse the next field, named `name` in error messages.
    pub fn next<T: FromStr>(&mut self, name: &str) -> Result<T> {
        let token = self
            .iter
            .next()
            .ok_or_else(|| Error::malformed(self.line, format!("missing field `{}`", name)))?;
        token.parse().map_err(|_| {
            Error::malformed(
                self.line,
                format!("field `{}` is not a valid number: `{}`", name, token),
            )
        })
    }

    /// Fail if any field remains on the line.
    pub fn end(mut self) -> Result<()> {
        match self.iter.next() {
            None => Ok(()),
            Some(token) => Err(Error::malformed(
                self.line,
                format!("unexpected trailing field `{}`", token),
            )),
        }
    }
}

/// First line of a graph file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of vertices.
    pub dim: usize,
    /// Number of edges.
    pub nnz: usize,
}

impl Header {
    pub fn parse(text: &str, line: usize) -> Result<Self> {
        let mut fields = Fields::new(text, line);
        let dim = fields.next("dim")?;
        let nnz = fields.next("nnz")?;
        fields.end()?;
        if dim == 0 {
            return Err(Error::malformed(line, "the graph has no vertex"));
        }
        let header = Header { dim, nnz };
        if header.max_rows().is_none() {
            return Err(Error::malformed(
                line,
                format!("{} vertices and {} edges exceed the row index range", dim, nnz),
            ));
        }
        Ok(header)
    }

    /// Number of constraint rows of the largest problem, `dim + 1 + nnz`,
    /// or `None` if it does not fit in a `usize`.
    pub fn max_rows(&self) -> Option<usize> {
        self.dim.checked_add(1)?.checked_add(self.nnz)
    }
}

/// A weighted edge `(row, col, weight)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub row: usize,
    pub col: usize,
    pub weight: f64,
}

impl Edge {
    /// Parse an edge and check that its endpoints lie in `[1, dim]`.
    pub fn parse(text: &str, line: usize, dim: usize) -> Result<Self> {
        let mut fields = Fields::new(text, line);
        let edge = Edge {
            row: fields.next("row")?,
            col: fields.next("col")?,
            weight: fields.next("weight")?,
        };
        fields.end()?;
        for (name, v) in [("row", edge.row), ("col", edge.col)] {
            if v == 0 || v > dim {
                return Err(Error::malformed(
                    line,
                    format!("{} index {} is outside [1, {}]", name, v, dim),
                ));
            }
        }
        Ok(edge)
    }
}

/// Reader over a graph file: the header is read eagerly, the edges lazily.
#[derive(Debug)]
pub struct GraphReader<R> {
    input: R,
    header: Header,
    line: usize,
    remaining: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> GraphReader<R> {
    pub fn new(mut input: R) -> Result<Self> {
        let mut buf = Vec::new();
        let mut line = 0;
        if !next_line(&mut input, &mut buf, &mut line)? {
            return Err(Error::malformed(line + 1, "missing header `dim nnz`"));
        }
        let header = Header::parse(as_text(&buf, line)?, line)?;
        Ok(Self {
            input,
            header,
            line,
            remaining: header.nnz,
            buf,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the next edge, or `None` once `nnz` edges were read.
    pub fn next_edge(&mut self) -> Result<Option<Edge>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if !next_line(&mut self.input, &mut self.buf, &mut self.line)? {
            return Err(Error::malformed(
                self.line + 1,
                format!(
                    "premature end of input: {} of {} edges read",
                    self.header.nnz - self.remaining,
                    self.header.nnz
                ),
            ));
        }
        let edge = Edge::parse(as_text(&self.buf, self.line)?, self.line, self.header.dim)?;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.check_trailing()?;
        }
        Ok(Some(edge))
    }

    // Trailing lines are not parsed, so they may hold anything
    fn check_trailing(&mut self) -> Result<()> {
        let mut extra = 0;
        let mut line = self.line;
        while next_line(&mut self.input, &mut self.buf, &mut line)? {
            extra += 1;
        }
        if extra > 0 {
            warn!(
                "Ignoring {} line(s) after the {} declared edges",
                extra, self.header.nnz
            );
        }
        Ok(())
    }
}

// Read the next non-blank line into `buf`, counting lines in `line`.
// Returns false at the end of the input.
fn next_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>, line: &mut usize) -> Result<bool> {
    loop {
        buf.clear();
        if input.read_until(b'\n', buf)? == 0 {
            return Ok(false);
        }
        *line += 1;
        if !buf.trim_ascii().is_empty() {
            return Ok(true);
        }
    }
}

fn as_text(buf: &[u8], line: usize) -> Result<&str> {
    std::str::from_utf8(buf)
        .map_err(|e| Error::malformed(line, format!("line is not valid UTF-8 ({})", e)))
}

impl<R: BufRead> Iterator for GraphReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_edge().transpose()
    }
}

/// Open a graph file, decompressing it if its name ends in `.gz`.
pub fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|source| Error::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        debug!("Reading {} as gzip", path.display());
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Name of the graph, used to build the output names: the file name of
/// `path` without a `.gz` suffix.
pub fn graph_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".gz") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}
