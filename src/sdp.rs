//! Text layout of the SDP problem files.
//!
//! A problem file is a sequence of sections, each opened by a keyword on
//! its own line, in the order `ROWS`, `POBJM`, `POBJV`, `CONM`, `CONV`,
//! `ENDATA`. Data lines start with a space and floats are printed with
//! six decimals.

use std::fmt;
use std::fmt::Display;
use std::io;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    /// Constraint rows.
    Rows,
    /// Quadratic objective.
    Pobjm,
    /// Linear objective.
    Pobjv,
    /// Quadratic constraints.
    Conm,
    /// Linear constraints.
    Conv,
    Endata,
}

impl Section {
    pub fn keyword(self) -> &'static str {
        match self {
            Section::Rows => "ROWS",
            Section::Pobjm => "POBJM",
            Section::Pobjv => "POBJV",
            Section::Conm => "CONM",
            Section::Conv => "CONV",
            Section::Endata => "ENDATA",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        use Section::*;
        [Rows, Pobjm, Pobjv, Conm, Conv, Endata]
            .into_iter()
            .find(|sec| sec.keyword() == s)
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

// A line `i j val`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coeff {
    pub i: usize,
    pub j: usize,
    pub val: f64,
}

impl Coeff {
    pub fn new(i: usize, j: usize, val: f64) -> Self {
        Self { i, j, val }
    }
}

impl Display for Coeff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {} {} {:.6}", self.i, self.j, self.val)
    }
}

/// Writer of one problem file.
#[derive(Debug)]
pub struct SectionWriter<W> {
    w: W,
    section: Option<Section>,
}

impl<W: Write> SectionWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w, section: None }
    }

    /// Last section opened.
    pub fn section(&self) -> Option<Section> {
        self.section
    }

    /// Open `section`. Sections must be opened in increasing order.
    pub fn open(&mut self, section: Section) -> io::Result<()> {
        debug_assert!(self.section < Some(section), "{} opened out of order", section);
        self.section = Some(section);
        writeln!(self.w, "{}", section)
    }

    /// Write the `ROWS` section declaring rows `1..=n`.
    pub fn rows(&mut self, n: usize) -> io::Result<()> {
        self.open(Section::Rows)?;
        for i in 1..=n {
            writeln!(self.w, " E {} {:.6}", i, 1.0)?;
        }
        Ok(())
    }

    pub fn coeff(&mut self, i: usize, j: usize, val: f64) -> io::Result<()> {
        writeln!(self.w, "{}", Coeff::new(i, j, val))
    }

    /// A vector entry `i val`.
    pub fn entry(&mut self, i: usize, val: f64) -> io::Result<()> {
        writeln!(self.w, " {} {:.6}", i, val)
    }

    /// Coefficients `(i, i, val)` for `i` in `1..=n`.
    pub fn diagonal(&mut self, n: usize, val: f64) -> io::Result<()> {
        for i in 1..=n {
            self.coeff(i, i, val)?;
        }
        Ok(())
    }

    /// Write `ENDATA` and flush the underlying stream.
    pub fn end(&mut self) -> io::Result<()> {
        self.open(Section::Endata)?;
        self.w.flush()
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coeff_display() {
        assert_eq!(Coeff::new(1, 2, 5.).to_string(), " 1 2 5.000000");
        assert_eq!(Coeff::new(4, 1, -1.).to_string(), " 4 1 -1.000000");
        assert_eq!(Coeff::new(2, 4, -0.5).to_string(), " 2 4 -0.500000");
    }

    #[test]
    fn layout() {
        let mut w = SectionWriter::new(Vec::new());
        w.rows(2).unwrap();
        w.open(Section::Pobjm).unwrap();
        w.open(Section::Pobjv).unwrap();
        w.entry(1, -2.).unwrap();
        w.open(Section::Conm).unwrap();
        w.diagonal(2, 1.).unwrap();
        w.open(Section::Conv).unwrap();
        w.end().unwrap();
        assert_eq!(w.section(), Some(Section::Endata));
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            text,
            "ROWS\n E 1 1.000000\n E 2 1.000000\nPOBJM\nPOBJV\n 1 -2.000000\n\
             CONM\n 1 1 1.000000\n 2 2 1.000000\nCONV\nENDATA\n"
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(Section::from_keyword("CONV"), Some(Section::Conv));
        assert_eq!(Section::from_keyword("conv"), None);
    }
}
