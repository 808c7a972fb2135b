//! Problem-specific writers.
//!
//! Each emitter owns one output file. It writes its fixed sections in
//! `begin`, receives every sorted row of the graph through `row`, and
//! closes the file in `end`. Emitters do not share any state.
//!
//! Notation: `n` is the number of vertices and `m` the number of edges.

use crate::format::Format;
use crate::reader::Header;
use crate::row::SparseRow;
use crate::sdp::{Section, SectionWriter};
use std::io;
use std::io::Write;

/// Common interface of the problem writers.
pub trait Emitter {
    fn format(&self) -> Format;
    /// Write the sections preceding the row coefficients.
    fn begin(&mut self) -> io::Result<()>;
    /// Write the coefficients induced by one sorted row.
    fn row(&mut self, row: &SparseRow) -> io::Result<()>;
    /// Write the remaining sections and flush.
    fn end(&mut self) -> io::Result<()>;
}

/// Create the emitter of `format` writing to `w`.
pub fn emitter<'a, W: Write + 'a>(format: Format, graph: Header, w: W) -> Box<dyn Emitter + 'a> {
    let out = SectionWriter::new(w);
    match format {
        Format::MaxCut => Box::new(MaxCut { graph, out }),
        Format::BoxQp => Box::new(BoxQp { graph, out }),
        Format::EqualCut => Box::new(EqualCut { graph, out }),
        Format::StableSet => Box::new(StableSet::new(graph, out, false)),
        Format::StableSet2 => Box::new(StableSet::new(graph, out, true)),
    }
}

// The weights of a row as objective coefficients
fn objective_row<W: Write>(out: &mut SectionWriter<W>, row: &SparseRow) -> io::Result<()> {
    for (i, j, w) in row.coeffs() {
        out.coeff(i, j, w)?;
    }
    Ok(())
}

/// Maximum cut: the weights form the objective and each vertex gets a
/// unit diagonal constraint.
#[derive(Debug)]
pub struct MaxCut<W> {
    graph: Header,
    out: SectionWriter<W>,
}

impl<W: Write> Emitter for MaxCut<W> {
    fn format(&self) -> Format {
        Format::MaxCut
    }
    fn begin(&mut self) -> io::Result<()> {
        let rows = self.format().row_count(self.graph.dim, self.graph.nnz);
        self.out.rows(rows)?;
        self.out.open(Section::Pobjm)
    }
    fn row(&mut self, row: &SparseRow) -> io::Result<()> {
        objective_row(&mut self.out, row)
    }
    fn end(&mut self) -> io::Result<()> {
        self.out.open(Section::Pobjv)?;
        self.out.open(Section::Conm)?;
        self.out.diagonal(self.graph.dim, 1.)?;
        self.out.open(Section::Conv)?;
        self.out.end()
    }
}

/// Box-constrained quadratic programming: as max-cut, with the box
/// constraints `(i, i, 1)` repeated in the linear constraint block.
#[derive(Debug)]
pub struct BoxQp<W> {
    graph: Header,
    out: SectionWriter<W>,
}

impl<W: Write> Emitter for BoxQp<W> {
    fn format(&self) -> Format {
        Format::BoxQp
    }
    fn begin(&mut self) -> io::Result<()> {
        let rows = self.format().row_count(self.graph.dim, self.graph.nnz);
        self.out.rows(rows)?;
        self.out.open(Section::Pobjm)
    }
    fn row(&mut self, row: &SparseRow) -> io::Result<()> {
        objective_row(&mut self.out, row)
    }
    fn end(&mut self) -> io::Result<()> {
        self.out.open(Section::Pobjv)?;
        self.out.open(Section::Conm)?;
        self.out.diagonal(self.graph.dim, 1.)?;
        self.out.open(Section::Conv)?;
        self.out.diagonal(self.graph.dim, 1.)?;
        self.out.end()
    }
}

/// Equal cut: max-cut plus the balance row `n+1`, with a unit coefficient
/// per vertex, linear term `-n` and a link `(n+1, 1, -1)`.
#[derive(Debug)]
pub struct EqualCut<W> {
    graph: Header,
    out: SectionWriter<W>,
}

impl<W: Write> Emitter for EqualCut<W> {
    fn format(&self) -> Format {
        Format::EqualCut
    }
    fn begin(&mut self) -> io::Result<()> {
        let rows = self.format().row_count(self.graph.dim, self.graph.nnz);
        self.out.rows(rows)?;
        self.out.open(Section::Pobjm)
    }
    fn row(&mut self, row: &SparseRow) -> io::Result<()> {
        objective_row(&mut self.out, row)
    }
    fn end(&mut self) -> io::Result<()> {
        let n = self.graph.dim;
        self.out.open(Section::Pobjv)?;
        self.out.entry(1, -(n as f64))?;
        self.out.open(Section::Conm)?;
        self.out.diagonal(n, 1.)?;
        for i in 1..=n {
            self.out.coeff(n + 1, i, 1.)?;
        }
        self.out.open(Section::Conv)?;
        self.out.coeff(n + 1, 1, -1.)?;
        self.out.end()
    }
}

/// Stable set: every edge `(u, v)` gets its own auxiliary row `a`, from
/// `n+2` to `n+1+m`, with unit coefficients on `u`, `v` and `n+1`.
///
/// The second variant (`linear == true`) adds the objective constant
/// `4n` and a coefficient `(a, 1, -1)` per auxiliary row.
#[derive(Debug)]
pub struct StableSet<W> {
    graph: Header,
    out: SectionWriter<W>,
    linear: bool,
    next_aux: usize,
}

impl<W: Write> StableSet<W> {
    fn new(graph: Header, out: SectionWriter<W>, linear: bool) -> Self {
        Self {
            graph,
            out,
            linear,
            next_aux: graph.dim + 2,
        }
    }

    fn aux_rows(&self) -> std::ops::Range<usize> {
        self.graph.dim + 2..self.next_aux
    }
}

impl<W: Write> Emitter for StableSet<W> {
    fn format(&self) -> Format {
        if self.linear {
            Format::StableSet2
        } else {
            Format::StableSet
        }
    }
    fn begin(&mut self) -> io::Result<()> {
        let n = self.graph.dim;
        let rows = self.format().row_count(n, self.graph.nnz);
        self.out.rows(rows)?;
        self.out.open(Section::Pobjm)?;
        for i in 1..=n {
            self.out.coeff(i, n + 1, -0.5)?;
        }
        self.out.open(Section::Pobjv)?;
        if self.linear {
            self.out.entry(1, 4. * n as f64)?;
        }
        self.out.open(Section::Conm)?;
        self.out.diagonal(n + 1, 1.)
    }
    fn row(&mut self, row: &SparseRow) -> io::Result<()> {
        let hub = self.graph.dim + 1;
        for &(col, _) in &row.entries {
            let aux = self.next_aux;
            self.out.coeff(aux, row.row, 1.)?;
            self.out.coeff(aux, col, 1.)?;
            self.out.coeff(aux, hub, 1.)?;
            self.next_aux += 1;
        }
        Ok(())
    }
    fn end(&mut self) -> io::Result<()> {
        self.out.open(Section::Conv)?;
        if self.linear {
            for aux in self.aux_rows() {
                self.out.coeff(aux, 1, -1.)?;
            }
        }
        self.out.end()
    }
}
