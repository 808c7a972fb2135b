//! Grouping the edge stream into sorted sparse rows.
//!
//! The edges of a graph file are grouped by row: all the edges of row `i`
//! come before the edges of row `j > i`, but the columns inside a row
//! can come in any order. The aggregator collects one row at a time and
//! hands it over sorted by column.

use crate::error::{Error, Result};
use crate::reader::Edge;

/// The entries `(col, weight)` of one row of the weight matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    pub row: usize,
    pub entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable sort of the entries by column.
    /// Entries with the same column keep their input order.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|&(col, _)| col)
    }

    /// Iterate on the triples `(row, col, weight)`.
    pub fn coeffs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.entries.iter().map(move |&(col, w)| (self.row, col, w))
    }

    fn push(&mut self, col: usize, weight: f64) -> Result<()> {
        self.entries
            .try_reserve(1)
            .map_err(|_| Error::Allocation(self.entries.len() + 1))?;
        self.entries.push((col, weight));
        Ok(())
    }
}

/// One-pass grouping of edges into rows.
///
/// Two buffers are used alternately, so that no memory is allocated once
/// the longest row has been seen.
#[derive(Debug, Clone)]
pub struct RowAggregator {
    current: SparseRow,
    ready: SparseRow,
    dispatched: usize,
    longest: usize,
}

impl Default for RowAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl RowAggregator {
    pub fn new() -> Self {
        Self {
            current: SparseRow::new(1),
            ready: SparseRow::new(1),
            dispatched: 0,
            longest: 0,
        }
    }

    /// Index of the row being collected.
    pub fn current_row(&self) -> usize {
        self.current.row
    }

    /// Number of rows handed over so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Length of the longest row handed over so far.
    pub fn longest(&self) -> usize {
        self.longest
    }

    /// Add the edge read at line `line`.
    ///
    /// Returns the previous row, sorted, when `edge` starts a new row.
    /// A row index smaller than the current one is an error.
    pub fn push(&mut self, edge: Edge, line: usize) -> Result<Option<&SparseRow>> {
        if edge.row < self.current.row {
            return Err(Error::malformed(
                line,
                format!(
                    "row {} comes after row {}: rows must be non-decreasing",
                    edge.row, self.current.row
                ),
            ));
        }
        if edge.row == self.current.row {
            self.current.push(edge.col, edge.weight)?;
            return Ok(None);
        }
        std::mem::swap(&mut self.current, &mut self.ready);
        self.current.entries.clear();
        self.current.row = edge.row;
        self.current.push(edge.col, edge.weight)?;
        Ok(self.seal())
    }

    /// Hand over the last row, if it has any entry.
    pub fn finish(&mut self) -> Option<&SparseRow> {
        std::mem::swap(&mut self.current, &mut self.ready);
        self.current.entries.clear();
        self.seal()
    }

    fn seal(&mut self) -> Option<&SparseRow> {
        if self.ready.is_empty() {
            return None;
        }
        self.ready.sort();
        self.dispatched += 1;
        self.longest = self.longest.max(self.ready.len());
        Some(&self.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(row: usize, col: usize, weight: f64) -> Edge {
        Edge { row, col, weight }
    }

    fn collect(edges: &[Edge]) -> Result<Vec<SparseRow>> {
        let mut agg = RowAggregator::new();
        let mut rows = Vec::new();
        for (i, &e) in edges.iter().enumerate() {
            if let Some(row) = agg.push(e, i + 2)? {
                rows.push(row.clone());
            }
        }
        if let Some(row) = agg.finish() {
            rows.push(row.clone())
        }
        assert_eq!(agg.dispatched(), rows.len());
        Ok(rows)
    }

    #[test]
    fn sort_is_stable() {
        let mut row = SparseRow {
            row: 1,
            entries: vec![(3, 1.), (2, 2.), (3, 3.), (1, 4.), (2, 5.)],
        };
        row.sort();
        assert_eq!(
            row.entries,
            vec![(1, 4.), (2, 2.), (2, 5.), (3, 1.), (3, 3.)]
        );
    }

    #[test]
    fn groups_rows() {
        let rows = collect(&[
            edge(1, 3, 1.),
            edge(1, 2, 2.),
            edge(3, 4, 3.),
            edge(3, 1, 4.),
            edge(3, 2, 5.),
            edge(4, 1, 6.),
        ])
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].entries, vec![(2, 2.), (3, 1.)]);
        assert_eq!(rows[1].row, 3);
        assert_eq!(rows[1].entries, vec![(1, 4.), (2, 5.), (4, 3.)]);
        assert_eq!(rows[2].entries, vec![(1, 6.)]);
    }

    #[test]
    fn first_row_after_one() {
        let rows = collect(&[edge(2, 1, 1.), edge(2, 3, 1.)]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 2);
    }

    #[test]
    fn no_edges() {
        assert!(collect(&[]).unwrap().is_empty());
    }

    #[test]
    fn decreasing_row() {
        let err = collect(&[edge(1, 2, 1.), edge(2, 3, 1.), edge(1, 3, 1.)]).unwrap_err();
        match err {
            Error::MalformedInputLine { line, .. } => assert_eq!(line, 4),
            e => panic!("unexpected {}", e),
        }
    }

    #[test]
    fn longest_row() {
        let mut agg = RowAggregator::new();
        for (i, &(r, c)) in [(1, 2), (1, 3), (1, 4), (2, 3)].iter().enumerate() {
            let _ = agg.push(edge(r, c, 1.), i).unwrap();
        }
        let _ = agg.finish();
        assert_eq!(agg.longest(), 3);
        assert_eq!(agg.dispatched(), 2);
    }
}
