//! The conversion pass.
//!
//! The graph is read once. Each completed row is sorted and broadcast to
//! every live emitter. An emitter whose stream fails is dropped and
//! reported, while the others carry on. An error in the input aborts the
//! whole conversion.

use crate::emitter::{Emitter, emitter};
use crate::error::{Error, Result};
use crate::format::{Format, FormatSet};
use crate::reader::{self, GraphReader, Header};
use crate::row::RowAggregator;
use log::*;
use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Parameters of a file conversion.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Requested formats. Empty means every format.
    pub formats: FormatSet,
    /// Directory receiving the problem files.
    pub output_dir: PathBuf,
}

impl Config {
    pub fn new(formats: FormatSet) -> Self {
        Self {
            formats,
            output_dir: PathBuf::new(),
        }
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// What happened to one format.
#[derive(Debug)]
pub struct Outcome {
    pub format: Format,
    /// Output file, if the conversion was run on files.
    pub path: Option<PathBuf>,
    /// `None` if the output was completely written.
    pub error: Option<Error>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Statistics and per-format results of a conversion.
#[derive(Debug)]
pub struct Summary {
    pub graph: Header,
    /// Number of rows handed to the emitters.
    pub rows: usize,
    /// Number of entries of the longest row.
    pub longest_row: usize,
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_ok)
    }

    pub fn outcome(&self, format: Format) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.format == format)
    }

    /// Formats whose output failed.
    pub fn failed(&self) -> impl Iterator<Item = Format> + '_ {
        self.outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.format)
    }
}

// An emitter and its state in the pass
struct Slot<'a> {
    emitter: Box<dyn Emitter + 'a>,
    error: Option<io::Error>,
}

impl<'a> Slot<'a> {
    fn live(&self) -> bool {
        self.error.is_none()
    }

    fn apply<F>(&mut self, f: F)
    where
        F: FnOnce(&mut (dyn Emitter + 'a)) -> io::Result<()>,
    {
        if self.live() {
            if let Err(e) = f(self.emitter.as_mut()) {
                error!("Writing {} failed: {}; dropping it", self.emitter.format(), e);
                self.error = Some(e)
            }
        }
    }
}

/// Convert the graph read from `input` into every format of `outputs`,
/// each one written to its own stream.
///
/// `outputs` is built once the header is known, through `open`, which is
/// called with the header and returns the streams to write to.
pub fn convert_with<R, W, F>(input: R, open: F) -> Result<Summary>
where
    R: BufRead,
    W: Write,
    F: FnOnce(Header) -> Vec<(Format, W)>,
{
    let mut reader = GraphReader::new(input)?;
    let graph = reader.header();
    info!("Graph with {} vertices and {} edges", graph.dim, graph.nnz);
    let mut slots: Vec<Slot<'_>> = open(graph)
        .into_iter()
        .map(|(format, w)| Slot {
            emitter: emitter(format, graph, w),
            error: None,
        })
        .collect();

    for slot in &mut slots {
        slot.apply(|e| e.begin());
    }
    let mut rows = RowAggregator::new();
    while let Some(edge) = reader.next_edge()? {
        if let Some(row) = rows.push(edge, reader.line())? {
            trace!("Row {} with {} entries", row.row, row.len());
            for slot in &mut slots {
                slot.apply(|e| e.row(row));
            }
        }
    }
    if let Some(row) = rows.finish() {
        trace!("Row {} with {} entries", row.row, row.len());
        for slot in &mut slots {
            slot.apply(|e| e.row(row));
        }
    }
    for slot in &mut slots {
        slot.apply(|e| e.end());
    }
    debug!(
        "{} rows dispatched, longest row has {} entries",
        rows.dispatched(),
        rows.longest()
    );

    Ok(Summary {
        graph,
        rows: rows.dispatched(),
        longest_row: rows.longest(),
        outcomes: slots
            .into_iter()
            .map(|slot| Outcome {
                format: slot.emitter.format(),
                path: None,
                error: slot.error.map(Error::Io),
            })
            .collect(),
    })
}

/// Convert the graph read from `input` into the selected formats, writing
/// each one to the stream given in `outputs`.
pub fn convert<R: BufRead, W: Write>(input: R, outputs: Vec<(Format, W)>) -> Result<Summary> {
    convert_with(input, |_| outputs)
}

/// Convert the graph file `path` according to `config`.
///
/// The problem files are named after the graph (see
/// [`Format::output_path`]). A format whose file cannot be created is
/// skipped and reported in the summary; a format whose file fails while
/// being written is reported and its incomplete file removed. On an input
/// error, every file created by this call is removed.
pub fn convert_file(path: &Path, config: &Config) -> Result<Summary> {
    let input = reader::open(path)?;
    let name = reader::graph_name(path);
    info!("Converting {}: generating {}", path.display(), config.formats);

    let mut created: Vec<(Format, PathBuf)> = Vec::new();
    let mut failed: Vec<Outcome> = Vec::new();
    let mut outputs = Vec::new();
    for format in config.formats.resolve() {
        let out_path = format.output_path(&config.output_dir, &name);
        match File::create(&out_path) {
            Ok(file) => {
                info!("Writing {}", out_path.display());
                outputs.push((format, BufWriter::new(file)));
                created.push((format, out_path));
            }
            Err(source) => {
                let e = Error::OutputCreate {
                    format,
                    path: out_path.clone(),
                    source,
                };
                error!("{}", e);
                failed.push(Outcome {
                    format,
                    path: Some(out_path),
                    error: Some(e),
                });
            }
        }
    }

    match convert(input, outputs) {
        Ok(mut summary) => {
            for outcome in &mut summary.outcomes {
                outcome.path = created
                    .iter()
                    .find(|(f, _)| *f == outcome.format)
                    .map(|(_, p)| p.clone());
                // A stream that failed while writing left a truncated file
                if let (Some(p), Some(Error::Io(_))) = (&outcome.path, &outcome.error) {
                    match fs::remove_file(p) {
                        Ok(()) => info!("Removed incomplete {}", p.display()),
                        Err(rm) => warn!("Cannot remove {}: {}", p.display(), rm),
                    }
                }
            }
            summary.outcomes.extend(failed);
            summary.outcomes.sort_by_key(|o| o.format);
            Ok(summary)
        }
        Err(e) => {
            for (_, p) in &created {
                if let Err(rm) = fs::remove_file(p) {
                    warn!("Cannot remove {}: {}", p.display(), rm);
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const INPUT: &str = "3 2\n1 2 5\n2 3 -1\n";

    // A stream that fails after `budget` bytes
    struct Failing {
        budget: usize,
    }

    impl Write for Failing {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.budget {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.budget -= buf.len();
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn summary() {
        let outputs = vec![(Format::MaxCut, Vec::new()), (Format::StableSet, Vec::new())];
        let summary = convert(Cursor::new(INPUT), outputs).unwrap();
        assert!(summary.is_ok());
        assert_eq!(summary.graph, Header { dim: 3, nnz: 2 });
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.longest_row, 1);
        assert_eq!(summary.outcomes.len(), 2);
    }

    #[test]
    fn failing_stream_is_isolated() {
        let mut good = Vec::new();
        let outputs: Vec<(Format, Box<dyn Write + '_>)> = vec![
            (Format::MaxCut, Box::new(Failing { budget: 20 })),
            (Format::BoxQp, Box::new(&mut good)),
        ];
        let summary = convert(Cursor::new(INPUT), outputs).unwrap();
        assert!(!summary.is_ok());
        assert_eq!(summary.failed().collect::<Vec<_>>(), vec![Format::MaxCut]);
        assert!(summary.outcome(Format::BoxQp).unwrap().is_ok());
        let text = String::from_utf8(good).unwrap();
        assert!(text.ends_with("ENDATA\n"));
    }

    #[test]
    fn decreasing_rows_abort() {
        let input = "3 3\n2 3 1\n3 1 1\n1 2 1\n";
        match convert(Cursor::new(input), vec![(Format::MaxCut, Vec::new())]) {
            Err(Error::MalformedInputLine { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected {:?}", other.map(|s| s.rows)),
        }
    }

    #[test]
    fn oversized_header_is_rejected() {
        let input = format!("1 {}\n1 1 1\n", usize::MAX);
        match convert(Cursor::new(input), vec![(Format::StableSet, io::sink())]) {
            Err(Error::MalformedInputLine { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected {:?}", other.map(|s| s.rows)),
        }
    }

    #[test]
    fn header_known_before_opening() {
        let summary = convert_with(Cursor::new(INPUT), |graph| {
            assert_eq!(graph.nnz, 2);
            vec![(Format::EqualCut, io::sink())]
        })
        .unwrap();
        assert_eq!(summary.outcomes[0].format, Format::EqualCut);
    }
}
