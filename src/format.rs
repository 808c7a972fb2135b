//! The problem types a graph can be converted to, and the selection of
//! which ones a run produces.

use crate::error::Error;
use std::fmt;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A target SDP relaxation. Each one is written to its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Format {
    MaxCut,
    BoxQp,
    EqualCut,
    StableSet,
    StableSet2,
}

use Format::*;

impl Format {
    /// Every format, in the order the outputs are opened.
    pub const ALL: [Format; 5] = [MaxCut, BoxQp, EqualCut, StableSet, StableSet2];

    /// Letter selecting this format on the command line.
    pub fn letter(self) -> char {
        match self {
            MaxCut => 'm',
            BoxQp => 'b',
            EqualCut => 'e',
            StableSet => 's',
            StableSet2 => 'S',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.letter() == c)
    }

    /// Long tag of the format, as accepted in a comma-separated selection.
    pub fn tag(self) -> &'static str {
        match self {
            MaxCut => "maxcut",
            BoxQp => "boxqp",
            EqualCut => "equalcut",
            StableSet => "stableset",
            StableSet2 => "stableset2",
        }
    }

    /// Prefix prepended to the graph name to build the output file name.
    pub fn file_prefix(self) -> &'static str {
        match self {
            MaxCut => "max",
            BoxQp => "box",
            EqualCut => "ecut",
            StableSet => "stable",
            StableSet2 => "SS",
        }
    }

    /// Number of constraint rows declared in the `ROWS` section.
    pub fn row_count(self, dim: usize, nnz: usize) -> usize {
        match self {
            MaxCut | BoxQp => dim,
            EqualCut => dim + 1,
            StableSet | StableSet2 => dim + 1 + nnz,
        }
    }

    /// Path of the output file for the graph `name` in `dir`.
    pub fn output_path(self, dir: &Path, name: &str) -> PathBuf {
        let mut path = dir.to_path_buf();
        path.push(format!("{}{}.sdp", self.file_prefix(), name));
        path
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaxCut => "Maxcut",
            BoxQp => "Box-qp",
            EqualCut => "Equal-cut",
            StableSet => "Stable-set",
            StableSet2 => "Stable-set2",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidArguments(format!("unknown format `{}`", s)))
    }
}

/// A set of requested formats. An empty set stands for every format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSet {
    bits: u8,
}

impl FormatSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Format::ALL.into_iter().collect()
    }

    fn bit(format: Format) -> u8 {
        1 << format as u8
    }

    pub fn insert(&mut self, format: Format) {
        self.bits |= Self::bit(format)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// True if `format` was explicitly requested.
    pub fn contains(&self, format: Format) -> bool {
        self.bits & Self::bit(format) != 0
    }

    /// The formats a run actually produces: the requested ones, or all
    /// of them if nothing was requested.
    pub fn resolve(self) -> impl Iterator<Item = Format> {
        let set = if self.is_empty() { Self::all() } else { self };
        Format::ALL.into_iter().filter(move |&f| set.contains(f))
    }
}

impl FromIterator<Format> for FormatSet {
    fn from_iter<I: IntoIterator<Item = Format>>(iter: I) -> Self {
        let mut set = Self::empty();
        for format in iter {
            set.insert(format)
        }
        set
    }
}

/// Parse either a letter selection (`mbe`, `-ebms`) or a comma-separated
/// list of long tags (`maxcut,boxqp`).
impl FromStr for FormatSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(',') || Format::ALL.iter().any(|f| f.tag().eq_ignore_ascii_case(s)) {
            return s
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::parse::<Format>)
                .collect();
        }
        let letters = s.strip_prefix('-').unwrap_or(s);
        letters
            .chars()
            .map(|c| {
                Format::from_letter(c).ok_or_else(|| {
                    Error::InvalidArguments(format!("unknown format letter `{}` in `{}`", c, s))
                })
            })
            .collect()
    }
}

impl Display for FormatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for format in self.resolve() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", format)?;
            first = false;
        }
        Ok(())
    }
}
