//!Conversion of weighted graphs into semidefinite programs.
//!
//!A graph file (`dim nnz` followed by `row col weight` lines grouped by
//!row) is read in a single pass and turned into problem files for the
//!SDP relaxations of
//!maximum cut, equal cut, box-constrained quadratic programming and two
//!formulations of the stable set problem.
//!
//!# Example
//!
//!```rust,no_run
//!use graph_sdp::*;
//!use std::path::Path;
//!
//!pub fn main() {
//!    init_default_log();
//!
//!    // Produce maxG11.sdp and boxG11.sdp in the directory "out".
//!    let config = Config::new("mb".parse().unwrap()).with_output_dir("out");
//!    let summary = convert_file(Path::new("G11"), &config).unwrap();
//!    assert!(summary.is_ok());
//!}
//!```
//!

#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_labels
)]

mod convert;
pub use crate::convert::*;

pub mod emitter;
mod error;
pub use crate::error::*;

mod format;
pub use crate::format::*;

pub mod reader;
pub mod row;
pub mod sdp;

use env_logger::Builder;
use log::LevelFilter;

fn init_log(level: LevelFilter) {
    let _ = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

/// Log at level Info to the terminal. `RUST_LOG` takes precedence.
pub fn init_default_log() {
    init_log(LevelFilter::Info)
}

pub fn init_debug_log() {
    init_log(LevelFilter::Trace)
}
