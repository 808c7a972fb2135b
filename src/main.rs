//! # g2sdp
//!
//! Convert a graph file into SDP problem files.
//!
//! `g2sdp G11 -ebm` writes `ecutG11.sdp`, `boxG11.sdp` and `maxG11.sdp`.
//! Without a selection, all five problems are generated.

use clap::Parser;
use graph_sdp::{Config, Error, FormatSet, convert_file, init_debug_log, init_default_log};
use log::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The graph file (`dim nnz` then `row col weight` lines), possibly gzipped
    graph: PathBuf,
    /// Problems to generate: m (max-cut), b (box-qp), e (equal-cut),
    /// s (stable set), S (stable set, second form); or a comma-separated
    /// list of names. Everything if absent
    #[arg(allow_hyphen_values = true)]
    selection: Option<String>,
    /// Directory where the problem files are written
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Log every row
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<bool, Error> {
    let formats: FormatSet = match &args.selection {
        Some(s) => s.parse()?,
        None => FormatSet::empty(),
    };
    let config = Config::new(formats).with_output_dir(args.output_dir);
    let summary = convert_file(&args.graph, &config)?;
    for outcome in &summary.outcomes {
        match (&outcome.path, &outcome.error) {
            (Some(path), None) => info!("{}: {}", outcome.format, path.display()),
            (_, Some(e)) => error!("{}: {}", outcome.format, e),
            (None, None) => {}
        }
    }
    info!(
        "{} rows converted, longest row has {} entries",
        summary.rows, summary.longest_row
    );
    Ok(summary.is_ok())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        init_debug_log()
    } else {
        init_default_log()
    }
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
