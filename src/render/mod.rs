pub use self::raster::{ImageWriter, DATA_DIR, IMAGE_HEIGHT, IMAGE_WIDTH};
pub use self::term::{render_text, TermWriter, TERM_HEIGHT, TERM_WIDTH};

mod draw;
mod raster;
mod term;

use std::fmt;
use std::str::FromStr;

use crate::chart::Chart;
use crate::error::ChartError;

/// Something charts can be written to.
///
/// Writers keep no state between charts: every call is independent.
pub trait ChartWriter {
    fn write(&mut self, chart: &Chart) -> Result<(), ChartError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Kinds of output supported.
pub enum Target {
    Term,
    Png,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TERM" => Ok(Target::Term),
            "PNG" => Ok(Target::Png),
            _ => Err(format!("unknown output '{}' (expected TERM or PNG)", s.trim())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Term => write!(f, "TERM"),
            Target::Png => write!(f, "PNG"),
        }
    }
}

/// Parses a comma separated list of outputs (case insensitive), ignoring
/// empty items.
pub fn parse_targets(list: &str) -> Result<Vec<Target>, String> {
    list.split(',')
        .filter(|word| !word.trim().is_empty())
        .map(Target::from_str)
        .collect()
}

/// Writer for `target`, with default settings.
pub fn writer_for(target: Target) -> Box<dyn ChartWriter> {
    match target {
        Target::Term => Box::new(TermWriter::stdout()),
        Target::Png => Box::new(ImageWriter::default()),
    }
}

/// Hands every chart to every writer, in order.  Stops at the first failure.
pub fn write_all(charts: &[Chart], writers: &mut [Box<dyn ChartWriter>]) -> Result<(), ChartError> {
    for chart in charts {
        for writer in writers.iter_mut() {
            writer.write(chart)?;
        }
    }
    Ok(())
}
