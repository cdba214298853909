pub use self::dateparser::{parse_since, parse_timestamp, parse_to};
pub use self::growth::{Granularity, GrowthReader, GrowthReaderBuilder};
pub use self::sizes::{read_sizes, sum_by_label};

mod dateparser;
mod growth;
mod sizes;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::error::ChartError;
use crate::stats::Point;

/// Return io::BufRead from a path, falling back to using stdin if path is "-".
fn open_file(path: &str) -> Result<Box<dyn io::BufRead>, ChartError> {
    match path {
        "-" => Ok(Box::new(BufReader::new(io::stdin()))),
        _ => match File::open(path) {
            Ok(fd) => Ok(Box::new(io::BufReader::new(fd))),
            Err(error) => Err(ChartError::io(path, error)),
        },
    }
}

/// Name of the table whose data is in `path`: the file name without
/// extension, or "stdin".
pub fn table_name(path: &str) -> String {
    if path == "-" {
        return "stdin".to_string();
    }
    match Path::new(path).file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => path.to_string(),
    }
}

/// Tables to chart: those in `include` (every table if empty) minus those in
/// `exclude`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TableFilter {
    /// Builds a filter out of comma separated lists of table names.
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> TableFilter {
        TableFilter {
            include: split_list(include),
            exclude: split_list(exclude),
        }
    }

    pub fn accepts(&self, table: &str) -> bool {
        (self.include.is_empty() || self.include.iter().any(|t| t == table))
            && !self.exclude.iter().any(|t| t == table)
    }
}

fn split_list(list: Option<&str>) -> Vec<String> {
    list.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Where the numbers to chart come from.
pub trait DataSource {
    /// Growth of every table over time, as cumulative points sorted by x.
    fn growth(&self) -> Result<Vec<(String, Vec<Point>)>, ChartError>;
    /// Current size of every table.
    fn sizes(&self) -> Result<Vec<(String, f64)>, ChartError>;
}

/// Data read from files (or stdin).  In growth mode every file holds the
/// rows of one table; in size mode every file holds `<table> <size>` lines.
#[derive(Debug)]
pub struct FileSource {
    paths: Vec<String>,
    reader: GrowthReader,
    filter: TableFilter,
}

impl FileSource {
    pub fn new(paths: Vec<String>, reader: GrowthReader, filter: TableFilter) -> FileSource {
        FileSource {
            paths,
            reader,
            filter,
        }
    }
}

impl DataSource for FileSource {
    fn growth(&self) -> Result<Vec<(String, Vec<Point>)>, ChartError> {
        let mut vec = Vec::new();
        for path in self.paths.iter() {
            let table = table_name(path);
            if !self.filter.accepts(&table) {
                debug!("Skipping table '{}'", table);
                continue;
            }
            let points = self.reader.read(path)?;
            debug!("Read {} points of table '{}' from {}", points.len(), table, path);
            vec.push((table, points));
        }
        Ok(vec)
    }

    fn sizes(&self) -> Result<Vec<(String, f64)>, ChartError> {
        let mut all = Vec::new();
        for path in self.paths.iter() {
            all.extend(read_sizes(path)?);
        }
        Ok(sum_by_label(all)
            .into_iter()
            .filter(|(table, _)| self.filter.accepts(table))
            .collect())
    }
}
