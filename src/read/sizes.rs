use std::collections::HashMap;
use std::io::BufRead;

use regex::Regex;

use crate::error::ChartError;
use crate::read::open_file;

// The label is anything before the last field, so it may contain spaces.
const SIZE_LINE: &str = r"^\s*(?P<label>\S.*?)\s+(?P<value>\S+)\s*$";

/// Reads `<label> <value>` lines.  Lines that do not follow that shape, or
/// whose value is not a finite non negative number, are skipped.
pub fn read_sizes(path: &str) -> Result<Vec<(String, f64)>, ChartError> {
    let regex = Regex::new(SIZE_LINE).map_err(|e| ChartError::Input(e.to_string()))?;
    let mut vec = Vec::new();
    for line in open_file(path)?.lines() {
        match line {
            Ok(as_string) => {
                if let Some(pair) = parse_line(&regex, &as_string) {
                    vec.push(pair);
                }
            }
            Err(error) => error!("{}", error),
        }
    }
    Ok(vec)
}

fn parse_line(regex: &Regex, line: &str) -> Option<(String, f64)> {
    let cap = match regex.captures(line) {
        Some(cap) => cap,
        None => {
            debug!("Regex does not match '{}'", line);
            return None;
        }
    };
    let label = cap.name("label")?.as_str();
    let value = cap.name("value")?.as_str();
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some((label.to_string(), n)),
        Ok(n) => {
            debug!("Ignoring size {} of '{}'", n, label);
            None
        }
        Err(parse_error) => {
            debug!("Cannot parse float ({}) at '{}'", parse_error, line);
            None
        }
    }
}

/// Adds up the values of repeated labels.  Labels keep the order in which
/// they were first seen.
pub fn sum_by_label<I>(pairs: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut vec: Vec<(String, f64)> = Vec::new();
    for (label, value) in pairs {
        match index.get(&label) {
            Some(&i) => vec[i].1 += value,
            None => {
                index.insert(label.clone(), vec.len());
                vec.push((label, value));
            }
        }
    }
    vec
}
