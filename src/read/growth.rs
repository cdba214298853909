use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::error::ChartError;
use crate::read::dateparser::parse_timestamp;
use crate::read::open_file;
use crate::stats::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Size of the periods rows are grouped in.
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Day
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAY" => Ok(Granularity::Day),
            "WEEK" => Ok(Granularity::Week),
            "MONTH" => Ok(Granularity::Month),
            "YEAR" => Ok(Granularity::Year),
            _ => Err(format!(
                "unknown grouping '{}' (expected DAY, WEEK, MONTH or YEAR)",
                s.trim()
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Granularity::Day => "DAY",
            Granularity::Week => "WEEK",
            Granularity::Month => "MONTH",
            Granularity::Year => "YEAR",
        };
        write!(f, "{}", name)
    }
}

impl Granularity {
    /// Start of the period `ts` belongs to, in unix seconds.  Weeks start on
    /// Monday.
    pub fn period_start(&self, ts: DateTime<Utc>) -> i64 {
        let date = ts.date_naive();
        let start = match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => date.with_ordinal(1).unwrap_or(date),
        };
        (start - NaiveDate::default()).num_days() * 86_400
    }
}

/// Reads rows of a table (one timestamp per line, optionally followed by a
/// weight) and turns them into the cumulative size of the table over time.
#[derive(Debug, Default, Builder)]
pub struct GrowthReader {
    #[builder(setter(strip_option), default)]
    range: Option<RangeInclusive<DateTime<Utc>>>,
    #[builder(default)]
    granularity: Granularity,
}

impl GrowthReader {
    pub fn read(&self, path: &str) -> Result<Vec<Point>, ChartError> {
        let mut totals: BTreeMap<i64, f64> = BTreeMap::new();
        for line in open_file(path)?.lines() {
            match line {
                Ok(as_string) => {
                    if let Some((ts, weight)) = self.parse_line(&as_string) {
                        *totals
                            .entry(self.granularity.period_start(ts))
                            .or_insert(0.0) += weight;
                    }
                }
                Err(error) => error!("{}", error),
            }
        }
        let mut total = 0.0;
        Ok(totals
            .into_iter()
            .map(|(x, sum)| {
                total += sum;
                Point::new(x as f64, total)
            })
            .collect())
    }

    // A trailing number is a weight, as long as what comes before it is a
    // timestamp on its own.
    fn parse_line(&self, line: &str) -> Option<(DateTime<Utc>, f64)> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let parsed = match line.rsplit_once(char::is_whitespace) {
            Some((head, last)) => match (parse_timestamp(head), last.parse::<f64>()) {
                (Some(ts), Ok(weight)) if weight.is_finite() => Some((ts, weight)),
                _ => parse_timestamp(line).map(|ts| (ts, 1.0)),
            },
            None => parse_timestamp(line).map(|ts| (ts, 1.0)),
        };
        match parsed {
            Some((ts, weight)) => match &self.range {
                Some(range) if !range.contains(&ts) => None,
                _ => Some((ts, weight)),
            },
            None => {
                debug!("Cannot parse a timestamp at '{}'", line);
                None
            }
        }
    }
}
