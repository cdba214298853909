pub use self::pie::{aggregate, PieBucket, OTHER_LABEL};

mod pie;

use crate::error::ChartError;
use crate::format::format_bytes;
use crate::stats::{self, Point};

/// Window used for the moving average of series with enough points.
pub const MOVING_AVERAGE_WINDOW: usize = 5;
/// Size of the hole in the middle of pie charts, relative to the radius.
pub const DONUT_HOLE: f64 = 0.3;

const RAW_STYLE: usize = 4;
const MOVING_AVERAGE_STYLE: usize = 1;
const TREND_STYLE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    TimeSeries,
    Pie,
}

impl ChartKind {
    fn suffix(self) -> &'static str {
        match self {
            ChartKind::TimeSeries => " time chart",
            ChartKind::Pie => " pie chart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    /// Points joined by lines
    LinesPoints,
    /// Just lines
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a series should look like.  `palette` is an index in a fixed palette
/// of the drawing surface, so the same index always renders the same way.
pub struct SeriesStyle {
    pub palette: usize,
    pub draw: DrawStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
    pub style: SeriesStyle,
}

impl Series {
    fn new(label: &str, points: Vec<Point>, palette: usize, draw: DrawStyle) -> Series {
        Series {
            label: label.to_string(),
            points,
            style: SeriesStyle { palette, draw },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesData {
    pub x_label: String,
    pub y_label: String,
    /// Series in drawing (and legend) order
    pub series: Vec<Series>,
    /// X values are seconds since the unix epoch
    pub time_axis: bool,
    /// Tick labels are repeated on the opposite side of the plot
    pub mirror_ticks: bool,
}

#[derive(Debug, Clone)]
pub struct PieData {
    pub buckets: Vec<PieBucket>,
    pub donut_hole: f64,
    /// How values are labelled when displayed
    pub value_format: fn(f64) -> String,
}

// Function pointers have no reliable identity, so the formatter is left out.
impl PartialEq for PieData {
    fn eq(&self, other: &Self) -> bool {
        self.buckets == other.buckets && self.donut_hole == other.donut_hole
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    TimeSeries(TimeSeriesData),
    Pie(PieData),
}

impl ChartBody {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartBody::TimeSeries(_) => ChartKind::TimeSeries,
            ChartBody::Pie(_) => ChartKind::Pie,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A chart ready to be handed to any writer.
///
/// It has no knowledge of how (or where) it will be drawn.
pub struct Chart {
    title: String,
    name: String,
    body: ChartBody,
}

impl Chart {
    fn new(title: &str, body: ChartBody) -> Chart {
        Chart {
            title: title.to_string(),
            name: derived_name(title, body.kind()),
            body,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.body.kind()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Filesystem safe identifier of the chart, derived from title and kind.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &ChartBody {
        &self.body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Derived series to add to a time chart.
pub struct TimeChartOptions {
    pub trend: bool,
    pub moving_average: bool,
    /// Continue the trend line beyond the last point.
    pub extrapolation: bool,
}

impl Default for TimeChartOptions {
    fn default() -> Self {
        TimeChartOptions {
            trend: true,
            moving_average: true,
            extrapolation: false,
        }
    }
}

/// Builds a time series chart from `points` (that should be sorted by x).
///
/// The raw data is always there.  Depending on `options`, a moving average
/// and a linear regression (computed on the raw data) are added.  Series with
/// less than 2 points get no regression.
pub fn time_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[Point],
    options: TimeChartOptions,
) -> Chart {
    let mut series = vec![Series::new(
        y_label,
        points.to_vec(),
        RAW_STYLE,
        DrawStyle::LinesPoints,
    )];
    if options.moving_average && !points.is_empty() {
        let window = moving_average_window(points.len());
        match stats::moving_average(points, window) {
            Ok(average) => series.push(Series::new(
                "Moving Average",
                average,
                MOVING_AVERAGE_STYLE,
                DrawStyle::Lines,
            )),
            Err(err) => warn!("No moving average for '{}': {}", title, err),
        }
    }
    if options.trend {
        match trend_points(points, options.extrapolation) {
            Ok(trend) => series.push(Series::new(
                "Linear Regression",
                trend,
                TREND_STYLE,
                DrawStyle::Lines,
            )),
            Err(err) => warn!("No linear regression for '{}': {}", title, err),
        }
    }
    debug!(
        "Time chart '{}' built with {} points and {} series",
        title,
        points.len(),
        series.len()
    );
    Chart::new(
        title,
        ChartBody::TimeSeries(TimeSeriesData {
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series,
            time_axis: true,
            mirror_ticks: true,
        }),
    )
}

/// Builds a donut chart with the `cutoff` biggest values and an "Other"
/// slice for the rest.  Values are displayed as byte sizes.
pub fn pie_chart(title: &str, labels: &[String], values: &[f64], cutoff: usize) -> Chart {
    let buckets = aggregate(labels, values, cutoff);
    debug!(
        "Pie chart '{}' built with {} buckets out of {} values",
        title,
        buckets.len(),
        values.len()
    );
    Chart::new(
        title,
        ChartBody::Pie(PieData {
            buckets,
            donut_hole: DONUT_HOLE,
            value_format: format_bytes,
        }),
    )
}

fn moving_average_window(len: usize) -> usize {
    if len < MOVING_AVERAGE_WINDOW {
        1.max(len / 5)
    } else {
        MOVING_AVERAGE_WINDOW
    }
}

fn trend_points(points: &[Point], extrapolation: bool) -> Result<Vec<Point>, ChartError> {
    let mut trend = stats::trendline(points)?;
    if extrapolation {
        trend.extend(stats::extrapolate(points, 1.max(points.len() / 4))?);
    }
    Ok(trend)
}

/// Turns `title` plus the suffix of `kind` into something usable as a file
/// name: lowercase ASCII alphanumerics, with any other run of chars replaced
/// by a dash, and a hash of the unmodified string at the end (so that titles
/// only differing in case or punctuation do not clash).
pub fn derived_name(title: &str, kind: ChartKind) -> String {
    let full = format!("{}{}", title, kind.suffix());
    let mut name = String::with_capacity(full.len() + 9);
    for c in full.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('-') {
            name.push('-');
        }
    }
    if !name.ends_with('-') {
        name.push('-');
    }
    name.push_str(&format!("{:08x}", fnv1a(full.as_bytes())));
    name
}

// 32 bits FNV-1a, stable across platforms and releases
fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(0x0100_0193)
    })
}
