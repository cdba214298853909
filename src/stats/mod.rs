use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq)]
/// A single sample of a series.
///
/// `x` is usually a time ordinal (seconds since the unix epoch).  Transforms
/// in this module never look at `x` for ordering purposes: the position of the
/// point in its slice is what counts, so callers are expected to provide
/// points sorted by `x`.
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Returns `(a, b)` so that `y = a * i + b` minimizes the squared distance to
/// the points, being `i` the 1-based rank of every point in the slice.
///
/// Fails with `InsufficientData` for less than 2 points, as no line can be
/// fitted through them.
pub fn linear_regression(points: &[Point]) -> Result<(f64, f64), ChartError> {
    if points.len() < 2 {
        return Err(ChartError::InsufficientData {
            needed: 2,
            got: points.len(),
        });
    }
    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (rank, point) in (1_u32..).zip(points.iter()) {
        let i = f64::from(rank);
        sx += i;
        sy += point.y;
        sxx += i * i;
        sxy += i * point.y;
    }
    let det = n * sxx - sx * sx;
    let a = (n * sxy - sx * sy) / det;
    let b = (sxx * sy - sx * sxy) / det;
    Ok((a, b))
}

/// Evaluates the regression line of `points` at the rank of every one of
/// them, keeping the original x values.
pub fn trendline(points: &[Point]) -> Result<Vec<Point>, ChartError> {
    let (a, b) = linear_regression(points)?;
    Ok((1_u32..)
        .zip(points.iter())
        .map(|(rank, p)| Point::new(p.x, a * f64::from(rank) + b))
        .collect())
}

/// Continues the regression line of `points` for `extra` more ranks.
///
/// The x value of every new point advances by the average x step of the
/// input.
pub fn extrapolate(points: &[Point], extra: usize) -> Result<Vec<Point>, ChartError> {
    let (a, b) = linear_regression(points)?;
    let n = points.len();
    let first = points[0].x;
    let last = points[n - 1].x;
    let step = (last - first) / (n - 1) as f64;
    Ok((1..=extra)
        .map(|k| {
            let rank = (n + k) as f64;
            Point::new(last + step * k as f64, a * rank + b)
        })
        .collect())
}

/// Smooths `points` averaging every run of `window` consecutive points.
///
/// A window bigger than the input is reduced to the input length (yielding a
/// single global average).  The output has `len - window + 1` points; the x
/// of the first one is moved to the x of the first input point, and the x of
/// the last one to the x of the last input point, so that the curve spans the
/// same domain as the input.  Interior points keep their averaged x.
pub fn moving_average(points: &[Point], window: usize) -> Result<Vec<Point>, ChartError> {
    if window < 1 {
        return Err(ChartError::InvalidWindow(window));
    }
    let n = points.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let window = window.min(n);
    let div = window as f64;
    let mut result = Vec::with_capacity(n - window + 1);
    for i in window..=n {
        let (sum_x, sum_y) = points[i - window..i]
            .iter()
            .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
        let x = if i == window {
            points[0].x
        } else if i == n {
            points[n - 1].x
        } else {
            sum_x / div
        };
        result.push(Point::new(x, sum_y / div));
    }
    Ok(result)
}
