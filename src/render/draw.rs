use std::ops::Range;
use std::sync::Once;

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::{FontStyle, Palette, Palette99};

use crate::chart::{Chart, ChartBody, DrawStyle, PieData, Series, TimeSeriesData};
use crate::format::{format_timestamp, F64Formatter};

/// Sizes (in backend units, that is pixels or characters) used to lay out a
/// chart on a surface.
pub(crate) struct Layout {
    pub margin: u32,
    pub caption_size: u32,
    pub label_size: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub x_labels: usize,
    pub y_labels: usize,
    pub tick_size: u32,
    pub marker_size: u32,
    pub stroke_width: u32,
    pub legend_key: i32,
    pub mesh: bool,
    /// Radius of pies, relative to the smallest side of the plotting area
    pub pie_radius: f64,
    /// Slices are listed next to the pie instead of labelled around it
    pub pie_legend: bool,
}

pub(crate) const RASTER_LAYOUT: Layout = Layout {
    margin: 20,
    caption_size: 30,
    label_size: 15,
    x_label_area: 40,
    y_label_area: 80,
    x_labels: 10,
    y_labels: 10,
    tick_size: 5,
    marker_size: 3,
    stroke_width: 2,
    legend_key: 20,
    mesh: true,
    pie_radius: 0.35,
    pie_legend: false,
};

pub(crate) const TEXT_LAYOUT: Layout = Layout {
    margin: 1,
    caption_size: 1,
    label_size: 1,
    x_label_area: 2,
    y_label_area: 10,
    x_labels: 5,
    y_labels: 8,
    tick_size: 1,
    marker_size: 0,
    stroke_width: 1,
    legend_key: 3,
    mesh: false,
    pie_radius: 0.4,
    pie_legend: true,
};

/// Color for palette entry `index`.  Same index, same color, everywhere.
pub(crate) fn palette_rgb(index: usize) -> (u8, u8, u8) {
    Palette99::COLORS[index % Palette99::COLORS.len()]
}

fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = palette_rgb(index);
    RGBColor(r, g, b)
}

static INIT_FONTS: Once = Once::new();

// ab_glyph does not know about system fonts, so we carry our own.  Layout is
// computed with it on every surface, text grids included.
fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            error!("Bundled font could not be loaded; charts will have no text");
        }
    });
}

/// Draws `chart` on `root`, whatever the surface behind it is.
pub(crate) fn draw_chart<DB: DrawingBackend>(
    chart: &Chart,
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    ensure_fonts_registered();
    root.fill(&WHITE)?;
    match chart.body() {
        ChartBody::TimeSeries(data) => draw_time_series(chart.title(), data, root, layout),
        ChartBody::Pie(data) => draw_pie(chart.title(), data, root, layout),
    }
}

fn draw_time_series<DB: DrawingBackend>(
    title: &str,
    data: &TimeSeriesData,
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let x_range = padded(bounds(&data.series, |p| p.0), data.time_axis);
    let y_range = padded(bounds(&data.series, |p| p.1), false);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(layout.margin)
        .caption(title, (FontFamily::SansSerif, layout.caption_size))
        .x_label_area_size(layout.x_label_area)
        .y_label_area_size(layout.y_label_area);
    if data.mirror_ticks {
        builder.top_x_label_area_size(layout.x_label_area / 2);
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range.clone())?;

    let time_axis = data.time_axis;
    let x_fmt = move |x: &f64| {
        if time_axis {
            format_timestamp(*x)
        } else {
            format!("{}", x)
        }
    };
    let y_formatter = F64Formatter::new_with_range(y_range);
    let y_fmt = |y: &f64| y_formatter.format(*y);
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(data.x_label.as_str())
            .y_desc(data.y_label.as_str())
            .x_labels(layout.x_labels)
            .y_labels(layout.y_labels)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .set_all_tick_mark_size(layout.tick_size)
            .label_style((FontFamily::SansSerif, layout.label_size))
            .axis_desc_style((FontFamily::SansSerif, layout.label_size));
        if !layout.mesh {
            mesh.disable_mesh();
        }
        mesh.draw()?;
    }

    for series in data.series.iter() {
        let style = ShapeStyle {
            color: palette_color(series.style.palette).to_rgba(),
            filled: false,
            stroke_width: layout.stroke_width,
        };
        let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.x(), p.y())).collect();
        let key = layout.legend_key;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + key, y)], style));
        if series.style.draw == DrawStyle::LinesPoints && layout.marker_size > 0 {
            chart.draw_series(
                points
                    .iter()
                    .map(|p| Circle::new(*p, layout.marker_size, style.filled())),
            )?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .label_font((FontFamily::SansSerif, layout.label_size))
        .draw()?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    title: &str,
    data: &PieData,
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let area = root
        .margin(layout.margin, layout.margin, layout.margin, layout.margin)
        .titled(title, (FontFamily::SansSerif, layout.caption_size))?;
    let (width, height) = area.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let total: f64 = data.buckets.iter().map(|b| b.value).sum();
    if data.buckets.is_empty() || total <= 0.0 {
        area.draw(&Text::new(
            "No data",
            center,
            (FontFamily::SansSerif, layout.label_size),
        ))?;
        return Ok(());
    }
    let texts: Vec<String> = data
        .buckets
        .iter()
        .map(|b| format!("{} ({})", b.label, (data.value_format)(b.value)))
        .collect();
    let sizes: Vec<f64> = data.buckets.iter().map(|b| b.value).collect();
    let colors: Vec<RGBColor> = (0..data.buckets.len()).map(palette_color).collect();
    if !layout.pie_legend {
        let radius = f64::from(width.min(height)) * layout.pie_radius;
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &texts);
        pie.donut_hole(radius * data.donut_hole);
        pie.label_style((FontFamily::SansSerif, layout.label_size));
        area.draw(&pie)?;
        return Ok(());
    }

    // Labels around small pies end up on top of each other
    let (pie_area, legend_area) = area.split_horizontally(width / 2);
    let (width, height) = pie_area.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * layout.pie_radius;
    let blanks = vec![String::new(); texts.len()];
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &blanks);
    pie.donut_hole(radius * data.donut_hole);
    pie_area.draw(&pie)?;
    let row_height = layout.label_size as i32;
    for (row, (text, color)) in (0..).zip(texts.iter().zip(colors.iter())) {
        let y = row * row_height;
        legend_area.draw(&Rectangle::new(
            [(0, y), (layout.legend_key - 2, y + row_height - 1)],
            color.filled(),
        ))?;
        legend_area.draw(&Text::new(
            text.as_str(),
            (layout.legend_key, y),
            (FontFamily::SansSerif, layout.label_size),
        ))?;
    }
    Ok(())
}

fn bounds<F>(series: &[Series], coordinate: F) -> Range<f64>
where
    F: Fn((f64, f64)) -> f64,
{
    let mut values = series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| coordinate((p.x(), p.y())))
        .filter(|v| v.is_finite());
    match values.next() {
        Some(first) => values.fold(first..first, |r, v| r.start.min(v)..r.end.max(v)),
        None => 0.0..1.0,
    }
}

// Leaves some room around the data, and some room at all when every value is
// the same.
fn padded(range: Range<f64>, time_axis: bool) -> Range<f64> {
    let width = range.end - range.start;
    if width == 0.0 {
        let delta = if time_axis { 86400.0 } else { 1.0f64.max(range.start.abs() / 10.0) };
        return (range.start - delta)..(range.end + delta);
    }
    let pad = width * 0.05;
    (range.start - pad)..(range.end + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{time_chart, TimeChartOptions};
    use crate::stats::Point;
    use float_eq::assert_float_eq;

    #[test]
    fn bounds_of_all_series() {
        let points = vec![
            Point::new(10.0, 3.0),
            Point::new(20.0, -1.0),
            Point::new(30.0, 8.0),
        ];
        let chart = time_chart("t", "x", "y", &points, TimeChartOptions::default());
        let series = match chart.body() {
            ChartBody::TimeSeries(data) => &data.series,
            _ => panic!("Not a time chart"),
        };
        let x = bounds(series, |p| p.0);
        assert_float_eq!(x.start, 10.0, rmax <= f64::EPSILON);
        assert_float_eq!(x.end, 30.0, rmax <= f64::EPSILON);
        let y = bounds(series, |p| p.1);
        assert_float_eq!(y.start, -1.0, rmax <= f64::EPSILON);
        assert_float_eq!(y.end, 8.0, rmax <= f64::EPSILON);
    }

    #[test]
    fn bounds_without_points() {
        let y = bounds(&[], |p| p.1);
        assert_float_eq!(y.start, 0.0, rmax <= f64::EPSILON);
        assert_float_eq!(y.end, 1.0, rmax <= f64::EPSILON);
    }

    #[test]
    fn padding() {
        let r = padded(0.0..100.0, false);
        assert_float_eq!(r.start, -5.0, abs <= 1e-9);
        assert_float_eq!(r.end, 105.0, abs <= 1e-9);
        let r = padded(50.0..50.0, false);
        assert_float_eq!(r.start, 45.0, abs <= 1e-9);
        assert_float_eq!(r.end, 55.0, abs <= 1e-9);
        let r = padded(86400.0..86400.0, true);
        assert_float_eq!(r.start, 0.0, abs <= 1e-9);
        assert_float_eq!(r.end, 172800.0, abs <= 1e-9);
    }

    #[test]
    fn palette_is_stable() {
        assert_eq!(palette_rgb(4), palette_rgb(4));
        assert_ne!(palette_rgb(1), palette_rgb(6));
        assert_eq!(palette_rgb(0), palette_rgb(Palette99::COLORS.len()));
    }
}
