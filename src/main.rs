#[macro_use]
extern crate log;

use std::env;

use chrono::Utc;
use clap::ArgMatches;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use yansi::Paint;

use tablecharts::chart::{pie_chart, time_chart, Chart, TimeChartOptions};
use tablecharts::read::{
    parse_since, parse_to, DataSource, FileSource, Granularity, GrowthReaderBuilder, TableFilter,
};
use tablecharts::render::{parse_targets, write_all, writer_for, ChartWriter};
use tablecharts::ChartError;

mod app;

/// Sets up color choices of both output and logs.
fn configure_output(option: &str, verbose: bool) {
    let mut color_choice = ColorChoice::Auto;
    match option {
        "no" => {
            Paint::disable();
            color_choice = ColorChoice::Never;
        }
        "auto" => match env::var("TERM") {
            Ok(value) if value == "dumb" => {
                Paint::disable();
                color_choice = ColorChoice::Never;
            }
            _ => {
                if atty::isnt(atty::Stream::Stdout) {
                    Paint::disable();
                    color_choice = ColorChoice::Never;
                }
            }
        },
        _ => color_choice = ColorChoice::Always,
    };
    if let Err(err) = TermLogger::init(
        if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        ConfigBuilder::new()
            .set_time_level(LevelFilter::Trace)
            .set_thread_level(LevelFilter::Trace)
            .set_target_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Stderr,
        color_choice,
    ) {
        eprintln!("[ERROR] Failed to initialize logger: {}", err);
    };
}

fn get_source(matches: &ArgMatches) -> Result<FileSource, ChartError> {
    let now = Utc::now();
    let since = parse_since(matches.value_of("since"), now);
    let to = parse_to(matches.value_of("to"), now);
    if since > to {
        warn!("Date range is empty: {} is after {}", since, to);
    }
    let reader = GrowthReaderBuilder::default()
        .range(since..=to)
        .granularity(matches.value_of_t::<Granularity>("group-by").unwrap_or_default())
        .build()
        .map_err(|e| ChartError::Input(e.to_string()))?;
    let filter = TableFilter::new(matches.value_of("tables"), matches.value_of("ignore-tables"));
    let paths = match matches.values_of("input") {
        Some(values) => values.map(String::from).collect(),
        None => vec![String::from("-")],
    };
    Ok(FileSource::new(paths, reader, filter))
}

fn growth_charts(source: &dyn DataSource, options: TimeChartOptions) -> Result<Vec<Chart>, ChartError> {
    let mut charts = Vec::new();
    for (table, points) in source.growth()? {
        if points.is_empty() {
            warn!("No rows to chart for table '{}'", table);
            continue;
        }
        charts.push(time_chart(&table, "Date", "Rows", &points, options));
    }
    Ok(charts)
}

fn size_charts(source: &dyn DataSource, title: &str, cutoff: usize) -> Result<Vec<Chart>, ChartError> {
    let (labels, values): (Vec<String>, Vec<f64>) = source.sizes()?.into_iter().unzip();
    if labels.is_empty() {
        return Ok(vec![]);
    }
    Ok(vec![pie_chart(title, &labels, &values, cutoff)])
}

fn run(matches: &ArgMatches) -> Result<(), ChartError> {
    let targets =
        parse_targets(matches.value_of("output").unwrap_or("term")).map_err(ChartError::Input)?;
    let source = get_source(matches)?;
    let charts = if matches.is_present("growth") {
        let options = TimeChartOptions {
            trend: !matches.is_present("no-trendline"),
            moving_average: !matches.is_present("no-moving-average"),
            extrapolation: matches.is_present("extrapolation"),
        };
        growth_charts(&source, options)?
    } else {
        size_charts(
            &source,
            matches.value_of("title").unwrap_or_default(),
            matches.value_of_t("cutoff").unwrap_or(20),
        )?
    };
    if charts.is_empty() {
        warn!("No data to process");
        return Ok(());
    }
    debug!("Writing {} charts to {} outputs", charts.len(), targets.len());
    let mut writers: Vec<Box<dyn ChartWriter>> = targets.into_iter().map(writer_for).collect();
    write_all(&charts, &mut writers)
}

fn main() {
    let matches = app::get_app().get_matches();
    configure_output(
        matches.value_of("color").unwrap_or("auto"),
        matches.is_present("verbose"),
    );
    if let Err(err) = run(&matches) {
        error!("{}", err);
        std::process::exit(1);
    }
}
