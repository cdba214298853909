use clap::{self, Arg, Command};

use tablecharts::read::Granularity;
use tablecharts::render::parse_targets;

fn add_input(app: Command<'static>) -> Command<'static> {
    app.arg(
        Arg::new("input")
            .help("Input files")
            .default_value("-")
            .multiple_values(true)
            .long_help(
                "If not present or a single dash, standard input will be used.  In growth \
                 mode every file holds the rows of one table (named after the file), one \
                 timestamp per line optionally followed by a weight.  Otherwise lines are \
                 expected to be `<table> <size in bytes>`.",
            ),
    )
}

fn add_outputs(app: Command<'static>) -> Command<'static> {
    app.arg(
        Arg::new("output")
            .long("output")
            .short('o')
            .help("Comma separated list of outputs (TERM, PNG)")
            .long_help("PNG images are written to the `data` directory, named after the charts")
            .default_value("term")
            .validator(|s| parse_targets(s).map(|_| ()))
            .takes_value(true),
    )
}

fn add_growth_options(app: Command<'static>) -> Command<'static> {
    app.arg(
        Arg::new("growth")
            .long("growth")
            .help("Chart growth of tables over time, instead of table sizes"),
    )
    .arg(
        Arg::new("no-trendline")
            .long("no-trendline")
            .help("Do not draw a linear regression of the data"),
    )
    .arg(
        Arg::new("extrapolation")
            .long("extrapolation")
            .help("Continue the trend line beyond the last point"),
    )
    .arg(
        Arg::new("no-moving-average")
            .long("no-moving-average")
            .help("Do not draw a moving average of the data"),
    )
    .arg(
        Arg::new("group-by")
            .long("group-by")
            .short('g')
            .help("Group rows by DAY, WEEK, MONTH or YEAR")
            .default_value("DAY")
            .validator(|s| s.parse::<Granularity>().map(|_| ()))
            .takes_value(true),
    )
    .arg(
        Arg::new("since")
            .long("since")
            .help("Ignore rows before this date (YYYY-MM-DD, or a duration like '30days')")
            .takes_value(true),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("Ignore rows after this date (YYYY-MM-DD, or a duration like '1week')")
            .takes_value(true),
    )
}

fn add_size_options(app: Command<'static>) -> Command<'static> {
    app.arg(
        Arg::new("cutoff")
            .long("cutoff")
            .help("Show this many tables in the pie chart, merging the rest")
            .default_value("20")
            .validator(|s| s.parse::<usize>())
            .takes_value(true),
    )
    .arg(
        Arg::new("title")
            .long("title")
            .short('t')
            .help("Title of the pie chart")
            .default_value("Table sizes")
            .takes_value(true),
    )
}

pub fn get_app() -> Command<'static> {
    let app = Command::new("tablecharts")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .max_term_width(100)
        .arg(
            Arg::new("color")
                .short('c')
                .long("color")
                .help("Use colors in the output")
                .possible_values(["auto", "no", "yes"])
                .default_value("auto")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Be more verbose")
                .takes_value(false),
        )
        .arg(
            Arg::new("tables")
                .long("tables")
                .help("Comma separated list of tables to chart (all by default)")
                .takes_value(true),
        )
        .arg(
            Arg::new("ignore-tables")
                .long("ignore-tables")
                .help("Comma separated list of tables not to chart")
                .takes_value(true),
        );
    add_input(add_size_options(add_growth_options(add_outputs(app))))
}
