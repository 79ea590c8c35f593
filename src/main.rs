use clap::{ArgAction, CommandFactory, Parser};
use git_version::git_version;
use hierarchy_viewer::{
    ColumnNames, GraphOptions, Options, Result, ScaleFloor, Table, Template, ViewerError,
    emit::{csv_path, open_viewer, output_base},
    generate,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::level_filters::LevelFilter;

const VERSION: &str = const_str::concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    git_version!(args = ["--always", "--dirty"], fallback = "unknown"),
    ")"
);

/// Render a parent/child CSV table as a Graphviz graph and a collapsible D3 tree
#[derive(Parser, Debug, Clone)]
#[command(version = VERSION, about, long_about = None)]
pub struct Args {
    /// CSV file name; ".csv" is appended when missing
    #[arg(short, long)]
    pub file: PathBuf,

    /// Child column, used as the row identifier
    #[arg(long)]
    pub from: String,

    /// Parent column, referencing another row's identifier
    #[arg(long)]
    pub to: String,

    /// Draw arrows from parent to child
    #[arg(short, long)]
    pub rev: bool,

    /// Column used as the node label (defaults to the "from" column)
    #[arg(short, long)]
    pub display: Option<String>,

    /// Column to cluster nodes by
    #[arg(short, long)]
    pub group: Option<String>,

    /// Numeric column that sizes the nodes (bubble chart)
    #[arg(short = 's', long)]
    pub value: Option<String>,

    /// Show every column of a row inside its node
    #[arg(short, long)]
    pub all: bool,

    /// Scale node sizes from the smallest value instead of from zero
    #[arg(long)]
    pub true_min: bool,

    /// HTML template containing a "{{data}}" placeholder
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory for the generated files (defaults to the input's directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Do not open the results in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Log more detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let input = csv_path(&args.file);
    let table = Table::from_path(&input)?;
    tracing::debug!(
        path = %input.display(),
        columns = table.columns().len(),
        rows = table.rows().len(),
        "loaded table"
    );

    let template = match &args.template {
        Some(path) => Template::from_path(path)?,
        None => Template::default(),
    };
    let options = Options {
        columns: ColumnNames {
            from: args.from,
            to: args.to,
            display: args.display,
            group: args.group,
            value: args.value,
        },
        graph: GraphOptions {
            reverse: args.rev,
            expand_all: args.all,
            floor: if args.true_min {
                ScaleFloor::Observed
            } else {
                ScaleFloor::Zero
            },
        },
        template,
    };

    let artifacts = generate(&table, &options)?;
    let written = artifacts.write(&output_base(&input, args.out_dir.as_deref()))?;
    println!("{}", artifacts.url);

    if !args.no_open {
        open_viewer(&artifacts.url);
        open_viewer(&written.html.display().to_string());
    }
    Ok(())
}

fn report(err: &ViewerError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_config() => {
            eprintln!("{}", report(&err));
            eprintln!("{}", Args::command().render_usage());
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {}", report(&err));
            ExitCode::FAILURE
        }
    }
}
