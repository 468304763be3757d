use clap::{ArgAction, Parser, ValueEnum};
use graphscribe::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WorkbookCli {
    Py,
    Ipynb,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GraphCli {
    Dot,
    Json,
    Off,
}

/// Convert a workflow into a graph description and a workbook per isolated subgraph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a workflow.json file or a directory that directly contains one
    path: PathBuf,

    /// Output directory
    #[arg(long, default_value = "out_graphs")]
    out: PathBuf,

    /// Workbook format to generate; both are generated when omitted
    #[arg(long, value_enum)]
    workbook: Option<WorkbookCli>,

    /// Graph file(s) to emit; both are generated when omitted
    #[arg(long, value_enum)]
    graph: Option<GraphCli>,

    /// Resolve a custom node type with a built-in generator, as USER_TYPE=BUILTIN_TYPE
    #[arg(
        long = "type-map",
        value_name = "USER_TYPE=BUILTIN_TYPE",
        value_parser = parse_type_mapping
    )]
    type_map: Vec<(String, String)>,

    /// Print the conversion summary as JSON on stdout
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_type_mapping(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((user, builtin)) if !user.is_empty() && !builtin.is_empty() => {
            Ok((user.to_string(), builtin.to_string()))
        }
        _ => Err(format!("expected USER_TYPE=BUILTIN_TYPE, got '{}'", s)),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let converter = cli
        .type_map
        .iter()
        .fold(Converter::builder(), |builder, (user, builtin)| {
            builder.with_type_mapping(user, builtin)
        })
        .build();

    let summaries = match convert_tree(&cli.path, &converter, &export_options(&cli)) {
        Ok(summaries) => summaries,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    if cli.summary {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("could not render summary: {}", e),
        }
    }
    ExitCode::SUCCESS
}

fn export_options(cli: &Cli) -> ExportOptions {
    let mut options = ExportOptions::new(&cli.out);
    options.graph = match cli.graph {
        None => GraphFormats::Both,
        Some(GraphCli::Json) => GraphFormats::Json,
        Some(GraphCli::Dot) => GraphFormats::Dot,
        Some(GraphCli::Off) => GraphFormats::Off,
    };
    options.workbook = match cli.workbook {
        None => WorkbookFormats::Both,
        Some(WorkbookCli::Py) => WorkbookFormats::Py,
        Some(WorkbookCli::Ipynb) => WorkbookFormats::Ipynb,
    };
    options
}
