//! sql-lineage CLI - Table and column lineage from SQL
//!
//! Usage:
//!   sql-lineage analyze <file.sql>... [--output-dir <dir>] [--format <format>]
//!   sql-lineage ingest <response.txt> [--sql <file.sql>] [--output-dir <dir>]
//!   sql-lineage extract <file.sql>
//!   sql-lineage summary <file.sql>
//!   sql-lineage impact <file.sql> <table>
//!
//! Examples:
//!   sql-lineage analyze etl/load_sales.sql --format mermaid -o out/
//!   sql-lineage ingest answer.txt --sql etl/load_sales.sql -o out/
//!   sql-lineage impact etl/load_sales.sql source_schema.customers

use clap::{Parser, Subcommand, ValueEnum};
use sql_lineage::config::{PipelineConfig, Settings};
use sql_lineage::extract::{self, summarize};
use sql_lineage::pipeline::{self, extract_analysis, PipelineError, RunReport};
use sql_lineage::render::DiagramFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sql-lineage")]
#[command(about = "sql-lineage - Table and column lineage from SQL, as CSV, JSON and diagrams")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract lineage from SQL files and write all artifacts
    Analyze {
        /// SQL files, processed one at a time
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write artifacts from an external model's lineage answer
    Ingest {
        /// File holding the model's response text
        response: PathBuf,

        /// The SQL the response describes (recorded in metadata)
        #[arg(long)]
        sql: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the raw extraction report for a SQL file as JSON
    Extract {
        /// Path to the SQL file
        file: PathBuf,
    },

    /// Print a lineage summary for a SQL file as JSON
    Summary {
        /// Path to the SQL file
        file: PathBuf,
    },

    /// List tables upstream and downstream of a table
    Impact {
        /// Path to the SQL file
        file: PathBuf,

        /// Table to analyze (schema-qualified)
        table: String,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output directory (must exist)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Diagram format
    #[arg(short, long)]
    format: Option<FormatArg>,
}

#[derive(Clone, ValueEnum)]
enum FormatArg {
    Drawio,
    Mermaid,
    Graphviz,
}

impl From<FormatArg> for DiagramFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Drawio => DiagramFormat::Drawio,
            FormatArg::Mermaid => DiagramFormat::Mermaid,
            FormatArg::Graphviz => DiagramFormat::Graphviz,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let directive = if cli.verbose {
        "sql_lineage=debug"
    } else {
        "sql_lineage=info"
    };
    sql_lineage::logging::init_tracing(directive);

    match cli.command {
        Commands::Analyze { files, output } => cmd_analyze(&files, output),
        Commands::Ingest {
            response,
            sql,
            output,
        } => cmd_ingest(&response, sql.as_deref(), output),
        Commands::Extract { file } => cmd_extract(&file),
        Commands::Summary { file } => cmd_summary(&file),
        Commands::Impact { file, table } => cmd_impact(&file, &table),
    }
}

/// Settings file values, overridden by command-line flags.
fn resolve_config(output: OutputArgs) -> Result<PipelineConfig, ExitCode> {
    let settings = Settings::load().and_then(|s| s.pipeline_config());
    let mut config = match settings {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    if let Some(dir) = output.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(format) = output.format {
        config = config.with_format(format.into());
    }
    Ok(config)
}

fn read_source(file: &Path) -> Result<String, ExitCode> {
    pipeline::read_sql(file).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })
}

fn print_report(label: &str, report: &RunReport) {
    println!(
        "{}: {} of {} mappings kept",
        label, report.cleaned_count, report.original_count
    );
    if report.artifacts().is_empty() {
        println!("  no mappings available, nothing written");
    }
    for path in report.artifacts() {
        println!("  wrote {}", path.display());
    }
}

fn cmd_analyze(files: &[PathBuf], output: OutputArgs) -> ExitCode {
    let config = match resolve_config(output) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let items = match pipeline::run_batch(files, &config) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut succeeded = 0;
    for item in &items {
        let label = item.path.display().to_string();
        match &item.result {
            Ok(report) => {
                succeeded += 1;
                print_report(&label, report);
            }
            Err(e) => eprintln!("{}: {}", label, e),
        }
    }

    if succeeded == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_ingest(response: &Path, sql: Option<&Path>, output: OutputArgs) -> ExitCode {
    let config = match resolve_config(output) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let text = match read_source(response) {
        Ok(text) => text,
        Err(code) => return code,
    };
    let sql = match sql.map(read_source).transpose() {
        Ok(sql) => sql.unwrap_or_default(),
        Err(code) => return code,
    };

    match pipeline::analyze_oracle_response(&text, &sql, &config) {
        Ok(report) => {
            print_report(&response.display().to_string(), &report);
            ExitCode::SUCCESS
        }
        Err(PipelineError::Oracle(e)) => {
            eprintln!("Error: {}", e);
            eprintln!("--- Response that failed parsing ---");
            eprintln!("{}", e.raw());
            eprintln!("--- End of response ---");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_extract(file: &Path) -> ExitCode {
    match read_source(file) {
        Ok(sql) => print_json(&extract::analyze(&sql)),
        Err(code) => code,
    }
}

fn cmd_summary(file: &Path) -> ExitCode {
    let sql = match read_source(file) {
        Ok(sql) => sql,
        Err(code) => return code,
    };
    let analysis = extract_analysis(&sql, &PipelineConfig::new("."), "");
    print_json(&summarize(&analysis.records))
}

fn cmd_impact(file: &Path, table: &str) -> ExitCode {
    let sql = match read_source(file) {
        Ok(sql) => sql,
        Err(code) => return code,
    };
    let analysis = extract_analysis(&sql, &PipelineConfig::new("."), "");
    let graph = &analysis.graph;

    // The extractor upper-cases identifiers
    let upper = table.to_uppercase();
    let Some(key) = [table, upper.as_str()]
        .into_iter()
        .find(|name| graph.node(name).is_some())
    else {
        eprintln!("Table '{}' not found in {}", table, file.display());
        return ExitCode::FAILURE;
    };

    println!("Table: {}", key);
    println!();
    println!("Upstream:");
    for name in graph.upstream(key) {
        println!("  - {}", name);
    }
    println!();
    println!("Downstream:");
    for name in graph.downstream(key) {
        println!("  - {}", name);
    }
    ExitCode::SUCCESS
}
