use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fixflow_analysis::{
    AnalysisConfig, AvailableExpressions, DataflowAnalysis, Liveness, Report, analyze_module,
};
use fixflow_ir::{Module, Name};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Run dataflow analyses over a JSON-encoded module.
#[derive(Parser, Debug)]
#[command(name = "fixflow", version)]
struct Args {
    /// The module to analyze.
    module: PathBuf,

    #[arg(long, value_enum, default_value_t = Selection::All)]
    analysis: Selection,

    /// Do not analyze the named function. Repeatable; `main` is always
    /// skipped unless `--no-skip` is given.
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,

    /// Analyze every function, including `main`.
    #[arg(long)]
    no_skip: bool,

    /// Also print GEN, KILL, IN, OUT and the CFG edges of every block.
    #[arg(long)]
    dump: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Give up on a function after this many solver passes.
    #[arg(long, value_name = "N")]
    max_passes: Option<usize>,

    /// Omit the `<analysis>: <function>` line before each report.
    #[arg(long)]
    no_heading: bool,

    /// Log more; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Selection {
    Available,
    Liveness,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Args {
    fn config(&self) -> AnalysisConfig {
        let config = if self.no_skip {
            AnalysisConfig::new().with_skip_functions(Vec::<Name>::new())
        } else {
            AnalysisConfig::new()
        };
        self.skip
            .iter()
            .fold(config, |config, name| config.with_skip(name.as_str()))
            .with_max_passes(self.max_passes)
            .with_heading(!self.no_heading)
    }
}

#[derive(Debug, serde::Serialize)]
struct Entry {
    #[serde(flatten)]
    report: Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    dump: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct Failure {
    analysis: &'static str,
    function: Name,
    message: String,
}

#[derive(Debug, Default, serde::Serialize)]
struct Output {
    reports: Vec<Entry>,
    errors: Vec<Failure>,
}

impl Output {
    fn collect<A: DataflowAnalysis>(
        &mut self,
        analysis: &A,
        module: &Module,
        config: &AnalysisConfig,
        dump: bool,
    ) {
        for outcome in analyze_module(analysis, &module.functions, config) {
            match outcome.result {
                Ok(Some(result)) => self.reports.push(Entry {
                    report: result.report(),
                    dump: dump.then(|| result.dump()),
                }),
                Ok(None) => {}
                Err(err) => self.errors.push(Failure {
                    analysis: analysis.name(),
                    function: outcome.function,
                    message: err.to_string(),
                }),
            }
        }
    }

    fn print_text(&self, heading: bool) {
        for entry in &self.reports {
            print!("{}", entry.report.render(heading));
            if let Some(dump) = &entry.dump {
                print!("{dump}");
            }
        }
        for failure in &self.errors {
            eprintln!(
                "error: {} failed for '{}': {}",
                failure.analysis, failure.function, failure.message
            );
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path) -> Result<Module> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let module = load(&args.module)?;
    tracing::debug!(functions = module.functions.len(), "loaded module");
    let config = args.config();

    let mut output = Output::default();
    if matches!(args.analysis, Selection::Available | Selection::All) {
        output.collect(&AvailableExpressions, &module, &config, args.dump);
    }
    if matches!(args.analysis, Selection::Liveness | Selection::All) {
        output.collect(&Liveness, &module, &config, args.dump);
    }

    match args.format {
        Format::Text => output.print_text(config.heading),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to encode reports")?
        ),
    }

    Ok(if output.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
