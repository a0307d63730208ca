use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use transition_entropy::{
    export_gexf, export_json, load_sequence, run_pipeline, write_table, LoaderConfig,
    PipelineConfig, TrajectoryConfig, TrajectoryGenerator,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Second-order transition entropy of state sequences")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the transition graph of a state table and score it
    Analyze(AnalyzeArgs),
    /// Write a synthetic Markov trajectory as a state table
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Delimited table with a header row
    input: PathBuf,
    /// JSON file with `pipeline` and `loader` sections
    #[arg(long)]
    config: Option<PathBuf>,
    /// State column
    #[arg(long)]
    column: Option<String>,
    #[arg(long)]
    time_column: Option<String>,
    /// Field separator (`tab` or a single character)
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<char>,
    #[arg(long)]
    min_duration: Option<usize>,
    #[arg(long)]
    step_size: Option<usize>,
    #[arg(long)]
    ignore_self_loops: bool,
    /// Print every edge entropy
    #[arg(long)]
    raw_values: bool,
    /// Number of nodes listed by in-entropy sum
    #[arg(long, default_value_t = 10)]
    top: usize,
    #[arg(long)]
    gexf: Option<PathBuf>,
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Output table (stdout when omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long, default_value_t = 8)]
    states: usize,
    #[arg(long, default_value_t = 10_000)]
    length: usize,
    #[arg(long, default_value_t = 3.0)]
    mean_dwell: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CliConfigFile {
    pipeline: PipelineConfig,
    loader: LoaderConfig,
}

fn parse_delimiter(raw: &str) -> Result<char, String> {
    match raw {
        "tab" | "\\t" | "\t" => Ok('\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("expected a single character or `tab`, got {:?}", raw)),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Simulate(args) => simulate(args),
    }
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut file_config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<CliConfigFile>(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => CliConfigFile::default(),
    };

    let loader = &mut file_config.loader;
    if let Some(column) = args.column {
        loader.state_column = column;
    }
    if let Some(column) = args.time_column {
        loader.time_column = column;
    }
    if let Some(delimiter) = args.delimiter {
        loader.delimiter = delimiter;
    }

    let pipeline = &mut file_config.pipeline;
    if let Some(min_duration) = args.min_duration {
        pipeline.min_duration = min_duration;
    }
    if let Some(step_size) = args.step_size {
        pipeline.step_size = step_size;
    }
    pipeline.ignore_self_loops |= args.ignore_self_loops;
    pipeline.include_raw_entropy_values |= args.raw_values;

    let sequence = load_sequence(&args.input, &file_config.loader)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let output = run_pipeline(&sequence, &file_config.pipeline)?;

    println!("input        : {}", args.input.display());
    println!(
        "sequence     : {} raw, {} after duration filter, {} after sub-sampling",
        output.stats.raw_len, output.stats.filtered_len, output.stats.sampled_len
    );
    println!(
        "graph        : {} nodes, {} edges",
        output.graph.node_count(),
        output.graph.edge_count()
    );
    println!(
        "edge entropy : min {:.4}  max {:.4}  mean {:.4} (bits)",
        output.summary.min, output.summary.max, output.summary.mean
    );

    if let Some(values) = &output.entropy_values {
        println!("\nedge entropies:");
        for (edge, value) in output.graph.edges().zip(values) {
            println!("  {} -> {} : {:.4}", edge.source, edge.target, value);
        }
    }

    let ranking = output.graph.ranked_by_in_entropy();
    if args.top > 0 && !ranking.is_empty() {
        println!("\nin-entropy sum (top {}):", args.top.min(ranking.len()));
        for (label, sum) in ranking.iter().take(args.top) {
            println!("  {:<16} {:.4}", label, sum);
        }
    }

    if let Some(path) = &args.gexf {
        export_gexf(&output.graph, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        export_json(&output.graph, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = TrajectoryConfig {
        n_states: args.states,
        length: args.length,
        mean_dwell: args.mean_dwell,
        seed: args.seed,
    };
    let sequence = TrajectoryGenerator::random(&config)?.generate();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_table(&sequence, BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                path = %path.display(),
                states = config.n_states,
                length = sequence.len(),
                "synthetic trajectory written"
            );
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_table(&sequence, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}
