//! Command-line entry point.

use clap::{Parser, Subcommand};
use parcp::bench::{runner, test_file_name, BenchmarkRunner, CopyTask};
use parcp::config::{BenchmarkConfig, CopyConfig, CopyStrategy, GenerateConfig};
use parcp::models::render_task_table;
use parcp::util::units::parse_size;
use parcp::{ParcpError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parcp", version, about = "Parallel file-copy benchmark")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy files in parallel with a chosen strategy
    Copy {
        /// Copy strategy: cp, mmap, direct_io, or direct_io_memory_impact
        #[arg(long, value_parser = CopyStrategy::from_str)]
        mode: CopyStrategy,

        /// Source files, one task per file
        #[arg(long, num_args = 1.., required = true)]
        from: Vec<PathBuf>,

        /// Destination directory
        #[arg(long)]
        to: PathBuf,
    },

    /// Generate deterministic test files
    #[command(name = "generate_test_files")]
    GenerateTestFiles {
        /// Size of each file, e.g. 100M, 2G, 1T
        #[arg(long, value_parser = parse_size)]
        size: u64,

        /// Number of files to generate
        #[arg(long)]
        num: usize,

        /// Directory to generate into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Generate test files, then measure memory and disk copy throughput
    Benchmark {
        /// Size of each test file, e.g. 100M, 2G, 1T
        #[arg(long, value_parser = parse_size)]
        size: u64,

        /// Number of test files
        #[arg(long)]
        num: usize,

        /// Directory test files are generated into
        #[arg(long)]
        from: PathBuf,

        /// Directory disk copies are written into
        #[arg(long)]
        to: PathBuf,

        /// Also write the report as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Copy { mode, from, to } => run_copy(from, to, mode).await,
        Commands::GenerateTestFiles { size, num, dir } => run_generate(dir, size, num).await,
        Commands::Benchmark {
            size,
            num,
            from,
            to,
            json,
        } => run_benchmark(from, to, size, num, json).await,
    }
}

async fn run_copy(sources: Vec<PathBuf>, dest_dir: PathBuf, strategy: CopyStrategy) -> Result<()> {
    let config = CopyConfig::new(sources, dest_dir, strategy);
    config.validate()?;

    let tasks: Vec<CopyTask> = config
        .sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            // validate() guarantees every source has a file name
            let destination = config.dest_dir.join(source.file_name().unwrap_or_default());
            CopyTask::copy(i, source.clone(), destination, config.strategy)
        })
        .collect();

    let finished = runner::run_all(tasks).await?;
    println!("{}", render_task_table(&finished));

    if finished.iter().any(|task| task.status.is_failure()) {
        return Err(ParcpError::CopyError(
            "one or more copy tasks failed".to_string(),
        ));
    }
    Ok(())
}

async fn run_generate(dir: PathBuf, file_size: u64, num_files: usize) -> Result<()> {
    let config = GenerateConfig::new(dir, file_size, num_files);
    config.validate()?;

    let tasks: Vec<CopyTask> = (1..=config.num_files)
        .map(|i| {
            CopyTask::generate(
                i - 1,
                config.dir.join(test_file_name(i)),
                config.file_size,
            )
        })
        .collect();

    let finished = runner::run_all(tasks).await?;
    println!("{}", render_task_table(&finished));

    if finished.iter().any(|task| task.status.is_failure()) {
        return Err(ParcpError::CopyError(
            "one or more generation tasks failed".to_string(),
        ));
    }
    Ok(())
}

async fn run_benchmark(
    source_dir: PathBuf,
    dest_dir: PathBuf,
    file_size: u64,
    num_files: usize,
    json: Option<PathBuf>,
) -> Result<()> {
    let mut config = BenchmarkConfig::new(source_dir, dest_dir, file_size, num_files);
    if let Some(path) = json {
        config = config.with_json_output(path);
    }

    let runner = BenchmarkRunner::new(config.clone())?;
    let report = runner.run().await?;

    println!("{}", report.render());

    if let Some(path) = &config.json_output {
        report.save_json(path)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}
