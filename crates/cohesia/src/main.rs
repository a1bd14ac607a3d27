use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cohesia_core::config::Config;
use cohesia_core::metric;
use cohesia_core::pipeline::Pipeline;
use cohesia_core::source::JsonSkeletonSource;
use cohesia_report::{text, PageRenderer};

#[derive(Parser)]
#[command(name = "cohesia")]
#[command(about = "Analyze class cohesion and render a defect report")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a skeleton and write the full report
    Analyze {
        /// Path to the skeleton JSON produced by an extractor
        skeleton: PathBuf,
        /// Directory to write report artifacts to (must not exist yet)
        #[arg(short, long)]
        out: PathBuf,
        /// Comma-separated metric names (overrides configuration)
        #[arg(long, value_delimiter = ',')]
        metrics: Option<Vec<String>>,
        /// Config file path (defaults to .cohesia.toml found from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Analyze and exit with code 0 (no defects) or 1 (defects found)
    Check {
        /// Path to the skeleton JSON produced by an extractor
        skeleton: PathBuf,
        /// Directory to write report artifacts to (must not exist yet)
        #[arg(short, long)]
        out: PathBuf,
        /// Comma-separated metric names (overrides configuration)
        #[arg(long, value_delimiter = ',')]
        metrics: Option<Vec<String>>,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a default .cohesia.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
    /// List the registered metric names
    Metrics,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            skeleton,
            out,
            metrics,
            config,
        } => cmd_analyze(&skeleton, &out, metrics, config.as_deref()),
        Commands::Check {
            skeleton,
            out,
            metrics,
            config,
        } => cmd_check(&skeleton, &out, metrics, config.as_deref()),
        Commands::Init { force } => cmd_init(force),
        Commands::Metrics => cmd_metrics(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_analyze(
    skeleton: &Path,
    out: &Path,
    metrics: Option<Vec<String>>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, metrics)?;
    let pipeline = Pipeline::new(JsonSkeletonSource::new(skeleton), PageRenderer, config);
    let outcome = pipeline.run(out)?;
    print!("{}", text::format_report(&outcome.report));
    println!("Report written to {}", outcome.out_dir.display());
    Ok(())
}

fn cmd_check(
    skeleton: &Path,
    out: &Path,
    metrics: Option<Vec<String>>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, metrics)?;
    let pipeline = Pipeline::new(JsonSkeletonSource::new(skeleton), PageRenderer, config);
    let outcome = pipeline.run(out)?;
    let (report, passed) = text::format_check(&outcome.report);
    print!("{report}");
    if !passed {
        process::exit(1);
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".cohesia.toml");
    if target.exists() && !force {
        anyhow::bail!(".cohesia.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created .cohesia.toml with default configuration.");
    Ok(())
}

fn cmd_metrics() -> Result<()> {
    for name in metric::known_metrics() {
        println!("{name}");
    }
    Ok(())
}

fn load_config(config_path: Option<&Path>, metrics: Option<Vec<String>>) -> Result<Config> {
    let mut config = match config_path {
        Some(p) => Config::load(p)?,
        None => Config::load_or_default(Path::new(".")),
    };
    if let Some(metrics) = metrics {
        config.metrics.enabled = metrics;
    }
    log::debug!("metrics enabled: {:?}", config.metrics.enabled);
    Ok(config)
}
