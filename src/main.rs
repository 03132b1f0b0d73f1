use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dx_styles::config::{Config, ScannerKind, DEFAULT_CONFIG_FILE};
use dx_styles::report::print_summary;
use dx_styles::rules::compile::compile_file;
use dx_styles::{run_cycle, watcher, RuleTable, WatcherState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Incremental atomic CSS generator for TSX component trees
#[derive(Parser)]
#[command(name = "dx-styles", version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Source directory to scan
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    /// Compiled rule table
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Stylesheet to generate
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Use the regex scanner instead of the TSX grammar
    #[arg(long, global = true)]
    regex_scanner: bool,

    /// Don't rewrite sources with generated ids
    #[arg(long, global = true)]
    no_inject: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate once, then regenerate on every source change (default)
    Watch,

    /// Generate once and exit
    Build {
        /// Print the cycle report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a TOML rule source into a binary rule table
    Compile {
        /// Rule source (styles.toml)
        input: PathBuf,

        /// Output rule table
        #[arg(short = 'o', long = "out", default_value = "styles.bin")]
        out: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "dx_styles=debug" } else { "dx_styles=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    if let Some(dir) = &cli.source_dir {
        config.source_dir = dir.clone();
    }
    if let Some(rules) = &cli.rules {
        config.rules = rules.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if cli.regex_scanner {
        config.scanner = ScannerKind::Regex;
    }
    if cli.no_inject {
        config.inject_ids = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Command::Compile { input, out }) => {
            let table = compile_file(input)
                .with_context(|| format!("Failed to compile {}", input.display()))?;
            table
                .save(out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(
                "Compiled {} static and {} dynamic rules into {}",
                table.static_rules.len(),
                table.dynamic_rules.len(),
                out.display()
            );
        }
        Some(Command::Build { json }) => {
            let config = load_config(&cli)?;
            let mut state = WatcherState::new(&config);
            let report = run_cycle(&config, &mut state, None).context("Generation failed")?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
        }
        Some(Command::Watch) | None => {
            let config = load_config(&cli)?;
            // Fail fast with a clear message before the watcher starts
            RuleTable::load(&config.rules).with_context(|| {
                format!("Cannot start without a rule table at {}", config.rules.display())
            })?;
            let mut state = WatcherState::new(&config);
            watcher::watch(&config, &mut state).context("Watcher stopped")?;
        }
    }

    Ok(())
}
