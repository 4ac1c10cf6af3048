use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crossbreed::cli::commands::{self, ResolveArgs};
use crossbreed::config::CrossbreedConfig;

#[derive(Parser)]
#[command(name = "crossbreed")]
#[command(about = "A plant cross-breeding engine resolving mutation rules from neighboring crops")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "crossbreed.toml")]
    config: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a rule book and report invalid entries
    Check {
        /// Rule book to load (defaults to rule_file from the config)
        #[arg(short, long)]
        rules: Option<String>,
    },

    /// List registered mutations
    List {
        /// Rule book to load (defaults to rule_file from the config)
        #[arg(short, long)]
        rules: Option<String>,

        /// Only mutations producing this plant
        #[arg(long)]
        child: Option<String>,

        /// Only mutations requiring this plant
        #[arg(long)]
        parent: Option<String>,
    },

    /// Resolve mutations for one crop over a batch of trials
    Resolve {
        /// Variant of the crop being evaluated
        #[arg(long)]
        crop: String,

        /// Neighboring variants, comma separated; repeat an id for multiple neighbors
        #[arg(short, long, value_delimiter = ',')]
        neighbors: Vec<String>,

        /// Rule book to load (defaults to rule_file from the config)
        #[arg(short, long)]
        rules: Option<String>,

        /// Number of trials (defaults to trials from the config)
        #[arg(short, long)]
        trials: Option<u32>,

        /// Base seed; 0 picks a random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Light level at the crop (0-15)
        #[arg(long)]
        light: Option<u8>,

        /// Time of day at the crop, in ticks (0-23999)
        #[arg(long)]
        time: Option<u32>,

        /// Tool last applied to the crop
        #[arg(long)]
        tool: Option<String>,

        /// Print the tally as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn rule_path(config: &CrossbreedConfig, rules: Option<String>) -> PathBuf {
    PathBuf::from(rules.unwrap_or_else(|| config.rule_file.clone()))
}

fn main() {
    let cli = Cli::parse();

    let config = match CrossbreedConfig::from_file_or_default(Path::new(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level, cli.log_json);

    let result = match cli.command {
        Commands::Check { rules } => commands::check(&rule_path(&config, rules)),

        Commands::List {
            rules,
            child,
            parent,
        } => commands::list(
            &rule_path(&config, rules),
            child.as_deref(),
            parent.as_deref(),
        ),

        Commands::Resolve {
            crop,
            neighbors,
            rules,
            trials,
            seed,
            light,
            time,
            tool,
            json,
        } => {
            let args = ResolveArgs {
                crop,
                neighbors,
                trials,
                seed,
                light,
                time,
                tool,
                json,
            };
            commands::resolve(&config, &rule_path(&config, rules), &args).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
