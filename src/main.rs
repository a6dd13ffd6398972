//! docsim - compare documents of a corpus for shared phrasing.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsim::report::{render_average, render_listing, render_scan, render_similarity};
use docsim::{
    average_documents, compare_documents, scan_corpus, Corpus, DocsimConfig, FixedSeeds,
    LoggingConfig, RandomSeeds, SeedSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docsim", author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, short, global = true, env = "DOCSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Listing file naming the corpus documents, one per line
    #[arg(long, global = true, env = "DOCSIM_LISTING")]
    listing: Option<PathBuf>,

    /// Directory holding the listed documents
    #[arg(long, global = true, env = "DOCSIM_ROOT")]
    root: Option<PathBuf>,

    /// Permutation columns per comparison
    #[arg(long, global = true, env = "DOCSIM_PERMUTATIONS")]
    permutations: Option<usize>,

    /// Words per shingle
    #[arg(long, global = true, env = "DOCSIM_SHINGLE_LENGTH")]
    shingle_length: Option<usize>,

    /// Fixed comparison seed, for reproducible scores
    #[arg(long, global = true, env = "DOCSIM_SEED")]
    seed: Option<u64>,

    /// Fold permutation columns on all cores
    #[arg(long, global = true)]
    parallel: bool,

    /// Treat words differing only in case as equal
    #[arg(long, global = true)]
    lowercase: bool,

    /// Log filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "DOCSIM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the documents available for comparison
    List,
    /// Compare two documents once
    Compare { left: String, right: String },
    /// Compare two documents several times under fresh seeds and average
    Average {
        left: String,
        right: String,
        /// Number of runs
        #[arg(long, env = "DOCSIM_RUNS")]
        runs: Option<usize>,
    },
    /// Compare one document against every other listed document
    Scan { subject: String },
}

impl Cli {
    /// Load the config file (or defaults) and apply command-line overrides.
    fn resolve_config(&self) -> Result<DocsimConfig> {
        let mut config = match &self.config {
            Some(path) => DocsimConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DocsimConfig::default(),
        };

        if let Some(listing) = &self.listing {
            config.corpus.listing = listing.clone();
        }
        if let Some(root) = &self.root {
            config.corpus.root = root.clone();
        }
        if let Some(permutations) = self.permutations {
            config.matcher.permutations = permutations;
        }
        if let Some(shingle_length) = self.shingle_length {
            config.perceptual.shingle_length = shingle_length;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.parallel {
            config.matcher.use_parallel = true;
        }
        if self.lowercase {
            config.tokenizer.lowercase = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.log_json {
            config.logging.json = true;
        }
        if let Command::Average {
            runs: Some(runs), ..
        } = &self.command
        {
            config.matcher.runs = *runs;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log filter `{}`", logging.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Seeds for this invocation: the pinned seed repeated, or fresh OS entropy.
fn seed_source(config: &DocsimConfig) -> Box<dyn SeedSource> {
    match config.fixed_seed() {
        Some(seed) => Box::new(FixedSeeds::single(seed)),
        None => Box::new(RandomSeeds::new()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = cli.resolve_config()?;
    init_tracing(&config.logging)?;

    let pinned = config.fixed_seed();
    let mut seeds = seed_source(&config);
    config.perceptual.seed = seeds.next_seed();

    let corpus = Corpus::load(&config.corpus).with_context(|| {
        format!(
            "make sure `{}` lists the documents under `{}`",
            config.corpus.listing.display(),
            config.corpus.root.display()
        )
    })?;

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Command::List => {
            write!(stdout, "{}", render_listing(corpus.names()))?;
        }
        Command::Compare { left, right } => {
            let sim = compare_documents(&corpus, left, right, &config)?;
            writeln!(stdout, "File 1: {left}\nFile 2: {right}\n")?;
            write!(stdout, "{}", render_similarity(&sim))?;
        }
        Command::Average { left, right, .. } => {
            let avg = match pinned {
                // A fixed seed replays one reproducible sequence of run seeds.
                Some(seed) => {
                    let mut replay = RandomSeeds::from_seed(seed);
                    average_documents(&corpus, left, right, &config, &mut replay)?
                }
                None => average_documents(&corpus, left, right, &config, seeds.as_mut())?,
            };
            writeln!(stdout, "File 1: {left}\nFile 2: {right}\n")?;
            write!(stdout, "{}", render_average(&avg))?;
        }
        Command::Scan { subject } => {
            let hits = {
                let mut stderr = io::stderr();
                let hits = scan_corpus(&corpus, subject, &config, |done, total| {
                    let _ = write!(stderr, "\rComparing files ({done}/{total})");
                    let _ = stderr.flush();
                })?;
                let _ = writeln!(stderr);
                hits
            };
            writeln!(stdout, "File 1: {subject}\n")?;
            write!(stdout, "{}", render_scan(&hits))?;
        }
    }
    Ok(())
}
