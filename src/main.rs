use anyhow::{bail, Context, Result as AnyhowResult};
use chunky::config::Config;
use chunky::message::read_message;
use chunky::transmission::NoisyTransmission;
use chunky::ChunkyString;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

mod tracing_setup;

/// Reads a message from a file, sends it down a noisy line and prints what
/// arrives on the other end.
#[derive(Parser, Debug)]
#[command(name = "message-passer")]
#[command(version)]
struct Cli {
    /// File to read the original message from
    #[arg(short = 'f', long = "filename", value_name = "PATH")]
    filename: Option<PathBuf>,

    /// Likelihood of each character being dropped, and separately of being doubled (0.0 to 0.5)
    #[arg(short = 'n', long = "noise", value_name = "RATE")]
    noise: Option<f64>,

    /// Seed the noise for a reproducible run
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layers command-line flags over the config file, if any.
    fn resolve_config(&self) -> AnyhowResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(noise) = self.noise {
            config.noise = noise;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.filename.is_some() {
            config.filename = self.filename.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> AnyhowResult<()> {
    let cli = Cli::parse();
    tracing_setup::init_global(cli.log_file.as_deref())?;

    let config = cli.resolve_config()?;
    let Some(filename) = config.filename.as_ref() else {
        bail!("filename not specified (use -f/--filename or the config file)");
    };

    let mut message: ChunkyString = read_message(filename)
        .with_context(|| format!("unable to read from file {}", filename.display()))?;

    let mut line = match config.seed {
        Some(seed) => NoisyTransmission::with_seed(config.noise, seed)?,
        None => NoisyTransmission::new(config.noise)?,
    };
    let stats = line.transmit(&mut message)?;
    tracing::info!(?stats, utilization = ?message.utilization(), "transmission finished");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    message.write_to(&mut out)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
