use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bennu_lens::config::{load_targets, Settings, DEFAULT_DATA_DIR};
use bennu_lens::data::loader::load_chirality_table;
use bennu_lens::pipeline::{run_chirality, run_spectra};
use bennu_lens::{build_table, ChiralityFixture, ChiralityTable};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bennu-lens")]
#[command(author, version, about = "Compare Bennu sample chemistry against Earth references")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory for generated images
    #[arg(long, global = true, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chirality answer key and chart each molecule
    Chirality(ChiralityArgs),
    /// Render OVIRS spectral maps with no-data pixels removed
    Spectra(SpectraArgs),
    /// Run both pipelines (default)
    All {
        #[command(flatten)]
        chirality: ChiralityArgs,
        #[command(flatten)]
        spectra: SpectraArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
struct ChiralityArgs {
    /// Chirality table (.json or .csv) to use instead of the built-in placeholder
    #[arg(long)]
    table: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct SpectraArgs {
    /// Directory holding the FITS map products
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// JSON list of {file, title, cmap} targets (default: organics + hydration)
    #[arg(long)]
    targets: Option<PathBuf>,
}

impl Default for SpectraArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            targets: None,
        }
    }
}

fn chirality(args: &ChiralityArgs, out_dir: &Path) -> Result<()> {
    let table: ChiralityTable = match &args.table {
        Some(path) => load_chirality_table(path)?,
        None => build_table(&ChiralityFixture::default()),
    };
    run_chirality(&table, out_dir)?;
    Ok(())
}

fn spectra(args: &SpectraArgs, out_dir: &Path) -> Result<()> {
    let mut settings = Settings {
        data_dir: args.data_dir.clone(),
        out_dir: out_dir.to_path_buf(),
        ..Settings::default()
    };
    if let Some(path) = &args.targets {
        settings.targets = load_targets(path)?;
    }
    run_spectra(&settings)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating output directory {}", cli.out_dir.display()))?;

    let command = cli.command.unwrap_or(Command::All {
        chirality: ChiralityArgs::default(),
        spectra: SpectraArgs::default(),
    });

    match command {
        Command::Chirality(args) => chirality(&args, &cli.out_dir),
        Command::Spectra(args) => spectra(&args, &cli.out_dir),
        Command::All { chirality: c, spectra: s } => {
            chirality(&c, &cli.out_dir)?;
            spectra(&s, &cli.out_dir)
        }
    }
}
