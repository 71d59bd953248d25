//! Sylva CLI - Command-line interface for seeded tree generation

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use sylva_core::definition::TreeDefinition;
use sylva_core::export::{ExportFormat, export_tree};
use sylva_core::grammar::{generate_sentence_bounded, sentence_to_string};
use sylva_core::pipeline::{MAX_SYMBOLS, TreeConfig, generate};
use sylva_core::presets;

#[derive(Parser)]
#[command(name = "sylva")]
#[command(about = "Procedural trees from stochastic L-systems", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the tree comes from, plus overrides
#[derive(Args)]
struct TreeSource {
    /// Named preset (see `sylva presets`)
    #[arg(short, long, default_value = "oak", conflicts_with = "definition")]
    preset: String,

    /// JSON tree definition file
    #[arg(short, long)]
    definition: Option<PathBuf>,

    /// Seed string (overrides the preset or definition)
    #[arg(short, long)]
    seed: Option<String>,

    /// Rewriting generations (overrides the preset or definition)
    #[arg(short, long)]
    iterations: Option<u32>,
}

impl TreeSource {
    fn load(&self) -> Result<TreeConfig> {
        let mut config = match &self.definition {
            Some(path) => TreeDefinition::load(path)
                .and_then(TreeDefinition::into_config)
                .with_context(|| format!("loading {}", path.display()))?,
            None => presets::preset(&self.preset)?,
        };
        if let Some(seed) = &self.seed {
            config = config.with_seed(seed.clone());
        }
        if let Some(iterations) = self.iterations {
            config = config.with_iterations(iterations);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a tree and optionally export it
    Generate {
        #[command(flatten)]
        source: TreeSource,

        /// Output file (.obj or .json, format auto-detected from extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Vertices per branch ring
        #[arg(long)]
        radial_segments: Option<u32>,
    },

    /// Print the expanded sentence without building geometry
    Sentence {
        #[command(flatten)]
        source: TreeSource,
    },

    /// List available presets
    Presets,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            source,
            output,
            radial_segments,
        } => {
            let mut config = source.load()?;
            if let Some(radial_segments) = radial_segments {
                config.branch = config.branch.with_radial_segments(radial_segments);
            }
            run_generate(&config, output.as_deref())?;
        }
        Commands::Sentence { source } => {
            let config = source.load()?;
            config.validate()?;
            let sentence = generate_sentence_bounded(
                &config.lsystem,
                config.iterations,
                &config.seed,
                MAX_SYMBOLS,
            )?;
            println!("{}", sentence_to_string(&sentence));
        }
        Commands::Presets => {
            for name in presets::PRESET_NAMES {
                let config = presets::preset(name)?;
                println!(
                    "{:<8} axiom {:<6} {} iterations",
                    name,
                    config.lsystem.axiom(),
                    config.iterations
                );
            }
        }
    }

    Ok(())
}

fn run_generate(config: &TreeConfig, output: Option<&Path>) -> Result<()> {
    tracing::info!(seed = %config.seed, iterations = config.iterations, "generating tree");

    let tree = generate(config)?;
    let stats = tree.stats;

    println!("Seed:      {}", config.seed);
    println!("Symbols:   {}", stats.symbol_count);
    println!("Nodes:     {}", stats.node_count);
    println!("Segments:  {}", stats.segment_count);
    println!("Leaves:    {}", stats.leaf_count);
    println!("Triangles: {}", stats.triangle_count);

    if let Some(output) = output {
        let format = ExportFormat::from_extension(output).with_context(|| {
            format!(
                "unsupported output extension: {} (expected .obj or .json)",
                output.display()
            )
        })?;
        export_tree(&tree, output)?;
        println!("Exported {} to: {}", format.name(), output.display());
    }

    Ok(())
}
