//! CLI tool to inspect and edit Lottie animation files.
//!
//! Usage:
//!   lottie-edit info <INPUT>
//!   lottie-edit palette <INPUT> --color '#FF0000' [--color ...] [--layer NAME ...] [-o OUT]
//!   lottie-edit edit <INPUT> [--layer NAME ...] [--fill HEX] [--stroke HEX] [--opacity F] [-o OUT]
//!   lottie-edit optimize <INPUT> [-o OUT]
//!   lottie-edit export <INPUT> [-o OUT]
//!
//! Each command loads the file into a fresh store session, runs the
//! operation there, and writes the stored result.

mod input;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lottiekit::{
    apply_palette, optimize, update_layer_properties, DocumentId, DocumentRecord, DocumentStore,
    LayerProperties, SessionId,
};

#[derive(Parser, Debug)]
#[command(
    name = "lottie-edit",
    about = "Inspect, recolor and optimize Lottie animations",
    version
)]
struct Args {
    /// Store config file (TOML)
    #[arg(long, global = true, env = "LOTTIE_EDIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print document metadata as JSON
    Info {
        input: PathBuf,
    },
    /// Apply a color palette, one color per matching layer
    Palette {
        #[command(flatten)]
        io: Io,
        /// Palette color (#RRGGBB), repeatable
        #[arg(short, long = "color", required = true)]
        colors: Vec<String>,
        /// Layer name to match, repeatable (default: all layers)
        #[arg(short, long = "layer")]
        layers: Vec<String>,
    },
    /// Override fill, stroke or opacity on matching layers
    Edit {
        #[command(flatten)]
        io: Io,
        /// Layer name to match, repeatable (default: all layers)
        #[arg(short, long = "layer")]
        layers: Vec<String>,
        /// Fill color (#RRGGBB)
        #[arg(long)]
        fill: Option<String>,
        /// Stroke color (#RRGGBB)
        #[arg(long)]
        stroke: Option<String>,
        /// Opacity between 0 and 1
        #[arg(long)]
        opacity: Option<f64>,
    },
    /// Remove hidden layers and round numbers to two decimals
    Optimize {
        #[command(flatten)]
        io: Io,
    },
    /// Re-emit the document as indented JSON
    Export {
        #[command(flatten)]
        io: Io,
    },
}

#[derive(ClapArgs, Debug)]
struct Io {
    /// Input Lottie JSON file
    input: PathBuf,

    /// Output file path (defaults to <input stem>.edited.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Io {
    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut path = self.input.clone();
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "animation".to_string());
            path.set_file_name(format!("{}.edited.json", stem));
            path
        })
    }
}

/// A store holding exactly the input file.
struct Workspace {
    store: DocumentStore,
    session: SessionId,
    document: DocumentId,
}

impl Workspace {
    fn open(input: &Path, config: Option<&Path>) -> Result<Self> {
        let store = DocumentStore::with_config(input::read_config(config)?);
        let session = store.create_session();
        let document = DocumentId::generate();
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let doc = input::read_document(input)?;
        store.put_document(&session, DocumentRecord::new(document.clone(), name, doc));
        Ok(Self {
            store,
            session,
            document,
        })
    }

    fn record(&self) -> Result<DocumentRecord> {
        self.store
            .get_document(&self.session, &self.document)
            .ok_or_else(|| anyhow!("Document {} vanished from the store", self.document))
    }

    fn write(&self, path: &Path) -> Result<()> {
        let json = self.record()?.export_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write output file {}", path.display()))?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config.as_deref();

    match args.command {
        Command::Info { input } => {
            let ws = Workspace::open(&input, config)?;
            let record = ws.record()?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Palette { io, colors, layers } => {
            let palette = input::parse_palette(&colors)?;
            let selector = input::parse_selector(&layers)?;
            let ws = Workspace::open(&io.input, config)?;
            ws.store
                .transform(&ws.session, &ws.document, |doc| {
                    Ok((apply_palette(doc, palette.colors(), &selector)?, ()))
                })?
                .context("Document not found")?;
            ws.write(&io.output_path())?;
        }
        Command::Edit {
            io,
            layers,
            fill,
            stroke,
            opacity,
        } => {
            let mut properties = LayerProperties::new();
            if let Some(hex) = fill {
                properties = properties.with_fill_color(input::parse_color(&hex)?);
            }
            if let Some(hex) = stroke {
                properties = properties.with_stroke_color(input::parse_color(&hex)?);
            }
            if let Some(value) = opacity {
                if !(0.0..=1.0).contains(&value) {
                    anyhow::bail!("Opacity must be between 0 and 1, got {}", value);
                }
                properties = properties.with_opacity(value);
            }
            if properties.is_empty() {
                anyhow::bail!("Nothing to edit: pass --fill, --stroke or --opacity");
            }
            let selector = input::parse_selector(&layers)?;
            let ws = Workspace::open(&io.input, config)?;
            ws.store
                .transform(&ws.session, &ws.document, |doc| {
                    Ok((update_layer_properties(doc, &selector, &properties), ()))
                })?
                .context("Document not found")?;
            ws.write(&io.output_path())?;
        }
        Command::Optimize { io } => {
            let ws = Workspace::open(&io.input, config)?;
            let stats = ws
                .store
                .transform(&ws.session, &ws.document, |doc| {
                    let outcome = optimize(doc)?;
                    Ok((outcome.document, outcome.stats))
                })?
                .context("Document not found")?;
            ws.write(&io.output_path())?;

            println!();
            println!("Optimization statistics:");
            println!("  Layers:    {:>10} → {}", stats.layers_before, stats.layers_after);
            println!("  Original:  {:>10} bytes", stats.original_size);
            println!("  Optimized: {:>10} bytes", stats.optimized_size);
            println!("  Reduction: {:>10.2}%", stats.reduction_percent);
        }
        Command::Export { io } => {
            let ws = Workspace::open(&io.input, config)?;
            // An existing directory as output receives the document under its export name.
            let path = match &io.output {
                Some(dir) if dir.is_dir() => dir.join(ws.record()?.export_file_name()),
                _ => io.output_path(),
            };
            ws.write(&path)?;
        }
    }

    Ok(())
}
