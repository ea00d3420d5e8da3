//! Loading documents and parsing color arguments for the CLI.

use std::path::Path;

use anyhow::{bail, Context, Result};

use lottiekit::{AnimationDocument, LayerSelector, Palette, Rgb, StoreConfig};

/// Reads and parses a Lottie JSON file.
pub fn read_document(path: &Path) -> Result<AnimationDocument> {
    if !path.exists() {
        bail!("Input file does not exist: {}", path.display());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    AnimationDocument::from_slice(&bytes).context("Failed to parse Lottie JSON")
}

/// Reads a TOML store config, or returns the defaults.
pub fn read_config(path: Option<&Path>) -> Result<StoreConfig> {
    let Some(path) = path else {
        return Ok(StoreConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    StoreConfig::from_toml_str(&text).context("Invalid store config")
}

/// Strict hex parsing; the library itself maps malformed colors to black.
pub fn parse_color(hex: &str) -> Result<Rgb> {
    match Rgb::parse_hex(hex) {
        Some(rgb) => Ok(rgb),
        None => bail!("Invalid color '{}': expected #RRGGBB", hex),
    }
}

pub fn parse_palette(hexes: &[String]) -> Result<Palette> {
    let colors = hexes
        .iter()
        .map(|h| parse_color(h))
        .collect::<Result<Vec<_>>>()?;
    Palette::new(colors).context("At least one --color is required")
}

/// No `--layer` flags means every layer.
pub fn parse_selector(layers: &[String]) -> Result<LayerSelector> {
    if layers.is_empty() {
        return Ok(LayerSelector::All);
    }
    LayerSelector::from_names(layers.iter().cloned()).context("Invalid layer selection")
}
