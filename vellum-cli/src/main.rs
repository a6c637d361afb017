//! Vellum command-line converter.
//!
//! Reads a layered document exported as JSON and writes it out as SVG.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use vellum_common::image::{DataUriRecoder, DirectoryRecoder, ImageRecoder};
use vellum_common::warning::print_warning;
use vellum_convert::{ConvertOptions, convert};
use vellum_model::{ApproximateShaper, JsonStore, print_tree};

/// Vellum: convert a layered vector/raster document to SVG
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Convert to stdout, images embedded as data URIs
    vellum drawing.json

    # Write a file, with images as separate files beside it
    vellum drawing.json -o out/drawing.svg --image-dir out

    # Sizes in points, no group pruning
    vellum drawing.json --unit pt --no-prune

    # Show the layer hierarchy instead of converting
    vellum --tree drawing.json
"#)]
struct Cli {
    /// Path to the exported document
    #[arg(value_name = "INPUT.json")]
    input: PathBuf,

    /// Write SVG here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Load conversion options from a JSON file; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep attribute-less single-child groups
    #[arg(long)]
    no_prune: bool,

    /// Emit font-face definitions for every font used
    #[arg(long)]
    font_faces: bool,

    /// Omit textLength hints on text spans
    #[arg(long)]
    no_text_length: bool,

    /// Unit suffix for the root width and height (adds a viewBox)
    #[arg(long, value_name = "UNIT")]
    unit: Option<String>,

    /// Store images as files in this directory, referenced by file name
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Print the layer hierarchy and exit
    #[arg(long)]
    tree: bool,

    /// Do not print warnings
    #[arg(short, long)]
    quiet: bool,

    /// Fail if any warning was raised
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = load_options(&cli)?;

    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let store = JsonStore::parse(&json)?;

    let mut recoder: Box<dyn ImageRecoder> = match &cli.image_dir {
        Some(dir) => Box::new(DirectoryRecoder::new(dir)),
        None => Box::new(DataUriRecoder),
    };
    let conversion = convert(&store, &ApproximateShaper, recoder.as_mut(), &options)?;

    if !cli.quiet {
        for warning in &conversion.warnings {
            print_warning(warning);
        }
    }

    if cli.tree {
        print_tree(&conversion.layers);
        return Ok(());
    }

    if cli.strict && !conversion.warnings.is_empty() {
        bail!(
            "{} warning(s) raised in strict mode",
            conversion.warnings.len()
        );
    }

    let xml = conversion.to_xml();
    match &cli.output {
        Some(path) => {
            fs::write(path, xml).with_context(|| format!("failed to write {}", path.display()))?;
            if !cli.quiet {
                eprintln!("{} {}", "wrote".green(), path.display());
            }
        }
        None => io::stdout().write_all(xml.as_bytes())?,
    }
    Ok(())
}

/// Options from `--config`, if any, with explicit flags applied on top.
fn load_options(cli: &Cli) -> anyhow::Result<ConvertOptions> {
    let mut options = match &cli.config {
        Some(path) => read_config(path)?,
        None => ConvertOptions::default(),
    };
    if cli.no_prune {
        options.prune_groups = false;
    }
    if cli.font_faces {
        options.font_faces = true;
    }
    if cli.no_text_length {
        options.text_length_hints = false;
    }
    if let Some(unit) = &cli.unit {
        options.unit = Some(unit.clone());
    }
    Ok(options)
}

fn read_config(path: &Path) -> anyhow::Result<ConvertOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
