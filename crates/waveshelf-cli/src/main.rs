//! waveshelf CLI - wave shelf designs to CNC cut files
//!
//! Loads a TOML or JSON design, prints what it produces and writes DXF, SVG
//! or STL files. DXF files can be read back for inspection and scoring.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use waveshelf::export::inspect;
use waveshelf::{ExportFormat, LayoutWarning, Shelf, ShelfConfig};

#[derive(Parser)]
#[command(name = "waveshelf")]
#[command(about = "Parametric wave shelf generator", long_about = None)]
struct Cli {
    /// Design file (.toml or .json); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default design to a file
    Init {
        /// Output file (.toml or .json)
        #[arg(default_value = "waveshelf.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Summarize the wave, ribs and cut layout of a design
    Info,
    /// Export a design
    Export {
        /// Output file; named after the design when omitted
        output: Option<PathBuf>,
        /// Output format (dxf, svg, stl); taken from the extension otherwise
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
    /// Report entities, layers and shape classes of a DXF file
    Inspect {
        /// DXF file
        file: PathBuf,
        /// Material thickness used to recognize slots, in mm
        #[arg(short, long, default_value_t = 12.0)]
        thickness: f64,
    },
    /// Score a generated DXF file against a reference
    Compare {
        /// Generated DXF file
        generated: PathBuf,
        /// Reference DXF file
        reference: PathBuf,
        /// Material thickness used to recognize slots, in mm
        #[arg(short, long, default_value_t = 12.0)]
        thickness: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force)?,
        Commands::Info => show_info(&load_shelf(cli.config.as_deref())?),
        Commands::Export { output, format } => {
            let shelf = load_shelf(cli.config.as_deref())?;
            export_file(&shelf, output, format)?;
        }
        Commands::Inspect { file, thickness } => inspect_file(&file, thickness)?,
        Commands::Compare {
            generated,
            reference,
            thickness,
        } => compare_files(&generated, &reference, thickness)?,
    }

    Ok(())
}

/// `RUST_LOG` wins over the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_shelf(config: Option<&Path>) -> Result<Shelf> {
    match config {
        Some(path) => Shelf::load(path)
            .with_context(|| format!("failed to load design {}", path.display())),
        None => {
            log::info!("no design file given, using defaults");
            Ok(Shelf::new(ShelfConfig::default())?)
        }
    }
}

fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }
    let config = ShelfConfig::default();
    let is_json = output
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let text = if is_json {
        config.to_json_string()?
    } else {
        config.to_toml_string()?
    };
    fs::write(output, text).with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote default design to {}", output.display());
    Ok(())
}

fn show_info(shelf: &Shelf) {
    let params = shelf.params();
    let backplane = shelf.backplane();

    println!("Shelf:");
    println!("  Length: {}", params.length);
    println!("  Shape: {:?}", params.shape);
    println!(
        "  Wave: amplitude {}, frequency {}",
        params.amplitude, params.frequency
    );
    println!("  Ribs: {}", params.rib_total());
    let [w, h, d] = params.base_size_mm();
    println!("  Rib size: {:.1} x {:.1} x {:.1} mm", w, h, d);

    println!("\nWave path:");
    for (i, p) in shelf.wave_path().iter().enumerate() {
        println!("  {:>3}: t={:.3}  x={:>8.2}  y={:>8.2}", i, p.t, p.x, p.y);
    }

    let bounds = shelf.bounds();
    let size = bounds.size();
    println!("\nBounds: {:.1} x {:.1} x {:.1} mm", size.x, size.y, size.z);

    let layout = shelf.layout();
    println!("\nLayout:");
    println!("  Sheets: {}", layout.sheet_count());
    println!("  Ribs: {}", layout.rib_count());
    if backplane.enabled {
        println!(
            "  Backplane: {:?}, {} slots ({:?})",
            backplane.shape,
            layout.slot_count(),
            backplane.slot_style
        );
    } else {
        println!("  Backplane: none");
    }
    for sheet in &layout.sheets {
        println!(
            "  Sheet {}: {} parts",
            sheet.index + 1,
            sheet.placements.len()
        );
    }

    if !layout.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &layout.warnings {
            let LayoutWarning::Oversized {
                name,
                width,
                height,
            } = warning;
            println!(
                "  {} ({:.0} x {:.0} mm) runs past the sheet edge",
                name, width, height
            );
        }
    }
}

fn export_file(shelf: &Shelf, output: Option<PathBuf>, format: Option<ExportFormat>) -> Result<()> {
    let format = match (format, output.as_deref().and_then(ExportFormat::from_path)) {
        (Some(f), _) | (None, Some(f)) => f,
        (None, None) => match &output {
            Some(path) => anyhow::bail!(
                "cannot tell the format of {} (use --format)",
                path.display()
            ),
            None => ExportFormat::Dxf,
        },
    };

    let file = shelf.export(format).context("export failed")?;
    let path = output.unwrap_or_else(|| PathBuf::from(&file.filename));
    fs::write(&path, &file.bytes).with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Exported {} to {} ({} bytes)",
        format.to_string().to_uppercase(),
        path.display(),
        file.bytes.len()
    );
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn inspect_file(file: &Path, thickness: f64) -> Result<()> {
    let text = read_text(file)?;
    let report = inspect::inspect(&text, thickness)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn compare_files(generated: &Path, reference: &Path, thickness: f64) -> Result<()> {
    let shapes = |path: &Path| -> Result<Vec<inspect::ShapeDescriptor>> {
        let entities = inspect::read_dxf(&read_text(path)?)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(inspect::describe_shapes(&entities))
    };
    let report = inspect::compare(&shapes(generated)?, &shapes(reference)?, thickness);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "waveshelf", "export", "out/cut.svg", "-c", "shelf.toml", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("shelf.toml")));
        let Commands::Export { output, format } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(output, Some(PathBuf::from("out/cut.svg")));
        assert_eq!(format, None);

        let cli = Cli::try_parse_from(["waveshelf", "export", "--format", "STL"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Export {
                output: None,
                format: Some(ExportFormat::Stl)
            }
        ));
        assert!(Cli::try_parse_from(["waveshelf", "export", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["waveshelf", "info", "-q", "-v"]).is_err());
        let cli = Cli::try_parse_from(["waveshelf", "inspect", "a.dxf", "-t", "18"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { thickness, .. } if thickness == 18.0));
    }
}
