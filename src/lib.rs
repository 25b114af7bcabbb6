//! Roicoloc: ROI co-localization for microscopy measurement tables.
//!
//! Roicoloc matches two collections of labelled image regions by pixel
//! overlap and writes the result back into the measurement tables that
//! describe them, one derived column per table. It also computes per-image
//! polygon and contour morphometry from the same regions.
//!
//! # Modules
//!
//! - [`region`]: Region data model, rasterization and the region archive
//! - [`matching`]: Greedy overlap matching and the resulting correspondence
//! - [`geometry`]: Vertex pairs, scaled distances, angles and shape descriptors
//! - [`table`]: Delimiter detection and measurement table reading
//! - [`merge`]: Derived-column merge, output writing and merge diagnostics
//! - [`morph`]: Per-image polygon records and contour/marker dumps
//! - [`coloc`]: The match-and-merge pipeline for one image
//! - [`error`]: Error types for roicoloc operations

pub mod coloc;
pub mod error;
pub mod geometry;
pub mod matching;
pub mod merge;
pub mod morph;
pub mod region;
pub mod table;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::{Logger, LoggerHandle};
use serde_json::json;

pub use error::RoiError;

use coloc::{ColocInputs, ColocOptions, SideOutcome};
use geometry::Scale;
use matching::MatchOrder;
use region::io_json::read_region_archive;
use region::ShapeKind;
use table::DetectOptions;

/// The roicoloc CLI application.
#[derive(Parser)]
#[command(name = "roicoloc")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level or flexi_logger spec (e.g. 'info', 'roicoloc::table=debug').
    #[arg(long, global = true, env = "ROICOLOC_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Match two region archives and append the result to their measurement tables.
    Coloc(ColocArgs),
    /// Print the detected dialect and data offset of a delimited file.
    Dialect(DialectArgs),
    /// Append polygon morphometry records for one image.
    Polygon(PolygonArgs),
    /// Write contour and marker-point morphometry for one image.
    Points(PointsArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Primary regions claim in archive order.
    Collection,
    /// Primary regions claim in normalized label order.
    Label,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the coloc subcommand.
#[derive(clap::Args)]
struct ColocArgs {
    /// Region archive of the primary collection (e.g. mitochondria).
    #[arg(long)]
    primary_rois: PathBuf,

    /// Region archive of the secondary collection (e.g. foci).
    #[arg(long)]
    secondary_rois: PathBuf,

    /// Measurement table of the primary collection.
    #[arg(long)]
    primary_csv: PathBuf,

    /// Measurement table of the secondary collection.
    #[arg(long)]
    secondary_csv: PathBuf,

    /// Key column of the primary table.
    #[arg(long, default_value = "Mito #")]
    primary_key: String,

    /// Key column of the secondary table.
    #[arg(long, default_value = "Label")]
    secondary_key: String,

    /// Column appended to the primary table.
    #[arg(long, default_value = "ColocalizedRois")]
    primary_field: String,

    /// Column appended to the secondary table.
    #[arg(long, default_value = "ColocalizedMito")]
    secondary_field: String,

    /// Order in which primary regions claim overlapping secondary regions.
    #[arg(long, value_enum, default_value = "collection")]
    order: OrderArg,

    /// Number of leading lines sampled for dialect detection.
    #[arg(long, default_value_t = table::dialect::DEFAULT_SAMPLE_LINES)]
    sample_lines: usize,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the dialect subcommand.
#[derive(clap::Args)]
struct DialectArgs {
    /// Delimited file to inspect.
    input: PathBuf,

    /// Number of leading lines sampled for detection.
    #[arg(long, default_value_t = table::dialect::DEFAULT_SAMPLE_LINES)]
    sample_lines: usize,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the polygon subcommand.
#[derive(clap::Args)]
struct PolygonArgs {
    /// Region archive holding the image's polygon.
    #[arg(long)]
    rois: PathBuf,

    /// Image name written to every record (defaults to the collection name).
    #[arg(long)]
    image_name: Option<String>,

    /// Physical size of one pixel.
    #[arg(long, env = "ROICOLOC_PIXEL_SIZE", default_value_t = 1.0)]
    pixel_size: f64,

    /// Records file to append to (created with a header if absent).
    #[arg(long)]
    out: PathBuf,
}

/// Arguments for the points subcommand.
#[derive(clap::Args)]
struct PointsArgs {
    /// Region archive holding the contour and the marker points.
    #[arg(long)]
    rois: PathBuf,

    /// Physical size of one pixel.
    #[arg(long, env = "ROICOLOC_PIXEL_SIZE", default_value_t = 1.0)]
    pixel_size: f64,

    /// Image name written to the dump (defaults to the collection name).
    #[arg(long)]
    image_name: Option<String>,

    /// Output dump, appended to (defaults to the archive path with a .csv extension).
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Run the roicoloc CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RoiError> {
    let cli = Cli::parse();
    let _logger = init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Coloc(args)) => run_coloc(args),
        Some(Commands::Dialect(args)) => run_dialect(args),
        Some(Commands::Polygon(args)) => run_polygon(args),
        Some(Commands::Points(args)) => run_points(args),
        None => {
            println!("roicoloc {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("ROI co-localization for microscopy measurement tables.");
            println!();
            println!("Run 'roicoloc --help' for usage information.");
            Ok(())
        }
    }
}

/// Starts a stderr logger. The handle must outlive the command.
fn init_logging(spec: &str) -> Result<LoggerHandle, RoiError> {
    Ok(Logger::try_with_str(spec)?.log_to_stderr().start()?)
}

/// Execute the coloc subcommand.
fn run_coloc(args: ColocArgs) -> Result<(), RoiError> {
    let inputs = ColocInputs {
        primary_rois: args.primary_rois,
        secondary_rois: args.secondary_rois,
        primary_csv: args.primary_csv,
        secondary_csv: args.secondary_csv,
    };
    let opts = ColocOptions {
        primary_key: args.primary_key,
        secondary_key: args.secondary_key,
        primary_field: args.primary_field,
        secondary_field: args.secondary_field,
        order: match args.order {
            OrderArg::Collection => MatchOrder::Collection,
            OrderArg::Label => MatchOrder::Label,
        },
        detect: DetectOptions {
            sample_lines: args.sample_lines,
            ..DetectOptions::default()
        },
    };

    let outcome = coloc::run_coloc(&inputs, &opts)?;

    match args.output {
        ReportFormat::Json => {
            let report = json!({
                "correspondence": outcome.correspondence,
                "primary": side_json(&inputs.primary_csv, &outcome.primary),
                "secondary": side_json(&inputs.secondary_csv, &outcome.secondary),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|e| RoiError::Io(e.into()))?
            );
        }
        ReportFormat::Text => {
            let c = &outcome.correspondence;
            println!(
                "Correspondence: {} secondary region(s) claimed by {} primary region(s)",
                c.claimed_count(),
                c.iter().filter(|(_, claimed)| !claimed.is_empty()).count()
            );
            for (owner, claimed) in c.iter() {
                let names: Vec<&str> = claimed.iter().map(|l| l.as_str()).collect();
                println!("  {} -> [{}]", owner, names.join(", "));
            }
            print_side("Primary", &inputs.primary_csv, &outcome.primary);
            print_side("Secondary", &inputs.secondary_csv, &outcome.secondary);
        }
    }

    let failed = [outcome.primary.is_err(), outcome.secondary.is_err()]
        .iter()
        .filter(|failed| **failed)
        .count();
    if failed > 0 {
        Err(RoiError::ColocIncomplete { failed })
    } else {
        Ok(())
    }
}

fn side_json(input: &Path, side: &Result<SideOutcome, RoiError>) -> serde_json::Value {
    match side {
        Ok(side) => json!({
            "input": input.display().to_string(),
            "output": side.output.display().to_string(),
            "report": side.report,
        }),
        Err(err) => json!({
            "input": input.display().to_string(),
            "error": err.to_string(),
        }),
    }
}

fn print_side(name: &str, input: &Path, side: &Result<SideOutcome, RoiError>) {
    match side {
        Ok(side) => {
            println!("{}: {} -> {}", name, input.display(), side.output.display());
            print!("  {}", side.report);
        }
        Err(err) => println!("{}: {} failed: {}", name, input.display(), err),
    }
}

/// Execute the dialect subcommand.
fn run_dialect(args: DialectArgs) -> Result<(), RoiError> {
    let opts = DetectOptions {
        sample_lines: args.sample_lines,
        ..DetectOptions::default()
    };
    let detection = table::detect(&args.input, &opts)?;

    match args.output {
        ReportFormat::Json => println!(
            "{}",
            json!({
                "input": args.input.display().to_string(),
                "delimiter": (detection.dialect.delimiter as char).to_string(),
                "quote": (detection.dialect.quote as char).to_string(),
                "offset": detection.offset,
                "line": detection.line + 1,
            })
        ),
        ReportFormat::Text => {
            println!("{}", args.input.display());
            println!("  {}", detection.dialect);
            println!(
                "  data starts at byte {} (line {})",
                detection.offset,
                detection.line + 1
            );
        }
    }
    Ok(())
}

/// Execute the polygon subcommand.
fn run_polygon(args: PolygonArgs) -> Result<(), RoiError> {
    let scale = Scale::new(args.pixel_size)?;
    let collection = read_region_archive(&args.rois)?;
    let polygon = collection
        .first_of_kind(ShapeKind::Polygon)
        .ok_or_else(|| RoiError::MissingRegion {
            collection: collection.name.clone(),
            expected: ShapeKind::Polygon.to_string(),
        })?;

    let image_name = args.image_name.unwrap_or_else(|| collection.name.clone());
    let records = morph::polygon_records(&image_name, polygon, scale)?;
    morph::append_records(&args.out, &records)?;

    println!(
        "{}: {} record(s) appended to {}",
        image_name,
        records.len(),
        args.out.display()
    );
    Ok(())
}

/// Execute the points subcommand.
fn run_points(args: PointsArgs) -> Result<(), RoiError> {
    let scale = Scale::new(args.pixel_size)?;
    let collection = read_region_archive(&args.rois)?;
    let (contour, markers) = morph::split_contour_and_markers(&collection)?;
    let image_name = args.image_name.unwrap_or_else(|| collection.name.clone());
    let dump = morph::point_dump(&image_name, contour, markers, scale)?;

    let out = args.out.unwrap_or_else(|| args.rois.with_extension("csv"));
    morph::write_dump(&out, &dump)?;

    println!(
        "{}: {} measurement(s) written to {}",
        image_name,
        dump.entries.len(),
        out.display()
    );
    for label in &dump.skipped {
        println!("  skipped degenerate angle {}", label);
    }
    Ok(())
}
