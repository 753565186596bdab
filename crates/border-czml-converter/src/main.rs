//! Command-line converter from shapefile borders to CZML polyline documents

use anyhow::{Context, Result};
use border_czml_lib::{
    BorderConverter, Config, ConversionSummary, LineStyle, Reporter, optimize_document,
    read_document, read_features, write_document,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "border-czml-converter",
    version,
    about = "Convert shapefile borders to CZML polyline documents"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a shapefile into a CZML polyline document
    Convert {
        /// Input shapefile (.shp, with its .dbf alongside)
        input: PathBuf,
        /// Output CZML file
        output: PathBuf,
        /// Document name written into the CZML header
        #[arg(long, default_value = "Country Borders")]
        name: String,
        /// Base simplification tolerance in degrees
        #[arg(long, default_value_t = 0.001)]
        epsilon: f64,
        /// Polyline width in pixels
        #[arg(long, default_value_t = 1.0)]
        width: f64,
        /// Polyline color as comma-separated RGBA bytes
        #[arg(long, default_value = "255,255,255,255", value_parser = parse_rgba)]
        rgba: [u8; 4],
    },
    /// Re-simplify the polylines of an existing CZML document
    Optimize {
        /// Input CZML file
        input: PathBuf,
        /// Output CZML file
        output: PathBuf,
        /// Simplification tolerance in radians
        #[arg(long, default_value_t = 0.00005)]
        tolerance: f64,
        /// Replacement name for the document header
        #[arg(long)]
        name: Option<String>,
    },
}

fn parse_rgba(text: &str) -> std::result::Result<[u8; 4], String> {
    let channels: Vec<u8> = text
        .split(',')
        .map(|channel| channel.trim().parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid color channel: {e}"))?;
    channels
        .try_into()
        .map_err(|_| "expected exactly 4 comma-separated bytes (r,g,b,a)".to_owned())
}

/// Logs conversion progress at a fixed feature cadence.
struct LogReporter {
    every: usize,
}

impl Default for LogReporter {
    fn default() -> Self {
        Self { every: 100 }
    }
}

impl Reporter for LogReporter {
    fn feature_converted(&mut self, feature_index: usize, entities_emitted: usize) {
        let processed = feature_index + 1;
        if processed % self.every == 0 {
            tracing::info!(
                features = processed,
                polylines = entities_emitted,
                "conversion progress"
            );
        }
    }

    fn run_completed(&mut self, summary: &ConversionSummary) {
        tracing::info!(
            features = summary.features_processed,
            polylines = summary.entities_emitted,
            points_before = summary.points_before,
            points_after = summary.points_after,
            reduction_percent = summary.point_reduction_percent(),
            "conversion complete"
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    match Args::parse().command {
        Command::Convert {
            input,
            output,
            name,
            epsilon,
            width,
            rgba,
        } => run_convert(input, output, name, epsilon, LineStyle { rgba, width }),
        Command::Optimize {
            input,
            output,
            tolerance,
            name,
        } => run_optimize(input, output, tolerance, name),
    }
}

fn run_convert(
    input: PathBuf,
    output: PathBuf,
    document_name: String,
    base_epsilon: f64,
    line_style: LineStyle,
) -> Result<()> {
    let features = read_features(&input)
        .with_context(|| format!("reading shapefile {}", input.display()))?;
    tracing::info!(features = features.len(), input = %input.display(), "loaded shapefile");

    let converter = BorderConverter::new(Config {
        document_name,
        base_epsilon,
        line_style,
    });
    let (packets, _summary) = converter.convert(&features, &mut LogReporter::default());

    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("creating {}", output.display()))?,
    );
    write_document(writer, &packets)
        .with_context(|| format!("writing CZML to {}", output.display()))?;
    tracing::info!(packets = packets.len(), output = %output.display(), "wrote CZML document");

    Ok(())
}

fn run_optimize(
    input: PathBuf,
    output: PathBuf,
    tolerance: f64,
    name: Option<String>,
) -> Result<()> {
    let reader = BufReader::new(
        File::open(&input).with_context(|| format!("opening {}", input.display()))?,
    );
    let mut packets = read_document(reader)
        .with_context(|| format!("reading CZML from {}", input.display()))?;

    if let Some(name) = name
        && let Some(border_czml_lib::Packet::Document(header)) = packets.first_mut()
    {
        header.name = name;
    }

    let summary = optimize_document(&mut packets, tolerance);
    tracing::info!(
        polylines = summary.polylines,
        points_before = summary.points_before,
        points_after = summary.points_after,
        "optimized document"
    );

    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("creating {}", output.display()))?,
    );
    write_document(writer, &packets)
        .with_context(|| format!("writing CZML to {}", output.display()))?;
    tracing::info!(output = %output.display(), "wrote optimized document");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        assert_eq!(parse_rgba("255,255,255,255").unwrap(), [255, 255, 255, 255]);
        assert_eq!(parse_rgba("0, 128, 64, 32").unwrap(), [0, 128, 64, 32]);
        assert!(parse_rgba("255,255,255").is_err());
        assert!(parse_rgba("256,0,0,0").is_err());
    }

    #[test]
    fn test_cli_parses_convert() {
        let args = Args::try_parse_from([
            "border-czml-converter",
            "convert",
            "borders.shp",
            "borders.czml",
            "--epsilon",
            "0.01",
        ])
        .unwrap();
        match args.command {
            Command::Convert { epsilon, rgba, .. } => {
                assert_eq!(epsilon, 0.01);
                assert_eq!(rgba, [255, 255, 255, 255]);
            }
            _ => panic!("expected convert subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_optimize() {
        let args = Args::try_parse_from([
            "border-czml-converter",
            "optimize",
            "in.czml",
            "out.czml",
            "--name",
            "Borders (Light)",
        ])
        .unwrap();
        match args.command {
            Command::Optimize {
                tolerance, name, ..
            } => {
                assert_eq!(tolerance, 0.00005);
                assert_eq!(name.as_deref(), Some("Borders (Light)"));
            }
            _ => panic!("expected optimize subcommand"),
        }
    }
}
