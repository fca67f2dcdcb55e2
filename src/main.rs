//! # barpath CLI
//!
//! Command-line interface for rendering linear barcodes.
//!
//! ## Usage
//!
//! ```bash
//! # List available formats
//! barpath formats
//!
//! # Print an SVG to stdout
//! barpath render "ABC-123"
//!
//! # EAN-13 into a 300px viewport, saved as SVG and PNG
//! barpath render 590123412345 --format ean13 --viewport 300 --svg out.svg --png out.png
//!
//! # Options from a JSON file, geometry as JSON
//! barpath render --config label.json --json
//!
//! # HTTP server
//! barpath serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use barpath::{
    Barcode, BarcodeError, BarcodeOptions,
    render::{raster, svg},
    server::{self, ServerConfig},
    symbology::Registry,
};

/// barpath - Linear barcode renderer
#[derive(Parser, Debug)]
#[command(name = "barpath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered barcode formats
    Formats,

    /// Render a barcode
    Render {
        /// Value to encode (overrides the config file)
        value: Option<String>,

        /// Options file (JSON, camelCase keys)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Barcode format
        #[arg(long)]
        format: Option<String>,

        /// Width of a single bar
        #[arg(long)]
        width: Option<f64>,

        /// Bar height
        #[arg(long)]
        height: Option<f64>,

        /// Label shown under the bars
        #[arg(long)]
        text: Option<String>,

        /// Bar color
        #[arg(long)]
        line_color: Option<String>,

        /// Background color
        #[arg(long)]
        background: Option<String>,

        /// Available display width in pixels
        #[arg(long, default_value = "576")]
        viewport: f64,

        /// Write an SVG file
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,

        /// Write a PNG file
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Print the frame as JSON instead of SVG
        #[arg(long)]
        json: bool,

        /// Report failures and exit cleanly instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Default viewport width in pixels
        #[arg(long, default_value = "576")]
        viewport: f64,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        error!(error = %e.detail(), "barpath failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BarcodeError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Formats => {
            println!("Available formats:");
            for name in Registry::builtin().formats() {
                println!("  {}", name);
            }
            Ok(())
        }
        Commands::Render {
            value,
            config,
            format,
            width,
            height,
            text,
            line_color,
            background,
            viewport,
            svg: svg_path,
            png: png_path,
            json,
            lenient,
        } => {
            let mut options = match config {
                Some(path) => BarcodeOptions::from_json(&fs::read_to_string(path)?)?,
                None => BarcodeOptions::default(),
            };
            if let Some(value) = value {
                options.value = value;
            }
            if let Some(format) = format {
                options.format = format;
            }
            if let Some(width) = width {
                options.width = width;
            }
            if let Some(height) = height {
                options.height = height;
            }
            if text.is_some() {
                options.text = text;
            }
            if let Some(color) = line_color {
                options.line_color = color;
            }
            if let Some(color) = background {
                options.background = color;
            }

            let mut barcode = Barcode::new(options);
            let reported = Arc::new(AtomicBool::new(false));
            if lenient {
                let flag = reported.clone();
                barcode = barcode.on_error(move |err| {
                    eprintln!("Not rendered: {}", err.detail());
                    flag.store(true, Ordering::Relaxed);
                });
            }

            let Some(frame) = barcode.render(viewport)? else {
                info!(
                    reported = reported.load(Ordering::Relaxed),
                    "nothing rendered"
                );
                return Ok(());
            };

            info!(
                total_width = frame.geometry.total_width,
                rects = frame.geometry.rects.len(),
                scale = frame.fit.scale,
                "rendered barcode"
            );

            if let Some(path) = &svg_path {
                fs::write(path, svg::to_svg(&frame))?;
                println!("Saved SVG to {}", path.display());
            }
            if let Some(path) = &png_path {
                fs::write(path, raster::to_png(&frame)?)?;
                println!("Saved PNG to {}", path.display());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else if svg_path.is_none() && png_path.is_none() {
                println!("{}", svg::to_svg(&frame));
            }
            Ok(())
        }
        Commands::Serve { listen, viewport } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(ServerConfig {
                listen_addr: listen,
                viewport_width: viewport,
            }))
        }
    }
}
