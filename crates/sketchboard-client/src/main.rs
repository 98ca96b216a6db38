#![allow(clippy::print_stdout)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, Table};
use eyre::{Result, eyre};
use sketchboard_canvas::Canvas;
use sketchboard_client::{DEFAULT_API_URL, DEFAULT_TITLE, SketchBoard, SketchClient};
use sketchboard_core::{DataUrl, Sketch, SketchId};
use tracing_subscriber::EnvFilter;

/// Save, list, restore and delete sketch versions.
#[derive(Parser)]
#[command(name = "sketchboard", version, about, long_about = None)]
struct Cli {
    /// Base URL of the sketch API
    #[arg(long, env = "SKETCHBOARD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved versions, newest first
    List,
    /// Show one saved version
    Show { id: SketchId },
    /// Save a new version from a blank canvas or a PNG file
    Save {
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
        /// Image to draw onto the canvas before saving
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Restore a version onto the canvas and write it out as PNG
    Restore {
        id: SketchId,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Delete a saved version and its images
    Delete {
        id: SketchId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = SketchClient::new(&cli.api_url)?;
    let mut board = SketchBoard::new(client, Canvas::default());

    match cli.command {
        Commands::List => {
            let sketches = board
                .refresh()
                .await
                .map_err(|e| eyre!("Failed to load sketches: {}", e))?;
            print_sketches(sketches);
        }
        Commands::Show { id } => {
            let sketch = board.client().get(id).await?;
            print_sketches(std::slice::from_ref(&sketch));
        }
        Commands::Save { title, image } => {
            if let Some(path) = image {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;
                let data_url = DataUrl::new("image/png", bytes).encode();
                board.canvas_mut().load_image(&data_url).await?;
            }
            let sketch = board
                .save_version(&title)
                .await
                .map_err(|e| eyre!("Failed to save sketch: {}", e))?;
            println!("Version saved successfully! (ID {})", sketch.id);
        }
        Commands::Restore { id, output } => {
            let sketch = board
                .restore(id)
                .await
                .map_err(|e| eyre!("Failed to load image: {}", e))?;
            let png = board.canvas().surface().encode_png()?;
            tokio::fs::write(&output, png)
                .await
                .map_err(|e| eyre!("Failed to write {}: {}", output.display(), e))?;
            println!("Restored '{}' to {}", sketch.title, output.display());
        }
        Commands::Delete { id, force } => {
            if !force {
                print!("Are you sure you want to delete version {id}? (y/N): ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;

                if !confirmed(&input) {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
            board
                .delete(id)
                .await
                .map_err(|e| eyre!("Failed to delete sketch: {}", e))?;
            println!("Deleted version {id}");
        }
    }

    Ok(())
}

fn print_sketches(sketches: &[Sketch]) {
    if sketches.is_empty() {
        println!("No saved versions yet");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").fg(Color::Green),
        Cell::new("Title").fg(Color::Green),
        Cell::new("Created").fg(Color::Green),
        Cell::new("Image").fg(Color::Green),
    ]);
    for sketch in sketches {
        table.add_row(vec![
            Cell::new(sketch.id),
            Cell::new(&sketch.title),
            Cell::new(sketch.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&sketch.image_url),
        ]);
    }
    println!("{table}");
}

fn confirmed(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with('y')
}
