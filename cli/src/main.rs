use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use shashin_core::{
    initial_position, resolve_photos, scatter_grid, EngineConfig, ItemSize, LayoutSpace,
};

mod sim;

use sim::{ResizeStep, SimulationPlan};

#[derive(Serialize)]
struct LayoutRow {
    index: usize,
    name: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Parser)]
#[command(name = "shashin-cli", version, about = "Headless tools for the floating photo collage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct CollageArgs {
    /// Photo names; the bundled collection is used when neither this nor
    /// --count is given.
    #[arg(long = "photo")]
    photos: Vec<String>,
    /// Number of synthetic photos to lay out.
    #[arg(long)]
    count: Option<usize>,
    #[arg(long, default_value_t = 1200.0)]
    width: f64,
    #[arg(long, default_value_t = 800.0)]
    height: f64,
    #[arg(long, env = "SHASHIN_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine for a number of frames and report final positions.
    Simulate {
        #[command(flatten)]
        collage: CollageArgs,
        #[arg(long, default_value_t = 600)]
        frames: u32,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Resize the space mid-run, as WIDTHxHEIGHT.
        #[arg(long)]
        resize_to: Option<String>,
        #[arg(long)]
        resize_at: Option<u32>,
        /// Number of scripted drags performed during the run.
        #[arg(long, default_value_t = 0)]
        drags: u32,
        #[arg(long)]
        seed: Option<String>,
    },
    /// Print the initial scatter layout without running physics.
    Layout {
        #[command(flatten)]
        collage: CollageArgs,
    },
    /// Print the effective engine configuration as TOML.
    Config {
        #[arg(long, env = "SHASHIN_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            collage,
            frames,
            fps,
            resize_to,
            resize_at,
            drags,
            seed,
        } => {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(format!("fps must be positive, got {fps}").into());
            }
            let config = load_config(collage.config.as_ref())?;
            let resize = match resize_to.as_deref() {
                Some(raw) => {
                    let (width, height) = parse_dimensions(raw)?;
                    Some(ResizeStep {
                        at_frame: resize_at.unwrap_or(frames / 2),
                        width,
                        height,
                    })
                }
                None => None,
            };
            let seed = match seed.as_deref() {
                Some(raw) => parse_seed_arg(raw)?,
                None => 0,
            };
            let plan = SimulationPlan {
                photos: photo_list(&collage),
                width: collage.width,
                height: collage.height,
                frames,
                fps,
                resize,
                drags,
                seed,
            };
            let report = sim::run(&plan, config);
            if collage.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "frames: {} space: {}x{} scale: {} contained: {}",
                    report.frames, report.width, report.height, report.scale, report.contained
                );
                for item in &report.items {
                    println!(
                        "  [{}] {:>8.2} {:>8.2}  {:>6.1}x{:<6.1} {:>5.1}deg  {}",
                        item.index,
                        item.x,
                        item.y,
                        item.width,
                        item.height,
                        item.angle_deg,
                        item.name
                    );
                }
            }
            if !report.contained {
                eprintln!("{} item-frames escaped their bounds", report.escapes);
                std::process::exit(2);
            }
        }
        Commands::Layout { collage } => {
            let config = load_config(collage.config.as_ref())?;
            let photos = photo_list(&collage);
            let space = LayoutSpace::new(collage.width, collage.height);
            if !space.is_measured() {
                return Err(format!("invalid space {}x{}", collage.width, collage.height).into());
            }
            let Some(grid) = scatter_grid(photos.len(), space.aspect_ratio()) else {
                println!("no photos");
                return Ok(());
            };
            let scale = config.scale_for_width(space.width);
            let padding = config.padding_for_scale(scale);
            let mut rows = Vec::with_capacity(photos.len());
            for (index, name) in photos.iter().enumerate() {
                let base = shashin_core::seed::item_size(index, config.size_min, config.size_range);
                let size = ItemSize::scaled(base, scale, config.photo_aspect);
                let Some(pos) =
                    initial_position(&grid, index, space, size, padding, config.jitter_ratio)
                else {
                    continue;
                };
                rows.push(LayoutRow {
                    index,
                    name: name.clone(),
                    x: pos.0,
                    y: pos.1,
                    width: size.width,
                    height: size.height,
                });
            }
            if collage.json {
                let doc = serde_json::json!({
                    "cols": grid.cols,
                    "rows": grid.rows,
                    "scale": scale,
                    "items": rows,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("grid: {}x{} scale: {}", grid.cols, grid.rows, scale);
                for row in &rows {
                    println!(
                        "  [{}] {:>8.2} {:>8.2}  {}",
                        row.index, row.x, row.y, row.name
                    );
                }
            }
        }
        Commands::Config { config } => {
            let config = load_config(config.as_ref())?;
            print!("{}", toml::to_string(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
    Ok(EngineConfig::from_toml_str(&raw)?)
}

fn photo_list(args: &CollageArgs) -> Vec<String> {
    if !args.photos.is_empty() {
        return resolve_photos(Some(args.photos.clone()));
    }
    match args.count {
        Some(count) => (0..count).map(|i| format!("photo-{i}.jpg")).collect(),
        None => resolve_photos(None),
    }
}

fn parse_dimensions(raw: &str) -> Result<(f64, f64), Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let (w, h) = trimmed
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {trimmed}"))?;
    Ok((w.trim().parse::<f64>()?, h.trim().parse::<f64>()?))
}

fn parse_seed_arg(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u64>()?
    };
    Ok(value)
}
