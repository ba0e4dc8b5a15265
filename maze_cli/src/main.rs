// main.rs - Command line front end: generate, inspect, relocate and export mazes

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use maze_cli::edit::{self, EditRequest, WallEdit};
use maze_cli::images;
use maze_cli::render::{export_png, render_ascii, RenderOptions};
use maze_cli::repository::JsonDirRepository;
use maze_engine::{
    Coord, Maze, MazeConfig, MazeRepository, RegionImage, RegionKind, RegionShape, Relocation,
    Scale,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding saved mazes
    #[arg(short, long, default_value = "mazes")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and save one or more mazes
    Generate(GenerateArgs),
    /// Print a saved maze
    Show {
        id: u32,
        /// Draw the solution path
        #[arg(long)]
        solution: bool,
        /// Hide entry/exit arrows
        #[arg(long)]
        no_arrows: bool,
    },
    /// List saved mazes
    List,
    /// Delete a saved maze
    Delete { id: u32 },
    /// Toggle walls or change the name, author or arrows of a saved maze
    Edit {
        id: u32,
        /// Wall change as x,y,direction,state (e.g. "3,1,east,down"); repeatable
        #[arg(long = "wall")]
        walls: Vec<WallEdit>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Show or hide entry/exit arrows
        #[arg(long)]
        arrows: Option<bool>,
    },
    /// Move the entry and/or exit of a saved maze
    Relocate {
        id: u32,
        /// e.g. "Top Left", "bottom-middle", "Upward"
        #[arg(long, default_value = "Unchanged")]
        start: Relocation,
        #[arg(long, default_value = "Unchanged")]
        finish: Relocation,
        /// Seed for the re-solve
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a saved maze as PNG
    Export {
        id: u32,
        /// Output image path; use "-" for stdout PNG
        #[arg(short, long, default_value = "maze.png")]
        output: PathBuf,
        /// Pixels per cell
        #[arg(long, default_value = "16")]
        cell_px: u32,
        /// Draw the solution path
        #[arg(long)]
        solution: bool,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Path to a MazeConfig JSON file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'W', long)]
    width: Option<usize>,

    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Start region shape, e.g. "Point" or "Medium square"
    #[arg(long)]
    start: Option<RegionShape>,

    #[arg(long)]
    finish: Option<RegionShape>,

    #[arg(long)]
    logo: Option<RegionShape>,

    /// Start image; its aspect ratio picks the start block shape
    #[arg(long)]
    start_image: Option<PathBuf>,

    #[arg(long, default_value = "small")]
    start_scale: Scale,

    /// Finish image; its aspect ratio picks the finish block shape
    #[arg(long)]
    finish_image: Option<PathBuf>,

    #[arg(long, default_value = "small")]
    finish_scale: Scale,

    /// Logo image; its aspect ratio picks the logo shape
    #[arg(long)]
    logo_image: Option<PathBuf>,

    #[arg(long, default_value = "medium")]
    logo_scale: Scale,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Seed for the first maze; the n-th maze of a batch uses seed + n
    #[arg(long)]
    seed: Option<u64>,

    /// Number of mazes to generate in parallel
    #[arg(short = 'n', long, default_value = "1")]
    count: usize,

    #[arg(long)]
    no_arrows: bool,

    /// Print each maze after saving it
    #[arg(long)]
    print: bool,
}

async fn load_config(path: &Path) -> Result<MazeConfig> {
    let s = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&s)
        .with_context(|| format!("Failed to parse maze config JSON from {}", path.display()))
}

async fn build_config(args: &GenerateArgs) -> Result<(MazeConfig, Vec<RegionImage>)> {
    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => MazeConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(shape) = args.start {
        config.start = shape;
    }
    if let Some(shape) = args.finish {
        config.finish = shape;
    }
    if args.logo.is_some() {
        config.logo = args.logo;
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if let Some(author) = &args.author {
        config.author = author.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_arrows {
        config.show_arrows = false;
    }

    let requests: Vec<(RegionKind, &Path, Scale)> = [
        (RegionKind::Start, &args.start_image, args.start_scale),
        (RegionKind::Finish, &args.finish_image, args.finish_scale),
        (RegionKind::Logo, &args.logo_image, args.logo_scale),
    ]
    .into_iter()
    .filter_map(|(kind, path, scale)| path.as_deref().map(|p| (kind, p, scale)))
    .collect();
    let images = images::size_regions(&mut config, &requests).context("Failed to read region images")?;

    config.validate().context("Invalid maze configuration")?;
    Ok((config, images))
}

async fn generate(repo: &mut JsonDirRepository, args: &GenerateArgs) -> Result<()> {
    let (config, region_images) = build_config(args).await?;
    let count = args.count.max(1);

    let mazes: Vec<Maze> = (0..count)
        .into_par_iter()
        .map(|i| {
            let mut cfg = config.clone();
            cfg.seed = config.seed.map(|s| s.wrapping_add(i as u64));
            if count > 1 {
                cfg.name = format!("{} #{}", config.name, i + 1);
            }
            Maze::generate(&cfg)
        })
        .collect::<std::result::Result<_, _>>()
        .context("Maze generation failed")?;

    for mut maze in mazes {
        images::attach_placed(&mut maze, &region_images);
        let id = maze.save(repo).context("Failed to save maze")?;
        info!(
            "Saved maze {} '{}' ({}x{}, solution {} cells, {} dead ends)",
            id,
            maze.name(),
            maze.width(),
            maze.height(),
            maze.solution_length(),
            maze.dead_end_count()
        );
        if args.print {
            let options = RenderOptions {
                show_solution: false,
                show_arrows: maze.show_arrows(),
            };
            println!("{}\n", render_ascii(&maze, options));
        }
    }
    Ok(())
}

fn load_maze(repo: &JsonDirRepository, id: u32) -> Result<Maze> {
    let snapshot = repo
        .load_by_id(id)
        .with_context(|| format!("Failed to load maze {}", id))?;
    Maze::from_snapshot(snapshot).with_context(|| format!("Maze {} is corrupt", id))
}

fn solve_or_warn(maze: &mut Maze) {
    let solved = maze.solve().map(|path| path.len());
    if let Err(e) = solved {
        warn!("Maze '{}' has no solution: {}", maze.name(), e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("Starting with {args:?}");

    let mut repo = JsonDirRepository::open(&args.store)
        .with_context(|| format!("Failed to open store {}", args.store.display()))?;
    debug!("Maze store at {}", repo.dir().display());

    match &args.command {
        Command::Generate(generate_args) => generate(&mut repo, generate_args).await?,
        Command::Show {
            id,
            solution,
            no_arrows,
        } => {
            let mut maze = load_maze(&repo, *id)?;
            if *solution {
                solve_or_warn(&mut maze);
            }
            let options = RenderOptions {
                show_solution: *solution,
                show_arrows: maze.show_arrows() && !*no_arrows,
            };
            println!("{} (by {})", maze.name(), maze.author());
            println!("{}", render_ascii(&maze, options));
        }
        Command::List => {
            for snapshot in repo.load_all().context("Failed to list mazes")? {
                println!(
                    "{:>4}  {:<24} {:<16} {:>3}x{:<3} solution {:>4}  edited {}",
                    snapshot.id.unwrap_or_default(),
                    snapshot.name,
                    snapshot.author,
                    snapshot.width,
                    snapshot.height,
                    snapshot.solution_length,
                    snapshot.last_edited.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Delete { id } => {
            repo.delete(*id)
                .with_context(|| format!("Failed to delete maze {}", id))?;
            info!("Deleted maze {}", id);
        }
        Command::Edit {
            id,
            walls,
            name,
            author,
            arrows,
        } => {
            let request = EditRequest {
                walls: walls.clone(),
                name: name.clone(),
                author: author.clone(),
                show_arrows: *arrows,
            };
            if request.is_empty() {
                warn!("Maze {}: nothing to edit", id);
                return Ok(());
            }
            let mut maze = load_maze(&repo, *id)?;
            edit::apply(&mut maze, &request).with_context(|| format!("Failed to edit maze {}", id))?;
            maze.save(&mut repo).context("Failed to save maze")?;
            info!(
                "Maze {} saved: solution {} cells, {} dead ends",
                id,
                maze.solution_length(),
                maze.dead_end_count()
            );
        }
        Command::Relocate {
            id,
            start,
            finish,
            seed,
        } => {
            let mut maze = load_maze(&repo, *id)?;
            if let Some(seed) = seed {
                maze.reseed(*seed);
            }
            if maze
                .change_entry_exit(*start, *finish)
                .context("Relocation failed")?
            {
                maze.save(&mut repo).context("Failed to save maze")?;
                let Coord { x: sx, y: sy } = maze.entry().cell;
                let Coord { x: fx, y: fy } = maze.exit().cell;
                info!("Maze {}: entry ({}, {}), exit ({}, {})", id, sx, sy, fx, fy);
            } else {
                warn!("Maze {}: relocation '{}' / '{}' rejected, nothing changed", id, start, finish);
            }
        }
        Command::Export {
            id,
            output,
            cell_px,
            solution,
        } => {
            let mut maze = load_maze(&repo, *id)?;
            if *solution {
                solve_or_warn(&mut maze);
            }
            export_png(&maze, output, *cell_px, *solution).await?;
        }
    }
    Ok(())
}
