//! # Delve Command Line Entry Point
//!
//! Generates a dungeon from command line or JSON configuration, optionally routes
//! between its first and last rooms, and prints an ASCII dump or a JSON document.

use clap::Parser;
use delve::{
    generate, AStar, DelveError, DelveResult, Dungeon, GenerationConfig, GridPathCost, Movement,
    Path, Position, SearchOutcome,
};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Command line arguments for the dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Seeded room-and-corridor dungeon layouts with grid A* routing")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board width in tiles
    #[arg(long)]
    columns: Option<u32>,

    /// Board height in tiles
    #[arg(long)]
    rows: Option<u32>,

    /// JSON file holding a full generation configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route from a random tile in the first room to one in the last room
    #[arg(long)]
    route: bool,

    /// Restrict routing to orthogonal steps
    #[arg(long)]
    four_way: bool,

    /// Print JSON instead of an ASCII map
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Everything printed in JSON mode.
#[derive(Serialize)]
struct Report<'a> {
    config: &'a GenerationConfig,
    dungeon: &'a Dungeon,
    route: Option<&'a Path>,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level)?;

    info!("Starting delve v{}", delve::VERSION);

    let config = build_config(&args)?;
    let dungeon = generate(&config)?;
    info!(
        "Generated {} rooms on a {}x{} board (seed {})",
        dungeon.rooms.len(),
        dungeon.columns(),
        dungeon.rows(),
        dungeon.seed
    );

    let route = if args.route {
        plan_route(&dungeon, &args)?
    } else {
        None
    };

    if args.json {
        let report = Report {
            config: &config,
            dungeon: &dungeon,
            route: route.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_ascii(&dungeon, route.as_ref()));
        if let Some(path) = &route {
            println!("route: {} steps, cost {:.3}", path.step_count(), path.cost());
        }
    }

    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> DelveResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| DelveError::InvalidState(format!("Logging setup failed: {e}")))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .try_init()
            .map_err(|e| DelveError::InvalidState(format!("Logging setup failed: {e}")))?;
    }

    Ok(())
}

/// Layers command line overrides on top of the config file or the defaults.
fn build_config(args: &Args) -> DelveResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => GenerationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    } else if args.config.is_none() {
        config.seed = rand::random();
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }

    config.validate()?;
    Ok(config)
}

/// Routes from a random tile in the first room to a random tile in the last room.
fn plan_route(dungeon: &Dungeon, args: &Args) -> DelveResult<Option<Path>> {
    let mut rng = StdRng::seed_from_u64(dungeon.seed.wrapping_add(1));
    let start = dungeon.random_floor_in_room(0, &mut rng)?;
    let goal = dungeon.random_floor_in_room(dungeon.rooms.len() - 1, &mut rng)?;

    let movement = if args.four_way {
        Movement::FourWay
    } else {
        Movement::EightWay
    };
    let cost = GridPathCost::new(&dungeon.grid).with_movement(movement);

    match AStar::new(cost).find_path(start, goal) {
        SearchOutcome::Found(path) => Ok(Some(path)),
        outcome => {
            warn!("No route from {} to {}: {:?}", start, goal, outcome);
            Ok(None)
        }
    }
}

/// Dumps the dungeon with its outer wall ring, north row first.
///
/// Route cells are drawn as `*`, with `S` and `G` marking its ends.
fn render_ascii(dungeon: &Dungeon, route: Option<&Path>) -> String {
    let on_route: HashSet<Position> = route
        .map(|path| path.positions().iter().copied().collect())
        .unwrap_or_default();
    let start = route.and_then(Path::start);
    let goal = route.and_then(Path::goal);

    let columns = dungeon.columns() as i32;
    let rows = dungeon.rows() as i32;
    let mut out = String::with_capacity(((columns + 3) * (rows + 2)) as usize);

    for y in (-1..=rows).rev() {
        for x in -1..=columns {
            let pos = Position::new(x, y);
            let c = match dungeon.grid.get(pos) {
                None => '#',
                Some(_) if Some(pos) == start => 'S',
                Some(_) if Some(pos) == goal => 'G',
                Some(_) if on_route.contains(&pos) => '*',
                Some(tile) => tile.to_char(),
            };
            out.push(c);
        }
        out.push('\n');
    }

    out
}
