//! delve: headless driver for the dungeon engine
//!
//! Plays a session with random four-directional input and prints the map
//! the player has uncovered.

use std::io;
use std::path::PathBuf;
use std::sync::Once;

use clap::Parser;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use delve_core::action::{ActionCommand, Direction};
use delve_core::dungeon::TileType;
use delve_core::monster::SPECIES;
use delve_core::options::GameOptions;
use delve_core::{GameLoop, GameLoopResult, GameRng};

/// Walk a generated dungeon without a terminal
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Headless dungeon crawl", long_about = None)]
struct Args {
    /// Base seed (0 picks one at random)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Map width
    #[arg(long = "width")]
    width: Option<i32>,

    /// Map height
    #[arg(long = "height")]
    height: Option<i32>,

    /// Player sight radius
    #[arg(short = 'r', long = "radius")]
    radius: Option<i32>,

    /// Number of player commands to play
    #[arg(short = 'n', long = "steps", default_value_t = 200)]
    steps: usize,

    /// Take the down stairs whenever standing on them
    #[arg(short = 'd', long = "descend")]
    descend: bool,

    /// Options file (OPTIONS=key:value lines)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print the tile legend and species table, then exit
    #[arg(long = "legend")]
    legend: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long = "log", default_value = "warn")]
    log_level: String,
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing once; RUST_LOG wins over `level`
fn init_tracing(level: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .compact();
        let _ = subscriber.try_init();
    });
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.legend {
        print_legend();
        return Ok(());
    }

    let options = build_options(&args)?;
    let mut game = GameLoop::new(options).map_err(io::Error::other)?;
    tracing::info!(seed = game.seed(), "session started");

    let mut rng = GameRng::new(game.seed());
    let outcome = play(&mut game, &mut rng, args.steps, args.descend);

    print_map(&game);
    print_status(&game, &outcome);
    Ok(())
}

fn build_options(args: &Args) -> io::Result<GameOptions> {
    let mut options = match &args.config {
        Some(path) => GameOptions::load_from_file(path).map_err(io::Error::other)?,
        None => GameOptions::default(),
    };
    if let Some(seed) = args.seed {
        options.base_seed = seed;
    }
    if let Some(width) = args.width {
        options.map_width = width;
    }
    if let Some(height) = args.height {
        options.map_height = height;
    }
    if let Some(radius) = args.radius {
        options.view_radius = radius;
    }
    options.validate().map_err(io::Error::other)?;
    Ok(options)
}

const CARDINALS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

/// Feed random input until `steps` commands are spent or the game ends
fn play(game: &mut GameLoop, rng: &mut GameRng, steps: usize, descend: bool) -> GameLoopResult {
    for _ in 0..steps {
        match game.run_until_input(100_000) {
            GameLoopResult::AwaitingInput => {}
            other => return other,
        }

        let command = match game.player_actor() {
            Some(p) if descend && game.grid().at(p.pos.x, p.pos.y).typ == TileType::StairsDown => {
                ActionCommand::Descend
            }
            Some(p) => {
                let open: Vec<Direction> = CARDINALS
                    .iter()
                    .copied()
                    .filter(|d| {
                        let (dx, dy) = d.delta();
                        game.grid().is_walkable(p.pos.x + dx, p.pos.y + dy)
                    })
                    .collect();
                rng.choose(&open)
                    .map_or(ActionCommand::Wait, |&d| ActionCommand::step(d))
            }
            None => return GameLoopResult::GameOver,
        };
        game.submit_player_command(command);
    }
    GameLoopResult::Continue
}

fn print_map(game: &GameLoop) {
    let grid = game.grid();
    let registry = game.registry();
    for y in 0..grid.height() {
        let row: String = (0..grid.width())
            .map(|x| {
                let tile = grid.at(x, y);
                if tile.visible {
                    tile.occupant
                        .and_then(|id| registry.actor(id))
                        .map_or(tile.typ.symbol(), |a| a.symbol)
                } else if tile.explored {
                    tile.typ.symbol()
                } else {
                    ' '
                }
            })
            .collect();
        println!("{}", row.trim_end());
    }
}

fn print_status(game: &GameLoop, outcome: &GameLoopResult) {
    println!();
    if let Some(player) = game.player_actor() {
        let hp = player.health.map_or((0, 0), |h| (h.current, h.max));
        let level = player.experience.map_or(1, |e| e.level);
        println!(
            "Floor {}  HP {}/{}  Lvl {}  Turns {}  Seed {}",
            game.floor(),
            hp.0,
            hp.1,
            level,
            game.turn_count(),
            game.seed()
        );
    }
    let messages: Vec<&str> = game.messages().collect();
    for msg in &messages[messages.len().saturating_sub(5)..] {
        println!("{msg}");
    }
    match outcome {
        GameLoopResult::PlayerDied(reason) => println!("You were {reason}."),
        GameLoopResult::GameOver => println!("Game over."),
        _ => {}
    }
}

fn print_legend() {
    println!("Tiles:");
    for typ in TileType::iter() {
        let walk = if typ.is_walkable() { "walkable" } else { "blocked" };
        println!("  {}  {:<10} {}", typ.symbol(), typ.to_string(), walk);
    }
    println!();
    println!("Monsters:");
    for s in SPECIES {
        println!(
            "  {}  {:<9} floors {}-{}  hp {:>2}  {}",
            s.symbol, s.name, s.min_floor, s.max_floor, s.hp, s.description
        );
    }
}
