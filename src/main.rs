//! # Delve Main Entry Point
//!
//! Headless driver: reads commands from stdin, runs them through the engine
//! and prints the message log and a plain-character map.

use clap::Parser;
use delve::{
    help_text, ActionOutcome, CharacterClass, DelveError, DelveResult, Difficulty, GameConfig,
    GameState, InputHandler, NullSoundSink, PlayerInput, RunState,
};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A turn-based dungeon crawler played from the terminal")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty (easy, normal, hard)
    #[arg(short, long, default_value = "normal")]
    difficulty: Difficulty,

    /// Character class (warrior, rogue, cleric)
    #[arg(short, long, default_value = "warrior")]
    class: CharacterClass,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;
    log::info!("Starting Delve v{}", delve::VERSION);

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.generation.seed = seed;
    }
    let seed = config.generation.seed;

    let mut state = GameState::new(config, StdRng::seed_from_u64(seed), Box::new(NullSoundSink))?;
    state.start_new_game(args.difficulty, args.class)?;

    run_loop(&mut state, &args)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> DelveResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .map_err(|e| DelveError::Config(format!("bad log level '{}': {}", log_level, e)))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
        tracing::debug!("tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let level: log::LevelFilter = log_level
            .parse()
            .map_err(|_| DelveError::Config(format!("bad log level '{}'", log_level)))?;
        env_logger::Builder::new()
            .filter_level(level)
            .format_target(false)
            .init();
    }

    Ok(())
}

/// Reads commands until stdin closes or the player quits.
fn run_loop(state: &mut GameState, args: &Args) -> DelveResult<()> {
    let input = InputHandler::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut shown = 0;

    print_screen(&mut stdout, state, &mut shown)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let command = match input.parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(DelveError::InvalidAction(reason)) => {
                writeln!(stdout, "{}", reason)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        match command {
            PlayerInput::Quit => {
                log::info!("player quit at depth {}", state.depth());
                break;
            }
            PlayerInput::Help => {
                writeln!(stdout, "{}", help_text())?;
            }
            PlayerInput::ShowMap => {
                print_screen(&mut stdout, state, &mut shown)?;
            }
            PlayerInput::NewGame => {
                state.start_new_game(args.difficulty, args.class)?;
                print_screen(&mut stdout, state, &mut shown)?;
            }
            PlayerInput::Act(action) => {
                let outcome = state.perform(action)?;
                // Events only feed sound here, and the sink is silent.
                state.drain_events();
                if outcome == ActionOutcome::TurnTaken {
                    print_screen(&mut stdout, state, &mut shown)?;
                } else {
                    print_new_messages(&mut stdout, state, &mut shown)?;
                }
            }
        }

        if let RunState::GameOver { outcome } = state.run_state() {
            writeln!(
                stdout,
                "Game over ({:?}) at depth {} after {} turns with {} gold. Type 'new' or 'quit'.",
                outcome,
                state.depth(),
                state.turn(),
                state.player().gold
            )?;
        }
    }

    Ok(())
}

fn print_screen(out: &mut impl Write, state: &GameState, shown: &mut u64) -> DelveResult<()> {
    writeln!(out, "{}", ascii_map(state))?;
    let player = state.player();
    writeln!(
        out,
        "Depth {}  Turn {}  HP {}/{}  Atk {}  Def {}  Lvl {} ({} XP)  Gold {}",
        state.depth(),
        state.turn(),
        player.hp,
        player.max_hp,
        player.attack,
        player.defense,
        player.level,
        player.xp,
        player.gold
    )?;
    if state.inventory_open() {
        for (slot, item) in state.inventory().iter().enumerate() {
            let cursor = if slot == state.selected_slot() { '>' } else { ' ' };
            writeln!(out, "{} {}. {}", cursor, slot + 1, item)?;
        }
    }
    print_new_messages(out, state, shown)
}

/// Prints the log entries that arrived since the last call.
fn print_new_messages(out: &mut impl Write, state: &GameState, shown: &mut u64) -> DelveResult<()> {
    for message in state.messages().since(*shown) {
        writeln!(out, "  {}", message)?;
    }
    *shown = state.messages().total();
    Ok(())
}

/// One character per cell: `@` the player, letters for monsters, `!` items,
/// tile glyphs for remembered cells and blanks for unexplored ones.
fn ascii_map(state: &GameState) -> String {
    let grid = state.grid();
    let fov = state.fov();
    let mut out = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);

    for (y, row) in grid.rows().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let pos = delve::Position::new(x as i32, y as i32);
            let glyph = if pos == state.player().position {
                '@'
            } else if fov.is_visible(pos) {
                if let Some(monster) = state.monsters().iter().find(|m| m.position == pos) {
                    monster.name.chars().next().unwrap_or('M')
                } else if state.items().iter().any(|i| i.position == pos) {
                    '!'
                } else {
                    tile.glyph
                }
            } else if fov.is_explored(pos) {
                tile.glyph
            } else {
                ' '
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
