//! Matchtrix — headless autoplayer for the match-clearing falling-block board.

mod app;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use matchtrix::config::{
    DEFAULT_FILL_THRESHOLD_PERCENT, DEFAULT_HEIGHT, DEFAULT_SPAWN, DEFAULT_WIDTH,
};
use matchtrix::{Bag, Board, BoardConfig, Coord, GameState, PieceSelector, TileSet, UniformSelector};

fn main() -> Result<()> {
    let args = Args::parse();
    let tiles = TileSet::load(args.tiles.as_deref()).context("loading tile file")?;
    let config = BoardConfig {
        width: args.width,
        height: args.height,
        spawn: Coord::new(args.spawn_x, args.spawn_y),
        fill_threshold_percent: args.fill_threshold,
    };
    let selector: Box<dyn PieceSelector> = match args.selector {
        SelectorKind::Uniform => Box::new(UniformSelector::new(args.seed)),
        SelectorKind::Bag => Box::new(Bag::new(args.seed)),
    };
    let board = Board::new(config, tiles, selector).context("invalid board configuration")?;
    let mut app = App::new(args, GameState::new(board));
    app.run()?;
    Ok(())
}

/// Drops random pieces on a match-clearing board until the game ends.
#[derive(Debug, Parser)]
#[command(
    name = "matchtrix",
    version,
    about = "Headless autoplayer for a falling-block board where rival piece kinds clear on contact.",
    long_about = "Matchtrix plays random pieces on a board where touching pieces of rival kinds clear \
        each other: I/J/S clear T/Z, O/L clear I/J/S, T/Z clear O/L. Tiles above a cleared cell \
        settle downward. The game ends once the filled rows stacked from the bottom leave no \
        more than the threshold share of the board free."
)]
pub struct Args {
    /// Board width in cells.
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_name = "COLS")]
    pub width: i32,

    /// Board height in cells.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_name = "ROWS")]
    pub height: i32,

    /// Spawn anchor x (board is centred on the origin).
    #[arg(long, default_value_t = DEFAULT_SPAWN.x, allow_negative_numbers = true)]
    pub spawn_x: i32,

    /// Spawn anchor y (y grows upward).
    #[arg(long, default_value_t = DEFAULT_SPAWN.y, allow_negative_numbers = true)]
    pub spawn_y: i32,

    /// Game over once free height above the bottom stack is at most this percent of the board.
    #[arg(long, default_value_t = DEFAULT_FILL_THRESHOLD_PERCENT, value_name = "PERCENT")]
    pub fill_threshold: u32,

    /// Seed for piece selection and the autoplayer.
    #[arg(long, default_value_t = 0x1234_5678)]
    pub seed: u32,

    /// How the next piece kind is chosen.
    #[arg(long, default_value = "uniform")]
    pub selector: SelectorKind,

    /// Tile file with `tile[K]="#RRGGBB"` overrides. Uses One Dark if not set.
    #[arg(long, value_name = "FILE")]
    pub tiles: Option<std::path::PathBuf>,

    /// Stop after this many locked pieces even if the game is still running.
    #[arg(long, default_value_t = 500, value_name = "N")]
    pub max_pieces: u32,

    /// Print the final board.
    #[arg(long)]
    pub print_board: bool,

    /// Print every lock and the game-over heights.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SelectorKind {
    /// Every kind equally likely on every draw.
    #[default]
    Uniform,
    /// Shuffled bag of all seven kinds.
    #[value(alias = "7bag")]
    Bag,
}
