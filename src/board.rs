//! Board core: placement checks, commit/un-draw, match clearing, column compaction,
//! the fill-threshold game over and spawning.
//!
//! Coordinates are centred on the origin with y up; see [`BoardBounds`].

use crate::config::{BoardConfig, ConfigError};
use crate::piece::{Piece, TetrominoKind};
use crate::rules::should_clear;
use crate::selector::PieceSelector;
use crate::surface::{BoardBounds, Coord, GridSurface, TileMap};
use crate::tiles::{Tile, TileSet};
use std::collections::HashSet;
use std::fmt;

/// Why spawning stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// The contiguous bottom stack reached the fill threshold.
    FillThreshold,
    /// The freshly selected piece did not fit at the spawn anchor.
    SpawnBlocked(TetrominoKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// New active piece, already drawn on the surface.
    Spawned(Piece),
    GameOver(GameOverCause),
}

/// Inputs and result of the fill-threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverCheck {
    pub total_height: i32,
    /// Completely filled rows counted from the bottom, stopping at the first gap.
    pub filled_rows: i32,
    pub remaining_height: i32,
    pub threshold_height: i32,
}

impl GameOverCheck {
    pub fn is_over(&self) -> bool {
        self.remaining_height <= self.threshold_height
    }
}

/// What a match scan removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Every cleared coordinate in record order after sorting by descending y.
    /// A cell may appear more than once.
    pub cleared: Vec<Coord>,
    /// Distinct cells among `cleared`.
    pub distinct: usize,
    /// Tiles moved down by compaction.
    pub moved: usize,
}

/// The playfield. Exclusively owns its surface; pieces are passed in per call and never kept.
#[derive(Debug)]
pub struct Board<S: GridSurface = TileMap> {
    config: BoardConfig,
    tiles: TileSet,
    surface: S,
    selector: Box<dyn PieceSelector>,
    halted: Option<GameOverCause>,
}

impl Board<TileMap> {
    pub fn new(
        config: BoardConfig,
        tiles: TileSet,
        selector: Box<dyn PieceSelector>,
    ) -> Result<Self, ConfigError> {
        Self::with_surface(config, tiles, selector, TileMap::new())
    }
}

impl<S: GridSurface> Board<S> {
    pub fn with_surface(
        config: BoardConfig,
        tiles: TileSet,
        selector: Box<dyn PieceSelector>,
        surface: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tiles,
            surface,
            selector,
            halted: None,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Recomputed from the configured size on every call.
    pub fn bounds(&self) -> BoardBounds {
        BoardBounds::centered(self.config.width, self.config.height)
    }

    /// Set once spawning has stopped; never cleared.
    pub fn halted(&self) -> Option<GameOverCause> {
        self.halted
    }

    pub fn tile_at(&self, at: Coord) -> Option<Tile> {
        self.surface.get_tile(at)
    }

    /// Kind of the tile at `at`, resolved through the tile table.
    pub fn kind_at(&self, at: Coord) -> Option<TetrominoKind> {
        self.surface.get_tile(at).map(|t| self.tiles.kind_of(t))
    }

    /// True if every cell of `piece` anchored at `position` is in bounds and empty.
    pub fn is_valid_position(&self, piece: &Piece, position: Coord) -> bool {
        let bounds = self.bounds();
        piece
            .cells_at(position)
            .into_iter()
            .all(|at| bounds.contains(at) && !self.surface.has_tile(at))
    }

    /// Draw `piece` at its anchor. No validation.
    pub fn set(&mut self, piece: &Piece) {
        let tile = self.tiles.tile_for(piece.kind);
        for at in piece.absolute_cells() {
            self.surface.set_tile(at, Some(tile));
        }
    }

    /// Un-draw `piece` from its anchor. No validation.
    pub fn clear(&mut self, piece: &Piece) {
        for at in piece.absolute_cells() {
            self.surface.set_tile(at, None);
        }
    }

    /// Match scan around a just-locked piece, then compaction of the cleared cells.
    ///
    /// Each piece cell checks its four neighbours. A pair is cleared as soon as it
    /// matches, so later checks in the same scan see those cells as empty. The piece's
    /// own kind is used for every cell, including cells already cleared by the scan.
    pub fn check_and_clear_tiles(&mut self, piece: &Piece) -> ClearReport {
        let current = piece.kind;
        let mut cleared = Vec::new();

        for at in piece.absolute_cells() {
            for dir in Coord::NEIGHBOURS_4 {
                let neighbour = at + dir;
                let Some(tile) = self.surface.get_tile(neighbour) else {
                    continue;
                };
                if should_clear(current, self.tiles.kind_of(tile)) {
                    self.surface.set_tile(at, None);
                    self.surface.set_tile(neighbour, None);
                    cleared.push(at);
                    cleared.push(neighbour);
                }
            }
        }

        let distinct = cleared.iter().collect::<HashSet<_>>().len();
        let moved = self.move_tiles_down(&mut cleared);
        ClearReport {
            cleared,
            distinct,
            moved,
        }
    }

    /// Settle tiles into cleared cells, one row step at a time, until a pass moves nothing.
    ///
    /// `cleared` is sorted by descending y. For each cleared cell the tile directly above
    /// drops into it. A source cell moves at most once per call, so a column with a gap
    /// taller than one step can be left partly settled. A cleared cell below the floor
    /// swallows the tile above it.
    ///
    /// A tile never drops onto another tile. Lists produced by a match scan always name
    /// empty cells, so this only matters when called directly with a list whose cells
    /// have since been filled.
    ///
    /// Returns the number of tiles moved.
    pub fn move_tiles_down(&mut self, cleared: &mut [Coord]) -> usize {
        cleared.sort_by(|a, b| b.y.cmp(&a.y));
        let floor = self.bounds().min.y;
        let mut processed: HashSet<Coord> = HashSet::new();
        let mut moves = 0;

        loop {
            let mut moved = false;
            for &dest in cleared.iter() {
                let above = dest + Coord::UP;
                if processed.contains(&above) {
                    continue;
                }
                let Some(tile) = self.surface.get_tile(above) else {
                    continue;
                };
                if dest.y < floor {
                    self.surface.set_tile(above, None);
                    continue;
                }
                if self.surface.has_tile(dest) {
                    continue;
                }
                self.surface.set_tile(dest, Some(tile));
                self.surface.set_tile(above, None);
                processed.insert(above);
                moved = true;
                moves += 1;
            }
            if !moved {
                break;
            }
        }
        moves
    }

    /// Evaluate the fill-threshold rule.
    pub fn game_over_check(&self) -> GameOverCheck {
        let bounds = self.bounds();
        let filled_rows = bounds
            .rows()
            .take_while(|&y| {
                bounds
                    .columns()
                    .all(|x| self.surface.has_tile(Coord::new(x, y)))
            })
            .count() as i32;
        let total_height = self.config.height;
        GameOverCheck {
            total_height,
            filled_rows,
            remaining_height: total_height - filled_rows,
            threshold_height: self.config.threshold_height(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_check().is_over()
    }

    /// Check for game over, then select, place and draw the next piece.
    ///
    /// Once this returns `GameOver` the board is halted and every later call returns the
    /// same cause without touching the surface.
    pub fn spawn_piece(&mut self) -> SpawnOutcome {
        if let Some(cause) = self.halted {
            return SpawnOutcome::GameOver(cause);
        }
        if self.is_game_over() {
            return self.halt(GameOverCause::FillThreshold);
        }

        let kind = self.selector.next_kind();
        let piece = Piece::new(kind, self.config.spawn);
        if !self.is_valid_position(&piece, piece.position) {
            return self.halt(GameOverCause::SpawnBlocked(kind));
        }
        self.set(&piece);
        SpawnOutcome::Spawned(piece)
    }

    fn halt(&mut self, cause: GameOverCause) -> SpawnOutcome {
        self.halted = Some(cause);
        SpawnOutcome::GameOver(cause)
    }
}

/// One line per row, top first; `.` for empty cells, otherwise the tile's kind letter.
impl<S: GridSurface> fmt::Display for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = self.bounds();
        for y in bounds.rows().rev() {
            for x in bounds.columns() {
                let c = self
                    .kind_at(Coord::new(x, y))
                    .map_or('.', |k| k.letter());
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Fixed;
    use ratatui::style::Color;

    fn board(kind: TetrominoKind) -> Board {
        Board::new(BoardConfig::default(), TileSet::default(), Box::new(Fixed(kind))).unwrap()
    }

    fn put(board: &mut Board, at: Coord, kind: TetrominoKind) {
        let tile = board.tiles.tile_for(kind);
        board.surface.set_tile(at, Some(tile));
    }

    fn fill_row(board: &mut Board, y: i32, kind: TetrominoKind) {
        for x in board.bounds().columns() {
            put(board, Coord::new(x, y), kind);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = BoardConfig {
            height: -4,
            ..BoardConfig::default()
        };
        let err = Board::new(config, TileSet::default(), Box::new(Fixed(TetrominoKind::I)));
        assert!(matches!(err, Err(ConfigError::InvalidSize { .. })));
        let config = BoardConfig {
            spawn: Coord::new(i32::MAX, 0),
            ..BoardConfig::default()
        };
        let err = Board::new(config, TileSet::default(), Box::new(Fixed(TetrominoKind::I)));
        assert!(matches!(err, Err(ConfigError::SpawnOutOfBounds { .. })));
    }

    #[test]
    fn test_valid_position_in_empty_board() {
        let b = board(TetrominoKind::T);
        let piece = Piece::new(TetrominoKind::T, Coord::default());
        assert!(b.is_valid_position(&piece, Coord::new(0, 0)));
        // T spans x-1..=x+1 and y..=y+1
        assert!(b.is_valid_position(&piece, Coord::new(-4, -10)));
        assert!(b.is_valid_position(&piece, Coord::new(3, 8)));
    }

    #[test]
    fn test_invalid_position_out_of_bounds() {
        let b = board(TetrominoKind::T);
        let piece = Piece::new(TetrominoKind::T, Coord::default());
        assert!(!b.is_valid_position(&piece, Coord::new(-5, 0)));
        assert!(!b.is_valid_position(&piece, Coord::new(4, 0)));
        assert!(!b.is_valid_position(&piece, Coord::new(0, -11)));
        assert!(!b.is_valid_position(&piece, Coord::new(0, 9)));
    }

    #[test]
    fn test_invalid_position_when_any_cell_occupied() {
        let mut b = board(TetrominoKind::T);
        put(&mut b, Coord::new(1, 0), TetrominoKind::O);
        let piece = Piece::new(TetrominoKind::T, Coord::default());
        assert!(!b.is_valid_position(&piece, Coord::new(0, 0)));
        assert!(!b.is_valid_position(&piece, Coord::new(2, 0)));
        assert!(b.is_valid_position(&piece, Coord::new(0, 1)));
        assert!(b.is_valid_position(&piece, Coord::new(3, 0)));
    }

    #[test]
    fn test_validation_has_no_side_effects() {
        let b = board(TetrominoKind::T);
        let piece = Piece::new(TetrominoKind::T, Coord::default());
        b.is_valid_position(&piece, Coord::new(100, 100));
        assert!(b.surface().is_empty());
    }

    #[test]
    fn test_set_then_clear_restores_empty() {
        let mut b = board(TetrominoKind::L);
        let piece = Piece::new(TetrominoKind::L, Coord::new(2, 3));
        b.set(&piece);
        assert_eq!(b.surface().len(), 4);
        for at in piece.absolute_cells() {
            assert_eq!(b.kind_at(at), Some(TetrominoKind::L));
        }
        b.clear(&piece);
        assert!(b.surface().is_empty());
    }

    #[test]
    fn test_i_next_to_t_clears_touching_pair() {
        let mut b = board(TetrominoKind::I);
        let t = Piece::new(TetrominoKind::T, Coord::new(-3, -10));
        b.set(&t);
        let i = Piece::new(TetrominoKind::I, Coord::new(0, -11));
        assert!(b.is_valid_position(&i, i.position));
        b.set(&i);

        let report = b.check_and_clear_tiles(&i);

        assert_eq!(report.distinct, 2);
        assert_eq!(report.moved, 0);
        assert!(report.cleared.contains(&Coord::new(-1, -10)));
        assert!(report.cleared.contains(&Coord::new(-2, -10)));
        assert_eq!(b.tile_at(Coord::new(-1, -10)), None);
        assert_eq!(b.tile_at(Coord::new(-2, -10)), None);
        // the rest of both pieces stays
        assert_eq!(b.surface().len(), 6);
        assert_eq!(b.kind_at(Coord::new(-3, -9)), Some(TetrominoKind::T));
        assert_eq!(b.kind_at(Coord::new(0, -10)), Some(TetrominoKind::I));
    }

    #[test]
    fn test_top_row_clear_records_center_twice() {
        let mut b = board(TetrominoKind::I);
        b.set(&Piece::new(TetrominoKind::T, Coord::new(-2, 8)));
        let i = Piece::new(TetrominoKind::I, Coord::new(0, 8));
        b.set(&i);

        let report = b.check_and_clear_tiles(&i);

        assert_eq!(
            report.cleared,
            vec![
                Coord::new(-1, 9),
                Coord::new(-2, 9),
                Coord::new(-1, 9),
                Coord::new(-1, 8),
            ]
        );
        assert_eq!(report.distinct, 3);
        assert_eq!(report.moved, 0);
        let remaining: HashSet<Coord> = b.surface().iter().map(|(at, _)| at).collect();
        let expected: HashSet<Coord> = [(-3, 8), (-2, 8), (0, 9), (1, 9), (2, 9)]
            .into_iter()
            .map(Coord::from)
            .collect();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn test_reverse_direction_does_not_clear() {
        let mut b = board(TetrominoKind::T);
        b.set(&Piece::new(TetrominoKind::I, Coord::new(0, -11)));
        // T locked on top of the I; T does not clear I
        let t = Piece::new(TetrominoKind::T, Coord::new(0, -9));
        b.set(&t);
        let report = b.check_and_clear_tiles(&t);
        assert!(report.cleared.is_empty());
        assert_eq!(b.surface().len(), 8);
    }

    #[test]
    fn test_unknown_neighbour_tile_reads_as_first_kind() {
        let mut b = board(TetrominoKind::O);
        let o = Piece::new(TetrominoKind::O, Coord::new(0, -10));
        b.set(&o);
        // O clears I, and a foreign tile resolves to I
        b.surface.set_tile(Coord::new(2, -10), Some(Tile(Color::Rgb(1, 2, 3))));
        let report = b.check_and_clear_tiles(&o);
        assert_eq!(report.distinct, 2);
        assert_eq!(b.tile_at(Coord::new(2, -10)), None);
        // the O cell above drops into the cleared one
        assert_eq!(report.moved, 1);
        assert_eq!(b.kind_at(Coord::new(1, -10)), Some(TetrominoKind::O));
        assert_eq!(b.tile_at(Coord::new(1, -9)), None);
    }

    #[test]
    fn test_clearing_drops_tile_above() {
        let mut b = board(TetrominoKind::I);
        // T tile at (-2,-10) with an O tile resting on it
        put(&mut b, Coord::new(-2, -10), TetrominoKind::T);
        put(&mut b, Coord::new(-2, -9), TetrominoKind::O);
        let i = Piece::new(TetrominoKind::I, Coord::new(0, -11));
        b.set(&i);

        let report = b.check_and_clear_tiles(&i);

        assert_eq!(report.moved, 1);
        assert_eq!(b.kind_at(Coord::new(-2, -10)), Some(TetrominoKind::O));
        assert_eq!(b.tile_at(Coord::new(-2, -9)), None);
    }

    #[test]
    fn test_compaction_settles_tall_gap_to_floor() {
        let mut b = board(TetrominoKind::I);
        let floor = b.bounds().min.y;
        put(&mut b, Coord::new(0, floor + 5), TetrominoKind::S);
        let mut cleared: Vec<Coord> = (0..5).map(|dy| Coord::new(0, floor + dy)).collect();

        let moved = b.move_tiles_down(&mut cleared);

        assert_eq!(moved, 5);
        assert_eq!(b.kind_at(Coord::new(0, floor)), Some(TetrominoKind::S));
        assert_eq!(b.surface().len(), 1);
    }

    #[test]
    fn test_compaction_tolerates_duplicates() {
        let mut b = board(TetrominoKind::I);
        put(&mut b, Coord::new(3, -8), TetrominoKind::Z);
        let mut cleared = vec![
            Coord::new(3, -9),
            Coord::new(3, -10),
            Coord::new(3, -9),
            Coord::new(3, -10),
        ];
        b.move_tiles_down(&mut cleared);
        assert_eq!(b.kind_at(Coord::new(3, -10)), Some(TetrominoKind::Z));
        assert_eq!(b.surface().len(), 1);
    }

    #[test]
    fn test_compaction_moves_each_source_once() {
        let mut b = board(TetrominoKind::I);
        put(&mut b, Coord::new(0, -9), TetrominoKind::J);
        put(&mut b, Coord::new(0, -8), TetrominoKind::L);
        let mut cleared = vec![Coord::new(0, -10)];

        assert_eq!(b.move_tiles_down(&mut cleared), 1);

        assert_eq!(b.kind_at(Coord::new(0, -10)), Some(TetrominoKind::J));
        assert_eq!(b.tile_at(Coord::new(0, -9)), None);
        assert_eq!(b.kind_at(Coord::new(0, -8)), Some(TetrominoKind::L));
    }

    #[test]
    fn test_compaction_second_run_is_noop() {
        let mut b = board(TetrominoKind::I);
        let floor = b.bounds().min.y;
        put(&mut b, Coord::new(-1, floor + 2), TetrominoKind::T);
        put(&mut b, Coord::new(2, floor + 1), TetrominoKind::O);
        let mut cleared = vec![
            Coord::new(-1, floor),
            Coord::new(-1, floor + 1),
            Coord::new(2, floor),
        ];
        assert!(b.move_tiles_down(&mut cleared) > 0);
        let after_first = b.surface().clone();

        assert_eq!(b.move_tiles_down(&mut cleared), 0);
        assert_eq!(b.surface(), &after_first);
    }

    #[test]
    fn test_compaction_never_overwrites() {
        let mut b = board(TetrominoKind::I);
        put(&mut b, Coord::new(0, -10), TetrominoKind::S);
        put(&mut b, Coord::new(0, -9), TetrominoKind::Z);
        let mut cleared = vec![Coord::new(0, -10)];
        assert_eq!(b.move_tiles_down(&mut cleared), 0);
        assert_eq!(b.surface().len(), 2);
    }

    #[test]
    fn test_compaction_below_floor_discards_tile() {
        let mut b = board(TetrominoKind::I);
        let floor = b.bounds().min.y;
        put(&mut b, Coord::new(1, floor), TetrominoKind::L);
        let mut cleared = vec![Coord::new(1, floor - 1)];
        assert_eq!(b.move_tiles_down(&mut cleared), 0);
        assert!(b.surface().is_empty());
    }

    #[test]
    fn test_game_over_at_six_filled_rows() {
        let mut b = board(TetrominoKind::I);
        for y in -10..-4 {
            fill_row(&mut b, y, TetrominoKind::S);
        }
        let check = b.game_over_check();
        assert_eq!(check.filled_rows, 6);
        assert_eq!(check.remaining_height, 14);
        assert_eq!(check.threshold_height, 14);
        assert!(check.is_over());
    }

    #[test]
    fn test_not_game_over_at_five_filled_rows() {
        let mut b = board(TetrominoKind::I);
        for y in -10..-5 {
            fill_row(&mut b, y, TetrominoKind::S);
        }
        let check = b.game_over_check();
        assert_eq!(check.remaining_height, 15);
        assert!(!check.is_over());
    }

    #[test]
    fn test_filled_rows_above_gap_not_counted() {
        let mut b = board(TetrominoKind::I);
        for y in -10..-5 {
            fill_row(&mut b, y, TetrominoKind::S);
        }
        // row -5 has a hole, rows above are full
        fill_row(&mut b, -5, TetrominoKind::S);
        b.surface.set_tile(Coord::new(4, -5), None);
        for y in -4..2 {
            fill_row(&mut b, y, TetrominoKind::S);
        }
        assert_eq!(b.game_over_check().filled_rows, 5);
        assert!(!b.is_game_over());
    }

    #[test]
    fn test_empty_board_spawns_at_anchor() {
        let mut b = board(TetrominoKind::T);
        match b.spawn_piece() {
            SpawnOutcome::Spawned(p) => {
                assert_eq!(p.kind, TetrominoKind::T);
                assert_eq!(p.position, b.config().spawn);
                for at in p.absolute_cells() {
                    assert_eq!(b.kind_at(at), Some(TetrominoKind::T));
                }
            }
            other => panic!("expected spawn, got {other:?}"),
        }
        assert_eq!(b.halted(), None);
    }

    #[test]
    fn test_game_over_halts_spawning_permanently() {
        let mut b = board(TetrominoKind::T);
        for y in -10..-4 {
            fill_row(&mut b, y, TetrominoKind::S);
        }
        let before = b.surface().clone();
        assert_eq!(
            b.spawn_piece(),
            SpawnOutcome::GameOver(GameOverCause::FillThreshold)
        );
        // clearing the stack does not resume spawning
        for y in -10..-4 {
            for x in b.bounds().columns() {
                b.surface.set_tile(Coord::new(x, y), None);
            }
        }
        assert_eq!(
            b.spawn_piece(),
            SpawnOutcome::GameOver(GameOverCause::FillThreshold)
        );
        assert!(b.surface().is_empty());
        assert_eq!(before.len(), 60);
    }

    #[test]
    fn test_blocked_spawn_halts_without_drawing() {
        let mut b = board(TetrominoKind::O);
        fill_row(&mut b, 8, TetrominoKind::Z);
        let before = b.surface().clone();
        assert_eq!(
            b.spawn_piece(),
            SpawnOutcome::GameOver(GameOverCause::SpawnBlocked(TetrominoKind::O))
        );
        assert_eq!(b.surface(), &before);
    }

    #[test]
    fn test_display_dump() {
        let config = BoardConfig {
            width: 4,
            height: 3,
            spawn: Coord::new(0, 0),
            ..BoardConfig::default()
        };
        let mut b = Board::new(config, TileSet::default(), Box::new(Fixed(TetrominoKind::I))).unwrap();
        put(&mut b, Coord::new(-2, -1), TetrominoKind::J);
        put(&mut b, Coord::new(1, 1), TetrominoKind::Z);
        assert_eq!(b.to_string(), "...Z\n....\nJ...\n");
    }
}
