use alloc::collections::VecDeque;
use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Playing (first reveal places the mines)
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Board allocated, no mines placed yet
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Rules engine for one board: owns the grid and drives reveal, flag, chord and undo.
///
/// Commands never fail. Anything that does not apply to the current board is ignored, and the
/// only trace of it is a `NoChange` outcome with nothing queued in [`Minesweeper::drain_events`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minesweeper {
    config: GameConfig,
    grid: Array2<Cell>,
    revealed_count: CellCount,
    state: GameState,
    flag_history: FlagHistory,
    triggered_mine: Option<Coord2>,
    seed: u64,
    #[serde(skip)]
    events: EventQueue,
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Minesweeper {
    /// Empty engine with a random seed, call [`Self::start_game`] before playing.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Empty engine whose mine placements are fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GameConfig::EMPTY,
            grid: Array2::default(GameConfig::EMPTY.size.to_nd_index()),
            revealed_count: 0,
            state: GameState::Ready,
            flag_history: FlagHistory::default(),
            triggered_mine: None,
            seed,
            events: EventQueue::default(),
        }
    }

    /// Engine over a fixed mine layout, already in play.
    pub fn from_layout(mine_layout: MineLayout) -> Self {
        Self {
            config: mine_layout.game_config(),
            grid: mine_layout.to_cells(),
            state: GameState::Playing,
            ..Self::default()
        }
    }

    pub fn start_game(&mut self, rows: Coord, cols: Coord, mine_count: CellCount) {
        self.start_with_config(GameConfig::new((rows, cols), mine_count));
    }

    pub fn start_with_config(&mut self, config: GameConfig) {
        self.config = config;
        self.grid = Array2::default(config.size.to_nd_index());
        self.revealed_count = 0;
        self.state = GameState::Ready;
        self.flag_history.reset();
        self.triggered_mine = None;
        log::debug!(
            "New game on a {}x{} board with {} mines",
            config.rows(),
            config.cols(),
            config.mines
        );
        self.events.push(EngineEvent::StateChanged);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn cols(&self) -> Coord {
        self.config.cols()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cell_count()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.grid.get(coords.to_nd_index()).copied()
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.grid
    }

    pub fn flag_count(&self) -> CellCount {
        self.grid.iter().filter(|cell| cell.is_flagged()).count() as CellCount
    }

    /// How many mines have not been flagged yet
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flag_count() as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn can_undo(&self) -> bool {
        !self.is_finished() && self.flag_history.can_undo()
    }

    pub fn flag_history(&self) -> FlagHistory {
        self.flag_history
    }

    /// Whether revealing `coords` would open its neighbors.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.state.is_finished() {
            return false;
        }

        match self.cell_at(coords) {
            Some(cell) if cell.is_revealed() && cell.adjacent_mines() > 0 => {
                cell.adjacent_mines() == self.count_flagged_neighbors(coords)
            }
            _ => false,
        }
    }

    /// Hands out the notifications queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> alloc::vec::Drain<'_, EngineEvent> {
        self.events.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Reveals a cell, or chords when it is an already revealed number.
    pub fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let outcome = match self.cell_at(coords) {
            Some(cell) if cell.is_revealed() && cell.adjacent_mines() > 0 => self.chord(coords),
            _ => self.reveal_single_cell(coords),
        };
        self.notify(outcome);
        outcome
    }

    pub fn flag_cell(&mut self, coords: Coord2) -> MarkOutcome {
        let Some(cell) = self.markable_cell(coords) else {
            return MarkOutcome::NoChange;
        };

        // the attempt is recorded even when no flags are left
        self.flag_history.record(FlagRecord::capture(coords, cell));

        let next = if cell.is_flagged() {
            Cover::Hidden
        } else if self.flag_count() >= self.config.mines {
            log::trace!("No flags left for {:?}", coords);
            return MarkOutcome::NoChange;
        } else {
            Cover::Flagged
        };
        self.set_cover(coords, next)
    }

    /// Toggles the question mark, which replaces a flag.
    pub fn cycle_cell_mark(&mut self, coords: Coord2) -> MarkOutcome {
        let Some(cell) = self.markable_cell(coords) else {
            return MarkOutcome::NoChange;
        };

        let next = if cell.is_question_mark() {
            Cover::Hidden
        } else {
            Cover::Questioned
        };
        self.set_cover(coords, next)
    }

    /// Restores the cell touched by the most recent flag toggle, once per game.
    pub fn undo_last_flag(&mut self) -> MarkOutcome {
        if self.state.is_finished() {
            log::trace!("Undo ignored, game already ended");
            return MarkOutcome::NoChange;
        }

        let record = match self.flag_history.last() {
            Some(record) if self.config.contains(record.coords) => record,
            _ => return MarkOutcome::NoChange,
        };
        if self.cell_at(record.coords).is_some_and(|cell| cell.is_revealed()) {
            log::trace!("Undo ignored, {:?} is already revealed", record.coords);
            return MarkOutcome::NoChange;
        }
        if self.flag_history.take_undo().is_none() {
            log::trace!("Undo already used this game");
            return MarkOutcome::NoChange;
        }

        self.set_cover(record.coords, record.cover())
    }

    /// Guard shared by the marking commands: the cell exists, is covered and the game is on.
    fn markable_cell(&self, coords: Coord2) -> Option<Cell> {
        if self.state.is_finished() {
            log::trace!("Mark at {:?} ignored, game already ended", coords);
            return None;
        }
        self.cell_at(coords).filter(|cell| !cell.is_revealed())
    }

    fn set_cover(&mut self, coords: Coord2, cover: Cover) -> MarkOutcome {
        self.grid[coords.to_nd_index()].set_cover(cover);
        self.events.push(EngineEvent::StateChanged);
        MarkOutcome::Changed
    }

    /// Opens every covered neighbor when the flags around a number match it.
    fn chord(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.cell_at(coords) else {
            return RevealOutcome::NoChange;
        };
        if cell.adjacent_mines() != self.count_flagged_neighbors(coords) {
            log::trace!("Chord at {:?} ignored, flags do not match", coords);
            return RevealOutcome::NoChange;
        }

        let covered: alloc::vec::Vec<_> = self
            .grid
            .iter_neighbors(coords)
            .filter(|&pos| self.grid[pos.to_nd_index()].cover().is_unrevealed())
            .collect();

        covered
            .into_iter()
            .map(|neighbor_coords| self.reveal_single_cell(neighbor_coords))
            .fold(RevealOutcome::NoChange, BitOr::bitor)
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.cell_at(coords) else {
            log::trace!("Reveal at {:?} ignored, out of bounds", coords);
            return RevealOutcome::NoChange;
        };
        if cell.is_revealed() || cell.is_flagged() || self.state.is_finished() {
            return RevealOutcome::NoChange;
        }

        if self.state.is_ready() {
            self.place_mines(coords);
        }

        self.grid[coords.to_nd_index()].set_cover(Cover::Revealed);
        let cell = self.grid[coords.to_nd_index()];

        if cell.is_mine() {
            self.triggered_mine = Some(coords);
            self.state = GameState::Lost;
            log::debug!("Mine hit at {:?}, game lost", coords);
            return RevealOutcome::HitMine;
        }

        self.revealed_count += 1;
        log::trace!(
            "Revealed {:?}, adjacent mines: {}",
            coords,
            cell.adjacent_mines()
        );

        if cell.adjacent_mines() == 0 {
            self.flood_reveal(coords);
        }

        if self.revealed_count == self.config.safe_cell_count() {
            self.state = GameState::Won;
            log::debug!("All {} safe cells revealed, game won", self.revealed_count);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Places the mines around the first revealed cell and moves the game into play.
    fn place_mines(&mut self, start: Coord2) {
        let generator = RandomMinefieldGenerator::new(self.seed, start);
        self.seed = RandomMinefieldGenerator::next_seed(self.seed);
        let placed = generator.generate(self.config).to_cells();

        // marks made before the first reveal stay on the board
        for (cell, placed) in self.grid.iter_mut().zip(placed.iter()) {
            let cover = cell.cover();
            *cell = *placed;
            cell.set_cover(cover);
        }
        self.state = GameState::Playing;
    }

    /// Opens the zero region around `origin`, stopping at numbers and flags.
    fn flood_reveal(&mut self, origin: Coord2) {
        let mut to_visit: VecDeque<_> = self.grid.iter_neighbors(origin).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            let visit_cell = &mut self.grid[visit_coords.to_nd_index()];
            if visit_cell.is_revealed() || visit_cell.is_flagged() || visit_cell.is_mine() {
                continue;
            }

            visit_cell.set_cover(Cover::Revealed);
            let visit_adjacent_mines = visit_cell.adjacent_mines();
            self.revealed_count += 1;

            if visit_adjacent_mines == 0 {
                let grid = &self.grid;
                to_visit.extend(
                    grid.iter_neighbors(visit_coords)
                        .filter(|&pos| grid[pos.to_nd_index()].cover().is_unrevealed()),
                );
            }
        }
    }

    /// Queues the notifications for a finished reveal command.
    fn notify(&mut self, outcome: RevealOutcome) {
        if !outcome.has_update() {
            return;
        }
        self.events.push(EngineEvent::StateChanged);
        if outcome.ends_game() {
            self.events.push(EngineEvent::GameEnded {
                victory: self.state == GameState::Won,
            });
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.grid
            .iter_neighbors(coords)
            .filter(|&pos| self.grid[pos.to_nd_index()].is_flagged())
            .count() as u8
    }
}
