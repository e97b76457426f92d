use serde::{Deserialize, Serialize};

/// What the player currently sees on top of a cell. Exactly one cover applies at a time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    Revealed,
}

impl Cover {
    pub const fn is_unrevealed(self) -> bool {
        !matches!(self, Self::Revealed)
    }
}

/// Snapshot of a single board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    adjacent_mines: u8,
    cover: Cover,
}

impl Cell {
    pub(crate) const fn new(mine: bool, adjacent_mines: u8) -> Self {
        Self {
            mine,
            adjacent_mines,
            cover: Cover::Hidden,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.mine
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.cover, Cover::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.cover, Cover::Flagged)
    }

    pub const fn is_question_mark(self) -> bool {
        matches!(self.cover, Cover::Questioned)
    }

    /// Mines among the up-to-8 neighbors. Always 0 for mine cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn cover(self) -> Cover {
        self.cover
    }

    pub(crate) fn set_cover(&mut self, cover: Cover) {
        self.cover = cover;
    }
}
