use serde::{Deserialize, Serialize};

use crate::*;

/// Marks a cell carried before a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRecord {
    pub coords: Coord2,
    pub was_flagged: bool,
    pub was_question_mark: bool,
}

impl FlagRecord {
    pub(crate) fn capture(coords: Coord2, cell: Cell) -> Self {
        Self {
            coords,
            was_flagged: cell.is_flagged(),
            was_question_mark: cell.is_question_mark(),
        }
    }

    /// The cover the recorded cell had before the toggle.
    pub fn cover(&self) -> Cover {
        match (self.was_flagged, self.was_question_mark) {
            (true, _) => Cover::Flagged,
            (false, true) => Cover::Questioned,
            (false, false) => Cover::Hidden,
        }
    }
}

/// Capacity-1 history of flag toggles; the record can be undone once per game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagHistory {
    last: Option<FlagRecord>,
    used: bool,
}

impl FlagHistory {
    /// Overwrites any previous record.
    pub(crate) fn record(&mut self, record: FlagRecord) {
        self.last = Some(record);
    }

    pub fn last(&self) -> Option<FlagRecord> {
        self.last
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn can_undo(&self) -> bool {
        !self.used && self.last.is_some()
    }

    /// Hands out the record to restore and latches the history, or `None` when undo is spent or
    /// nothing was recorded.
    pub(crate) fn take_undo(&mut self) -> Option<FlagRecord> {
        if !self.can_undo() {
            return None;
        }
        self.used = true;
        self.last
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
