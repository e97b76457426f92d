use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Notification for whoever presents the board.
///
/// A command queues at most one `StateChanged`. When the command ends the game, `GameEnded`
/// follows it, for a win as well as a loss.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Cells or counters may have changed, the consumer should re-read the board.
    StateChanged,
    /// The game reached a terminal state, queued once per game.
    GameEnded { victory: bool },
}

/// Pending notifications, drained by the consumer between commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQueue {
    events: Vec<EngineEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: EngineEvent) {
        log::trace!("Queued {:?}", event);
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> alloc::vec::Drain<'_, EngineEvent> {
        self.events.drain(..)
    }
}
