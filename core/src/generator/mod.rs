use crate::*;
pub use random::*;

mod random;

/// Decides where the mines go for a game.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}
