//! Random generation of players, directions and moves, for bots and tests.
use rand::{
    distributions::{Distribution, Standard},
    seq::SliceRandom,
    Rng,
};

use crate::{
    board::Direction,
    game::{GameModel, Move, Player, Session},
};

impl Distribution<Player> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Player {
        if rng.gen() {
            Player::First
        } else {
            Player::Second
        }
    }
}

impl Distribution<Direction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.gen_range(0, Direction::ALL.len())]
    }
}

impl Session {
    /// Pick one of the current player's legal moves uniformly at random. `None` once the
    /// game is over.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.legal_moves().choose(rng).copied()
    }
}

impl GameModel {
    /// Pick one of the current player's legal moves uniformly at random.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.session().random_move(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TableSize;

    #[test]
    fn random_games_always_finish() {
        let mut rng = rand::thread_rng();
        for &size in TableSize::ALL {
            let mut model = GameModel::new(size);
            let mut moves = 0;
            while let Some(mv) = model.random_move(&mut rng) {
                assert!(model.player_clicked(mv));
                moves += 1;
            }
            assert!(model.is_over());
            assert!(model.winner().is_some());
            assert_eq!(moves, size.total_size());
        }
    }
}
