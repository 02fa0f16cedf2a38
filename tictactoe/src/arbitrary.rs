use crate::{Histories, Position};

/// A board size small enough to keep property tests fast.
#[derive(Clone, Debug)]
pub struct BoardSize(pub u32);

impl quickcheck::Arbitrary for BoardSize {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        BoardSize(3 + u32::arbitrary(g) % 6)
    }
}

/// Every cell of a board in a random order, to be played alternately
/// starting with player 1.
#[derive(Clone, Debug)]
pub struct Playout {
    pub board_size: u32,
    pub moves: Vec<Position>,
}

impl Playout {
    /// The histories after the first `num_moves` moves.
    pub fn histories_after(&self, num_moves: usize) -> Histories {
        let mut histories = Histories::new();
        for (idx, &position) in self.moves[..num_moves].iter().enumerate() {
            histories.0[idx % 2].push(position);
        }
        histories
    }
}

impl quickcheck::Arbitrary for Playout {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let board_size = 3 + u32::arbitrary(g) % 4;
        let mut moves: Vec<Position> = (1..=board_size * board_size).collect();
        // Fisher-Yates, since Gen doesn't expose its RNG
        for i in (1..moves.len()).rev() {
            let j = usize::arbitrary(g) % (i + 1);
            moves.swap(i, j);
        }
        Playout { board_size, moves }
    }
}
