//! Games made of identically-faced weighted dice.

use log::debug;
use rand::Rng;

use crate::die::WeightedDie;
use crate::error::{ArgumentError, DiceResult};
use crate::face::Face;
use crate::rng::RngStreams;
use crate::table::{PlayTable, PlayView, TableFormat};

/// An ordered set of dice rolled together.
///
/// Every die shares the same face values. Only the most recent play is kept.
#[derive(Debug, Clone)]
pub struct DiceGame<F> {
    dice: Vec<WeightedDie<F>>,
    faces: Vec<F>,
    streams: RngStreams,
    plays: u64,
    last_play: Option<PlayTable<F>>,
}

impl<F: Face> DiceGame<F> {
    /// Create a game seeded from operating system entropy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `dice` is empty or the dice do not
    /// share the same face values.
    pub fn new(dice: Vec<WeightedDie<F>>) -> DiceResult<Self> {
        Self::with_streams(dice, RngStreams::from_entropy())
    }

    /// Create a game whose plays are reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`DiceGame::new`].
    pub fn with_seed(dice: Vec<WeightedDie<F>>, seed: u64) -> DiceResult<Self> {
        Self::with_streams(dice, RngStreams::from_user_seed(seed))
    }

    fn with_streams(dice: Vec<WeightedDie<F>>, streams: RngStreams) -> DiceResult<Self> {
        let first = dice.first().ok_or(ArgumentError::EmptyDice)?;
        if let Some(die) = dice.iter().position(|die| !die.same_faces(first)) {
            return Err(ArgumentError::MismatchedDice { die }.into());
        }
        let faces = first.faces().to_vec();
        Ok(Self {
            dice,
            faces,
            streams,
            plays: 0,
            last_play: None,
        })
    }

    #[must_use]
    pub fn dice(&self) -> &[WeightedDie<F>] {
        &self.dice
    }

    /// Mutable access for adjusting weights between plays.
    pub fn dice_mut(&mut self) -> &mut [WeightedDie<F>] {
        &mut self.dice
    }

    #[must_use]
    pub fn num_dice(&self) -> usize {
        self.dice.len()
    }

    /// Face set shared by every die, in the order the first die declares it.
    #[must_use]
    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.streams.seed()
    }

    /// Number of completed plays.
    #[must_use]
    pub const fn plays(&self) -> u64 {
        self.plays
    }

    /// Roll every die `n` times, each from its own stream, replacing the last play.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `n` is zero or a die has only zero weights.
    /// The previous play is kept on failure.
    pub fn play(&mut self, n: usize) -> DiceResult<()> {
        let play = self.plays;
        let columns = self
            .dice
            .iter()
            .enumerate()
            .map(|(idx, die)| die.roll_with_rng(n, &mut self.streams.die_stream(play, idx)))
            .collect::<DiceResult<Vec<_>>>()?;
        self.store(columns);
        Ok(())
    }

    /// Roll every die `n` times from a caller-supplied generator, in die order.
    ///
    /// # Errors
    ///
    /// Same as [`DiceGame::play`].
    pub fn play_with_rng<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> DiceResult<()> {
        let columns = self
            .dice
            .iter()
            .map(|die| die.roll_with_rng(n, rng))
            .collect::<DiceResult<Vec<_>>>()?;
        self.store(columns);
        Ok(())
    }

    fn store(&mut self, columns: Vec<Vec<F>>) {
        let table = PlayTable::from_columns(columns);
        debug!(
            "play {} stored {} rolls x {} dice",
            self.plays,
            table.n_rolls(),
            table.n_dice()
        );
        self.plays += 1;
        self.last_play = Some(table);
    }

    /// The stored wide table, or `None` before the first play.
    #[must_use]
    pub fn last_play(&self) -> Option<&PlayTable<F>> {
        self.last_play.as_ref()
    }

    /// Most recent play in the requested layout, or `None` before the first play.
    #[must_use]
    pub fn most_recent_play(&self, format: TableFormat) -> Option<PlayView<'_, F>> {
        let table = self.last_play.as_ref()?;
        Some(match format {
            TableFormat::Wide => PlayView::Wide(table),
            TableFormat::Narrow => PlayView::Narrow(table.to_narrow()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiceError;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn d6() -> WeightedDie<i64> {
        WeightedDie::new(1..=6).unwrap()
    }

    #[test]
    fn empty_dice_list_is_rejected() {
        let err = DiceGame::<i64>::new(Vec::new()).unwrap_err();
        assert_eq!(err, DiceError::InvalidArgument(ArgumentError::EmptyDice));
    }

    #[test]
    fn mismatched_dice_are_rejected() {
        let coin = WeightedDie::new([1, 2]).unwrap();
        let err = DiceGame::new(vec![d6(), coin]).unwrap_err();
        assert_eq!(
            err,
            DiceError::InvalidArgument(ArgumentError::MismatchedDice { die: 1 })
        );

        let shifted = WeightedDie::new(2..=7).unwrap();
        assert!(DiceGame::new(vec![d6(), shifted]).is_err());
    }

    #[test]
    fn face_order_may_differ_between_dice() {
        let reversed = WeightedDie::new((1..=6).rev()).unwrap();
        let game = DiceGame::new(vec![d6(), reversed]).unwrap();
        assert_eq!(game.faces(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(game.num_dice(), 2);
    }

    #[test]
    fn no_play_yet_is_distinguishable() {
        let game = DiceGame::new(vec![d6()]).unwrap();
        assert!(game.last_play().is_none());
        assert!(game.most_recent_play(TableFormat::Wide).is_none());
        assert!(game.most_recent_play(TableFormat::Narrow).is_none());
    }

    #[test]
    fn play_shapes_wide_and_narrow_tables() {
        let mut game = DiceGame::with_seed(vec![d6(), d6(), d6()], 9).unwrap();
        game.play(10).unwrap();
        let Some(PlayView::Wide(wide)) = game.most_recent_play(TableFormat::Wide) else {
            panic!("expected wide table");
        };
        assert_eq!(wide.n_rolls(), 10);
        assert_eq!(wide.n_dice(), 3);
        assert!(wide.rows().iter().flatten().all(|face| (1..=6).contains(face)));

        let narrow = game.most_recent_play(TableFormat::Narrow).unwrap();
        assert_eq!(narrow.len(), 30);
    }

    #[test]
    fn play_replaces_previous_result() {
        let mut game = DiceGame::with_seed(vec![d6(), d6()], 3).unwrap();
        game.play(5).unwrap();
        game.play(2).unwrap();
        assert_eq!(game.last_play().unwrap().n_rolls(), 2);
        assert_eq!(game.plays(), 2);
    }

    #[test]
    fn seeded_games_replay_identically() {
        let mut a = DiceGame::with_seed(vec![d6(), d6()], 1337).unwrap();
        let mut b = DiceGame::with_seed(vec![d6(), d6()], 1337).unwrap();
        a.play(50).unwrap();
        b.play(50).unwrap();
        assert_eq!(a.last_play(), b.last_play());
        assert_eq!(a.seed(), 1337);
    }

    #[test]
    fn failed_play_keeps_previous_result() {
        let mut game = DiceGame::with_seed(vec![d6(), d6()], 5).unwrap();
        game.play(4).unwrap();
        let before = game.last_play().cloned();

        assert!(game.play(0).unwrap_err().is_invalid_argument());
        assert_eq!(game.last_play().cloned(), before);

        for face in 1..=6 {
            game.dice_mut()[1].set_weight(&face, 0).unwrap();
        }
        assert!(game.play(3).unwrap_err().is_invalid_argument());
        let mut rng = SmallRng::seed_from_u64(2);
        assert!(game.play_with_rng(3, &mut rng).is_err());
        assert_eq!(game.last_play().cloned(), before);
        assert_eq!(game.plays(), 1);
    }

    #[test]
    fn weights_adjust_between_plays() {
        let mut game = DiceGame::with_seed(vec![d6(), d6()], 21).unwrap();
        for die in game.dice_mut() {
            for face in 1..=5 {
                die.set_weight(&face, 0).unwrap();
            }
        }
        game.play(20).unwrap();
        let table = game.last_play().unwrap();
        assert!(table.rows().iter().flatten().all(|face| *face == 6));
    }

    #[test]
    fn repeated_reads_are_identical() {
        let mut game = DiceGame::with_seed(vec![d6(), d6()], 77).unwrap();
        game.play(8).unwrap();
        let first = game.most_recent_play(TableFormat::Narrow);
        let second = game.most_recent_play(TableFormat::Narrow);
        assert_eq!(first, second);
    }
}
