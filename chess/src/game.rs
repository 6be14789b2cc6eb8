//! Hot-seat game session

use crate::moves::{Move, MoveError, PromotePiece};
use crate::piece::PieceId;
use crate::position::Position;
use crate::square_set::SquareSet;
use crate::types::{Color, Outcome, Square};
use crate::{legal, movegen};

use std::fmt;

use log::info;

/// State of the game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The game goes on, `side` is to move
    InProgress { side: Color, check: bool },
    /// The game is finished
    GameOver(Outcome),
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::InProgress { side, check: false } => write!(f, "{} to move", side.name()),
            Self::InProgress { side, check: true } => {
                write!(f, "{} to move, in check", side.name())
            }
            Self::GameOver(outcome) => write!(f, "{} ({})", outcome, outcome.score()),
        }
    }
}

/// Game between two players sharing one position
///
/// The outcome is calculated once after each committed move. When the game is finished, all
/// the moves are rejected until [`Game::reset()`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    history: Vec<Move>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Starts a new game from the initial position
    pub fn new() -> Game {
        Game::from_position(Position::initial())
    }

    /// Starts a new game from the given position
    pub fn from_position(position: Position) -> Game {
        let outcome = position.calc_outcome();
        Game {
            position,
            history: Vec::new(),
            outcome,
        }
    }

    /// Discards the current game and starts a new one from the initial position
    pub fn reset(&mut self) {
        *self = Game::new();
        info!("new game started");
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.position.side()
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn status(&self) -> GameStatus {
        match self.outcome {
            Some(outcome) => GameStatus::GameOver(outcome),
            None => GameStatus::InProgress {
                side: self.position.side(),
                check: self.position.is_check(),
            },
        }
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the winner, or `None` if the game is not finished or ended in a draw
    pub fn winner(&self) -> Option<Color> {
        self.outcome.and_then(|o| o.winner())
    }

    /// Returns the committed moves, in order
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Returns the pseudo-legal destinations of the piece `id`, suitable to highlight them
    ///
    /// Returns an empty set when the game is finished.
    pub fn pseudo_legal_moves(&self, id: PieceId) -> SquareSet {
        if self.is_finished() {
            return SquareSet::EMPTY;
        }
        movegen::pseudo_legal(&self.position, id)
    }

    /// Returns the legal destinations of the piece `id`
    ///
    /// Returns an empty set when the game is finished.
    pub fn legal_moves(&self, id: PieceId) -> SquareSet {
        if self.is_finished() {
            return SquareSet::EMPTY;
        }
        legal::legal_moves(&self.position, id)
    }

    /// Tries to move the piece with index `id` to the square at `(row, col)`
    ///
    /// Returns `true` if the move is made. Out-of-range indices and coordinates are rejected.
    pub fn try_move(&mut self, id: usize, row: isize, col: isize) -> bool {
        let (id, dst) = match (PieceId::new(id), Square::new(row, col)) {
            (Some(id), Some(dst)) => (id, dst),
            _ => return false,
        };
        self.try_move_to(id, dst).is_ok()
    }

    /// Moves the piece `id` to `dst`, promoting pawns to queen
    pub fn try_move_to(&mut self, id: PieceId, dst: Square) -> Result<Move, MoveError> {
        self.try_move_promote(id, dst, PromotePiece::Queen)
    }

    /// Moves the piece `id` to `dst`
    ///
    /// On error, the game is left unchanged.
    pub fn try_move_promote(
        &mut self,
        id: PieceId,
        dst: Square,
        promote: PromotePiece,
    ) -> Result<Move, MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameOver);
        }
        let mv = self.position.try_move_promote(id, dst, promote)?;
        self.history.push(mv);
        self.outcome = self.position.calc_outcome();
        match self.outcome {
            Some(outcome) => info!("game over: {}", outcome),
            None if self.position.is_check() => {
                info!("{} is in check", self.position.side().name())
            }
            None => {}
        }
        Ok(mv)
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Setup;
    use crate::types::{DrawReason, PieceKind, WinReason};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    fn play(game: &mut Game, mv: &str) -> Result<Move, MoveError> {
        let id = game
            .position()
            .piece_at(sq(&mv[0..2]))
            .ok_or(MoveError::NotPseudoLegal)?;
        game.try_move_to(id, sq(&mv[2..4]))
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        assert_eq!(
            game.status(),
            GameStatus::InProgress {
                side: Color::White,
                check: false
            }
        );
        for mv in ["f2f3", "e7e5", "g2g4"] {
            play(&mut game, mv).unwrap();
            assert!(!game.is_finished());
        }
        play(&mut game, "d8h4").unwrap();

        let mate = Outcome::Win {
            side: Color::Black,
            reason: WinReason::Checkmate,
        };
        assert!(game.is_finished());
        assert!(game.is_check());
        assert_eq!(game.outcome(), Some(mate));
        assert_eq!(game.status(), GameStatus::GameOver(mate));
        assert_eq!(game.winner(), Some(Color::Black));
        assert_eq!(game.len(), 4);
        assert_eq!(game.status().to_string(), "Black wins by checkmate (0-1)");

        // No moves accepted until reset
        let before = game.clone();
        let pawn = game.position().piece_at(sq("a2")).unwrap();
        assert_eq!(game.try_move_to(pawn, sq("a3")), Err(MoveError::GameOver));
        assert!(!game.try_move(pawn.index(), 5, 0));
        assert!(game.pseudo_legal_moves(pawn).is_empty());
        assert!(game.legal_moves(pawn).is_empty());
        assert_eq!(game, before);

        game.reset();
        assert!(!game.is_finished());
        assert!(game.is_empty());
        assert_eq!(game.position(), &Position::initial());
        assert!(game.try_move(pawn.index(), 5, 0));
    }

    #[test]
    fn test_try_move_coords() {
        let mut game = Game::new();
        // White pawn e2 is #20, e4 is at row 4, col 4
        assert!(!game.try_move(20, 3, 4));
        assert!(!game.try_move(20, 8, 4));
        assert!(!game.try_move(20, 4, -1));
        assert!(!game.try_move(32, 4, 4));
        assert!(!game.try_move(12, 3, 4));
        assert!(game.moves().is_empty());

        assert!(game.try_move(20, 4, 4));
        assert_eq!(game.side(), Color::Black);
        assert_eq!(game.moves().len(), 1);
        assert_eq!(game.moves()[0].to_string(), "e2e4");
        assert_eq!(game.position().ep_target(), Some(sq("e3")));
        assert_eq!(game.status().to_string(), "Black to move");
    }

    #[test]
    fn test_stalemate() {
        let mut setup = Setup::empty();
        setup.side = Color::Black;
        setup.put(sq("h8"), Color::Black, PieceKind::King);
        setup.put(sq("f7"), Color::White, PieceKind::King);
        setup.put(sq("g5"), Color::White, PieceKind::Queen);
        let mut game = Game::from_position(setup.try_into().unwrap());
        assert!(!game.is_finished());

        play(&mut game, "h8h7").unwrap();
        play(&mut game, "g5g4").unwrap();
        play(&mut game, "h7h8").unwrap();
        play(&mut game, "g4g6").unwrap();
        assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::Stalemate)));
        assert_eq!(game.winner(), None);
        assert!(!game.is_check());
        assert_eq!(game.status().to_string(), "draw by stalemate (1/2-1/2)");
    }

    #[test]
    fn test_random_playouts() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let mut game = Game::new();
            for _ in 0..200 {
                if game.is_finished() {
                    break;
                }
                let moves = legal::gen_all(game.position());
                assert!(!moves.is_empty());
                let mv = *moves.choose(&mut rng).unwrap();
                let promote = mv.kind().promote().unwrap_or_default();
                let made = game
                    .try_move_promote(mv.piece(), mv.dst(), promote)
                    .unwrap();
                assert_eq!(made, mv);
                game.position().self_check();
            }
            if let Some(outcome) = game.outcome() {
                assert!(legal::gen_all(game.position()).is_empty());
                assert_eq!(outcome.winner().is_some(), game.is_check());
            }
        }
    }
}
