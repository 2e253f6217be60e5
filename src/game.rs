//! # Game
//!
//! Herein is the orchestrator: the state machine that composes the board, the
//! tray, the lexicon, the curator, the piece factory, and the match pass. The
//! [`Game`] is the only component that a front end talks to. It accepts
//! placements, rotations, and the pause/resume/restart controls, and it
//! publishes immutable [snapshots](GameSnapshot) and [events](GameEvent).

use std::{
	error::Error,
	fmt::{self, Display, Formatter}
};

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::{
	board::{Board, PlacementError, Position, RemovedCell, BOARD_COLS, BOARD_ROWS},
	curator::WordCurator,
	factory::{Cadence, PieceFactory},
	lexicon::Lexicon,
	matcher::{self, WordMatch},
	piece::{Piece, PieceId, PieceKind, Tint}
};

////////////////////////////////////////////////////////////////////////////////
//                               Configuration.                               //
////////////////////////////////////////////////////////////////////////////////

/// The tunable parameters of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig
{
	/// The seed of the random number generator. `None` seeds from the
	/// operating system.
	pub seed: Option<u64>,

	/// The number of pieces dealt at the start of a game.
	pub initial_tray: usize,

	/// The maximum number of pieces in the tray.
	pub tray_cap: usize,

	/// The clear streak that triggers a bomb. `0` disables bombs.
	pub bomb_every: u32,

	/// The number of generated pieces per wildcard. `0` disables wildcards.
	pub wildcard_every: u32,

	/// The relative weights of the piece sizes 1 through 4.
	pub size_weights: [u32; 4]
}

impl Default for GameConfig
{
	fn default() -> Self
	{
		Self {
			seed: None,
			initial_tray: 4,
			tray_cap: 5,
			bomb_every: 3,
			wildcard_every: 3,
			size_weights: [1, 1, 1, 1]
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   State.                                   //
////////////////////////////////////////////////////////////////////////////////

/// The life cycle of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GameStatus
{
	/// The lexicon and the curator are not ready yet.
	Loading,

	/// Pieces may be placed and rotated.
	Playing,

	/// Play is suspended.
	Paused,

	/// The game has ended. Only a restart leaves this state.
	GameOver
}

impl Display for GameStatus
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		let name = match self
		{
			GameStatus::Loading => "loading",
			GameStatus::Playing => "playing",
			GameStatus::Paused => "paused",
			GameStatus::GameOver => "game over"
		};
		write!(f, "{}", name)
	}
}

/// A notable change, reported for optional animation. Events never affect the
/// state of the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GameEvent
{
	/// A lettered piece was placed.
	PiecePlaced
	{
		/// The piece.
		piece: PieceId,

		/// The cells it now occupies.
		cells: Vec<Position>
	},

	/// A bomb exploded.
	BombExploded
	{
		/// The center of the blast.
		center: Position,

		/// The cells that were cleared.
		removed: Vec<RemovedCell>
	},

	/// Words were formed and cleared.
	WordsCleared
	{
		/// The words, resolved.
		words: Vec<String>,

		/// The points awarded.
		points: u32,

		/// The cells that were cleared.
		removed: Vec<RemovedCell>
	},

	/// The level changed.
	LevelChanged
	{
		/// The previous level.
		from: u32,

		/// The new level.
		to: u32
	},

	/// The status changed.
	StatusChanged
	{
		/// The previous status.
		from: GameStatus,

		/// The new status.
		to: GameStatus
	}
}

/// An immutable view of a tray piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieceView
{
	/// The identifier of the piece.
	pub id: PieceId,

	/// The tag of the piece's shape and rotation, e.g., `line3-vertical`.
	pub shape: String,

	/// What the piece does when placed.
	pub kind: PieceKind,

	/// The cosmetic tag.
	pub tint: Tint,

	/// The occupancy matrix, as rows of columns.
	pub rows: Vec<Vec<Option<char>>>
}

impl From<&Piece> for PieceView
{
	fn from(piece: &Piece) -> Self
	{
		Self {
			id: piece.id(),
			shape: piece.shape_tag().to_string(),
			kind: piece.kind(),
			tint: piece.tint(),
			rows: piece.rows().to_vec()
		}
	}
}

/// An immutable view of the whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSnapshot
{
	/// The letters on the board, as rows of columns.
	pub board: [[Option<char>; BOARD_COLS]; BOARD_ROWS],

	/// The pieces in the tray, in tray order.
	pub tray: Vec<PieceView>,

	/// The total score.
	pub score: u32,

	/// The level, in `1..=10`.
	pub level: u32,

	/// The number of word-clearing passes since the last bomb was consumed.
	pub clear_streak: u32,

	/// Whether a bomb is live in the tray.
	pub bomb_armed: bool,

	/// The status.
	pub status: GameStatus,

	/// The curated words, oldest first.
	pub active_words: Vec<String>
}

/// The outcome of a successful placement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Turn
{
	/// The words formed and cleared.
	pub words: Vec<WordMatch>,

	/// The points awarded.
	pub points: u32
}

////////////////////////////////////////////////////////////////////////////////
//                                Orchestrator.                               //
////////////////////////////////////////////////////////////////////////////////

/// A single-player game session.
#[derive(Debug)]
#[must_use]
pub struct Game
{
	/// The tunable parameters.
	config: GameConfig,

	/// The word corpus. It survives restarts.
	lexicon: Lexicon,

	/// The source of randomness.
	rng: StdRng,

	/// The board.
	board: Board,

	/// The pieces available for placement.
	tray: Vec<Piece>,

	/// The total score.
	score: u32,

	/// The level, in `1..=10`.
	level: u32,

	/// The special-piece counters.
	cadence: Cadence,

	/// The status.
	status: GameStatus,

	/// The curator of the active word set.
	curator: WordCurator,

	/// The piece factory.
	factory: PieceFactory,

	/// The events not yet drained.
	events: Vec<GameEvent>
}

impl Game
{
	/// Construct a game in the [loading](GameStatus::Loading) state. Call
	/// [`start`](Self::start) to begin play.
	///
	/// # Arguments
	///
	/// * `config` - The tunable parameters.
	/// * `lexicon` - The word corpus.
	///
	/// # Returns
	///
	/// The new game.
	pub fn new(config: GameConfig, lexicon: Lexicon) -> Self
	{
		let rng = match config.seed
		{
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng()
		};
		let factory = Self::factory(&config);
		Self {
			config,
			lexicon,
			rng,
			board: Board::new(),
			tray: Vec::new(),
			score: 0,
			level: 1,
			cadence: Cadence::default(),
			status: GameStatus::Loading,
			curator: WordCurator::default(),
			factory,
			events: Vec::new()
		}
	}

	/// Build a piece factory for the given configuration.
	fn factory(config: &GameConfig) -> PieceFactory
	{
		PieceFactory::new(
			config.size_weights,
			config.bomb_every,
			config.wildcard_every
		)
	}

	/// Warm the lexicon, curate the initial words, deal the initial tray, and
	/// begin play. A game dealt an empty tray is over at once. Does nothing
	/// unless the game is [loading](GameStatus::Loading).
	pub fn start(&mut self)
	{
		if self.status != GameStatus::Loading
		{
			return
		}
		self.lexicon.warm();
		self.curator = WordCurator::new(&mut self.lexicon, &mut self.rng);
		for _ in 0..self.config.initial_tray.min(self.config.tray_cap)
		{
			let piece = self.factory.next_piece(
				&mut self.cadence,
				&mut self.curator,
				&mut self.rng
			);
			self.tray.push(piece);
		}
		self.set_status(GameStatus::Playing);
		self.check_game_over();
	}

	/// The status.
	#[inline]
	#[must_use]
	pub fn status(&self) -> GameStatus { self.status }

	/// The total score.
	#[inline]
	#[must_use]
	pub fn score(&self) -> u32 { self.score }

	/// The level.
	#[inline]
	#[must_use]
	pub fn level(&self) -> u32 { self.level }

	/// The board.
	#[inline]
	pub fn board(&self) -> &Board { &self.board }

	/// The pieces available for placement.
	#[inline]
	#[must_use]
	pub fn tray(&self) -> &[Piece] { &self.tray }

	/// The special-piece counters.
	#[inline]
	#[must_use]
	pub fn cadence(&self) -> Cadence { self.cadence }

	/// The curator of the active word set.
	#[inline]
	pub fn curator(&self) -> &WordCurator { &self.curator }

	/// Take an immutable snapshot of the game.
	#[must_use]
	pub fn snapshot(&self) -> GameSnapshot
	{
		GameSnapshot {
			board: self.board.letters(),
			tray: self.tray.iter().map(PieceView::from).collect(),
			score: self.score,
			level: self.level,
			clear_streak: self.cadence.clear_streak,
			bomb_armed: self.cadence.bomb_armed,
			status: self.status,
			active_words: self.curator.active_words()
				.map(|w| w.word.clone())
				.collect()
		}
	}

	/// Take the events that occurred since the last drain.
	#[must_use]
	pub fn drain_events(&mut self) -> Vec<GameEvent>
	{
		std::mem::take(&mut self.events)
	}

	/// Suggest words that start with the given prefix. Only words that are
	/// already resident in the lexicon are suggested.
	#[must_use]
	pub fn hint(&self, prefix: &str, limit: usize) -> Vec<String>
	{
		self.lexicon.prefix_search(prefix, limit)
	}

	/// Transition to the given status, recording an event if it changed.
	fn set_status(&mut self, to: GameStatus)
	{
		let from = self.status;
		if from != to
		{
			debug!("status: {} => {}", from, to);
			self.status = to;
			self.events.push(GameEvent::StatusChanged { from, to });
		}
	}

	/// End the game if the tray is empty or the board is full.
	fn check_game_over(&mut self)
	{
		if self.tray.is_empty() || self.board.is_full()
		{
			self.set_status(GameStatus::GameOver);
		}
	}

	/// Answer an error unless the game is [playing](GameStatus::Playing).
	fn require_playing(&self) -> Result<(), GameError>
	{
		match self.status
		{
			GameStatus::Playing => Ok(()),
			status => Err(GameError::NotPlaying(status))
		}
	}

	/// Find the tray index of the given piece.
	fn tray_index(&self, id: PieceId) -> Result<usize, GameError>
	{
		self.tray.iter()
			.position(|piece| piece.id() == id)
			.ok_or(GameError::UnknownPiece(id))
	}

	/// Place a piece from the tray. A lettered piece is written onto the given
	/// cells; a bomb instead clears the 3×3 neighborhood of its single target
	/// cell, disarms, and resets the clear streak. Either way, the piece leaves
	/// the tray, a replacement is generated if the tray is below its cap, the
	/// match pass runs, the score and level are updated, and game over is
	/// checked.
	///
	/// # Arguments
	///
	/// * `id` - The piece to place.
	/// * `targets` - The cells to cover, one per occupied cell of the piece.
	///
	/// # Returns
	///
	/// The words formed by the placement, and the points awarded.
	///
	/// # Errors
	///
	/// * [`GameError::NotPlaying`] unless the game is playing.
	/// * [`GameError::UnknownPiece`] if the piece is not in the tray.
	/// * [`GameError::InvalidPlacement`] if the piece does not fit the
	///   targets. The game is unchanged.
	pub fn place_piece(
		&mut self,
		id: PieceId,
		targets: &[Position]
	) -> Result<Turn, GameError>
	{
		self.require_playing()?;
		let index = self.tray_index(id)?;
		let piece = &self.tray[index];
		if piece.is_bomb()
		{
			let center = bomb_target(targets)?;
			let removed = self.board.explode(center);
			debug!("bomb {} exploded at {}: {} cells", id, center, removed.len());
			self.cadence.bomb_armed = false;
			self.cadence.clear_streak = 0;
			self.events.push(GameEvent::BombExploded { center, removed });
		}
		else
		{
			let cells = self.board.place(piece, targets)?;
			self.events.push(GameEvent::PiecePlaced { piece: id, cells });
		}
		self.tray.remove(index);
		if self.tray.len() < self.config.tray_cap
		{
			let next = self.factory.next_piece(
				&mut self.cadence,
				&mut self.curator,
				&mut self.rng
			);
			trace!("dealt {} ({})", next.id(), next.shape_tag());
			self.tray.push(next);
		}

		let words = matcher::find_words(&self.board, &mut self.lexicon, self.level);
		let resolution = matcher::on_words_found(
			&words,
			&mut self.board,
			&mut self.cadence,
			&mut self.curator,
			&mut self.lexicon,
			&mut self.rng
		);
		self.cadence.bomb_armed = self.tray.iter().any(Piece::is_bomb);
		if !words.is_empty()
		{
			self.events.push(GameEvent::WordsCleared {
				words: words.iter().map(|w| w.text.clone()).collect(),
				points: resolution.points,
				removed: resolution.removed
			});
		}

		self.score += resolution.points;
		let level = matcher::level_for_score(self.score);
		if level != self.level
		{
			debug!("level: {} => {}", self.level, level);
			self.events.push(GameEvent::LevelChanged { from: self.level, to: level });
			self.level = level;
		}
		self.check_game_over();
		Ok(Turn { words, points: resolution.points })
	}

	/// Rotate a piece in the tray 90° clockwise.
	///
	/// # Errors
	///
	/// * [`GameError::NotPlaying`] unless the game is playing.
	/// * [`GameError::UnknownPiece`] if the piece is not in the tray.
	pub fn rotate_piece(&mut self, id: PieceId) -> Result<(), GameError>
	{
		self.require_playing()?;
		let index = self.tray_index(id)?;
		self.tray[index] = self.tray[index].rotate();
		Ok(())
	}

	/// Suspend play. Does nothing unless the game is playing.
	pub fn pause(&mut self)
	{
		if self.status == GameStatus::Playing
		{
			self.set_status(GameStatus::Paused);
		}
	}

	/// Resume play. Does nothing unless the game is paused.
	pub fn resume(&mut self)
	{
		if self.status == GameStatus::Paused
		{
			self.set_status(GameStatus::Playing);
		}
	}

	/// Discard the session's state, keeping only the lexicon, and begin a new
	/// game.
	pub fn restart(&mut self)
	{
		debug!("restarting at score {}", self.score);
		self.board = Board::new();
		self.tray.clear();
		self.score = 0;
		self.level = 1;
		self.cadence = Cadence::default();
		self.factory = Self::factory(&self.config);
		self.set_status(GameStatus::Loading);
		self.start();
	}
}

/// Validate the targets of a bomb: exactly one cell, on the board. The cell
/// may be occupied.
fn bomb_target(targets: &[Position]) -> Result<Position, PlacementError>
{
	match targets
	{
		[center] if center.is_in_bounds() => Ok(*center),
		[center] => Err(PlacementError::OutOfBounds(*center)),
		_ => Err(PlacementError::CountMismatch { expected: 1, actual: targets.len() })
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Errors.                                   //
////////////////////////////////////////////////////////////////////////////////

/// The complete enumeration of failures at the [`Game`] boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameError
{
	/// The piece does not fit the requested cells.
	InvalidPlacement(PlacementError),

	/// The piece is not in the tray.
	UnknownPiece(PieceId),

	/// The operation requires the game to be playing.
	NotPlaying(GameStatus)
}

impl From<PlacementError> for GameError
{
	fn from(e: PlacementError) -> Self { GameError::InvalidPlacement(e) }
}

impl Display for GameError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::InvalidPlacement(e) => write!(f, "{}", e),
			Self::UnknownPiece(id) => write!(f, "piece {} is not in the tray", id),
			Self::NotPlaying(status) =>
				write!(f, "not playing: the game is {}", status)
		}
	}
}

impl Error for GameError
{
	fn source(&self) -> Option<&(dyn Error + 'static)>
	{
		match self
		{
			Self::InvalidPlacement(e) => Some(e),
			_ => None
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use crate::{
		board::{PlacementError, Position},
		game::{Game, GameConfig, GameError, GameEvent, GameStatus},
		lexicon::{Lexicon, MemoryLoader},
		piece::{Piece, PieceId, Shape, Tint}
	};

	/// Start a deterministic game whose lexicon knows only "가나다". Wildcards
	/// are disabled, so that only bombs disturb the tray.
	fn game() -> Game
	{
		let config = GameConfig {
			seed: Some(42),
			wildcard_every: 0,
			..GameConfig::default()
		};
		let lexicon = Lexicon::new(MemoryLoader::new().with_words(&["가나다"]))
			.with_fallback::<&str>(&[]);
		let mut game = Game::new(config, lexicon);
		game.start();
		game
	}

	/// Put the given piece at the front of the tray, replacing the piece
	/// there.
	fn deal(game: &mut Game, piece: Piece) -> PieceId
	{
		let id = piece.id();
		game.tray[0] = piece;
		id
	}

	/// Fill the given cells with the letter `X`, bypassing the tray.
	fn fill(game: &mut Game, cells: &[Position])
	{
		for (i, &cell) in cells.iter().enumerate()
		{
			let piece = Piece::single(PieceId(9000 + i as u32), 'X', Tint(0));
			game.board.place(&piece, &[cell]).unwrap();
		}
	}

	/// Ensure the life cycle: loading, playing, paused, playing.
	#[test]
	fn test_status()
	{
		let lexicon = Lexicon::new(MemoryLoader::new());
		let mut game = Game::new(GameConfig::default(), lexicon);
		assert_eq!(game.status(), GameStatus::Loading);
		assert_eq!(
			game.place_piece(PieceId(1), &[Position::new(0, 0)]),
			Err(GameError::NotPlaying(GameStatus::Loading))
		);
		game.start();
		assert_eq!(game.status(), GameStatus::Playing);
		assert_eq!(game.tray().len(), 4);
		game.pause();
		assert_eq!(game.status(), GameStatus::Paused);
		let id = game.tray()[0].id();
		assert_eq!(game.rotate_piece(id), Err(GameError::NotPlaying(GameStatus::Paused)));
		game.pause();
		game.resume();
		assert_eq!(game.status(), GameStatus::Playing);
		let events = game.drain_events();
		assert_eq!(
			events,
			vec![
				GameEvent::StatusChanged { from: GameStatus::Loading, to: GameStatus::Playing },
				GameEvent::StatusChanged { from: GameStatus::Playing, to: GameStatus::Paused },
				GameEvent::StatusChanged { from: GameStatus::Paused, to: GameStatus::Playing }
			]
		);
		assert!(game.drain_events().is_empty());
	}

	/// Placing a domino that forms no word changes nothing but the board and
	/// the tray.
	#[test]
	fn test_scenario_a()
	{
		let mut game = game();
		let piece = Piece::new(PieceId(100), Shape::Line2, 0, &['가', '나'], Tint(0))
			.unwrap();
		let id = deal(&mut game, piece);
		let before = game.tray().iter().map(|p| p.id()).collect::<Vec<_>>();
		let turn = game.place_piece(id, &[Position::new(0, 0), Position::new(1, 0)])
			.unwrap();
		assert!(turn.words.is_empty());
		assert_eq!(game.score(), 0);
		assert_eq!(game.cadence().clear_streak, 0);
		assert_eq!(game.board().occupied_count(), 2);
		assert_eq!(game.tray().len(), 4);
		assert!(game.tray().iter().all(|p| p.id() != id));
		assert!(!before.contains(&game.tray()[3].id()));
		assert_eq!(game.status(), GameStatus::Playing);
	}

	/// Completing "가나다" clears it and scores it.
	#[test]
	fn test_scenario_b()
	{
		let mut game = game();
		let piece = Piece::new(PieceId(100), Shape::Line2, 0, &['가', '나'], Tint(0))
			.unwrap();
		let id = deal(&mut game, piece);
		game.place_piece(id, &[Position::new(0, 0), Position::new(1, 0)]).unwrap();
		let id = deal(&mut game, Piece::single(PieceId(101), '다', Tint(2)));
		game.drain_events();
		let turn = game.place_piece(id, &[Position::new(2, 0)]).unwrap();
		assert_eq!(turn.words.len(), 1);
		assert_eq!(turn.words[0].text, "가나다");
		assert_eq!(
			turn.words[0].cells,
			vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
		);
		assert_eq!(turn.points, 30);
		assert_eq!(game.score(), 30);
		assert_eq!(game.board().occupied_count(), 0);
		assert_eq!(game.cadence().clear_streak, 1);
		let events = game.drain_events();
		assert!(matches!(events[0], GameEvent::PiecePlaced { piece, .. } if piece == id));
		assert!(matches!(
			&events[1],
			GameEvent::WordsCleared { points: 30, removed, .. } if removed.len() == 3
		));
	}

	/// A streak of three clears arms a bomb, and the bomb clears its 3×3
	/// neighborhood regardless of the letters there.
	#[test]
	fn test_scenario_c()
	{
		let mut game = game();
		game.cadence.clear_streak = 3;
		let region = (3..=7)
			.flat_map(|row| (3..=7).map(move |col| Position::new(col, row)))
			.collect::<Vec<_>>();
		fill(&mut game, &region);
		let id = deal(&mut game, Piece::single(PieceId(100), 'X', Tint(0)));
		game.place_piece(id, &[Position::new(0, 9)]).unwrap();
		let bomb = game.tray()[3].clone();
		assert!(bomb.is_bomb());
		assert!(game.cadence().bomb_armed);
		assert!(game.snapshot().bomb_armed);
		let before = game.board().occupied_count();
		game.place_piece(bomb.id(), &[Position::new(5, 5)]).unwrap();
		assert_eq!(game.board().occupied_count(), before - 9);
		for row in 4..=6
		{
			for col in 4..=6
			{
				assert!(game.board().is_vacant(Position::new(col, row)));
			}
		}
		assert!(!game.board().is_vacant(Position::new(3, 3)));
		assert!(!game.board().is_vacant(Position::new(7, 5)));
		assert_eq!(game.cadence().clear_streak, 0);
		assert!(!game.cadence().bomb_armed);
		assert!(game.tray().iter().all(|p| !p.is_bomb()));
	}

	/// A bomb must target exactly one cell on the board.
	#[test]
	fn test_bomb_targets()
	{
		let mut game = game();
		let id = deal(&mut game, Piece::bomb(PieceId(100), Tint(0)));
		assert_eq!(
			game.place_piece(id, &[Position::new(10, 0)]),
			Err(GameError::InvalidPlacement(PlacementError::OutOfBounds(
				Position::new(10, 0)
			)))
		);
		assert_eq!(
			game.place_piece(id, &[]),
			Err(GameError::InvalidPlacement(PlacementError::CountMismatch {
				expected: 1,
				actual: 0
			}))
		);
		// A bomb on an empty board is still consumed.
		assert!(game.place_piece(id, &[Position::new(0, 0)]).is_ok());
		assert_eq!(game.place_piece(id, &[Position::new(0, 0)]), Err(GameError::UnknownPiece(id)));
	}

	/// A failed placement leaves the game exactly as it was.
	#[test]
	fn test_invalid_placement()
	{
		let mut game = game();
		fill(&mut game, &[Position::new(1, 0)]);
		let piece = Piece::new(PieceId(100), Shape::Line2, 0, &['가', '나'], Tint(0))
			.unwrap();
		let id = deal(&mut game, piece);
		game.drain_events();
		let before = game.snapshot();
		assert_eq!(
			game.place_piece(id, &[Position::new(0, 0), Position::new(1, 0)]),
			Err(GameError::InvalidPlacement(PlacementError::Occupied(Position::new(1, 0))))
		);
		assert_eq!(
			game.place_piece(id, &[Position::new(0, 0), Position::new(0, 1)]),
			Err(GameError::InvalidPlacement(PlacementError::FootprintMismatch))
		);
		assert_eq!(
			game.place_piece(id, &[Position::new(9, 5), Position::new(10, 5)]),
			Err(GameError::InvalidPlacement(PlacementError::OutOfBounds(Position::new(10, 5))))
		);
		assert_eq!(
			game.place_piece(PieceId(9999), &[Position::new(5, 5)]),
			Err(GameError::UnknownPiece(PieceId(9999)))
		);
		assert_eq!(game.snapshot(), before);
		assert!(game.drain_events().is_empty());
	}

	/// Rotation replaces the tray piece with its rotated self.
	#[test]
	fn test_rotate_piece()
	{
		let mut game = game();
		let piece = Piece::new(PieceId(100), Shape::Line2, 0, &['가', '나'], Tint(0))
			.unwrap();
		let id = deal(&mut game, piece);
		game.rotate_piece(id).unwrap();
		assert_eq!(game.snapshot().tray[0].shape, "line2-vertical");
		game.place_piece(id, &[Position::new(0, 0), Position::new(0, 1)]).unwrap();
		assert_eq!(game.board().letters()[1][0], Some('나'));
		assert_eq!(game.rotate_piece(id), Err(GameError::UnknownPiece(id)));
	}

	/// Filling the board ends the game, and a restart begins afresh with the
	/// same lexicon.
	#[test]
	fn test_game_over_and_restart()
	{
		let mut game = game();
		assert!(game.lexicon.is_valid("가나다"));
		let almost = (0..10)
			.flat_map(|row| (0..10).map(move |col| Position::new(col, row)))
			.filter(|&p| p != Position::new(9, 9))
			.collect::<Vec<_>>();
		fill(&mut game, &almost);
		let id = deal(&mut game, Piece::single(PieceId(100), 'X', Tint(0)));
		game.place_piece(id, &[Position::new(9, 9)]).unwrap();
		assert_eq!(game.status(), GameStatus::GameOver);
		let id = game.tray()[0].id();
		assert_eq!(game.rotate_piece(id), Err(GameError::NotPlaying(GameStatus::GameOver)));
		game.resume();
		assert_eq!(game.status(), GameStatus::GameOver);

		game.score = 250;
		game.restart();
		assert_eq!(game.status(), GameStatus::Playing);
		assert_eq!(game.score(), 0);
		assert_eq!(game.level(), 1);
		assert_eq!(game.board().occupied_count(), 0);
		assert_eq!(game.tray().len(), 4);
		assert_eq!(game.cadence().clear_streak, 0);
		assert!(game.hint("가", 5).contains(&"가나다".to_string()));
	}

	/// A game dealt an empty tray ends as soon as it starts.
	#[test]
	fn test_empty_tray_ends_game()
	{
		for (initial_tray, tray_cap) in [(0, 5), (4, 0)]
		{
			let config = GameConfig {
				seed: Some(3),
				initial_tray,
				tray_cap,
				..GameConfig::default()
			};
			let mut game = Game::new(config, Lexicon::new(MemoryLoader::new()));
			game.start();
			assert!(game.tray().is_empty());
			assert_eq!(game.status(), GameStatus::GameOver);
			assert_eq!(
				game.drain_events(),
				vec![
					GameEvent::StatusChanged {
						from: GameStatus::Loading,
						to: GameStatus::Playing
					},
					GameEvent::StatusChanged {
						from: GameStatus::Playing,
						to: GameStatus::GameOver
					}
				]
			);
		}
	}

	/// Crossing a hundred-point boundary raises the level.
	#[test]
	fn test_level_changed()
	{
		let mut game = game();
		game.score = 95;
		let piece = Piece::new(PieceId(100), Shape::Line3, 0, &['가', '나', '다'], Tint(0))
			.unwrap();
		let id = deal(&mut game, piece);
		game.drain_events();
		let turn = game.place_piece(
			id,
			&[Position::new(4, 4), Position::new(5, 4), Position::new(6, 4)]
		).unwrap();
		assert_eq!(turn.points, 30);
		assert_eq!(game.score(), 125);
		assert_eq!(game.level(), 2);
		assert!(game.drain_events().contains(&GameEvent::LevelChanged { from: 1, to: 2 }));
		assert_eq!(game.snapshot().level, 2);
	}
}
