//! # Matching and scoring
//!
//! Herein is the word-resolution pass that follows every placement: scan the
//! [`Board`], validate the candidates against the [`Lexicon`], score the
//! matches, and clear every matched cell at once.

use std::collections::HashSet;

use log::{debug, trace};
use rand::Rng;
use serde::Serialize;

use crate::{
	board::{Axis, Board, Position, RemovedCell},
	curator::WordCurator,
	factory::Cadence,
	lexicon::Lexicon
};

/// The highest attainable level.
pub const MAX_LEVEL: u32 = 10;

/// The points per level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// The points awarded per letter of a word.
pub const POINTS_PER_LETTER: u32 = 10;

/// A validated word on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordMatch
{
	/// The concrete word. For a wildcard match, this is the resolved word.
	pub text: String,

	/// The letters as read from the board, including wildcards.
	pub pattern: String,

	/// The coordinates of the word, in reading order.
	pub cells: Vec<Position>,

	/// The axis along which the word was read.
	pub axis: Axis,

	/// The points the word is worth.
	pub score: u32
}

/// The outcome of a word-resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution
{
	/// The points awarded.
	pub points: u32,

	/// The cells that were cleared.
	pub removed: Vec<RemovedCell>
}

/// Compute the score of a word: ten points per letter plus the rarity bonus,
/// multiplied by 10% for every level above the first.
///
/// # Arguments
///
/// * `word` - The concrete word.
/// * `level` - The current level, starting at 1.
/// * `lexicon` - The lexicon, for its letter-frequency table.
///
/// # Returns
///
/// The score, rounded to the nearest point.
#[must_use]
pub fn score(word: &str, level: u32, lexicon: &Lexicon) -> u32
{
	let base = word.chars().count() as u32 * POINTS_PER_LETTER
		+ lexicon.rarity_bonus(word);
	let multiplier = 1.0 + level.saturating_sub(1) as f64 * 0.1;
	(base as f64 * multiplier).round() as u32
}

/// Compute the level that corresponds to a score.
#[inline]
#[must_use]
pub fn level_for_score(score: u32) -> u32
{
	(score / POINTS_PER_LEVEL + 1).min(MAX_LEVEL)
}

/// Find every valid word on the board. Candidates are deduplicated by text and
/// cell set, and wildcard candidates are resolved to concrete words.
///
/// # Arguments
///
/// * `board` - The board to scan.
/// * `lexicon` - The lexicon to validate against.
/// * `level` - The current level, for scoring.
///
/// # Returns
///
/// The matches, rows before columns.
pub fn find_words(board: &Board, lexicon: &mut Lexicon, level: u32) -> Vec<WordMatch>
{
	let mut seen = HashSet::new();
	let mut words = Vec::new();
	for candidate in board.scan_words()
	{
		let mut key = candidate.cells.clone();
		key.sort();
		if !seen.insert((candidate.text.to_string(), key))
		{
			continue
		}
		let pattern = candidate.text.as_str();
		let resolved = if candidate.has_wildcard
		{
			lexicon.is_valid_fuzzy(pattern)
		}
		else
		{
			lexicon.is_valid(pattern).then(|| pattern.to_string())
		};
		if let Some(text) = resolved
		{
			let points = score(&text, level, lexicon);
			trace!("matched: {} as {} for {}", pattern, text, points);
			words.push(WordMatch {
				text,
				pattern: pattern.to_string(),
				cells: candidate.cells,
				axis: candidate.axis,
				score: points
			});
		}
	}
	words
}

/// Resolve the found words: advance the clear streak once for the whole pass,
/// report each word to the curator, total the points, and clear the union of
/// the matched cells in a single pass. Nothing happens if `words` is empty.
///
/// The bomb-armed flag is left alone; the caller resynchronizes it from the
/// tray.
///
/// # Arguments
///
/// * `words` - The words found by [`find_words`].
/// * `board` - The board to clear.
/// * `cadence` - The special-piece counters.
/// * `curator` - The curator to report usage to.
/// * `lexicon` - The lexicon, for replenishing the curator.
/// * `rng` - The source of randomness.
///
/// # Returns
///
/// The points awarded and the cells removed.
pub fn on_words_found<R: Rng + ?Sized>(
	words: &[WordMatch],
	board: &mut Board,
	cadence: &mut Cadence,
	curator: &mut WordCurator,
	lexicon: &mut Lexicon,
	rng: &mut R
) -> Resolution
{
	if words.is_empty()
	{
		return Resolution::default()
	}
	cadence.clear_streak += 1;
	let mut points = 0;
	for word in words
	{
		curator.record_usage(&word.text, lexicon, rng);
		points += word.score;
	}
	let cells = words.iter()
		.flat_map(|w| w.cells.iter().copied())
		.collect::<Vec<_>>();
	let removed = board.clear_cells(&cells);
	debug!(
		"cleared {} words ({} cells) for {} points; clear streak {}",
		words.len(),
		removed.len(),
		points,
		cadence.clear_streak
	);
	Resolution { points, removed }
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use rand::{rngs::StdRng, SeedableRng};

	use crate::{
		board::{Board, Position},
		curator::WordCurator,
		factory::Cadence,
		lexicon::{Lexicon, MemoryLoader, NullLoader},
		matcher::{find_words, level_for_score, on_words_found, score},
		piece::{Piece, PieceId, Tint, WILDCARD_SYMBOL}
	};

	/// Place single-cell pieces spelling `word` from `start` along a row.
	fn spell(board: &mut Board, word: &str, start: Position)
	{
		for (i, c) in word.chars().enumerate()
		{
			let piece = Piece::single(PieceId(500 + i as u32), c, Tint(0));
			board.place(&piece, &[start.offset(i as i16, 0)]).unwrap();
		}
	}

	/// A lexicon that knows only the given words.
	fn lexicon_of(words: &[&str]) -> Lexicon
	{
		Lexicon::new(MemoryLoader::new().with_words(words))
			.with_fallback::<&str>(&[])
	}

	/// Ensure the scoring formula, including the level multiplier and the
	/// rarity bonus.
	#[test]
	fn test_score()
	{
		let lexicon = Lexicon::new(NullLoader);
		assert_eq!(score("가나다", 1, &lexicon), 30);
		assert_eq!(score("가나다", 3, &lexicon), 36);
		assert_eq!(score("가나꿹", 1, &lexicon), 35);
		assert_eq!(score("가나꿹", 3, &lexicon), 42);
		assert_eq!(score("가나다라", 10, &lexicon), 76);
	}

	/// Ensure the leveling thresholds.
	#[test]
	fn test_level_for_score()
	{
		assert_eq!(level_for_score(0), 1);
		assert_eq!(level_for_score(99), 1);
		assert_eq!(level_for_score(100), 2);
		assert_eq!(level_for_score(950), 10);
		assert_eq!(level_for_score(5000), 10);
	}

	/// Ensure that a single valid row yields exactly one match.
	#[test]
	fn test_find_words()
	{
		let mut board = Board::new();
		spell(&mut board, "ABC", Position::new(0, 0));
		let mut lexicon = lexicon_of(&["ABC"]);
		let words = find_words(&board, &mut lexicon, 1);
		assert_eq!(words.len(), 1);
		assert_eq!(words[0].text, "ABC");
		assert_eq!(
			words[0].cells,
			vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
		);
		// Latin letters are all rare.
		assert_eq!(words[0].score, 45);
		// Only windows of a longer run that are words match.
		spell(&mut board, "D", Position::new(3, 0));
		let words = find_words(&board, &mut lexicon, 1);
		assert_eq!(words.len(), 1);
		let mut lexicon = lexicon_of(&["ABC", "BCD", "ABCD"]);
		let words = find_words(&board, &mut lexicon, 1);
		let mut texts = words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>();
		texts.sort();
		assert_eq!(texts, vec!["ABC", "ABCD", "BCD"]);
	}

	/// Ensure that wildcard windows resolve to concrete words.
	#[test]
	fn test_find_words_wildcard()
	{
		let mut board = Board::new();
		spell(&mut board, "가", Position::new(4, 2));
		board.place(
			&Piece::wildcard(PieceId(600), Tint(1)),
			&[Position::new(5, 2)]
		).unwrap();
		spell(&mut board, "다", Position::new(6, 2));
		let mut lexicon = lexicon_of(&["가나다"]);
		let words = find_words(&board, &mut lexicon, 1);
		assert_eq!(words.len(), 1);
		assert_eq!(words[0].text, "가나다");
		assert_eq!(words[0].pattern, format!("가{}다", WILDCARD_SYMBOL));
		assert_eq!(words[0].score, 30);
	}

	/// Ensure that a resolution pass clears the union of the matched cells,
	/// advances the clear streak once, and reports usage to the curator.
	#[test]
	fn test_on_words_found()
	{
		let mut board = Board::new();
		spell(&mut board, "가나다라", Position::new(0, 0));
		let mut lexicon = lexicon_of(&["가나다", "나다라"]);
		let mut curator = WordCurator::from_words(&["가나다", "바나나"]);
		let mut cadence = Cadence::default();
		let mut rng = StdRng::seed_from_u64(31);
		let words = find_words(&board, &mut lexicon, 1);
		assert_eq!(words.len(), 2);
		let resolution = on_words_found(
			&words,
			&mut board,
			&mut cadence,
			&mut curator,
			&mut lexicon,
			&mut rng
		);
		assert_eq!(resolution.points, 60);
		assert_eq!(resolution.removed.len(), 4);
		assert_eq!(board.occupied_count(), 0);
		assert_eq!(cadence.clear_streak, 1);
		assert_eq!(curator.used_count(), 1);
		let resolution = on_words_found(
			&[],
			&mut board,
			&mut cadence,
			&mut curator,
			&mut lexicon,
			&mut rng
		);
		assert_eq!(resolution.points, 0);
		assert_eq!(cadence.clear_streak, 1);
	}
}
