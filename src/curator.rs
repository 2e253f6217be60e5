//! # Word curation
//!
//! Random letters rarely spell anything. The [`WordCurator`] keeps a small,
//! rotating set of words drawn from the [`Lexicon`], and draws the letters of
//! new pieces from the letters of those words, so that the tray keeps offering
//! something that can actually be spelled. Once most of the active words have
//! been formed on the board, the set is replenished with fresh words.

use std::{
	collections::{HashSet, VecDeque},
	ops::RangeInclusive
};

use log::{debug, trace};
use rand::Rng;
use serde::Serialize;

use crate::lexicon::Lexicon;

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The number of words in the initial active set.
pub const INITIAL_BATCH: usize = 10;

/// The maximum number of words added by a single replenishment.
pub const REPLENISH_BATCH: usize = 10;

/// The maximum size of the active set. The oldest words are evicted beyond it.
pub const ACTIVE_CAP: usize = 20;

/// The letter pool is refilled once it holds fewer distinct letters than this.
pub const MIN_POOL: usize = 5;

/// The minimum number of distinct letters in a freshly derived pool.
pub const MIN_DISTINCT_LETTERS: usize = 10;

/// The fraction of active words that must have been used to trigger
/// replenishment.
pub const REPLENISH_THRESHOLD: f64 = 0.7;

/// The admissible lengths of curated words, in letters.
pub const WORD_LENGTHS: RangeInclusive<usize> = 2..=5;

/// The letters used to top up a pool that is too small.
pub const DEFAULT_LETTERS: &str = "가나다라마바사아자차카타파하";

/// The words curated when the lexicon has nothing to offer.
pub const DEMO_WORDS: &[&str] = &[
	"가나다", "나무", "바다", "하늘", "사랑", "학교", "친구", "사과", "우유",
	"고양이"
];

////////////////////////////////////////////////////////////////////////////////
//                                  Curator.                                  //
////////////////////////////////////////////////////////////////////////////////

/// A curated word and the number of times it has been formed on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveWord
{
	/// The word.
	pub word: String,

	/// How many times the word has been formed.
	pub uses: u32
}

/// The curator of the active word set and the letter pool derived from it.
/// The active set and the pool are never empty.
#[derive(Clone, Debug)]
#[must_use]
pub struct WordCurator
{
	/// The active words, oldest first.
	active: VecDeque<ActiveWord>,

	/// The distinct letters available for new pieces.
	letters: Vec<char>
}

impl Default for WordCurator
{
	/// Answer a curator of the [demonstration words](DEMO_WORDS).
	fn default() -> Self { Self::from_words(DEMO_WORDS) }
}

impl WordCurator
{
	/// Construct a curator from an initial batch of random words drawn from
	/// the given lexicon. If the lexicon cannot supply any words, the
	/// [demonstration words](DEMO_WORDS) are curated instead.
	///
	/// # Arguments
	///
	/// * `lexicon` - The lexicon.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// The new curator.
	pub fn new<R: Rng + ?Sized>(lexicon: &mut Lexicon, rng: &mut R) -> Self
	{
		let words = lexicon.sample_words(
			INITIAL_BATCH,
			WORD_LENGTHS,
			&HashSet::new(),
			rng
		);
		if words.is_empty()
		{
			debug!("lexicon offered no words; curating demonstration words");
			return Self::default()
		}
		Self::from_words(&words)
	}

	/// Construct a curator of exactly the given words.
	///
	/// # Arguments
	///
	/// * `words` - The initial active set.
	///
	/// # Returns
	///
	/// The new curator, or a curator of the
	/// [demonstration words](DEMO_WORDS) if `words` is empty.
	pub fn from_words<T: AsRef<str>>(words: &[T]) -> Self
	{
		let mut active = VecDeque::new();
		let mut seen = HashSet::new();
		for word in words
		{
			let word = word.as_ref();
			if !word.is_empty() && seen.insert(word)
			{
				active.push_back(ActiveWord { word: word.to_string(), uses: 0 });
			}
		}
		if active.is_empty()
		{
			return Self::default()
		}
		let mut curator = Self { active, letters: Vec::new() };
		curator.refill();
		debug!(
			"curating {} words over {} letters",
			curator.active.len(),
			curator.letters.len()
		);
		curator
	}

	/// The active words, oldest first.
	#[inline]
	pub fn active_words(&self) -> impl Iterator<Item = &ActiveWord>
	{
		self.active.iter()
	}

	/// The number of active words.
	#[inline]
	#[must_use]
	pub fn active_count(&self) -> usize { self.active.len() }

	/// Check whether the given word is active.
	#[inline]
	#[must_use]
	pub fn is_active(&self, word: &str) -> bool
	{
		self.active.iter().any(|w| w.word == word)
	}

	/// The letters currently available for new pieces.
	#[inline]
	#[must_use]
	pub fn letters(&self) -> &[char] { &self.letters }

	/// The number of active words that have been formed at least once.
	#[inline]
	#[must_use]
	pub fn used_count(&self) -> usize
	{
		self.active.iter().filter(|w| w.uses > 0).count()
	}

	/// Draw a letter uniformly from the pool. The letter leaves the pool, and
	/// the pool is refilled from the active words once it runs low.
	///
	/// # Arguments
	///
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// The letter.
	pub fn sample_letter<R: Rng + ?Sized>(&mut self, rng: &mut R) -> char
	{
		if self.letters.is_empty()
		{
			self.refill();
		}
		let index = rng.random_range(0..self.letters.len());
		let letter = self.letters.swap_remove(index);
		if self.letters.len() < MIN_POOL
		{
			trace!("letter pool low ({}); refilling", self.letters.len());
			self.refill();
		}
		trace!("drew letter: {}", letter);
		letter
	}

	/// Merge the letters of the active words into the pool, and top it up
	/// with [default letters](DEFAULT_LETTERS) if too few distinct letters
	/// result.
	fn refill(&mut self)
	{
		let letters = self.active.iter()
			.flat_map(|w| w.word.chars())
			.collect::<Vec<_>>();
		self.merge_letters(letters);
		let defaults = DEFAULT_LETTERS.chars().collect::<Vec<_>>();
		for c in defaults
		{
			if self.letters.len() >= MIN_DISTINCT_LETTERS
			{
				break
			}
			if !self.letters.contains(&c)
			{
				self.letters.push(c);
			}
		}
	}

	/// Add the given letters to the pool, skipping those already present.
	fn merge_letters<I: IntoIterator<Item = char>>(&mut self, letters: I)
	{
		for c in letters
		{
			if !self.letters.contains(&c)
			{
				self.letters.push(c);
			}
		}
	}

	/// Record that the given word was formed on the board. Words outside the
	/// active set are ignored. Once at least
	/// [70%](REPLENISH_THRESHOLD) of the active words have been used, up to
	/// [`REPLENISH_BATCH`] new words are appended, and the oldest words are
	/// evicted beyond [`ACTIVE_CAP`].
	///
	/// # Arguments
	///
	/// * `word` - The word that was formed.
	/// * `lexicon` - The lexicon to draw new words from.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// The number of words added to the active set.
	pub fn record_usage<R: Rng + ?Sized>(
		&mut self,
		word: &str,
		lexicon: &mut Lexicon,
		rng: &mut R
	) -> usize
	{
		if let Some(active) = self.active.iter_mut().find(|w| w.word == word)
		{
			active.uses += 1;
			trace!("used: {} ({} times)", word, active.uses);
		}
		let used = self.used_count() as f64;
		if used < self.active.len() as f64 * REPLENISH_THRESHOLD
		{
			return 0
		}
		self.replenish(lexicon, rng)
	}

	/// Append up to [`REPLENISH_BATCH`] new distinct words to the active set
	/// and evict the oldest words beyond [`ACTIVE_CAP`].
	///
	/// # Returns
	///
	/// The number of words added.
	fn replenish<R: Rng + ?Sized>(
		&mut self,
		lexicon: &mut Lexicon,
		rng: &mut R
	) -> usize
	{
		let exclude = self.active.iter()
			.map(|w| w.word.clone())
			.collect::<HashSet<_>>();
		let words =
			lexicon.sample_words(REPLENISH_BATCH, WORD_LENGTHS, &exclude, rng);
		let added = words.len();
		for word in words
		{
			self.merge_letters(word.chars().collect::<Vec<_>>());
			self.active.push_back(ActiveWord { word, uses: 0 });
		}
		while self.active.len() > ACTIVE_CAP
		{
			if let Some(evicted) = self.active.pop_front()
			{
				trace!("evicted: {}", evicted.word);
			}
		}
		debug!(
			"replenished {} words; {} active, {} letters",
			added,
			self.active.len(),
			self.letters.len()
		);
		added
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
