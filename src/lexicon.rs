//! # Lexicon
//!
//! Herein is support for the word corpus. The corpus is partitioned into
//! [buckets](BucketKey) by the class of each word's leading character, and
//! every bucket is a [`Dictionary`], which is a prefix tree of words plus a
//! sorted word list. Buckets are fetched lazily through an injected
//! [`BucketLoader`], so the full corpus is never resident unless play demands
//! it. The [`Lexicon`] answers validity, fuzzy (wildcard) and prefix queries,
//! and always falls back to a small built-in word set, so the game remains
//! playable without any external assets.

use std::{
	collections::{BTreeSet, HashMap, HashSet},
	error::Error,
	fmt::{self, Display, Formatter},
	fs::File,
	io::{self, BufRead, BufReader, ErrorKind, Read, Write},
	ops::RangeInclusive,
	path::{Path, PathBuf}
};

use log::{debug, trace, warn};
use pfx::PrefixTreeSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
	board::MIN_WORD_LEN,
	piece::{is_marker, WILDCARD_SYMBOL}
};

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The default number of results of a [prefix search](Lexicon::prefix_search).
pub const DEFAULT_HINT_LIMIT: usize = 20;

/// The points awarded for each letter that is not [common](COMMON_LETTERS).
pub const RARITY_POINTS: u32 = 5;

/// The file stem of the bootstrap word list.
pub const BOOTSTRAP_STEM: &str = "bootstrap";

/// The built-in word set that backs every lexicon, whatever its loader does.
pub const FALLBACK_WORDS: &[&str] = &[
	"가나다", "가방", "가로수", "강아지", "거북이", "고양이", "구름", "기차",
	"나무", "나비", "노래", "다리", "다람쥐", "대한민국", "도서관", "도토리",
	"마음", "무지개", "바다", "바나나", "비행기", "사과", "사다리", "사랑",
	"선생님", "소나무", "아이스크림", "오리", "우유", "자동차", "친구",
	"컴퓨터", "코끼리", "하늘", "학교", "해바라기", "호랑이"
];

/// The 200 most frequent Hangul syllables, in descending order of frequency.
/// Letters outside this table earn [rarity points](RARITY_POINTS).
pub const COMMON_LETTERS: &str = concat!(
	"이다는의에고하가을지서로기사한대수리자도",
	"어나인아정전시일부보제적그주라해있상것들",
	"게요면여장스과성국신동원구만까소위경화문",
	"무방비공생개거우마내모치유실세연물선중오",
	"분계회간저발미재조관진민학말식행명감체반",
	"터점없건차통년교처데두르러려야업금히니를",
	"은께바파타카강산영현단결음운입출양불설본",
	"품심별곳김박최용안역번토종표확호후노누느",
	"늘날남너네녀더덕돈돌되된될뒤드든등따때또",
	"뜻락람랑래량력련령례론료루류률름맞매머먹"
);

////////////////////////////////////////////////////////////////////////////////
//                                Dictionary.                                 //
////////////////////////////////////////////////////////////////////////////////

/// A dictionary is a [`PrefixTreeSet`] of words, accompanied by the same
/// words as a sorted list for enumeration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Dictionary
{
	/// The words, for membership and prefix tests.
	tree: PrefixTreeSet<String>,

	/// The words, sorted.
	words: Vec<String>
}

impl Dictionary
{
	/// Construct an empty dictionary. Same as [`Default::default`].
	#[inline]
	pub fn new() -> Self { Self::default() }

	/// Construct a dictionary containing the given words.
	///
	/// # Arguments
	///
	/// * `words` - The intended content of the dictionary.
	///
	/// # Returns
	///
	/// The new dictionary.
	pub fn from_words<T: AsRef<str>>(words: &[T]) -> Self
	{
		let mut dictionary = Self::new();
		dictionary.populate(words);
		dictionary
	}

	/// Check if the dictionary is empty.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.words.is_empty() }

	/// The number of words in the dictionary.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize { self.words.len() }

	/// Check if the dictionary contains the given word.
	#[inline]
	#[must_use]
	pub fn contains(&self, word: &str) -> bool { self.tree.contains(word) }

	/// Check if the dictionary contains a word with the given prefix.
	#[inline]
	#[must_use]
	pub fn contains_prefix(&self, prefix: &str) -> bool
	{
		self.tree.contains_prefix(prefix)
	}

	/// The words of the dictionary, sorted.
	#[inline]
	#[must_use]
	pub fn words(&self) -> &[String] { &self.words }

	/// Get the words that start with the given prefix, in sorted order.
	///
	/// # Arguments
	///
	/// * `prefix` - The prefix.
	///
	/// # Returns
	///
	/// An iterator over the matching words.
	pub fn words_with_prefix<'a>(
		&'a self,
		prefix: &'a str
	) -> impl Iterator<Item = &'a String> + 'a
	{
		// Words sharing a prefix are contiguous in byte order.
		let start = self.words.partition_point(|w| w.as_str() < prefix);
		self.words[start..].iter().take_while(move |w| w.starts_with(prefix))
	}

	/// Populate the dictionary with the given words. Words are trimmed, and
	/// blank lines, duplicates and words containing a special-piece marker are
	/// skipped.
	///
	/// # Arguments
	///
	/// * `words` - The intended content of the dictionary.
	pub fn populate<T: AsRef<str>>(&mut self, words: &[T])
	{
		for word in words
		{
			let word = word.as_ref().trim();
			if word.is_empty() || word.chars().any(is_marker)
			{
				continue
			}
			if !self.tree.contains(word)
			{
				self.tree.insert(word.to_string());
				self.words.push(word.to_string());
			}
		}
		self.words.sort();
	}

	/// Open a dictionary with the given name. Only the specified directory will
	/// be searched. `name` denotes the dictionary file, sans the extension. If
	/// a binary dictionary (`<name>.dict`) exists _and_ is newer than the text
	/// file (`<name>.txt`), it will be read; otherwise, a text file will be
	/// read and a binary dictionary will be created (to optimize future reads).
	///
	/// # Arguments
	///
	/// * `dir` - The directory to search.
	/// * `name` - The name of the dictionary file.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or read, an error is returned.
	/// * If the file contains invalid data, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn open<T: AsRef<Path>>(dir: T, name: &str) -> Result<Self, io::Error>
	{
		let dict_path = dir.as_ref().join(format!("{}.dict", name));
		let txt_path = dir.as_ref().join(format!("{}.txt", name));
		// Use the binary dictionary only if it's newer than the text
		// dictionary. If either timestamp is unavailable, including because a
		// file is missing, fall back to the text file.
		let binary_is_fresh = dict_path
			.metadata()
			.and_then(|m| m.modified())
			.and_then(|dict_time| {
				txt_path
					.metadata()
					.and_then(|n| n.modified())
					.map(|txt_time| dict_time > txt_time)
			})
			.unwrap_or(false);
		if binary_is_fresh
		{
			let dictionary = Self::deserialize_from_file(&dict_path)?;
			trace!("Read binary dictionary: {}", dict_path.display());
			Ok(dictionary)
		}
		else
		{
			let dictionary = Self::compile(&txt_path, &dict_path)?;
			Ok(dictionary)
		}
	}

	/// Read a text dictionary and write its binary counterpart. Failure to
	/// write the binary dictionary is logged, but not reported.
	///
	/// # Arguments
	///
	/// * `txt_path` - The text dictionary.
	/// * `dict_path` - The binary dictionary to produce.
	///
	/// # Returns
	///
	/// The dictionary read from the text file.
	///
	/// # Errors
	///
	/// If the text file cannot be opened or read, an error is returned.
	pub fn compile<T: AsRef<Path>, U: AsRef<Path>>(
		txt_path: T,
		dict_path: U
	) -> Result<Self, io::Error>
	{
		let dictionary = Self::read_from_file(&txt_path)?;
		trace!("Read text dictionary: {}", txt_path.as_ref().display());
		match dictionary.serialize_to_file(&dict_path)
		{
			Ok(_) => trace!(
				"Wrote binary dictionary: {}",
				dict_path.as_ref().display()
			),
			Err(e) => warn!(
				"Failed to write binary dictionary: {}: {}",
				dict_path.as_ref().display(),
				e
			)
		}
		Ok(dictionary)
	}

	/// Construct a dictionary from the contents of the given file. Each line
	/// in the file is considered a single word.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// If the file cannot be opened or read, an error is returned.
	pub fn read_from_file<T: AsRef<Path>>(path: T) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let reader = BufReader::new(file);
		let words = reader.lines().collect::<Result<Vec<_>, _>>()?;
		Ok(Self::from_words(&words))
	}

	/// Deserialize a dictionary from the given file. The file must contain a
	/// serialized dictionary in [`bincode`](bincode) format.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or read, an error is returned.
	/// * If the file contains invalid data, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn deserialize_from_file<T: AsRef<Path>>(
		path: T
	) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let mut reader = BufReader::new(file);
		let mut content = Vec::new();
		reader.read_to_end(&mut content)?;
		let dictionary = bincode::deserialize(&content)
			.map_err(|_e| ErrorKind::InvalidData)?;
		Ok(dictionary)
	}

	/// Serialize the dictionary to the given file. The dictionary is serialized
	/// in [`bincode`](bincode) format.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or written, an error is returned.
	/// * If the dictionary cannot be encoded, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn serialize_to_file<T: AsRef<Path>>(
		&self,
		path: T
	) -> Result<(), io::Error>
	{
		let mut file = File::create(path)?;
		let content =
			bincode::serialize(self).map_err(|_e| ErrorKind::InvalidData)?;
		file.write_all(&content)?;
		Ok(())
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Buckets.                                  //
////////////////////////////////////////////////////////////////////////////////

/// The class of a word's leading character. Hangul syllables are classified
/// by their initial consonant, with each tense consonant folded into its plain
/// counterpart; everything else is [`Other`](BucketKey::Other).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey
{
	/// ㄱ, ㄲ.
	G,
	/// ㄴ.
	N,
	/// ㄷ, ㄸ.
	D,
	/// ㄹ.
	R,
	/// ㅁ.
	M,
	/// ㅂ, ㅃ.
	B,
	/// ㅅ, ㅆ.
	S,
	/// ㅇ.
	Ng,
	/// ㅈ, ㅉ.
	J,
	/// ㅊ.
	Ch,
	/// ㅋ.
	K,
	/// ㅌ.
	T,
	/// ㅍ.
	P,
	/// ㅎ.
	H,
	/// Anything that is not a Hangul syllable.
	Other
}

impl BucketKey
{
	/// Every bucket key.
	pub const ALL: [BucketKey; 15] = [
		BucketKey::G,
		BucketKey::N,
		BucketKey::D,
		BucketKey::R,
		BucketKey::M,
		BucketKey::B,
		BucketKey::S,
		BucketKey::Ng,
		BucketKey::J,
		BucketKey::Ch,
		BucketKey::K,
		BucketKey::T,
		BucketKey::P,
		BucketKey::H,
		BucketKey::Other
	];

	/// Classify a leading character.
	///
	/// # Arguments
	///
	/// * `c` - The leading character of a word.
	///
	/// # Returns
	///
	/// The bucket key.
	#[must_use]
	pub fn for_char(c: char) -> Self
	{
		const SYLLABLES: RangeInclusive<u32> = 0xAC00..=0xD7A3;
		// 21 medials × 28 finals per initial consonant.
		const SYLLABLES_PER_INITIAL: u32 = 588;
		let code = c as u32;
		if !SYLLABLES.contains(&code)
		{
			return BucketKey::Other
		}
		match (code - SYLLABLES.start()) / SYLLABLES_PER_INITIAL
		{
			0 | 1 => BucketKey::G,
			2 => BucketKey::N,
			3 | 4 => BucketKey::D,
			5 => BucketKey::R,
			6 => BucketKey::M,
			7 | 8 => BucketKey::B,
			9 | 10 => BucketKey::S,
			11 => BucketKey::Ng,
			12 | 13 => BucketKey::J,
			14 => BucketKey::Ch,
			15 => BucketKey::K,
			16 => BucketKey::T,
			17 => BucketKey::P,
			_ => BucketKey::H
		}
	}

	/// Classify a word by its leading character.
	///
	/// # Returns
	///
	/// The bucket key, or `None` if the word is empty.
	#[inline]
	#[must_use]
	pub fn for_word(word: &str) -> Option<Self>
	{
		word.chars().next().map(Self::for_char)
	}

	/// The file stem of the bucket's asset.
	#[must_use]
	pub const fn file_stem(self) -> &'static str
	{
		match self
		{
			BucketKey::G => "g",
			BucketKey::N => "n",
			BucketKey::D => "d",
			BucketKey::R => "r",
			BucketKey::M => "m",
			BucketKey::B => "b",
			BucketKey::S => "s",
			BucketKey::Ng => "ng",
			BucketKey::J => "j",
			BucketKey::Ch => "ch",
			BucketKey::K => "k",
			BucketKey::T => "t",
			BucketKey::P => "p",
			BucketKey::H => "h",
			BucketKey::Other => "other"
		}
	}
}

impl Display for BucketKey
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "{}", self.file_stem())
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Loaders.                                  //
////////////////////////////////////////////////////////////////////////////////

/// The capability to fetch dictionary assets: one bucket per leading-character
/// class, plus an unconditioned bootstrap word list.
pub trait BucketLoader
{
	/// Load the words of a single bucket.
	///
	/// # Errors
	///
	/// [`AssetError::Unavailable`] if the bucket cannot be loaded.
	fn load_bucket(&self, key: BucketKey) -> Result<Dictionary, AssetError>;

	/// Load the bootstrap word list.
	///
	/// # Errors
	///
	/// [`AssetError::Unavailable`] if the list cannot be loaded.
	fn load_bootstrap(&self) -> Result<Dictionary, AssetError>;
}

/// A loader without any assets. Every lexicon built upon it plays with the
/// built-in fallback words only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLoader;

impl BucketLoader for NullLoader
{
	fn load_bucket(&self, key: BucketKey) -> Result<Dictionary, AssetError>
	{
		Err(AssetError::unavailable(key.file_stem(), "no assets"))
	}

	fn load_bootstrap(&self) -> Result<Dictionary, AssetError>
	{
		Err(AssetError::unavailable(BOOTSTRAP_STEM, "no assets"))
	}
}

/// A loader serving words from memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader
{
	/// The words of each bucket.
	buckets: HashMap<BucketKey, Vec<String>>,

	/// The bootstrap words, if any.
	bootstrap: Option<Vec<String>>
}

impl MemoryLoader
{
	/// Construct a loader without any buckets.
	#[inline]
	pub fn new() -> Self { Self::default() }

	/// Add the given words, each to the bucket of its leading character.
	///
	/// # Arguments
	///
	/// * `words` - The words to add.
	///
	/// # Returns
	///
	/// The updated loader.
	pub fn with_words<T: AsRef<str>>(mut self, words: &[T]) -> Self
	{
		for word in words
		{
			let word = word.as_ref().trim();
			if let Some(key) = BucketKey::for_word(word)
			{
				self.buckets.entry(key).or_default().push(word.to_string());
			}
		}
		self
	}

	/// Set the bootstrap word list.
	pub fn with_bootstrap<T: AsRef<str>>(mut self, words: &[T]) -> Self
	{
		self.bootstrap =
			Some(words.iter().map(|w| w.as_ref().to_string()).collect());
		self
	}
}

impl BucketLoader for MemoryLoader
{
	fn load_bucket(&self, key: BucketKey) -> Result<Dictionary, AssetError>
	{
		self.buckets.get(&key)
			.map(|words| Dictionary::from_words(words))
			.ok_or_else(|| AssetError::unavailable(key.file_stem(), "not embedded"))
	}

	fn load_bootstrap(&self) -> Result<Dictionary, AssetError>
	{
		self.bootstrap.as_ref()
			.map(|words| Dictionary::from_words(words))
			.ok_or_else(|| AssetError::unavailable(BOOTSTRAP_STEM, "not embedded"))
	}
}

/// A loader reading one text file per bucket (`<dir>/<stem>.txt`, one word
/// per line) from a directory. Each text file is compiled into a binary
/// counterpart (`<dir>/<stem>.dict`) on first use, and the binary is preferred
/// for as long as it is newer than the text.
#[derive(Clone, Debug)]
pub struct DirectoryLoader
{
	/// The directory containing the dictionary files.
	dir: PathBuf
}

impl DirectoryLoader
{
	/// Construct a loader for the given directory.
	#[inline]
	pub fn new<T: AsRef<Path>>(dir: T) -> Self
	{
		Self { dir: dir.as_ref().to_path_buf() }
	}

	/// The directory containing the dictionary files.
	#[inline]
	#[must_use]
	pub fn dir(&self) -> &Path { &self.dir }

	/// Open the dictionary with the given file stem.
	fn open(&self, stem: &str) -> Result<Dictionary, AssetError>
	{
		Dictionary::open(&self.dir, stem)
			.map_err(|e| AssetError::unavailable(stem, e.to_string()))
	}

	/// Compile every text file in the directory into its binary counterpart,
	/// regardless of freshness. Missing text files are reported, but do not
	/// stop the remaining compilations.
	///
	/// # Returns
	///
	/// The outcome per file stem: the number of words, or the error.
	pub fn compile_all(&self) -> Vec<(&'static str, Result<usize, AssetError>)>
	{
		BucketKey::ALL.iter()
			.map(|key| key.file_stem())
			.chain(std::iter::once(BOOTSTRAP_STEM))
			.map(|stem| {
				let txt_path = self.dir.join(format!("{}.txt", stem));
				let dict_path = self.dir.join(format!("{}.dict", stem));
				let outcome = Dictionary::compile(&txt_path, &dict_path)
					.map(|d| d.len())
					.map_err(|e| AssetError::unavailable(stem, e.to_string()));
				(stem, outcome)
			})
			.collect()
	}
}

impl BucketLoader for DirectoryLoader
{
	fn load_bucket(&self, key: BucketKey) -> Result<Dictionary, AssetError>
	{
		self.open(key.file_stem())
	}

	fn load_bootstrap(&self) -> Result<Dictionary, AssetError>
	{
		self.open(BOOTSTRAP_STEM)
	}
}

/// The complete enumeration of asset failures. These never escape the
/// [`Lexicon`]; it absorbs them and degrades to its fallback words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetError
{
	/// The asset could not be loaded.
	Unavailable
	{
		/// The file stem of the asset.
		key: String,

		/// Why the asset could not be loaded.
		reason: String
	}
}

impl AssetError
{
	fn unavailable(key: &str, reason: impl Into<String>) -> Self
	{
		Self::Unavailable { key: key.to_string(), reason: reason.into() }
	}
}

impl Display for AssetError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Unavailable { key, reason } =>
				write!(f, "asset unavailable: {}: {}", key, reason)
		}
	}
}

impl Error for AssetError {}

////////////////////////////////////////////////////////////////////////////////
//                                  Lexicon.                                  //
////////////////////////////////////////////////////////////////////////////////

/// The load state of a bucket. A bucket absent from the lexicon's map has not
/// been requested yet.
#[derive(Clone, Debug)]
enum BucketState
{
	/// The bucket is resident.
	Loaded(Dictionary),

	/// The loader failed; the bucket will not be requested again.
	Unavailable
}

/// The session's word corpus. The corpus is immutable once loaded, so every
/// validity answer is memoized for the lifetime of the lexicon.
#[must_use]
pub struct Lexicon
{
	/// The source of the buckets and the bootstrap list.
	loader: Box<dyn BucketLoader>,

	/// The requested buckets. At most one load is ever attempted per bucket.
	buckets: HashMap<BucketKey, BucketState>,

	/// The bootstrap list, once requested. Empty if the loader failed.
	bootstrap: Option<Dictionary>,

	/// The words that are always valid.
	fallback: Dictionary,

	/// The letters that do not earn rarity points.
	common_letters: HashSet<char>,

	/// Memoized answers of [`is_valid`](Self::is_valid).
	validity: HashMap<String, bool>,

	/// Memoized answers of [`is_valid_fuzzy`](Self::is_valid_fuzzy).
	resolutions: HashMap<String, Option<String>>
}

impl fmt::Debug for Lexicon
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		f.debug_struct("Lexicon")
			.field("buckets", &self.buckets.keys().collect::<BTreeSet<_>>())
			.field("bootstrap", &self.bootstrap.as_ref().map(Dictionary::len))
			.field("fallback", &self.fallback.len())
			.finish_non_exhaustive()
	}
}

impl Lexicon
{
	/// Construct a lexicon that fetches its buckets from the given loader.
	/// Nothing is loaded yet.
	///
	/// # Arguments
	///
	/// * `loader` - The asset loader.
	///
	/// # Returns
	///
	/// The new lexicon.
	pub fn new<L: BucketLoader + 'static>(loader: L) -> Self
	{
		Self {
			loader: Box::new(loader),
			buckets: HashMap::new(),
			bootstrap: None,
			fallback: Dictionary::from_words(FALLBACK_WORDS),
			common_letters: COMMON_LETTERS.chars().collect(),
			validity: HashMap::new(),
			resolutions: HashMap::new()
		}
	}

	/// Replace the built-in fallback words.
	pub fn with_fallback<T: AsRef<str>>(mut self, words: &[T]) -> Self
	{
		self.fallback = Dictionary::from_words(words);
		self.forget();
		self
	}

	/// Replace the table of common letters.
	pub fn with_common_letters(mut self, letters: &str) -> Self
	{
		self.common_letters = letters.chars().collect();
		self
	}

	/// Drop every memoized answer.
	fn forget(&mut self)
	{
		self.validity.clear();
		self.resolutions.clear();
	}

	/// Load the bootstrap list, if it has not been requested yet. Buckets
	/// remain lazy.
	pub fn warm(&mut self)
	{
		if self.bootstrap.is_some()
		{
			return
		}
		let bootstrap = match self.loader.load_bootstrap()
		{
			Ok(dictionary) =>
			{
				debug!("loaded bootstrap list: {} words", dictionary.len());
				dictionary
			},
			Err(e) =>
			{
				warn!("{}; continuing without bootstrap list", e);
				Dictionary::new()
			}
		};
		self.bootstrap = Some(bootstrap);
	}

	/// Check whether the given bucket is resident.
	#[inline]
	#[must_use]
	pub fn is_loaded(&self, key: BucketKey) -> bool
	{
		matches!(self.buckets.get(&key), Some(BucketState::Loaded(_)))
	}

	/// Ensure that the given bucket has been requested from the loader. A
	/// bucket is requested at most once, whether or not its load succeeds.
	///
	/// # Arguments
	///
	/// * `key` - The bucket.
	pub fn ensure_bucket(&mut self, key: BucketKey)
	{
		if self.buckets.contains_key(&key)
		{
			return
		}
		let state = match self.loader.load_bucket(key)
		{
			Ok(dictionary) =>
			{
				debug!("loaded bucket {}: {} words", key, dictionary.len());
				BucketState::Loaded(dictionary)
			},
			Err(e) =>
			{
				warn!("{}; using fallback words", e);
				BucketState::Unavailable
			}
		};
		self.buckets.insert(key, state);
	}

	/// Get the given bucket, if it is resident.
	#[inline]
	fn bucket(&self, key: BucketKey) -> Option<&Dictionary>
	{
		match self.buckets.get(&key)
		{
			Some(BucketState::Loaded(dictionary)) => Some(dictionary),
			_ => None
		}
	}

	/// All resident dictionaries: the fallback words, the bootstrap list and
	/// the loaded buckets.
	fn resident(&self) -> impl Iterator<Item = &Dictionary>
	{
		std::iter::once(&self.fallback)
			.chain(self.bootstrap.iter())
			.chain(self.buckets.values().filter_map(|state| match state
			{
				BucketState::Loaded(dictionary) => Some(dictionary),
				BucketState::Unavailable => None
			}))
	}

	/// Check whether the given word is valid. Words shorter than
	/// [`MIN_WORD_LEN`] letters never are. The word's bucket is loaded on
	/// demand; if it is unavailable, only the fallback words and the bootstrap
	/// list are consulted.
	///
	/// # Arguments
	///
	/// * `word` - The word to check.
	///
	/// # Returns
	///
	/// `true` if the word is valid, `false` otherwise.
	pub fn is_valid(&mut self, word: &str) -> bool
	{
		if word.chars().count() < MIN_WORD_LEN
		{
			return false
		}
		if let Some(&valid) = self.validity.get(word)
		{
			return valid
		}
		let valid = self.lookup(word);
		trace!("valid: {} => {}", word, valid);
		self.validity.insert(word.to_string(), valid);
		valid
	}

	/// Look up a word without memoization.
	fn lookup(&mut self, word: &str) -> bool
	{
		if word.chars().any(is_marker)
		{
			return false
		}
		if self.fallback.contains(word)
		{
			return true
		}
		self.warm();
		if self.bootstrap.as_ref().is_some_and(|d| d.contains(word))
		{
			return true
		}
		match BucketKey::for_word(word)
		{
			Some(key) =>
			{
				self.ensure_bucket(key);
				self.bucket(key).is_some_and(|d| d.contains(word))
			},
			None => false
		}
	}

	/// Resolve a pattern that may contain [wildcards](WILDCARD_SYMBOL). The
	/// pattern matches a word of the same length that agrees with every fixed
	/// position. When several words match, the first in sorted order wins. A
	/// pattern with a leading wildcard is resolved against every bucket, but
	/// only buckets that were already resident stay resident.
	///
	/// # Arguments
	///
	/// * `pattern` - The pattern to resolve.
	///
	/// # Returns
	///
	/// The concrete word, or `None` if nothing matches.
	pub fn is_valid_fuzzy(&mut self, pattern: &str) -> Option<String>
	{
		let letters = pattern.chars().collect::<Vec<_>>();
		if letters.len() < MIN_WORD_LEN
		{
			return None
		}
		if !letters.contains(&WILDCARD_SYMBOL)
		{
			return self.is_valid(pattern).then(|| pattern.to_string())
		}
		if let Some(resolution) = self.resolutions.get(pattern)
		{
			return resolution.clone()
		}
		self.warm();
		let resolution = match letters[0]
		{
			WILDCARD_SYMBOL => self.resolve_anywhere(&letters),
			first =>
			{
				let key = BucketKey::for_char(first);
				self.ensure_bucket(key);
				let sources = std::iter::once(&self.fallback)
					.chain(self.bootstrap.iter())
					.chain(self.bucket(key));
				best_match(sources, &letters)
			}
		};
		debug!("resolved: {} => {:?}", pattern, resolution);
		self.resolutions.insert(pattern.to_string(), resolution.clone());
		resolution
	}

	/// Resolve a pattern whose first letter is a wildcard, and which could
	/// therefore belong to any bucket. Resident words are searched first. Every
	/// bucket that has never been requested is then loaded, scanned and
	/// dropped again, so that the lookup leaves no additional bucket resident.
	///
	/// # Arguments
	///
	/// * `letters` - The letters of the pattern.
	///
	/// # Returns
	///
	/// The first matching word in sorted order, if any.
	fn resolve_anywhere(&mut self, letters: &[char]) -> Option<String>
	{
		let mut best = best_match(self.resident(), letters);
		for key in BucketKey::ALL
		{
			if self.buckets.contains_key(&key)
			{
				continue
			}
			match self.loader.load_bucket(key)
			{
				Ok(dictionary) =>
				{
					trace!("scanned bucket {} without keeping it", key);
					let found = best_match(std::iter::once(&dictionary), letters);
					best = best.into_iter().chain(found).min();
				},
				Err(e) =>
				{
					warn!("{}; using fallback words", e);
					self.buckets.insert(key, BucketState::Unavailable);
				}
			}
		}
		best
	}

	/// Search the resident words for those starting with the given prefix.
	/// This is best-effort: buckets that have not been loaded yet are not
	/// consulted.
	///
	/// # Arguments
	///
	/// * `prefix` - The prefix.
	/// * `limit` - The maximum number of results.
	///
	/// # Returns
	///
	/// The matching words, sorted and deduplicated.
	#[must_use]
	pub fn prefix_search(&self, prefix: &str, limit: usize) -> Vec<String>
	{
		let mut found = BTreeSet::new();
		for dictionary in self.resident()
		{
			found.extend(
				dictionary.words_with_prefix(prefix).take(limit).cloned()
			);
		}
		found.into_iter().take(limit).collect()
	}

	/// Draw random distinct words from the bootstrap list and the resident
	/// buckets. The fallback words are never drawn.
	///
	/// # Arguments
	///
	/// * `count` - The maximum number of words.
	/// * `lengths` - The admissible lengths, in letters.
	/// * `exclude` - Words that must not be drawn.
	/// * `rng` - The source of randomness.
	///
	/// # Returns
	///
	/// Up to `count` words. Fewer if the corpus runs short, and none if
	/// nothing has been loaded.
	pub fn sample_words<R: Rng + ?Sized>(
		&mut self,
		count: usize,
		lengths: RangeInclusive<usize>,
		exclude: &HashSet<String>,
		rng: &mut R
	) -> Vec<String>
	{
		self.warm();
		let mut seen = HashSet::new();
		// Visit the buckets in key order, so that a seeded generator always
		// draws the same words.
		let mut pool = self.bootstrap.iter()
			.chain(BucketKey::ALL.iter().filter_map(|&key| self.bucket(key)))
			.flat_map(|dictionary| dictionary.words().iter())
			.filter(|word| lengths.contains(&word.chars().count()))
			.filter(|word| !exclude.contains(word.as_str()))
			.filter(|word| seen.insert(word.as_str()))
			.collect::<Vec<_>>();
		// Partial Fisher-Yates: the first `count` slots end up random.
		let count = count.min(pool.len());
		for i in 0..count
		{
			let j = rng.random_range(i..pool.len());
			pool.swap(i, j);
		}
		pool.into_iter().take(count).cloned().collect()
	}

	/// Check whether the given letter is in the table of common letters.
	#[inline]
	#[must_use]
	pub fn is_common_letter(&self, c: char) -> bool
	{
		self.common_letters.contains(&c)
	}

	/// Compute the rarity bonus of a word: [`RARITY_POINTS`] for every letter
	/// that is not common.
	///
	/// # Arguments
	///
	/// * `word` - The word.
	///
	/// # Returns
	///
	/// The rarity bonus.
	#[must_use]
	pub fn rarity_bonus(&self, word: &str) -> u32
	{
		let rare = word.chars().filter(|&c| !self.is_common_letter(c)).count();
		rare as u32 * RARITY_POINTS
	}
}

/// Find the first word, in sorted order, that matches the given pattern in any
/// of the given dictionaries.
fn best_match<'a, I>(dictionaries: I, pattern: &[char]) -> Option<String>
	where I: Iterator<Item = &'a Dictionary>
{
	dictionaries
		.flat_map(|dictionary| dictionary.words().iter())
		.filter(|word| matches_pattern(word, pattern))
		.min()
		.cloned()
}

/// Check whether a word matches a pattern letter for letter, treating
/// [wildcards](WILDCARD_SYMBOL) as matching anything.
fn matches_pattern(word: &str, pattern: &[char]) -> bool
{
	let mut letters = word.chars();
	for &expected in pattern
	{
		match letters.next()
		{
			Some(actual) if expected == WILDCARD_SYMBOL || expected == actual => {}
			_ => return false
		}
	}
	letters.next().is_none()
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
